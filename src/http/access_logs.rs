//! Owner-facing audit trail listing.

use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use kw_app::AccessFlowError;
use kw_core::{PropertyId, UserId};

use crate::http::error::ApiError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct LogQuery {
    pub property_id: String,
    pub limit: Option<usize>,
}

#[derive(Serialize)]
pub struct LogResponse {
    pub entries: Vec<LogEntry>,
    pub count: usize,
}

#[derive(Serialize)]
pub struct LogEntry {
    pub access_method: &'static str,
    pub used_by_name: Option<String>,
    pub used_by_contact: Option<String>,
    pub request_id: Option<String>,
    pub access_code_id: Option<String>,
    pub used_at: DateTime<Utc>,
}

pub async fn list(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<LogQuery>,
) -> Result<Json<LogResponse>, ApiError> {
    let owner = headers
        .get("x-keyward-user")
        .and_then(|v| v.to_str().ok())
        .filter(|s| !s.is_empty())
        .map(UserId::from)
        .ok_or_else(|| ApiError(AccessFlowError::Forbidden("Not authenticated".to_string())))?;

    let entries = state
        .recent_log
        .execute(&owner, &PropertyId::from(query.property_id), query.limit)
        .await?;
    let entries: Vec<LogEntry> = entries
        .into_iter()
        .map(|e| LogEntry {
            access_method: e.access_method.as_str(),
            used_by_name: e.used_by_name,
            used_by_contact: e.used_by_contact,
            request_id: e.request_id.map(|r| r.into_inner()),
            access_code_id: e.access_code_id.map(|c| c.into_inner()),
            used_at: e.used_at,
        })
        .collect();
    let count = entries.len();
    Ok(Json(LogResponse { entries, count }))
}
