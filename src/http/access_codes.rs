//! Access code validation and owner-initiated generation.

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use kw_app::usecases::{GenerateAccessCodeInput, ValidateAccessCodeInput};
use kw_app::AccessFlowError;
use kw_core::access::AccessMethod;
use kw_core::{CodeType, PropertyId, UserId};

use crate::http::error::ApiError;
use crate::state::AppState;

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ValidateBody {
    pub property_id: String,
    pub access_code: String,
    pub access_method: Option<String>,
    pub used_by_name: Option<String>,
    pub used_by_contact: Option<String>,
    pub location_data: Option<serde_json::Value>,
}

#[derive(Serialize)]
pub struct ValidateResponse {
    pub valid: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property_name: Option<String>,
}

pub async fn validate(
    State(state): State<AppState>,
    Json(body): Json<ValidateBody>,
) -> Result<Json<ValidateResponse>, ApiError> {
    let access_method = match body.access_method.as_deref() {
        None => AccessMethod::ManualEntry,
        Some(raw) => AccessMethod::parse(raw).ok_or_else(|| {
            ApiError(AccessFlowError::Validation(format!(
                "Unknown access_method: {raw}"
            )))
        })?,
    };
    let validation = state
        .validate_code
        .execute(ValidateAccessCodeInput {
            property_id: PropertyId::from(body.property_id),
            code: body.access_code,
            access_method,
            used_by_name: body.used_by_name,
            used_by_contact: body.used_by_contact,
            location_data: body.location_data,
        })
        .await?;
    Ok(Json(ValidateResponse {
        valid: validation.valid,
        message: validation.message,
        property_name: validation.property_name,
    }))
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GenerateBody {
    pub property_id: String,
    pub code_type: Option<String>,
    pub granted_to: Option<String>,
    pub reason: Option<String>,
    pub expires_in_hours: Option<i64>,
    pub max_uses: Option<i32>,
}

#[derive(Serialize)]
pub struct GenerateResponse {
    pub code_id: String,
    pub access_code: String,
    pub expires_at: DateTime<Utc>,
}

pub async fn generate(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<GenerateBody>,
) -> Result<(StatusCode, Json<GenerateResponse>), ApiError> {
    let granted_by = headers
        .get("x-keyward-user")
        .and_then(|v| v.to_str().ok())
        .filter(|s| !s.is_empty())
        .map(UserId::from);
    let code_type = match body.code_type.as_deref() {
        None => CodeType::Emergency,
        Some(raw) => CodeType::parse(raw).ok_or_else(|| {
            ApiError(AccessFlowError::Validation(format!(
                "Unknown code_type: {raw}"
            )))
        })?,
    };
    let code = state
        .generate_code
        .execute(GenerateAccessCodeInput {
            property_id: PropertyId::from(body.property_id),
            code_type,
            granted_to: body.granted_to,
            reason: body.reason,
            granted_by_user_id: granted_by,
            expires_in_hours: body.expires_in_hours,
            max_uses: body.max_uses,
        })
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(GenerateResponse {
            code_id: code.id.into_inner(),
            access_code: code.code,
            expires_at: code.expires_at,
        }),
    ))
}
