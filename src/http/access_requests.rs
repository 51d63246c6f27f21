//! JSON endpoints for the access-request lifecycle.

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use kw_app::usecases::{CreateAccessRequestInput, DecisionAction, DecisionOutcome};
use kw_app::AccessFlowError;
use kw_core::access::RequestMeta;
use kw_core::{LocationData, PropertyId, RequestId, UserId};

use crate::http::error::ApiError;
use crate::state::AppState;

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateBody {
    pub property_id: String,
    pub requester_email: Option<String>,
    pub requester_phone: Option<String>,
    pub requester_name: Option<String>,
    pub location_data: Option<LocationData>,
}

#[derive(Serialize)]
pub struct CreateResponse {
    pub request_id: String,
    pub verification_token: String,
    pub expires_at: DateTime<Utc>,
    pub property: PropertySummary,
    pub message: &'static str,
}

#[derive(Serialize)]
pub struct PropertySummary {
    pub name: String,
    pub address: String,
}

fn request_meta(headers: &HeaderMap) -> RequestMeta {
    let header_str = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    RequestMeta {
        ip_address: header_str("x-forwarded-for")
            .map(|chain| chain.split(',').next().unwrap_or("").trim().to_string()),
        user_agent: header_str("user-agent"),
    }
}

pub async fn create(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<CreateBody>,
) -> Result<(StatusCode, Json<CreateResponse>), ApiError> {
    let created = state
        .create
        .execute(CreateAccessRequestInput {
            property_id: PropertyId::from(body.property_id),
            requester_email: body.requester_email,
            requester_phone: body.requester_phone,
            requester_name: body.requester_name,
            location_data: body.location_data,
            meta: request_meta(&headers),
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateResponse {
            request_id: created.request_id.into_inner(),
            verification_token: created.verification_token,
            expires_at: created.expires_at,
            property: PropertySummary {
                name: created.property_name,
                address: created.property_address,
            },
            message:
                "A verification code has been sent to your contact channel. Enter it to continue.",
        }),
    ))
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VerifyBody {
    pub verification_token: String,
    pub verification_code: String,
}

#[derive(Serialize)]
pub struct VerifyResponse {
    pub request_id: String,
    pub status: &'static str,
    pub message: &'static str,
}

pub async fn verify(
    State(state): State<AppState>,
    Json(body): Json<VerifyBody>,
) -> Result<Json<VerifyResponse>, ApiError> {
    let verified = state
        .verify
        .execute(&body.verification_token, &body.verification_code)
        .await?;
    Ok(Json(VerifyResponse {
        request_id: verified.request_id.into_inner(),
        status: verified.status.as_str(),
        message: "Verification successful. Your access request is being reviewed.",
    }))
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DecideBody {
    pub request_id: String,
    pub action: String,
}

#[derive(Serialize)]
pub struct DecideResponse {
    pub request_id: String,
    pub status: String,
    pub already_processed: bool,
}

/// Stand-in session auth: the authenticated owner id arrives in a header
/// set by the fronting proxy.
fn owner_from_headers(headers: &HeaderMap) -> Result<UserId, ApiError> {
    headers
        .get("x-keyward-user")
        .and_then(|v| v.to_str().ok())
        .filter(|s| !s.is_empty())
        .map(UserId::from)
        .ok_or_else(|| ApiError(AccessFlowError::Forbidden("Not authenticated".to_string())))
}

pub async fn decide(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<DecideBody>,
) -> Result<Json<DecideResponse>, ApiError> {
    let owner = owner_from_headers(&headers)?;
    let action = DecisionAction::parse(&body.action).ok_or_else(|| {
        ApiError(AccessFlowError::Validation(
            "Invalid action. Must be \"approve\" or \"deny\"".to_string(),
        ))
    })?;
    let request_id = RequestId::from(body.request_id);
    let outcome = state.decide.by_owner(&request_id, &owner, action).await?;
    let (status, already_processed) = match outcome {
        DecisionOutcome::Decided { status } => (status, false),
        DecisionOutcome::AlreadyProcessed { status } => (status, true),
    };
    Ok(Json(DecideResponse {
        request_id: request_id.into_inner(),
        status: status.as_str().to_string(),
        already_processed,
    }))
}

#[derive(Serialize)]
pub struct PendingResponse {
    pub pending: Vec<PendingEntry>,
    pub count: usize,
}

#[derive(Serialize)]
pub struct PendingEntry {
    pub request_id: String,
    pub property_id: String,
    pub requester_name: Option<String>,
    pub requester_email: Option<String>,
    pub requester_phone: Option<String>,
    pub status: &'static str,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

pub async fn pending(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<PendingResponse>, ApiError> {
    let owner = owner_from_headers(&headers)?;
    let requests = state.pending.execute(&owner).await?;
    let pending: Vec<PendingEntry> = requests
        .into_iter()
        .map(|r| PendingEntry {
            request_id: r.id.to_string(),
            property_id: r.property_id.to_string(),
            requester_name: r.requester_name,
            requester_email: r.requester_email,
            requester_phone: r.requester_phone,
            status: r.status.as_str(),
            created_at: r.created_at,
            expires_at: r.expires_at,
        })
        .collect();
    let count = pending.len();
    Ok(Json(PendingResponse { pending, count }))
}
