//! Advisory domain screening endpoint.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::state::AppState;

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CheckBody {
    pub email: String,
}

#[derive(Serialize)]
pub struct CheckResponse {
    pub allowed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    pub message: String,
}

pub async fn check(
    State(state): State<AppState>,
    Json(body): Json<CheckBody>,
) -> Json<CheckResponse> {
    let check = state.check_domain.execute(&body.email).await;
    Json(CheckResponse {
        allowed: check.allowed,
        domain: check.domain,
        message: check.message,
    })
}
