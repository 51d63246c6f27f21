//! HTTP surface: JSON endpoints for the lifecycle plus the HTML
//! owner-action page.

pub mod access_codes;
pub mod access_logs;
pub mod access_requests;
pub mod domains;
pub mod error;
pub mod owner_action;

use axum::routing::{get, post};
use axum::Router;

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/api/access-requests", post(access_requests::create))
        .route("/api/access-requests/verify", post(access_requests::verify))
        .route("/api/access-requests/decide", post(access_requests::decide))
        .route("/api/access-requests/pending", get(access_requests::pending))
        .route(
            "/api/access-requests/owner-action",
            get(owner_action::owner_action),
        )
        .route("/api/access-codes/validate", post(access_codes::validate))
        .route("/api/access-codes/generate", post(access_codes::generate))
        .route("/api/access-logs", get(access_logs::list))
        .route("/api/domains/check", post(domains::check))
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}
