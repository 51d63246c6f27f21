//! One-click owner action endpoint.
//!
//! The link lands from an email or SMS client, so the answer is always a
//! human-readable HTML page, never raw JSON. The token in the query string
//! is the whole credential; a wrong token and an unknown request render the
//! same page so the endpoint cannot confirm which request ids exist.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::Html;
use serde::Deserialize;
use tracing::error;

use kw_app::usecases::{DecisionAction, DecisionOutcome};
use kw_app::AccessFlowError;
use kw_core::access::RequestStatus;
use kw_core::RequestId;

use crate::state::AppState;

#[derive(Deserialize)]
pub struct OwnerActionQuery {
    pub request: Option<String>,
    pub token: Option<String>,
    pub action: Option<String>,
}

enum Tone {
    Success,
    Info,
    Error,
}

fn render_page(title: &str, message: &str, tone: Tone) -> Html<String> {
    let color = match tone {
        Tone::Success => "#047857",
        Tone::Info => "#1d4ed8",
        Tone::Error => "#dc2626",
    };
    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
  <head>
    <meta charset="UTF-8" />
    <meta name="viewport" content="width=device-width, initial-scale=1.0" />
    <title>{title}</title>
    <style>
      body {{ font-family: Arial, sans-serif; background: #f3f4f6; margin: 0; padding: 32px; color: #111827; }}
      .card {{ max-width: 540px; margin: 0 auto; background: #fff; padding: 32px; border-radius: 12px; box-shadow: 0 10px 25px rgba(15, 23, 42, 0.1); }}
      h1 {{ color: {color}; font-size: 24px; margin-bottom: 16px; }}
      p {{ line-height: 1.6; font-size: 16px; color: #374151; }}
    </style>
  </head>
  <body>
    <div class="card">
      <h1>{title}</h1>
      <p>{message}</p>
    </div>
  </body>
</html>"#
    ))
}

pub async fn owner_action(
    State(state): State<AppState>,
    Query(query): Query<OwnerActionQuery>,
) -> (StatusCode, Html<String>) {
    let action = query
        .action
        .as_deref()
        .map(str::to_ascii_lowercase)
        .and_then(|a| DecisionAction::parse(&a));
    let (Some(request_id), Some(token), Some(action)) = (query.request, query.token, action)
    else {
        return (
            StatusCode::BAD_REQUEST,
            render_page(
                "Invalid Access Request",
                "The access request link is missing required information or is invalid.",
                Tone::Error,
            ),
        );
    };

    let request_id = RequestId::from(request_id);
    match state.decide.by_token(&request_id, &token, action).await {
        Ok(DecisionOutcome::Decided { status }) => {
            let (title, message) = match status {
                RequestStatus::Approved => (
                    "Access Request Approved",
                    "You have approved the emergency access request. The requester has been notified.",
                ),
                _ => (
                    "Access Request Denied",
                    "You have denied the emergency access request. The requester has been notified.",
                ),
            };
            (StatusCode::OK, render_page(title, message, Tone::Success))
        }
        Ok(DecisionOutcome::AlreadyProcessed { status }) => {
            let message = match status {
                RequestStatus::Approved => "This access request has already been approved.",
                RequestStatus::Denied => "This access request has already been denied.",
                _ => "This access request can no longer be modified.",
            };
            (
                StatusCode::OK,
                render_page("Access Request Already Processed", message, Tone::Info),
            )
        }
        Err(AccessFlowError::Forbidden(_)) | Err(AccessFlowError::NotFound(_)) => (
            StatusCode::FORBIDDEN,
            render_page(
                "Unauthorized",
                "This link is not valid for any access request. Please use the exact link from your email or text message.",
                Tone::Error,
            ),
        ),
        Err(e) => {
            error!("owner action failed: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                render_page(
                    "Unable to Process Request",
                    "We encountered an issue while updating this access request. Please try again later.",
                    Tone::Error,
                ),
            )
        }
    }
}
