//! Owner decision: approve or deny, via one-click link token or an
//! authenticated owner session.
//!
//! The status change is one conditional write; whichever call observes an
//! affected row is the single winner and runs disclosure and notification.
//! Everyone else gets the idempotent "already processed" answer.

use std::sync::Arc;

use tracing::{info, warn};

use kw_core::access::RequestStatus;
use kw_core::ids::{RequestId, UserId};
use kw_core::ports::{
    AccessCodeRepositoryPort, AccessRequestRepositoryPort, ClockPort, DecideWriteOutcome,
    PropertyRepositoryPort,
};
use kw_core::{token, AccessRequest, Property};

use crate::access_logger::AccessLogger;
use crate::error::AccessFlowError;
use crate::notify::NotificationDispatcher;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecisionAction {
    Approve,
    Deny,
}

impl DecisionAction {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "approve" => Some(DecisionAction::Approve),
            "deny" => Some(DecisionAction::Deny),
            _ => None,
        }
    }

    fn target_status(&self) -> RequestStatus {
        match self {
            DecisionAction::Approve => RequestStatus::Approved,
            DecisionAction::Deny => RequestStatus::Denied,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecisionOutcome {
    /// This call performed the transition.
    Decided { status: RequestStatus },
    /// The request was already terminal; nothing changed. Stale email links
    /// get clicked twice, so this is a calm answer, not an error.
    AlreadyProcessed { status: RequestStatus },
}

pub struct DecideAccessRequest {
    requests: Arc<dyn AccessRequestRepositoryPort>,
    properties: Arc<dyn PropertyRepositoryPort>,
    codes: Arc<dyn AccessCodeRepositoryPort>,
    dispatcher: Arc<NotificationDispatcher>,
    logger: AccessLogger,
    clock: Arc<dyn ClockPort>,
}

impl DecideAccessRequest {
    pub fn new(
        requests: Arc<dyn AccessRequestRepositoryPort>,
        properties: Arc<dyn PropertyRepositoryPort>,
        codes: Arc<dyn AccessCodeRepositoryPort>,
        dispatcher: Arc<NotificationDispatcher>,
        logger: AccessLogger,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        Self {
            requests,
            properties,
            codes,
            dispatcher,
            logger,
            clock,
        }
    }

    /// Token-authenticated path used by owner-action links. A missing
    /// request and a wrong token are the same `Forbidden` answer, so the
    /// endpoint cannot be used as an oracle for valid request ids.
    pub async fn by_token(
        &self,
        request_id: &RequestId,
        verification_token: &str,
        action: DecisionAction,
    ) -> Result<DecisionOutcome, AccessFlowError> {
        const UNAUTHORIZED: &str =
            "The link is not valid for this access request. Use the exact link from your message.";

        let Some(request) = self.requests.find_by_id(request_id).await? else {
            return Err(AccessFlowError::Forbidden(UNAUTHORIZED.to_string()));
        };
        if !token::token_matches(&request.verification_token, verification_token) {
            return Err(AccessFlowError::Forbidden(UNAUTHORIZED.to_string()));
        }
        if !request.status.is_decidable() {
            return Ok(DecisionOutcome::AlreadyProcessed {
                status: request.status,
            });
        }
        self.decide(request, action, None).await
    }

    /// Session-authenticated path: the caller proved who they are, so the
    /// guard is property ownership instead of the link token.
    pub async fn by_owner(
        &self,
        request_id: &RequestId,
        owner_user_id: &UserId,
        action: DecisionAction,
    ) -> Result<DecisionOutcome, AccessFlowError> {
        let request = self
            .requests
            .find_by_id(request_id)
            .await?
            .ok_or_else(|| AccessFlowError::NotFound("Access request not found".to_string()))?;
        let property = self.load_property(&request).await?;
        if property.owner_user_id != *owner_user_id {
            return Err(AccessFlowError::Forbidden(
                "You do not have permission to decide this request".to_string(),
            ));
        }
        if !request.status.is_decidable() {
            return Err(AccessFlowError::InvalidTransition(format!(
                "Request cannot be decided. Current status: {}",
                request.status.as_str()
            )));
        }
        self.decide(request, action, Some(owner_user_id.clone())).await
    }

    async fn decide(
        &self,
        request: AccessRequest,
        action: DecisionAction,
        actor: Option<UserId>,
    ) -> Result<DecisionOutcome, AccessFlowError> {
        let to_status = action.target_status();
        let now = self.clock.now();

        let outcome = self
            .requests
            .decide(&request.id, &request.verification_token, to_status, now)
            .await?;
        let updated = match outcome {
            DecideWriteOutcome::Updated(updated) => updated,
            DecideWriteOutcome::NoRowMatched => {
                // Lost the race: report whatever terminal status won.
                let current = self
                    .requests
                    .find_by_id(&request.id)
                    .await?
                    .ok_or_else(|| {
                        AccessFlowError::NotFound("Access request not found".to_string())
                    })?;
                return Ok(DecisionOutcome::AlreadyProcessed {
                    status: current.status,
                });
            }
        };

        let approved = to_status == RequestStatus::Approved;
        if approved {
            self.disclose(&updated).await;
        }
        self.logger
            .request_decided(&updated, approved, actor.as_ref().map(|a| a.as_str()))
            .await;

        // Transition is durable; telling the requester is best-effort.
        match self.load_property(&updated).await {
            Ok(property) => {
                self.dispatcher
                    .notify_requester_of_decision(
                        &updated,
                        &property,
                        approved,
                        property.keysafe.as_ref().filter(|_| approved),
                    )
                    .await;
            }
            Err(e) => {
                warn!(request_id = %updated.id, "skipping decision notice, property load failed: {e}")
            }
        }

        info!(
            request_id = %updated.id,
            status = updated.status.as_str(),
            "access request decided"
        );
        Ok(DecisionOutcome::Decided {
            status: updated.status,
        })
    }

    /// Disclosure bookkeeping: find the code the request referenced, bump
    /// its use count atomically and append the disclosure log entry.
    async fn disclose(&self, request: &AccessRequest) {
        let code = match self
            .codes
            .find_by_value(&request.property_id, &request.access_code_entered)
            .await
        {
            Ok(Some(code)) => code,
            Ok(None) => {
                warn!(
                    request_id = %request.id,
                    "approved request references unknown access code, skipping use-count"
                );
                return;
            }
            Err(e) => {
                warn!(request_id = %request.id, "access code lookup failed: {e}");
                return;
            }
        };
        if let Err(e) = self.codes.record_use(&code.id).await {
            warn!(code_id = %code.id, "failed to record code use: {e}");
        }
        self.logger.code_disclosed(request, &code.id).await;
    }

    async fn load_property(&self, request: &AccessRequest) -> Result<Property, AccessFlowError> {
        self.properties
            .get_by_id(&request.property_id)
            .await?
            .ok_or_else(|| AccessFlowError::NotFound("Property not found".to_string()))
    }
}
