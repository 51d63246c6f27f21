//! Requester-side verification: prove control of the contact channel.

use std::sync::Arc;

use tracing::{info, warn};

use kw_core::access::{RequestEvent, RequestStateMachine, RequestStatus, VerificationOutcome};
use kw_core::ids::RequestId;
use kw_core::ports::{
    AccessRequestRepositoryPort, ClockPort, VerificationCodeRepositoryPort,
};

use crate::access_logger::AccessLogger;
use crate::error::AccessFlowError;

#[derive(Debug, Clone)]
pub struct VerifiedRequest {
    pub request_id: RequestId,
    pub status: RequestStatus,
}

pub struct VerifyAccessRequest {
    requests: Arc<dyn AccessRequestRepositoryPort>,
    verifications: Arc<dyn VerificationCodeRepositoryPort>,
    logger: AccessLogger,
    clock: Arc<dyn ClockPort>,
}

impl VerifyAccessRequest {
    pub fn new(
        requests: Arc<dyn AccessRequestRepositoryPort>,
        verifications: Arc<dyn VerificationCodeRepositoryPort>,
        logger: AccessLogger,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        Self {
            requests,
            verifications,
            logger,
            clock,
        }
    }

    pub async fn execute(
        &self,
        verification_token: &str,
        submitted_code: &str,
    ) -> Result<VerifiedRequest, AccessFlowError> {
        let now = self.clock.now();
        let request = self
            .requests
            .find_pending_by_token(verification_token)
            .await?
            .ok_or_else(|| {
                AccessFlowError::NotFound("Invalid or expired verification token".to_string())
            })?;

        // Lazy expiry: a pending request past its deadline flips to expired
        // before anything else happens.
        if request.is_expired_at(now) {
            let _ = RequestStateMachine::transition(request.status, RequestEvent::ExpiryReached)
                .map_err(|e| AccessFlowError::InvalidTransition(e.to_string()))?;
            self.requests
                .transition_status(
                    &request.id,
                    RequestStatus::Pending,
                    RequestStatus::Expired,
                    now,
                )
                .await?;
            return Err(AccessFlowError::Gone(
                "Access request has expired".to_string(),
            ));
        }

        let code = self
            .verifications
            .find_unverified_by_request(&request.id)
            .await?
            .ok_or(AccessFlowError::InvalidCode {
                attempts_left: None,
            })?;

        match code.evaluate(submitted_code, now) {
            VerificationOutcome::AlreadyVerified => Err(AccessFlowError::InvalidCode {
                attempts_left: None,
            }),
            VerificationOutcome::Expired => Err(AccessFlowError::Gone(
                "Verification code has expired".to_string(),
            )),
            VerificationOutcome::AttemptsExhausted if code.attempts_exhausted() => {
                // Already at the ceiling before this try; the request may
                // have been denied by an earlier call, the write is
                // conditional either way.
                self.deny_exhausted(&request.id).await;
                Err(AccessFlowError::TooManyAttempts)
            }
            VerificationOutcome::AttemptsExhausted | VerificationOutcome::Mismatch { .. } => {
                // Increment-then-check: the stored counter is authoritative
                // so racing retries cannot win a free attempt.
                let attempts = self.verifications.increment_attempts(&code.id).await?;
                if attempts >= code.max_attempts {
                    self.deny_exhausted(&request.id).await;
                    if let Some(denied) = self.requests.find_by_id(&request.id).await? {
                        self.logger.verification_denied(&denied).await;
                    }
                    return Err(AccessFlowError::TooManyAttempts);
                }
                Err(AccessFlowError::InvalidCode {
                    attempts_left: Some(code.max_attempts - attempts),
                })
            }
            VerificationOutcome::Verified => {
                if !self.verifications.mark_verified(&code.id, now).await? {
                    // A concurrent check claimed the code first.
                    return Err(AccessFlowError::InvalidCode {
                        attempts_left: None,
                    });
                }
                let next =
                    RequestStateMachine::transition(request.status, RequestEvent::VerificationSucceeded)
                        .map_err(|e| AccessFlowError::InvalidTransition(e.to_string()))?;
                let moved = self
                    .requests
                    .transition_status(&request.id, RequestStatus::Pending, next, now)
                    .await?;
                if !moved {
                    return Err(AccessFlowError::NotFound(
                        "Invalid or expired verification token".to_string(),
                    ));
                }
                self.logger.request_verified(&request).await;
                info!(request_id = %request.id, "access request verified");
                Ok(VerifiedRequest {
                    request_id: request.id,
                    status: next,
                })
            }
        }
    }

    async fn deny_exhausted(&self, request_id: &RequestId) {
        match self
            .requests
            .transition_status(
                request_id,
                RequestStatus::Pending,
                RequestStatus::Denied,
                self.clock.now(),
            )
            .await
        {
            Ok(true) => {
                info!(request_id = %request_id, "request denied after exhausted verification attempts")
            }
            Ok(false) => {}
            Err(e) => warn!(request_id = %request_id, "failed to deny exhausted request: {e}"),
        }
    }
}
