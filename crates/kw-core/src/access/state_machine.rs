//! Request lifecycle state machine (pure state transitions).
//!
//! ```text
//! pending ──verify──▶ verified ──approve/deny──▶ approved | denied
//!    │                                             ▲
//!    ├──approve/deny──────────────────────────────┘
//!    └──expire──▶ expired
//! ```
//!
//! Owner approval is itself authoritative, so pending → approved/denied is
//! legal without requester-side verification. Terminal states absorb every
//! further event; callers translate [`TransitionError::AlreadyProcessed`]
//! into an idempotent response rather than a failure.

use thiserror::Error;

use super::request::RequestStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestEvent {
    /// Requester proved control of the contact channel.
    VerificationSucceeded,
    /// Requester burned through every verification attempt.
    VerificationExhausted,
    OwnerApproved,
    OwnerDenied,
    ExpiryReached,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("request already in terminal status {0:?}")]
    AlreadyProcessed(RequestStatus),

    #[error("event {event:?} is not legal in status {status:?}")]
    IllegalTransition {
        status: RequestStatus,
        event: RequestEvent,
    },
}

pub struct RequestStateMachine;

impl RequestStateMachine {
    pub fn transition(
        status: RequestStatus,
        event: RequestEvent,
    ) -> Result<RequestStatus, TransitionError> {
        use RequestEvent::*;
        use RequestStatus::*;

        match (status, event) {
            (Pending, VerificationSucceeded) => Ok(Verified),
            (Pending, VerificationExhausted) => Ok(Denied),
            (Pending, ExpiryReached) => Ok(Expired),
            (Pending, OwnerApproved) | (Verified, OwnerApproved) => Ok(Approved),
            (Pending, OwnerDenied) | (Verified, OwnerDenied) => Ok(Denied),

            (Verified, event @ (VerificationSucceeded | VerificationExhausted | ExpiryReached)) => {
                Err(TransitionError::IllegalTransition {
                    status: Verified,
                    event,
                })
            }

            (status @ (Approved | Denied | Expired), _) => {
                Err(TransitionError::AlreadyProcessed(status))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use RequestEvent::*;
    use RequestStatus::*;

    #[test]
    fn pending_verifies() {
        assert_eq!(
            RequestStateMachine::transition(Pending, VerificationSucceeded),
            Ok(Verified)
        );
    }

    #[test]
    fn pending_can_be_decided_directly() {
        assert_eq!(
            RequestStateMachine::transition(Pending, OwnerApproved),
            Ok(Approved)
        );
        assert_eq!(
            RequestStateMachine::transition(Pending, OwnerDenied),
            Ok(Denied)
        );
    }

    #[test]
    fn exhausted_verification_denies() {
        assert_eq!(
            RequestStateMachine::transition(Pending, VerificationExhausted),
            Ok(Denied)
        );
    }

    #[test]
    fn expiry_only_applies_to_pending() {
        assert_eq!(
            RequestStateMachine::transition(Pending, ExpiryReached),
            Ok(Expired)
        );
        assert_eq!(
            RequestStateMachine::transition(Verified, ExpiryReached),
            Err(TransitionError::IllegalTransition {
                status: Verified,
                event: ExpiryReached,
            })
        );
    }

    #[test]
    fn terminal_states_absorb_everything() {
        for status in [Approved, Denied, Expired] {
            for event in [
                VerificationSucceeded,
                VerificationExhausted,
                OwnerApproved,
                OwnerDenied,
                ExpiryReached,
            ] {
                assert_eq!(
                    RequestStateMachine::transition(status, event),
                    Err(TransitionError::AlreadyProcessed(status))
                );
            }
        }
    }

    #[test]
    fn verified_cannot_verify_twice() {
        assert!(matches!(
            RequestStateMachine::transition(Verified, VerificationSucceeded),
            Err(TransitionError::IllegalTransition { .. })
        ));
    }
}
