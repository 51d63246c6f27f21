//! Error taxonomy for the state-transition path.
//!
//! Callers branch on the variant, not on message text; the HTTP layer maps
//! each variant to a status code. Notification and audit-log failures never
//! surface here — they degrade to logged warnings.

use thiserror::Error;

use kw_core::ports::{
    AccessCodeRepositoryError, AccessLogError, AccessRequestRepositoryError,
    DomainRuleRepositoryError, PropertyRepositoryError, VerificationCodeRepositoryError,
};

#[derive(Debug, Error)]
pub enum AccessFlowError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Gone(String),

    /// Wrong verification code; retryable while attempts remain.
    #[error("Invalid verification code")]
    InvalidCode { attempts_left: Option<i32> },

    #[error("Maximum verification attempts exceeded")]
    TooManyAttempts,

    #[error("{0}")]
    InvalidTransition(String),

    /// Malformed or incomplete input, rejected at the boundary.
    #[error("{0}")]
    Validation(String),

    /// Storage or provider failure on the authoritative path.
    #[error("upstream failure: {0}")]
    Upstream(String),
}

impl From<PropertyRepositoryError> for AccessFlowError {
    fn from(e: PropertyRepositoryError) -> Self {
        match e {
            PropertyRepositoryError::NotFound => {
                AccessFlowError::NotFound("Property not found".to_string())
            }
            PropertyRepositoryError::Storage(msg) => AccessFlowError::Upstream(msg),
        }
    }
}

impl From<AccessCodeRepositoryError> for AccessFlowError {
    fn from(e: AccessCodeRepositoryError) -> Self {
        match e {
            AccessCodeRepositoryError::NotFound => {
                AccessFlowError::NotFound("Access code not found".to_string())
            }
            AccessCodeRepositoryError::Storage(msg) => AccessFlowError::Upstream(msg),
        }
    }
}

impl From<AccessRequestRepositoryError> for AccessFlowError {
    fn from(e: AccessRequestRepositoryError) -> Self {
        match e {
            AccessRequestRepositoryError::NotFound => {
                AccessFlowError::NotFound("Access request not found".to_string())
            }
            AccessRequestRepositoryError::DuplicatePending => AccessFlowError::Conflict(
                "Access request already pending for this contact".to_string(),
            ),
            AccessRequestRepositoryError::Storage(msg) => AccessFlowError::Upstream(msg),
        }
    }
}

impl From<VerificationCodeRepositoryError> for AccessFlowError {
    fn from(e: VerificationCodeRepositoryError) -> Self {
        match e {
            VerificationCodeRepositoryError::NotFound => {
                AccessFlowError::NotFound("Verification code not found".to_string())
            }
            VerificationCodeRepositoryError::Storage(msg) => AccessFlowError::Upstream(msg),
        }
    }
}

impl From<DomainRuleRepositoryError> for AccessFlowError {
    fn from(e: DomainRuleRepositoryError) -> Self {
        match e {
            DomainRuleRepositoryError::Storage(msg) => AccessFlowError::Upstream(msg),
        }
    }
}

impl From<AccessLogError> for AccessFlowError {
    fn from(e: AccessLogError) -> Self {
        match e {
            AccessLogError::Storage(msg) => AccessFlowError::Upstream(msg),
        }
    }
}
