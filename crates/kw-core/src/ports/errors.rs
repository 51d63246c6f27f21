use thiserror::Error;

#[derive(Debug, Error)]
pub enum PropertyRepositoryError {
    #[error("property not found")]
    NotFound,

    #[error("storage error: {0}")]
    Storage(String),
}

#[derive(Debug, Error)]
pub enum AccessCodeRepositoryError {
    #[error("access code not found")]
    NotFound,

    #[error("storage error: {0}")]
    Storage(String),
}

#[derive(Debug, Error)]
pub enum AccessRequestRepositoryError {
    #[error("access request not found")]
    NotFound,

    /// The unique pending index rejected the insert: a pending request for
    /// the same (property, phone, email) tuple already exists.
    #[error("a pending access request already exists for this contact")]
    DuplicatePending,

    #[error("storage error: {0}")]
    Storage(String),
}

#[derive(Debug, Error)]
pub enum VerificationCodeRepositoryError {
    #[error("verification code not found")]
    NotFound,

    #[error("storage error: {0}")]
    Storage(String),
}

#[derive(Debug, Error)]
pub enum DomainRuleRepositoryError {
    #[error("storage error: {0}")]
    Storage(String),
}

#[derive(Debug, Error)]
pub enum AccessLogError {
    #[error("storage error: {0}")]
    Storage(String),
}

#[derive(Debug, Error)]
pub enum SendError {
    #[error("sender is not configured")]
    NotConfigured,

    #[error("delivery failed: {0}")]
    Delivery(String),
}
