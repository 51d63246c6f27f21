use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::access::VerificationCode;
use crate::ids::{RequestId, VerificationCodeId};

use super::errors::VerificationCodeRepositoryError;

#[async_trait]
pub trait VerificationCodeRepositoryPort: Send + Sync {
    async fn insert(&self, code: &VerificationCode)
        -> Result<(), VerificationCodeRepositoryError>;

    /// The latest unverified code for a request, if any.
    async fn find_unverified_by_request(
        &self,
        request_id: &RequestId,
    ) -> Result<Option<VerificationCode>, VerificationCodeRepositoryError>;

    /// Atomic `attempts = attempts + 1`, returning the post-increment
    /// value. Increment-then-check keeps the ceiling monotonic under races.
    async fn increment_attempts(
        &self,
        id: &VerificationCodeId,
    ) -> Result<i32, VerificationCodeRepositoryError>;

    /// Stamp `verified_at` iff the row is still unverified; false when a
    /// concurrent check already claimed it.
    async fn mark_verified(
        &self,
        id: &VerificationCodeId,
        now: DateTime<Utc>,
    ) -> Result<bool, VerificationCodeRepositoryError>;
}
