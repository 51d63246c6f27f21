use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::access::{AccessRequest, RequestStatus};
use crate::ids::{PropertyId, RequestId};

use super::errors::AccessRequestRepositoryError;

/// Outcome of the conditional owner-decision update.
#[derive(Debug, Clone, PartialEq)]
pub enum DecideWriteOutcome {
    /// This call won the conditional write; the updated row is returned.
    Updated(AccessRequest),
    /// No row matched `(id, token, decidable status)` — either a concurrent
    /// call already decided the request, or the token/id pair is wrong.
    NoRowMatched,
}

#[async_trait]
pub trait AccessRequestRepositoryPort: Send + Sync {
    /// Insert a new pending request. The storage layer enforces the
    /// single-pending-per-contact invariant with a unique partial index and
    /// reports violations as [`AccessRequestRepositoryError::DuplicatePending`].
    async fn insert(&self, request: &AccessRequest) -> Result<(), AccessRequestRepositoryError>;

    async fn find_by_id(
        &self,
        id: &RequestId,
    ) -> Result<Option<AccessRequest>, AccessRequestRepositoryError>;

    /// Lookup by bearer token, restricted to `pending` rows (the verify
    /// path never touches other statuses).
    async fn find_pending_by_token(
        &self,
        verification_token: &str,
    ) -> Result<Option<AccessRequest>, AccessRequestRepositoryError>;

    /// Application-level duplicate pre-check; the unique index stays the
    /// real guard.
    async fn has_pending_for_contact(
        &self,
        property_id: &PropertyId,
        requester_phone: Option<&str>,
        requester_email: Option<&str>,
    ) -> Result<bool, AccessRequestRepositoryError>;

    /// Single conditional write:
    /// `UPDATE ... SET status = to_status [, approved_at = now]
    ///  WHERE id = ? AND verification_token = ? AND status IN ('pending','verified')`.
    /// Exactly one of two concurrent calls can observe an affected row.
    async fn decide(
        &self,
        id: &RequestId,
        verification_token: &str,
        to_status: RequestStatus,
        now: DateTime<Utc>,
    ) -> Result<DecideWriteOutcome, AccessRequestRepositoryError>;

    /// Conditional `from → to` transition without a token guard (verify,
    /// deny-on-exhaustion, lazy expiry). Returns false when no row matched.
    async fn transition_status(
        &self,
        id: &RequestId,
        from: RequestStatus,
        to: RequestStatus,
        now: DateTime<Utc>,
    ) -> Result<bool, AccessRequestRepositoryError>;

    /// Bulk lazy expiry: every pending row past its deadline becomes
    /// expired. Returns the number of rows swept.
    async fn sweep_expired(&self, now: DateTime<Utc>)
        -> Result<usize, AccessRequestRepositoryError>;

    /// Pending/verified requests across a set of properties, newest first.
    async fn list_decidable_for_properties(
        &self,
        property_ids: &[PropertyId],
    ) -> Result<Vec<AccessRequest>, AccessRequestRepositoryError>;
}
