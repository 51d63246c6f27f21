use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::access::AccessCode;
use crate::ids::{AccessCodeId, PropertyId};

use super::errors::AccessCodeRepositoryError;

#[async_trait]
pub trait AccessCodeRepositoryPort: Send + Sync {
    async fn insert(&self, code: &AccessCode) -> Result<(), AccessCodeRepositoryError>;

    /// Most recently created code that is active, unexpired and under its
    /// use ceiling at `now`; None when the property has no usable code.
    async fn latest_usable(
        &self,
        property_id: &PropertyId,
        now: DateTime<Utc>,
    ) -> Result<Option<AccessCode>, AccessCodeRepositoryError>;

    /// Exact lookup by code value within one property (active rows only).
    async fn find_by_value(
        &self,
        property_id: &PropertyId,
        code: &str,
    ) -> Result<Option<AccessCode>, AccessCodeRepositoryError>;

    /// Atomic `use_count = use_count + 1`; concurrent disclosures must not
    /// lose updates.
    async fn record_use(&self, id: &AccessCodeId) -> Result<(), AccessCodeRepositoryError>;
}
