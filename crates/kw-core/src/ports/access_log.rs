use async_trait::async_trait;

use crate::access::AccessLogEntry;
use crate::ids::PropertyId;

use super::errors::AccessLogError;

/// Append-only audit sink. No update or delete operations are exposed.
#[async_trait]
pub trait AccessLogPort: Send + Sync {
    async fn append(&self, entry: &AccessLogEntry) -> Result<(), AccessLogError>;

    /// Owner-facing read; the engine itself never consults the log.
    async fn recent_for_property(
        &self,
        property_id: &PropertyId,
        limit: usize,
    ) -> Result<Vec<AccessLogEntry>, AccessLogError>;
}
