//! Owner dashboard listing of requests still awaiting a decision.

use std::sync::Arc;

use tracing::debug;

use kw_core::ids::UserId;
use kw_core::ports::{AccessRequestRepositoryPort, ClockPort, PropertyRepositoryPort};
use kw_core::AccessRequest;

use crate::error::AccessFlowError;

pub struct PendingRequestsForOwner {
    requests: Arc<dyn AccessRequestRepositoryPort>,
    properties: Arc<dyn PropertyRepositoryPort>,
    clock: Arc<dyn ClockPort>,
}

impl PendingRequestsForOwner {
    pub fn new(
        requests: Arc<dyn AccessRequestRepositoryPort>,
        properties: Arc<dyn PropertyRepositoryPort>,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        Self {
            requests,
            properties,
            clock,
        }
    }

    /// Sweeps stale pending rows first, so the listing never shows a
    /// request that would fail the moment the owner acted on it.
    pub async fn execute(
        &self,
        owner_user_id: &UserId,
    ) -> Result<Vec<AccessRequest>, AccessFlowError> {
        let swept = self.requests.sweep_expired(self.clock.now()).await?;
        if swept > 0 {
            debug!(swept, "expired stale pending requests");
        }

        let property_ids = self.properties.list_ids_for_owner(owner_user_id).await?;
        if property_ids.is_empty() {
            return Ok(Vec::new());
        }
        Ok(self
            .requests
            .list_decidable_for_properties(&property_ids)
            .await?)
    }
}
