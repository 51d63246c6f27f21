//! Owner-facing read over the audit trail.
//!
//! The engine itself never consults the log; this exists for the owner's
//! dashboard only, guarded by property ownership.

use std::sync::Arc;

use kw_core::access::AccessLogEntry;
use kw_core::ids::{PropertyId, UserId};
use kw_core::ports::{AccessLogPort, PropertyRepositoryPort};

use crate::error::AccessFlowError;

const DEFAULT_LIMIT: usize = 50;
const MAX_LIMIT: usize = 500;

pub struct RecentAccessLog {
    log: Arc<dyn AccessLogPort>,
    properties: Arc<dyn PropertyRepositoryPort>,
}

impl RecentAccessLog {
    pub fn new(log: Arc<dyn AccessLogPort>, properties: Arc<dyn PropertyRepositoryPort>) -> Self {
        Self { log, properties }
    }

    pub async fn execute(
        &self,
        owner_user_id: &UserId,
        property_id: &PropertyId,
        limit: Option<usize>,
    ) -> Result<Vec<AccessLogEntry>, AccessFlowError> {
        let property = self
            .properties
            .get_by_id(property_id)
            .await?
            .ok_or_else(|| AccessFlowError::NotFound("Property not found".to_string()))?;
        if property.owner_user_id != *owner_user_id {
            return Err(AccessFlowError::Forbidden(
                "You do not have permission to view this property's access log".to_string(),
            ));
        }
        let limit = limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT);
        Ok(self.log.recent_for_property(property_id, limit).await?)
    }
}
