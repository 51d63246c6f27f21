//! Auto-provisioning half of the access code registry.
//!
//! An emergency request must never be blocked just because the owner forgot
//! to generate a code, so the first request against a bare property mints a
//! long-lived emergency code.

use std::sync::Arc;

use chrono::Duration;
use tracing::info;

use kw_core::access::{AccessCode, CodeType};
use kw_core::ids::PropertyId;
use kw_core::ports::{AccessCodeRepositoryPort, ClockPort};
use kw_core::{token, AccessCodeId};

use crate::error::AccessFlowError;

/// Auto-provisioned codes live for a year and have no use ceiling.
const AUTO_CODE_VALIDITY_DAYS: i64 = 365;

pub struct EnsureActiveCode {
    codes: Arc<dyn AccessCodeRepositoryPort>,
    clock: Arc<dyn ClockPort>,
}

impl EnsureActiveCode {
    pub fn new(codes: Arc<dyn AccessCodeRepositoryPort>, clock: Arc<dyn ClockPort>) -> Self {
        Self { codes, clock }
    }

    /// Return the property's usable code, creating one when none exists.
    pub async fn execute(&self, property_id: &PropertyId) -> Result<AccessCode, AccessFlowError> {
        let now = self.clock.now();
        if let Some(existing) = self.codes.latest_usable(property_id, now).await? {
            return Ok(existing);
        }

        let code = AccessCode {
            id: AccessCodeId::generate(),
            property_id: property_id.clone(),
            code: token::generate_access_code(),
            code_type: CodeType::Emergency,
            granted_to: Some("Emergency Access".to_string()),
            reason: Some("Auto-generated for emergency access request".to_string()),
            granted_by_user_id: None,
            expires_at: now + Duration::days(AUTO_CODE_VALIDITY_DAYS),
            max_uses: None,
            use_count: 0,
            is_active: true,
            created_at: now,
        };
        self.codes.insert(&code).await?;
        info!(property_id = %property_id, code_id = %code.id, "auto-provisioned emergency access code");
        Ok(code)
    }
}
