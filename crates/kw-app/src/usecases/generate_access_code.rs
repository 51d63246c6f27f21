//! Owner-initiated access code creation.

use std::sync::Arc;

use chrono::Duration;
use tracing::info;

use kw_core::access::{AccessCode, CodeType};
use kw_core::ids::{AccessCodeId, PropertyId, UserId};
use kw_core::ports::{AccessCodeRepositoryPort, ClockPort, PropertyRepositoryPort};
use kw_core::token;

use crate::error::AccessFlowError;

const DEFAULT_VALIDITY_HOURS: i64 = 24;

#[derive(Debug, Clone)]
pub struct GenerateAccessCodeInput {
    pub property_id: PropertyId,
    pub code_type: CodeType,
    pub granted_to: Option<String>,
    pub reason: Option<String>,
    pub granted_by_user_id: Option<UserId>,
    pub expires_in_hours: Option<i64>,
    pub max_uses: Option<i32>,
}

pub struct GenerateAccessCode {
    codes: Arc<dyn AccessCodeRepositoryPort>,
    properties: Arc<dyn PropertyRepositoryPort>,
    clock: Arc<dyn ClockPort>,
}

impl GenerateAccessCode {
    pub fn new(
        codes: Arc<dyn AccessCodeRepositoryPort>,
        properties: Arc<dyn PropertyRepositoryPort>,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        Self {
            codes,
            properties,
            clock,
        }
    }

    pub async fn execute(
        &self,
        input: GenerateAccessCodeInput,
    ) -> Result<AccessCode, AccessFlowError> {
        let property = self
            .properties
            .get_by_id(&input.property_id)
            .await?
            .ok_or_else(|| AccessFlowError::NotFound("Property not found".to_string()))?;

        let hours = input.expires_in_hours.unwrap_or(DEFAULT_VALIDITY_HOURS);
        if hours <= 0 {
            return Err(AccessFlowError::Validation(
                "expires_in_hours must be positive".to_string(),
            ));
        }
        if matches!(input.max_uses, Some(n) if n <= 0) {
            return Err(AccessFlowError::Validation(
                "max_uses must be positive when set".to_string(),
            ));
        }

        let now = self.clock.now();
        let code = AccessCode {
            id: AccessCodeId::generate(),
            property_id: property.id.clone(),
            code: token::generate_access_code(),
            code_type: input.code_type,
            granted_to: input.granted_to,
            reason: input.reason,
            granted_by_user_id: input.granted_by_user_id,
            expires_at: now + Duration::hours(hours),
            max_uses: input.max_uses,
            use_count: 0,
            is_active: true,
            created_at: now,
        };
        self.codes.insert(&code).await?;
        info!(property_id = %property.id, code_id = %code.id, "access code generated");
        Ok(code)
    }
}
