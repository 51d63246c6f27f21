//! Standalone access-code validation (manual entry, QR scan, NFC tap).

use std::sync::Arc;

use kw_core::access::AccessMethod;
use kw_core::ids::PropertyId;
use kw_core::ports::{AccessCodeRepositoryPort, ClockPort, PropertyRepositoryPort};
use kw_core::CodeUnusableReason;

use crate::access_logger::AccessLogger;
use crate::error::AccessFlowError;

#[derive(Debug, Clone)]
pub struct ValidateAccessCodeInput {
    pub property_id: PropertyId,
    pub code: String,
    pub access_method: AccessMethod,
    pub used_by_name: Option<String>,
    pub used_by_contact: Option<String>,
    pub location_data: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CodeValidation {
    pub valid: bool,
    pub message: String,
    pub property_name: Option<String>,
}

pub struct ValidateAccessCode {
    codes: Arc<dyn AccessCodeRepositoryPort>,
    properties: Arc<dyn PropertyRepositoryPort>,
    logger: AccessLogger,
    clock: Arc<dyn ClockPort>,
}

impl ValidateAccessCode {
    pub fn new(
        codes: Arc<dyn AccessCodeRepositoryPort>,
        properties: Arc<dyn PropertyRepositoryPort>,
        logger: AccessLogger,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        Self {
            codes,
            properties,
            logger,
            clock,
        }
    }

    /// An invalid code is a negative result, not an error; errors are
    /// reserved for storage failures.
    pub async fn execute(
        &self,
        input: ValidateAccessCodeInput,
    ) -> Result<CodeValidation, AccessFlowError> {
        let Some(code) = self
            .codes
            .find_by_value(&input.property_id, &input.code)
            .await?
        else {
            return Ok(CodeValidation {
                valid: false,
                message: "Invalid access code".to_string(),
                property_name: None,
            });
        };

        if let Err(reason) = code.usable_at(self.clock.now()) {
            let message = match reason {
                CodeUnusableReason::Inactive => "Invalid access code",
                CodeUnusableReason::Expired => "Access code has expired",
                CodeUnusableReason::MaxUsesReached => "Access code has reached maximum uses",
            };
            return Ok(CodeValidation {
                valid: false,
                message: message.to_string(),
                property_name: None,
            });
        }

        let property = self
            .properties
            .get_by_id(&input.property_id)
            .await?
            .ok_or_else(|| AccessFlowError::NotFound("Property not found".to_string()))?;
        if !property.emergency_access_enabled {
            return Ok(CodeValidation {
                valid: false,
                message: "Emergency access is disabled for this property".to_string(),
                property_name: None,
            });
        }

        self.logger
            .code_validated(
                &input.property_id,
                &code.id,
                input.access_method,
                input.used_by_name,
                input.used_by_contact,
                input.location_data,
            )
            .await;

        Ok(CodeValidation {
            valid: true,
            message: "Access code is valid".to_string(),
            property_name: Some(property.name),
        })
    }
}
