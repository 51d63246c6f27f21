//! Per-property access codes: the long-lived secret whose disclosure the
//! whole request flow protects.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{AccessCodeId, PropertyId, UserId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CodeType {
    Emergency,
    Standard,
}

impl CodeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CodeType::Emergency => "emergency",
            CodeType::Standard => "standard",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "emergency" => Some(CodeType::Emergency),
            "standard" => Some(CodeType::Standard),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessCode {
    pub id: AccessCodeId,
    pub property_id: PropertyId,
    /// Opaque code value, stored uppercase by convention.
    pub code: String,
    pub code_type: CodeType,
    pub granted_to: Option<String>,
    pub reason: Option<String>,
    pub granted_by_user_id: Option<UserId>,
    pub expires_at: DateTime<Utc>,
    /// None means unlimited uses.
    pub max_uses: Option<i32>,
    pub use_count: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Why a code cannot be used right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeUnusableReason {
    Inactive,
    Expired,
    MaxUsesReached,
}

impl AccessCode {
    /// Usability invariant: active, unexpired and under its use ceiling.
    pub fn usable_at(&self, now: DateTime<Utc>) -> Result<(), CodeUnusableReason> {
        if !self.is_active {
            return Err(CodeUnusableReason::Inactive);
        }
        if now >= self.expires_at {
            return Err(CodeUnusableReason::Expired);
        }
        if let Some(max) = self.max_uses {
            if self.use_count >= max {
                return Err(CodeUnusableReason::MaxUsesReached);
            }
        }
        Ok(())
    }

    pub fn is_usable_at(&self, now: DateTime<Utc>) -> bool {
        self.usable_at(now).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn code(now: DateTime<Utc>) -> AccessCode {
        AccessCode {
            id: AccessCodeId::from("code-1"),
            property_id: PropertyId::from("prop-1"),
            code: "A1B2C3D4".to_string(),
            code_type: CodeType::Emergency,
            granted_to: None,
            reason: None,
            granted_by_user_id: None,
            expires_at: now + Duration::days(365),
            max_uses: None,
            use_count: 0,
            is_active: true,
            created_at: now,
        }
    }

    #[test]
    fn fresh_code_is_usable() {
        let now = Utc::now();
        assert!(code(now).is_usable_at(now));
    }

    #[test]
    fn inactive_code_is_unusable() {
        let now = Utc::now();
        let mut c = code(now);
        c.is_active = false;
        assert_eq!(c.usable_at(now), Err(CodeUnusableReason::Inactive));
    }

    #[test]
    fn expired_code_is_unusable() {
        let now = Utc::now();
        let mut c = code(now);
        c.expires_at = now - Duration::seconds(1);
        assert_eq!(c.usable_at(now), Err(CodeUnusableReason::Expired));
    }

    #[test]
    fn exhausted_code_is_unusable() {
        let now = Utc::now();
        let mut c = code(now);
        c.max_uses = Some(2);
        c.use_count = 2;
        assert_eq!(c.usable_at(now), Err(CodeUnusableReason::MaxUsesReached));
    }

    #[test]
    fn unlimited_uses_never_exhaust() {
        let now = Utc::now();
        let mut c = code(now);
        c.use_count = i32::MAX;
        assert!(c.is_usable_at(now));
    }
}
