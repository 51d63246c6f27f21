//! Domain allow/block screening for requester email addresses.
//!
//! Rules live in two independent tables; evaluation here is pure, the
//! lookups happen behind [`crate::ports::DomainRuleRepositoryPort`]. An
//! unexpired block rule wins over an allow rule; an expired block falls
//! back to the allow decision. The result is advisory metadata in the
//! request flow, not a hard gate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    Allowed,
    Blocked,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainRule {
    pub id: String,
    pub domain: String,
    pub kind: RuleKind,
    pub note: Option<String>,
    pub is_active: bool,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_by: Option<String>,
}

impl DomainRule {
    pub fn in_force_at(&self, now: DateTime<Utc>) -> bool {
        if !self.is_active {
            return false;
        }
        match self.expires_at {
            Some(expires_at) => now <= expires_at,
            None => true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainCheck {
    pub allowed: bool,
    pub domain: Option<String>,
    pub message: String,
}

impl DomainCheck {
    pub fn denied(domain: Option<String>, message: impl Into<String>) -> Self {
        Self {
            allowed: false,
            domain,
            message: message.into(),
        }
    }

    pub fn allowed(domain: String) -> Self {
        Self {
            allowed: true,
            domain: Some(domain),
            message: "Domain is allowed".to_string(),
        }
    }
}

/// Extract the lowercased domain part of an email address, or None when the
/// address has no usable domain.
pub fn email_domain(email: &str) -> Option<String> {
    let (local, domain) = email.trim().rsplit_once('@')?;
    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return None;
    }
    Some(domain.to_ascii_lowercase())
}

/// Evaluate fetched rules for one domain. Allow rule first, then the block
/// override.
pub fn evaluate_rules(
    domain: &str,
    allow_rule: Option<&DomainRule>,
    block_rule: Option<&DomainRule>,
    now: DateTime<Utc>,
) -> DomainCheck {
    let allow = match allow_rule {
        Some(rule) if rule.is_active => rule,
        _ => {
            return DomainCheck::denied(
                Some(domain.to_string()),
                "Domain not in allowed list",
            )
        }
    };

    if !allow.in_force_at(now) {
        return DomainCheck::denied(Some(domain.to_string()), "Domain access has expired");
    }

    if let Some(block) = block_rule {
        if block.in_force_at(now) {
            let reason = block.note.as_deref().unwrap_or("No reason provided");
            return DomainCheck::denied(
                Some(domain.to_string()),
                format!("Domain is blocked: {reason}"),
            );
        }
    }

    DomainCheck::allowed(domain.to_string())
}
