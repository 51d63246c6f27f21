//! Short-lived numeric codes proving the requester controls the contact
//! channel they claimed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{RequestId, VerificationCodeId};

/// Attempts allowed before the parent request is denied outright.
pub const MAX_VERIFICATION_ATTEMPTS: i32 = 3;

/// Verification codes live for ten minutes.
pub const VERIFICATION_CODE_TTL_MINUTES: i64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    Sms,
    Email,
}

impl Channel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::Sms => "sms",
            Channel::Email => "email",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "sms" => Some(Channel::Sms),
            "email" => Some(Channel::Email),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationCode {
    pub id: VerificationCodeId,
    pub request_id: RequestId,
    /// Exactly six ASCII digits, zero-padded.
    pub code: String,
    pub channel: Channel,
    pub phone_number: Option<String>,
    pub email_address: Option<String>,
    pub expires_at: DateTime<Utc>,
    pub attempts: i32,
    pub max_attempts: i32,
    pub verified_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Outcome of checking a submitted code against the stored one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationOutcome {
    Verified,
    /// Wrong code; the stored attempt counter has already been bumped.
    Mismatch { attempts_left: i32 },
    Expired,
    /// Attempt ceiling reached. Terminal for the parent request.
    AttemptsExhausted,
    /// Already verified once; a second success must not be granted.
    AlreadyVerified,
}

impl VerificationCode {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    pub fn attempts_exhausted(&self) -> bool {
        self.attempts >= self.max_attempts
    }

    /// Evaluate a submitted code without touching storage. `attempts` must
    /// already reflect the increment for this try on the mismatch path, so
    /// races cannot grant an extra free attempt.
    pub fn evaluate(&self, submitted: &str, now: DateTime<Utc>) -> VerificationOutcome {
        if self.verified_at.is_some() {
            return VerificationOutcome::AlreadyVerified;
        }
        if self.attempts_exhausted() {
            return VerificationOutcome::AttemptsExhausted;
        }
        if self.is_expired_at(now) {
            return VerificationOutcome::Expired;
        }
        if self.code != submitted {
            let after = self.attempts + 1;
            if after >= self.max_attempts {
                return VerificationOutcome::AttemptsExhausted;
            }
            return VerificationOutcome::Mismatch {
                attempts_left: self.max_attempts - after,
            };
        }
        VerificationOutcome::Verified
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn code(now: DateTime<Utc>) -> VerificationCode {
        VerificationCode {
            id: VerificationCodeId::from("vc-1"),
            request_id: RequestId::from("req-1"),
            code: "042137".to_string(),
            channel: Channel::Email,
            phone_number: None,
            email_address: Some("a@b.com".to_string()),
            expires_at: now + Duration::minutes(VERIFICATION_CODE_TTL_MINUTES),
            attempts: 0,
            max_attempts: MAX_VERIFICATION_ATTEMPTS,
            verified_at: None,
            created_at: now,
        }
    }

    #[test]
    fn correct_code_verifies() {
        let now = Utc::now();
        assert_eq!(
            code(now).evaluate("042137", now),
            VerificationOutcome::Verified
        );
    }

    #[test]
    fn wrong_code_counts_down() {
        let now = Utc::now();
        assert_eq!(
            code(now).evaluate("000000", now),
            VerificationOutcome::Mismatch { attempts_left: 2 }
        );
    }

    #[test]
    fn third_wrong_code_exhausts() {
        let now = Utc::now();
        let mut c = code(now);
        c.attempts = 2;
        assert_eq!(
            c.evaluate("000000", now),
            VerificationOutcome::AttemptsExhausted
        );
    }

    #[test]
    fn exhausted_code_rejects_even_the_right_value() {
        let now = Utc::now();
        let mut c = code(now);
        c.attempts = MAX_VERIFICATION_ATTEMPTS;
        assert_eq!(
            c.evaluate("042137", now),
            VerificationOutcome::AttemptsExhausted
        );
    }

    #[test]
    fn expired_code_rejects() {
        let now = Utc::now();
        let mut c = code(now);
        c.expires_at = now - Duration::seconds(1);
        assert_eq!(c.evaluate("042137", now), VerificationOutcome::Expired);
    }

    #[test]
    fn verified_code_cannot_verify_again() {
        let now = Utc::now();
        let mut c = code(now);
        c.verified_at = Some(now);
        assert_eq!(
            c.evaluate("042137", now),
            VerificationOutcome::AlreadyVerified
        );
    }
}
