//! Access requests: one requester's attempt to get the keysafe disclosed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{PropertyId, RequestId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    Pending,
    Verified,
    Approved,
    Denied,
    Expired,
}

impl RequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "pending",
            RequestStatus::Verified => "verified",
            RequestStatus::Approved => "approved",
            RequestStatus::Denied => "denied",
            RequestStatus::Expired => "expired",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(RequestStatus::Pending),
            "verified" => Some(RequestStatus::Verified),
            "approved" => Some(RequestStatus::Approved),
            "denied" => Some(RequestStatus::Denied),
            "expired" => Some(RequestStatus::Expired),
            _ => None,
        }
    }

    /// Terminal statuses absorb every further event.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RequestStatus::Approved | RequestStatus::Denied | RequestStatus::Expired
        )
    }

    /// Statuses an owner decision may still act on.
    pub fn is_decidable(&self) -> bool {
        matches!(self, RequestStatus::Pending | RequestStatus::Verified)
    }
}

/// Requester-supplied geolocation, kept as advisory metadata on the request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationData {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accuracy_m: Option<f64>,
}

/// Transport-level metadata captured at creation time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequestMeta {
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessRequest {
    pub id: RequestId,
    pub property_id: PropertyId,
    pub requester_email: Option<String>,
    pub requester_phone: Option<String>,
    pub requester_name: Option<String>,
    /// The access code value this request is asking to have disclosed.
    pub access_code_entered: String,
    /// Bearer credential for owner-action links. Never shown to the requester.
    pub verification_token: String,
    pub status: RequestStatus,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub location_data: Option<LocationData>,
    pub location_verified: bool,
    pub distance_from_property_m: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub verified_at: Option<DateTime<Utc>>,
    pub approved_at: Option<DateTime<Utc>>,
}

impl AccessRequest {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    /// Best contact string for audit entries and notifications.
    pub fn requester_contact(&self) -> Option<&str> {
        self.requester_phone
            .as_deref()
            .filter(|p| !p.is_empty())
            .or(self.requester_email.as_deref())
    }

    pub fn requester_display_name(&self) -> &str {
        self.requester_name.as_deref().unwrap_or("Unknown")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips() {
        for status in [
            RequestStatus::Pending,
            RequestStatus::Verified,
            RequestStatus::Approved,
            RequestStatus::Denied,
            RequestStatus::Expired,
        ] {
            assert_eq!(RequestStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(RequestStatus::parse("cancelled"), None);
    }

    #[test]
    fn terminal_and_decidable_partition() {
        assert!(RequestStatus::Pending.is_decidable());
        assert!(RequestStatus::Verified.is_decidable());
        assert!(!RequestStatus::Approved.is_decidable());
        assert!(RequestStatus::Approved.is_terminal());
        assert!(RequestStatus::Denied.is_terminal());
        assert!(RequestStatus::Expired.is_terminal());
        assert!(!RequestStatus::Pending.is_terminal());
    }

    #[test]
    fn contact_prefers_phone() {
        let mut request = AccessRequest {
            id: RequestId::from("req-1"),
            property_id: PropertyId::from("prop-1"),
            requester_email: Some("a@b.com".to_string()),
            requester_phone: Some("+447700900123".to_string()),
            requester_name: None,
            access_code_entered: "A1B2C3D4".to_string(),
            verification_token: "tok".to_string(),
            status: RequestStatus::Pending,
            ip_address: None,
            user_agent: None,
            location_data: None,
            location_verified: false,
            distance_from_property_m: None,
            created_at: Utc::now(),
            expires_at: Utc::now(),
            verified_at: None,
            approved_at: None,
        };
        assert_eq!(request.requester_contact(), Some("+447700900123"));
        request.requester_phone = None;
        assert_eq!(request.requester_contact(), Some("a@b.com"));
        assert_eq!(request.requester_display_name(), "Unknown");
    }
}
