//! Append-only audit trail entries.
//!
//! The log is a sink: the engine writes it on every notable event and never
//! reads it back for authorization decisions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{AccessCodeId, PropertyId, RequestId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccessMethod {
    QrScan,
    QrScanVerified,
    ManualEntry,
    Nfc,
    EmailVerification,
    RequestCreated,
    RequestVerified,
    RequestApproved,
    RequestDenied,
}

impl AccessMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessMethod::QrScan => "QR_SCAN",
            AccessMethod::QrScanVerified => "QR_SCAN_VERIFIED",
            AccessMethod::ManualEntry => "MANUAL_ENTRY",
            AccessMethod::Nfc => "NFC",
            AccessMethod::EmailVerification => "EMAIL_VERIFICATION",
            AccessMethod::RequestCreated => "REQUEST_CREATED",
            AccessMethod::RequestVerified => "REQUEST_VERIFIED",
            AccessMethod::RequestApproved => "REQUEST_APPROVED",
            AccessMethod::RequestDenied => "REQUEST_DENIED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "QR_SCAN" => Some(AccessMethod::QrScan),
            "QR_SCAN_VERIFIED" => Some(AccessMethod::QrScanVerified),
            "MANUAL_ENTRY" => Some(AccessMethod::ManualEntry),
            "NFC" => Some(AccessMethod::Nfc),
            "EMAIL_VERIFICATION" => Some(AccessMethod::EmailVerification),
            "REQUEST_CREATED" => Some(AccessMethod::RequestCreated),
            "REQUEST_VERIFIED" => Some(AccessMethod::RequestVerified),
            "REQUEST_APPROVED" => Some(AccessMethod::RequestApproved),
            "REQUEST_DENIED" => Some(AccessMethod::RequestDenied),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessLogEntry {
    pub access_code_id: Option<AccessCodeId>,
    pub property_id: PropertyId,
    pub used_by_name: Option<String>,
    pub used_by_contact: Option<String>,
    pub access_method: AccessMethod,
    pub location_data: Option<serde_json::Value>,
    pub request_id: Option<RequestId>,
    pub additional_data: Option<serde_json::Value>,
    pub used_at: DateTime<Utc>,
}

impl AccessLogEntry {
    pub fn new(property_id: PropertyId, access_method: AccessMethod, used_at: DateTime<Utc>) -> Self {
        Self {
            access_code_id: None,
            property_id,
            used_by_name: None,
            used_by_contact: None,
            access_method,
            location_data: None,
            request_id: None,
            additional_data: None,
            used_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_round_trips() {
        for method in [
            AccessMethod::QrScan,
            AccessMethod::QrScanVerified,
            AccessMethod::ManualEntry,
            AccessMethod::Nfc,
            AccessMethod::EmailVerification,
            AccessMethod::RequestCreated,
            AccessMethod::RequestVerified,
            AccessMethod::RequestApproved,
            AccessMethod::RequestDenied,
        ] {
            assert_eq!(AccessMethod::parse(method.as_str()), Some(method));
        }
    }
}
