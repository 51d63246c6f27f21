//! Property entity as seen by the access engine.
//!
//! Properties are owned and edited elsewhere; the engine only reads them to
//! gate requests and to disclose the keysafe after approval.

use serde::{Deserialize, Serialize};

use crate::ids::{PropertyId, UserId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub id: PropertyId,
    pub owner_user_id: UserId,
    pub name: String,
    pub address: String,
    pub city: Option<String>,
    pub region: Option<String>,
    pub postal_code: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub emergency_access_enabled: bool,
    pub keysafe: Option<KeysafeInfo>,
}

impl Property {
    /// Full postal address used in notifications, skipping empty parts.
    pub fn display_address(&self) -> String {
        let mut parts = vec![self.address.clone()];
        for extra in [&self.city, &self.region, &self.postal_code] {
            if let Some(value) = extra {
                if !value.is_empty() {
                    parts.push(value.clone());
                }
            }
        }
        parts.join(", ")
    }

    pub fn coordinates(&self) -> Option<(f64, f64)> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Some((lat, lon)),
            _ => None,
        }
    }
}

/// Where and how to open the keysafe. Only ever shown to a requester after
/// the owner approved the request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeysafeInfo {
    pub location: Option<String>,
    pub code: Option<String>,
    pub notes: Option<String>,
    pub what3words: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl KeysafeInfo {
    pub fn is_empty(&self) -> bool {
        self.location.is_none()
            && self.code.is_none()
            && self.notes.is_none()
            && self.what3words.is_none()
            && self.latitude.is_none()
            && self.longitude.is_none()
    }
}

/// Contact point for notification fan-out: the owner profile or one of the
/// owner's emergency contacts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactPoint {
    pub email: Option<String>,
    pub phone: Option<String>,
}
