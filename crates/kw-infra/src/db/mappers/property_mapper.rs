use anyhow::Result;

use kw_core::{ContactPoint, KeysafeInfo, Property, PropertyId, UserId};

use crate::db::models::{EmergencyContactRow, OwnerProfileRow, PropertyRow};
use crate::db::ports::RowMapper;

pub struct PropertyRowMapper;

impl RowMapper<PropertyRow, Property> for PropertyRowMapper {
    fn to_domain(&self, row: &PropertyRow) -> Result<Property> {
        let keysafe = KeysafeInfo {
            location: row.keysafe_location.clone(),
            code: row.keysafe_code.clone(),
            notes: row.keysafe_notes.clone(),
            what3words: row.keysafe_what3words.clone(),
            latitude: row.keysafe_latitude,
            longitude: row.keysafe_longitude,
        };
        Ok(Property {
            id: PropertyId::from(row.id.clone()),
            owner_user_id: UserId::from(row.owner_user_id.clone()),
            name: row.name.clone(),
            address: row.address.clone(),
            city: row.city.clone(),
            region: row.region.clone(),
            postal_code: row.postal_code.clone(),
            latitude: row.latitude,
            longitude: row.longitude,
            emergency_access_enabled: row.emergency_access_enabled,
            keysafe: if keysafe.is_empty() { None } else { Some(keysafe) },
        })
    }
}

impl RowMapper<OwnerProfileRow, ContactPoint> for PropertyRowMapper {
    fn to_domain(&self, row: &OwnerProfileRow) -> Result<ContactPoint> {
        Ok(ContactPoint {
            email: row.email.clone(),
            phone: row.phone.clone(),
        })
    }
}

impl RowMapper<EmergencyContactRow, ContactPoint> for PropertyRowMapper {
    fn to_domain(&self, row: &EmergencyContactRow) -> Result<ContactPoint> {
        Ok(ContactPoint {
            email: row.email.clone(),
            phone: row.phone.clone(),
        })
    }
}
