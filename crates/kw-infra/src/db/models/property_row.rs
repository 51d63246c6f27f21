use crate::db::schema::{t_emergency_contact, t_owner_profile, t_property};
use diesel::prelude::*;

#[derive(Debug, Queryable, Insertable)]
#[diesel(table_name = t_property)]
pub struct PropertyRow {
    pub id: String,
    pub owner_user_id: String,
    pub name: String,
    pub address: String,
    pub city: Option<String>,
    pub region: Option<String>,
    pub postal_code: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub emergency_access_enabled: bool,
    pub keysafe_location: Option<String>,
    pub keysafe_code: Option<String>,
    pub keysafe_notes: Option<String>,
    pub keysafe_what3words: Option<String>,
    pub keysafe_latitude: Option<f64>,
    pub keysafe_longitude: Option<f64>,
    pub created_at: i64,
}

#[derive(Debug, Queryable, Insertable)]
#[diesel(table_name = t_owner_profile)]
pub struct OwnerProfileRow {
    pub user_id: String,
    pub email: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Queryable, Insertable)]
#[diesel(table_name = t_emergency_contact)]
pub struct EmergencyContactRow {
    pub id: String,
    pub user_id: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub is_primary: bool,
}
