use crate::db::schema::t_access_request;
use diesel::prelude::*;

#[derive(Debug, Queryable)]
#[diesel(table_name = t_access_request)]
pub struct AccessRequestRow {
    pub id: String,
    pub property_id: String,
    pub requester_email: Option<String>,
    pub requester_phone: Option<String>,
    pub requester_name: Option<String>,
    pub access_code_entered: String,
    pub verification_token: String,
    pub status: String,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub location_data: Option<String>,
    pub location_verified: bool,
    pub distance_from_property_m: Option<f64>,
    pub created_at: i64,
    pub expires_at: i64,
    pub verified_at: Option<i64>,
    pub approved_at: Option<i64>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = t_access_request)]
pub struct NewAccessRequestRow {
    pub id: String,
    pub property_id: String,
    pub requester_email: Option<String>,
    pub requester_phone: Option<String>,
    pub requester_name: Option<String>,
    pub access_code_entered: String,
    pub verification_token: String,
    pub status: String,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub location_data: Option<String>,
    pub location_verified: bool,
    pub distance_from_property_m: Option<f64>,
    pub created_at: i64,
    pub expires_at: i64,
    pub verified_at: Option<i64>,
    pub approved_at: Option<i64>,
}
