use crate::db::schema::t_access_log;
use diesel::prelude::*;

#[derive(Debug, Queryable)]
#[diesel(table_name = t_access_log)]
pub struct AccessLogRow {
    pub id: String,
    pub access_code_id: Option<String>,
    pub property_id: String,
    pub used_by_name: Option<String>,
    pub used_by_contact: Option<String>,
    pub access_method: String,
    pub location_data: Option<String>,
    pub request_id: Option<String>,
    pub additional_data: Option<String>,
    pub used_at: i64,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = t_access_log)]
pub struct NewAccessLogRow {
    pub id: String,
    pub access_code_id: Option<String>,
    pub property_id: String,
    pub used_by_name: Option<String>,
    pub used_by_contact: Option<String>,
    pub access_method: String,
    pub location_data: Option<String>,
    pub request_id: Option<String>,
    pub additional_data: Option<String>,
    pub used_at: i64,
}
