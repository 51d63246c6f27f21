use crate::db::schema::t_access_code;
use diesel::prelude::*;

#[derive(Debug, Queryable)]
#[diesel(table_name = t_access_code)]
pub struct AccessCodeRow {
    pub id: String,
    pub property_id: String,
    pub code: String,
    pub code_type: String,
    pub granted_to: Option<String>,
    pub reason: Option<String>,
    pub granted_by_user_id: Option<String>,
    pub expires_at: i64,
    pub max_uses: Option<i32>,
    pub use_count: i32,
    pub is_active: bool,
    pub created_at: i64,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = t_access_code)]
pub struct NewAccessCodeRow {
    pub id: String,
    pub property_id: String,
    pub code: String,
    pub code_type: String,
    pub granted_to: Option<String>,
    pub reason: Option<String>,
    pub granted_by_user_id: Option<String>,
    pub expires_at: i64,
    pub max_uses: Option<i32>,
    pub use_count: i32,
    pub is_active: bool,
    pub created_at: i64,
}
