use crate::db::schema::t_verification_code;
use diesel::prelude::*;

#[derive(Debug, Queryable)]
#[diesel(table_name = t_verification_code)]
pub struct VerificationCodeRow {
    pub id: String,
    pub request_id: String,
    pub code: String,
    pub channel: String,
    pub phone_number: Option<String>,
    pub email_address: Option<String>,
    pub expires_at: i64,
    pub attempts: i32,
    pub max_attempts: i32,
    pub verified_at: Option<i64>,
    pub created_at: i64,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = t_verification_code)]
pub struct NewVerificationCodeRow {
    pub id: String,
    pub request_id: String,
    pub code: String,
    pub channel: String,
    pub phone_number: Option<String>,
    pub email_address: Option<String>,
    pub expires_at: i64,
    pub attempts: i32,
    pub max_attempts: i32,
    pub verified_at: Option<i64>,
    pub created_at: i64,
}
