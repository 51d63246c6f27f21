use crate::db::schema::{t_allowed_domain, t_blocked_domain};
use diesel::prelude::*;

// The allow and block tables share a shape but stay independent, so each
// gets its own row type bound to its own table.

#[derive(Debug, Queryable, Insertable)]
#[diesel(table_name = t_allowed_domain)]
pub struct AllowedDomainRow {
    pub id: String,
    pub domain: String,
    pub note: Option<String>,
    pub is_active: bool,
    pub expires_at: Option<i64>,
    pub created_by: Option<String>,
}

#[derive(Debug, Queryable, Insertable)]
#[diesel(table_name = t_blocked_domain)]
pub struct BlockedDomainRow {
    pub id: String,
    pub domain: String,
    pub note: Option<String>,
    pub is_active: bool,
    pub expires_at: Option<i64>,
    pub created_by: Option<String>,
}
