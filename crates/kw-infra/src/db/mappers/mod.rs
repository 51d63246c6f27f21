//! Row ↔ domain mappers. Timestamps are epoch milliseconds in SQLite and
//! `DateTime<Utc>` in the domain.

pub mod access_code_mapper;
pub mod access_log_mapper;
pub mod access_request_mapper;
pub mod domain_rule_mapper;
pub mod property_mapper;
pub mod verification_code_mapper;

pub use access_code_mapper::AccessCodeRowMapper;
pub use access_log_mapper::AccessLogRowMapper;
pub use access_request_mapper::AccessRequestRowMapper;
pub use domain_rule_mapper::DomainRuleRowMapper;
pub use property_mapper::PropertyRowMapper;
pub use verification_code_mapper::VerificationCodeRowMapper;

use anyhow::Result;
use chrono::{DateTime, Utc};

pub(crate) fn to_millis(ts: DateTime<Utc>) -> i64 {
    ts.timestamp_millis()
}

pub(crate) fn from_millis(ms: i64) -> Result<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp_millis(ms)
        .ok_or_else(|| anyhow::anyhow!("timestamp out of range: {ms}"))
}

pub(crate) fn opt_from_millis(ms: Option<i64>) -> Result<Option<DateTime<Utc>>> {
    ms.map(from_millis).transpose()
}
