use anyhow::Result;

use kw_core::access::Channel;
use kw_core::{RequestId, VerificationCode, VerificationCodeId};

use crate::db::models::{NewVerificationCodeRow, VerificationCodeRow};
use crate::db::ports::{InsertMapper, RowMapper};

use super::{from_millis, opt_from_millis, to_millis};

pub struct VerificationCodeRowMapper;

impl InsertMapper<VerificationCode, NewVerificationCodeRow> for VerificationCodeRowMapper {
    fn to_row(&self, domain: &VerificationCode) -> Result<NewVerificationCodeRow> {
        Ok(NewVerificationCodeRow {
            id: domain.id.to_string(),
            request_id: domain.request_id.to_string(),
            code: domain.code.clone(),
            channel: domain.channel.as_str().to_string(),
            phone_number: domain.phone_number.clone(),
            email_address: domain.email_address.clone(),
            expires_at: to_millis(domain.expires_at),
            attempts: domain.attempts,
            max_attempts: domain.max_attempts,
            verified_at: domain.verified_at.map(to_millis),
            created_at: to_millis(domain.created_at),
        })
    }
}

impl RowMapper<VerificationCodeRow, VerificationCode> for VerificationCodeRowMapper {
    fn to_domain(&self, row: &VerificationCodeRow) -> Result<VerificationCode> {
        let channel = Channel::parse(&row.channel)
            .ok_or_else(|| anyhow::anyhow!("unknown verification channel: {}", row.channel))?;
        Ok(VerificationCode {
            id: VerificationCodeId::from(row.id.clone()),
            request_id: RequestId::from(row.request_id.clone()),
            code: row.code.clone(),
            channel,
            phone_number: row.phone_number.clone(),
            email_address: row.email_address.clone(),
            expires_at: from_millis(row.expires_at)?,
            attempts: row.attempts,
            max_attempts: row.max_attempts,
            verified_at: opt_from_millis(row.verified_at)?,
            created_at: from_millis(row.created_at)?,
        })
    }
}
