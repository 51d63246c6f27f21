use anyhow::Result;

use kw_core::access::CodeType;
use kw_core::{AccessCode, AccessCodeId, PropertyId, UserId};

use crate::db::models::{AccessCodeRow, NewAccessCodeRow};
use crate::db::ports::{InsertMapper, RowMapper};

use super::{from_millis, to_millis};

pub struct AccessCodeRowMapper;

impl InsertMapper<AccessCode, NewAccessCodeRow> for AccessCodeRowMapper {
    fn to_row(&self, domain: &AccessCode) -> Result<NewAccessCodeRow> {
        Ok(NewAccessCodeRow {
            id: domain.id.to_string(),
            property_id: domain.property_id.to_string(),
            code: domain.code.clone(),
            code_type: domain.code_type.as_str().to_string(),
            granted_to: domain.granted_to.clone(),
            reason: domain.reason.clone(),
            granted_by_user_id: domain.granted_by_user_id.as_ref().map(|u| u.to_string()),
            expires_at: to_millis(domain.expires_at),
            max_uses: domain.max_uses,
            use_count: domain.use_count,
            is_active: domain.is_active,
            created_at: to_millis(domain.created_at),
        })
    }
}

impl RowMapper<AccessCodeRow, AccessCode> for AccessCodeRowMapper {
    fn to_domain(&self, row: &AccessCodeRow) -> Result<AccessCode> {
        let code_type = CodeType::parse(&row.code_type)
            .ok_or_else(|| anyhow::anyhow!("unknown code_type: {}", row.code_type))?;
        Ok(AccessCode {
            id: AccessCodeId::from(row.id.clone()),
            property_id: PropertyId::from(row.property_id.clone()),
            code: row.code.clone(),
            code_type,
            granted_to: row.granted_to.clone(),
            reason: row.reason.clone(),
            granted_by_user_id: row.granted_by_user_id.clone().map(UserId::from),
            expires_at: from_millis(row.expires_at)?,
            max_uses: row.max_uses,
            use_count: row.use_count,
            is_active: row.is_active,
            created_at: from_millis(row.created_at)?,
        })
    }
}
