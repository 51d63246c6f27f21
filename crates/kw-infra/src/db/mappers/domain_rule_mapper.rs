use anyhow::Result;

use kw_core::{DomainRule, RuleKind};

use crate::db::models::{AllowedDomainRow, BlockedDomainRow};
use crate::db::ports::RowMapper;

use super::opt_from_millis;

pub struct DomainRuleRowMapper;

impl RowMapper<AllowedDomainRow, DomainRule> for DomainRuleRowMapper {
    fn to_domain(&self, row: &AllowedDomainRow) -> Result<DomainRule> {
        Ok(DomainRule {
            id: row.id.clone(),
            domain: row.domain.clone(),
            kind: RuleKind::Allowed,
            note: row.note.clone(),
            is_active: row.is_active,
            expires_at: opt_from_millis(row.expires_at)?,
            created_by: row.created_by.clone(),
        })
    }
}

impl RowMapper<BlockedDomainRow, DomainRule> for DomainRuleRowMapper {
    fn to_domain(&self, row: &BlockedDomainRow) -> Result<DomainRule> {
        Ok(DomainRule {
            id: row.id.clone(),
            domain: row.domain.clone(),
            kind: RuleKind::Blocked,
            note: row.note.clone(),
            is_active: row.is_active,
            expires_at: opt_from_millis(row.expires_at)?,
            created_by: row.created_by.clone(),
        })
    }
}
