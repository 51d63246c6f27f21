use async_trait::async_trait;
use diesel::prelude::*;

use kw_core::ports::{DomainRuleRepositoryError, DomainRuleRepositoryPort};
use kw_core::DomainRule;

use crate::db::models::{AllowedDomainRow, BlockedDomainRow};
use crate::db::ports::{DbExecutor, RowMapper};
use crate::db::schema::{t_allowed_domain, t_blocked_domain};

pub struct DieselDomainRuleRepository<E, M> {
    executor: E,
    mapper: M,
}

impl<E, M> DieselDomainRuleRepository<E, M> {
    pub fn new(executor: E, mapper: M) -> Self {
        Self { executor, mapper }
    }
}

#[async_trait]
impl<E, M> DomainRuleRepositoryPort for DieselDomainRuleRepository<E, M>
where
    E: DbExecutor,
    M: RowMapper<AllowedDomainRow, DomainRule>
        + RowMapper<BlockedDomainRow, DomainRule>
        + Send
        + Sync,
{
    async fn find_allow_rule(
        &self,
        domain: &str,
    ) -> Result<Option<DomainRule>, DomainRuleRepositoryError> {
        let domain_str = domain.to_lowercase();
        self.executor
            .run(move |conn| {
                let row = t_allowed_domain::table
                    .filter(
                        t_allowed_domain::domain
                            .eq(&domain_str)
                            .and(t_allowed_domain::is_active.eq(true)),
                    )
                    .first::<AllowedDomainRow>(conn)
                    .optional()?;
                match row {
                    Some(r) => Ok(Some(self.mapper.to_domain(&r)?)),
                    None => Ok(None),
                }
            })
            .map_err(|e| DomainRuleRepositoryError::Storage(e.to_string()))
    }

    async fn find_block_rule(
        &self,
        domain: &str,
    ) -> Result<Option<DomainRule>, DomainRuleRepositoryError> {
        let domain_str = domain.to_lowercase();
        self.executor
            .run(move |conn| {
                let row = t_blocked_domain::table
                    .filter(
                        t_blocked_domain::domain
                            .eq(&domain_str)
                            .and(t_blocked_domain::is_active.eq(true)),
                    )
                    .first::<BlockedDomainRow>(conn)
                    .optional()?;
                match row {
                    Some(r) => Ok(Some(self.mapper.to_domain(&r)?)),
                    None => Ok(None),
                }
            })
            .map_err(|e| DomainRuleRepositoryError::Storage(e.to_string()))
    }
}
