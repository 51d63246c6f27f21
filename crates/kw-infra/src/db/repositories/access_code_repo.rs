use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

use kw_core::ports::{AccessCodeRepositoryError, AccessCodeRepositoryPort};
use kw_core::{AccessCode, AccessCodeId, PropertyId};

use crate::db::mappers::to_millis;
use crate::db::models::{AccessCodeRow, NewAccessCodeRow};
use crate::db::ports::{DbExecutor, InsertMapper, RowMapper};
use crate::db::schema::t_access_code::dsl::*;

pub struct DieselAccessCodeRepository<E, M> {
    executor: E,
    mapper: M,
}

impl<E, M> DieselAccessCodeRepository<E, M> {
    pub fn new(executor: E, mapper: M) -> Self {
        Self { executor, mapper }
    }
}

#[async_trait]
impl<E, M> AccessCodeRepositoryPort for DieselAccessCodeRepository<E, M>
where
    E: DbExecutor,
    M: InsertMapper<AccessCode, NewAccessCodeRow>
        + RowMapper<AccessCodeRow, AccessCode>
        + Send
        + Sync,
{
    async fn insert(&self, domain_code: &AccessCode) -> Result<(), AccessCodeRepositoryError> {
        let row = self
            .mapper
            .to_row(domain_code)
            .map_err(|e| AccessCodeRepositoryError::Storage(e.to_string()))?;
        self.executor
            .run(move |conn| {
                diesel::insert_into(t_access_code)
                    .values(&row)
                    .execute(conn)?;
                Ok(())
            })
            .map_err(|e| AccessCodeRepositoryError::Storage(e.to_string()))
    }

    async fn latest_usable(
        &self,
        property: &PropertyId,
        now: DateTime<Utc>,
    ) -> Result<Option<AccessCode>, AccessCodeRepositoryError> {
        let property_str = property.as_str().to_string();
        let now_ms = to_millis(now);
        self.executor
            .run(move |conn| {
                // Active and unexpired narrowed in SQL; the use-count
                // ceiling is nullable so it is applied on the mapped rows.
                let rows = t_access_code
                    .filter(
                        property_id
                            .eq(&property_str)
                            .and(is_active.eq(true))
                            .and(expires_at.gt(now_ms)),
                    )
                    .order(created_at.desc())
                    .load::<AccessCodeRow>(conn)?;
                for row in rows {
                    let domain_code = self.mapper.to_domain(&row)?;
                    if domain_code.is_usable_at(now) {
                        return Ok(Some(domain_code));
                    }
                }
                Ok(None)
            })
            .map_err(|e| AccessCodeRepositoryError::Storage(e.to_string()))
    }

    async fn find_by_value(
        &self,
        property: &PropertyId,
        code_value: &str,
    ) -> Result<Option<AccessCode>, AccessCodeRepositoryError> {
        let property_str = property.as_str().to_string();
        let code_str = code_value.to_string();
        self.executor
            .run(move |conn| {
                let row = t_access_code
                    .filter(
                        property_id
                            .eq(&property_str)
                            .and(code.eq(&code_str))
                            .and(is_active.eq(true)),
                    )
                    .first::<AccessCodeRow>(conn)
                    .optional()?;
                match row {
                    Some(r) => Ok(Some(self.mapper.to_domain(&r)?)),
                    None => Ok(None),
                }
            })
            .map_err(|e| AccessCodeRepositoryError::Storage(e.to_string()))
    }

    async fn record_use(&self, code_id: &AccessCodeId) -> Result<(), AccessCodeRepositoryError> {
        let id_str = code_id.as_str().to_string();
        let affected = self
            .executor
            .run(move |conn| {
                // Atomic in-place increment; read-modify-write would lose
                // updates under concurrent disclosures.
                let n = diesel::update(t_access_code.filter(id.eq(&id_str)))
                    .set(use_count.eq(use_count + 1))
                    .execute(conn)?;
                Ok(n)
            })
            .map_err(|e| AccessCodeRepositoryError::Storage(e.to_string()))?;
        if affected == 0 {
            return Err(AccessCodeRepositoryError::NotFound);
        }
        Ok(())
    }
}
