use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

use kw_core::ports::{VerificationCodeRepositoryError, VerificationCodeRepositoryPort};
use kw_core::{RequestId, VerificationCode, VerificationCodeId};

use crate::db::mappers::to_millis;
use crate::db::models::{NewVerificationCodeRow, VerificationCodeRow};
use crate::db::ports::{DbExecutor, InsertMapper, RowMapper};
use crate::db::schema::t_verification_code::dsl::*;

pub struct DieselVerificationCodeRepository<E, M> {
    executor: E,
    mapper: M,
}

impl<E, M> DieselVerificationCodeRepository<E, M> {
    pub fn new(executor: E, mapper: M) -> Self {
        Self { executor, mapper }
    }
}

#[async_trait]
impl<E, M> VerificationCodeRepositoryPort for DieselVerificationCodeRepository<E, M>
where
    E: DbExecutor,
    M: InsertMapper<VerificationCode, NewVerificationCodeRow>
        + RowMapper<VerificationCodeRow, VerificationCode>
        + Send
        + Sync,
{
    async fn insert(
        &self,
        domain_code: &VerificationCode,
    ) -> Result<(), VerificationCodeRepositoryError> {
        let row = self
            .mapper
            .to_row(domain_code)
            .map_err(|e| VerificationCodeRepositoryError::Storage(e.to_string()))?;
        self.executor
            .run(move |conn| {
                diesel::insert_into(t_verification_code)
                    .values(&row)
                    .execute(conn)?;
                Ok(())
            })
            .map_err(|e| VerificationCodeRepositoryError::Storage(e.to_string()))
    }

    async fn find_unverified_by_request(
        &self,
        request: &RequestId,
    ) -> Result<Option<VerificationCode>, VerificationCodeRepositoryError> {
        let request_str = request.as_str().to_string();
        self.executor
            .run(move |conn| {
                let row = t_verification_code
                    .filter(request_id.eq(&request_str).and(verified_at.is_null()))
                    .order(created_at.desc())
                    .first::<VerificationCodeRow>(conn)
                    .optional()?;
                match row {
                    Some(r) => Ok(Some(self.mapper.to_domain(&r)?)),
                    None => Ok(None),
                }
            })
            .map_err(|e| VerificationCodeRepositoryError::Storage(e.to_string()))
    }

    async fn increment_attempts(
        &self,
        code_id: &VerificationCodeId,
    ) -> Result<i32, VerificationCodeRepositoryError> {
        let id_str = code_id.as_str().to_string();
        self.executor
            .run(move |conn| {
                // In-place increment returning the stored value, so the
                // ceiling check always sees the post-increment count.
                let new_attempts = diesel::update(t_verification_code.filter(id.eq(&id_str)))
                    .set(attempts.eq(attempts + 1))
                    .returning(attempts)
                    .get_result::<i32>(conn)?;
                Ok(new_attempts)
            })
            .map_err(|e| VerificationCodeRepositoryError::Storage(e.to_string()))
    }

    async fn mark_verified(
        &self,
        code_id: &VerificationCodeId,
        now: DateTime<Utc>,
    ) -> Result<bool, VerificationCodeRepositoryError> {
        let id_str = code_id.as_str().to_string();
        let now_ms = to_millis(now);
        self.executor
            .run(move |conn| {
                // Conditional on still-unverified: a second success is a
                // replay and must not be granted.
                let affected = diesel::update(
                    t_verification_code.filter(id.eq(&id_str).and(verified_at.is_null())),
                )
                .set(verified_at.eq(Some(now_ms)))
                .execute(conn)?;
                Ok(affected > 0)
            })
            .map_err(|e| VerificationCodeRepositoryError::Storage(e.to_string()))
    }
}
