use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::result::DatabaseErrorKind;

use kw_core::access::RequestStatus;
use kw_core::ports::{
    AccessRequestRepositoryError, AccessRequestRepositoryPort, DecideWriteOutcome,
};
use kw_core::{AccessRequest, PropertyId, RequestId};

use crate::db::mappers::to_millis;
use crate::db::models::{AccessRequestRow, NewAccessRequestRow};
use crate::db::ports::{DbExecutor, InsertMapper, RowMapper};
use crate::db::schema::t_access_request::dsl::*;

pub struct DieselAccessRequestRepository<E, M> {
    executor: E,
    mapper: M,
}

impl<E, M> DieselAccessRequestRepository<E, M> {
    pub fn new(executor: E, mapper: M) -> Self {
        Self { executor, mapper }
    }
}

fn is_unique_violation(e: &anyhow::Error) -> bool {
    matches!(
        e.downcast_ref::<diesel::result::Error>(),
        Some(diesel::result::Error::DatabaseError(
            DatabaseErrorKind::UniqueViolation,
            _
        ))
    )
}

const DECIDABLE: [&str; 2] = ["pending", "verified"];

#[async_trait]
impl<E, M> AccessRequestRepositoryPort for DieselAccessRequestRepository<E, M>
where
    E: DbExecutor,
    M: InsertMapper<AccessRequest, NewAccessRequestRow>
        + RowMapper<AccessRequestRow, AccessRequest>
        + Send
        + Sync,
{
    async fn insert(&self, request: &AccessRequest) -> Result<(), AccessRequestRepositoryError> {
        let row = self
            .mapper
            .to_row(request)
            .map_err(|e| AccessRequestRepositoryError::Storage(e.to_string()))?;
        self.executor
            .run(move |conn| {
                diesel::insert_into(t_access_request)
                    .values(&row)
                    .execute(conn)?;
                Ok(())
            })
            .map_err(|e| {
                // The unique pending index is the authoritative anti-spam
                // guard; surface its violation as a typed conflict.
                if is_unique_violation(&e) {
                    AccessRequestRepositoryError::DuplicatePending
                } else {
                    AccessRequestRepositoryError::Storage(e.to_string())
                }
            })
    }

    async fn find_by_id(
        &self,
        request_id: &RequestId,
    ) -> Result<Option<AccessRequest>, AccessRequestRepositoryError> {
        let id_str = request_id.as_str().to_string();
        self.executor
            .run(move |conn| {
                let row = t_access_request
                    .filter(id.eq(&id_str))
                    .first::<AccessRequestRow>(conn)
                    .optional()?;
                match row {
                    Some(r) => Ok(Some(self.mapper.to_domain(&r)?)),
                    None => Ok(None),
                }
            })
            .map_err(|e| AccessRequestRepositoryError::Storage(e.to_string()))
    }

    async fn find_pending_by_token(
        &self,
        token: &str,
    ) -> Result<Option<AccessRequest>, AccessRequestRepositoryError> {
        let token_str = token.to_string();
        self.executor
            .run(move |conn| {
                let row = t_access_request
                    .filter(
                        verification_token
                            .eq(&token_str)
                            .and(status.eq(RequestStatus::Pending.as_str())),
                    )
                    .first::<AccessRequestRow>(conn)
                    .optional()?;
                match row {
                    Some(r) => Ok(Some(self.mapper.to_domain(&r)?)),
                    None => Ok(None),
                }
            })
            .map_err(|e| AccessRequestRepositoryError::Storage(e.to_string()))
    }

    async fn has_pending_for_contact(
        &self,
        property: &PropertyId,
        phone: Option<&str>,
        email: Option<&str>,
    ) -> Result<bool, AccessRequestRepositoryError> {
        let property_str = property.as_str().to_string();
        let phone_owned = phone.map(str::to_string);
        let email_owned = email.map(str::to_string);
        self.executor
            .run(move |conn| {
                let mut query = t_access_request
                    .filter(
                        property_id
                            .eq(&property_str)
                            .and(status.eq(RequestStatus::Pending.as_str())),
                    )
                    .into_boxed();
                query = match &phone_owned {
                    Some(p) => query.filter(requester_phone.eq(p)),
                    None => query.filter(requester_phone.is_null()),
                };
                query = match &email_owned {
                    Some(m) => query.filter(requester_email.eq(m)),
                    None => query.filter(requester_email.is_null()),
                };
                let count: i64 = query.count().get_result(conn)?;
                Ok(count > 0)
            })
            .map_err(|e| AccessRequestRepositoryError::Storage(e.to_string()))
    }

    async fn decide(
        &self,
        request_id: &RequestId,
        token: &str,
        to_status: RequestStatus,
        now: DateTime<Utc>,
    ) -> Result<DecideWriteOutcome, AccessRequestRepositoryError> {
        let id_str = request_id.as_str().to_string();
        let token_str = token.to_string();
        let now_ms = to_millis(now);
        self.executor
            .run(move |conn| {
                // Single conditional write: the affected-row count is the
                // mutual-exclusion guarantee for concurrent decisions.
                let target = t_access_request.filter(
                    id.eq(&id_str)
                        .and(verification_token.eq(&token_str))
                        .and(status.eq_any(DECIDABLE)),
                );
                let affected = if to_status == RequestStatus::Approved {
                    diesel::update(target)
                        .set((
                            status.eq(to_status.as_str()),
                            approved_at.eq(Some(now_ms)),
                        ))
                        .execute(conn)?
                } else {
                    diesel::update(target)
                        .set(status.eq(to_status.as_str()))
                        .execute(conn)?
                };
                if affected == 0 {
                    return Ok(DecideWriteOutcome::NoRowMatched);
                }
                let row = t_access_request
                    .filter(id.eq(&id_str))
                    .first::<AccessRequestRow>(conn)?;
                Ok(DecideWriteOutcome::Updated(self.mapper.to_domain(&row)?))
            })
            .map_err(|e| AccessRequestRepositoryError::Storage(e.to_string()))
    }

    async fn transition_status(
        &self,
        request_id: &RequestId,
        from: RequestStatus,
        to: RequestStatus,
        now: DateTime<Utc>,
    ) -> Result<bool, AccessRequestRepositoryError> {
        let id_str = request_id.as_str().to_string();
        let now_ms = to_millis(now);
        self.executor
            .run(move |conn| {
                let target =
                    t_access_request.filter(id.eq(&id_str).and(status.eq(from.as_str())));
                let affected = if to == RequestStatus::Verified {
                    diesel::update(target)
                        .set((status.eq(to.as_str()), verified_at.eq(Some(now_ms))))
                        .execute(conn)?
                } else {
                    diesel::update(target)
                        .set(status.eq(to.as_str()))
                        .execute(conn)?
                };
                Ok(affected > 0)
            })
            .map_err(|e| AccessRequestRepositoryError::Storage(e.to_string()))
    }

    async fn sweep_expired(
        &self,
        now: DateTime<Utc>,
    ) -> Result<usize, AccessRequestRepositoryError> {
        let now_ms = to_millis(now);
        self.executor
            .run(move |conn| {
                let affected = diesel::update(
                    t_access_request.filter(
                        status
                            .eq(RequestStatus::Pending.as_str())
                            .and(expires_at.lt(now_ms)),
                    ),
                )
                .set(status.eq(RequestStatus::Expired.as_str()))
                .execute(conn)?;
                Ok(affected)
            })
            .map_err(|e| AccessRequestRepositoryError::Storage(e.to_string()))
    }

    async fn list_decidable_for_properties(
        &self,
        properties: &[PropertyId],
    ) -> Result<Vec<AccessRequest>, AccessRequestRepositoryError> {
        let ids: Vec<String> = properties.iter().map(|p| p.as_str().to_string()).collect();
        self.executor
            .run(move |conn| {
                let rows = t_access_request
                    .filter(property_id.eq_any(&ids).and(status.eq_any(DECIDABLE)))
                    .order(created_at.desc())
                    .load::<AccessRequestRow>(conn)?;
                let mut requests = Vec::with_capacity(rows.len());
                for row in rows {
                    requests.push(self.mapper.to_domain(&row)?);
                }
                Ok(requests)
            })
            .map_err(|e| AccessRequestRepositoryError::Storage(e.to_string()))
    }
}
