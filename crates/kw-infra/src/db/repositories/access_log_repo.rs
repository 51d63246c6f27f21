use async_trait::async_trait;
use diesel::prelude::*;

use kw_core::access::AccessLogEntry;
use kw_core::ports::{AccessLogError, AccessLogPort};
use kw_core::PropertyId;

use crate::db::models::{AccessLogRow, NewAccessLogRow};
use crate::db::ports::{DbExecutor, InsertMapper, RowMapper};
use crate::db::schema::t_access_log::dsl::*;

/// Append-only: this repository deliberately exposes no update or delete.
pub struct DieselAccessLogRepository<E, M> {
    executor: E,
    mapper: M,
}

impl<E, M> DieselAccessLogRepository<E, M> {
    pub fn new(executor: E, mapper: M) -> Self {
        Self { executor, mapper }
    }
}

#[async_trait]
impl<E, M> AccessLogPort for DieselAccessLogRepository<E, M>
where
    E: DbExecutor,
    M: InsertMapper<AccessLogEntry, NewAccessLogRow>
        + RowMapper<AccessLogRow, AccessLogEntry>
        + Send
        + Sync,
{
    async fn append(&self, entry: &AccessLogEntry) -> Result<(), AccessLogError> {
        let row = self
            .mapper
            .to_row(entry)
            .map_err(|e| AccessLogError::Storage(e.to_string()))?;
        self.executor
            .run(move |conn| {
                diesel::insert_into(t_access_log).values(&row).execute(conn)?;
                Ok(())
            })
            .map_err(|e| AccessLogError::Storage(e.to_string()))
    }

    async fn recent_for_property(
        &self,
        property: &PropertyId,
        limit: usize,
    ) -> Result<Vec<AccessLogEntry>, AccessLogError> {
        let property_str = property.as_str().to_string();
        self.executor
            .run(move |conn| {
                let rows = t_access_log
                    .filter(property_id.eq(&property_str))
                    .order(used_at.desc())
                    .limit(limit as i64)
                    .load::<AccessLogRow>(conn)?;
                let mut entries = Vec::with_capacity(rows.len());
                for row in rows {
                    entries.push(self.mapper.to_domain(&row)?);
                }
                Ok(entries)
            })
            .map_err(|e| AccessLogError::Storage(e.to_string()))
    }
}
