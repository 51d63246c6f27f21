use async_trait::async_trait;
use diesel::prelude::*;

use kw_core::ports::{PropertyRepositoryError, PropertyRepositoryPort};
use kw_core::{ContactPoint, Property, PropertyId, UserId};

use crate::db::models::{EmergencyContactRow, OwnerProfileRow, PropertyRow};
use crate::db::ports::{DbExecutor, RowMapper};
use crate::db::schema::{t_emergency_contact, t_owner_profile, t_property};

pub struct DieselPropertyRepository<E, M> {
    executor: E,
    mapper: M,
}

impl<E, M> DieselPropertyRepository<E, M> {
    pub fn new(executor: E, mapper: M) -> Self {
        Self { executor, mapper }
    }
}

#[async_trait]
impl<E, M> PropertyRepositoryPort for DieselPropertyRepository<E, M>
where
    E: DbExecutor,
    M: RowMapper<PropertyRow, Property>
        + RowMapper<OwnerProfileRow, ContactPoint>
        + RowMapper<EmergencyContactRow, ContactPoint>
        + Send
        + Sync,
{
    async fn get_by_id(
        &self,
        property_id: &PropertyId,
    ) -> Result<Option<Property>, PropertyRepositoryError> {
        let id_str = property_id.as_str().to_string();
        self.executor
            .run(move |conn| {
                let row = t_property::table
                    .filter(t_property::id.eq(&id_str))
                    .first::<PropertyRow>(conn)
                    .optional()?;
                match row {
                    Some(r) => Ok(Some(self.mapper.to_domain(&r)?)),
                    None => Ok(None),
                }
            })
            .map_err(|e| PropertyRepositoryError::Storage(e.to_string()))
    }

    async fn list_ids_for_owner(
        &self,
        owner_user_id: &UserId,
    ) -> Result<Vec<PropertyId>, PropertyRepositoryError> {
        let owner_str = owner_user_id.as_str().to_string();
        self.executor
            .run(move |conn| {
                let ids = t_property::table
                    .filter(t_property::owner_user_id.eq(&owner_str))
                    .select(t_property::id)
                    .load::<String>(conn)?;
                Ok(ids.into_iter().map(PropertyId::from).collect())
            })
            .map_err(|e| PropertyRepositoryError::Storage(e.to_string()))
    }

    async fn owner_profile(
        &self,
        owner_user_id: &UserId,
    ) -> Result<Option<ContactPoint>, PropertyRepositoryError> {
        let owner_str = owner_user_id.as_str().to_string();
        self.executor
            .run(move |conn| {
                let row = t_owner_profile::table
                    .filter(t_owner_profile::user_id.eq(&owner_str))
                    .first::<OwnerProfileRow>(conn)
                    .optional()?;
                match row {
                    Some(r) => Ok(Some(self.mapper.to_domain(&r)?)),
                    None => Ok(None),
                }
            })
            .map_err(|e| PropertyRepositoryError::Storage(e.to_string()))
    }

    async fn primary_contacts(
        &self,
        owner_user_id: &UserId,
    ) -> Result<Vec<ContactPoint>, PropertyRepositoryError> {
        let owner_str = owner_user_id.as_str().to_string();
        self.executor
            .run(move |conn| {
                let rows = t_emergency_contact::table
                    .filter(
                        t_emergency_contact::user_id
                            .eq(&owner_str)
                            .and(t_emergency_contact::is_primary.eq(true)),
                    )
                    .load::<EmergencyContactRow>(conn)?;
                let mut contacts = Vec::with_capacity(rows.len());
                for row in rows {
                    contacts.push(self.mapper.to_domain(&row)?);
                }
                Ok(contacts)
            })
            .map_err(|e| PropertyRepositoryError::Storage(e.to_string()))
    }
}
