use async_trait::async_trait;

use crate::ids::{PropertyId, UserId};
use crate::property::{ContactPoint, Property};

use super::errors::PropertyRepositoryError;

/// Read-only view over properties and the contact points hanging off their
/// owner. Property CRUD lives outside the engine.
#[async_trait]
pub trait PropertyRepositoryPort: Send + Sync {
    async fn get_by_id(
        &self,
        property_id: &PropertyId,
    ) -> Result<Option<Property>, PropertyRepositoryError>;

    async fn list_ids_for_owner(
        &self,
        owner_user_id: &UserId,
    ) -> Result<Vec<PropertyId>, PropertyRepositoryError>;

    /// The owner's own profile contact point.
    async fn owner_profile(
        &self,
        owner_user_id: &UserId,
    ) -> Result<Option<ContactPoint>, PropertyRepositoryError>;

    /// Emergency contacts flagged primary for this owner.
    async fn primary_contacts(
        &self,
        owner_user_id: &UserId,
    ) -> Result<Vec<ContactPoint>, PropertyRepositoryError>;
}
