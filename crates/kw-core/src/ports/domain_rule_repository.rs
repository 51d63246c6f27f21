use async_trait::async_trait;

use crate::policy::DomainRule;

use super::errors::DomainRuleRepositoryError;

/// Lookup over the two independent rule tables. Expiry is evaluated by the
/// caller; these return the active rule rows as stored.
#[async_trait]
pub trait DomainRuleRepositoryPort: Send + Sync {
    async fn find_allow_rule(
        &self,
        domain: &str,
    ) -> Result<Option<DomainRule>, DomainRuleRepositoryError>;

    async fn find_block_rule(
        &self,
        domain: &str,
    ) -> Result<Option<DomainRule>, DomainRuleRepositoryError>;
}
