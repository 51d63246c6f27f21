//! Domain allow/block screening for a requester email address.

use std::sync::Arc;

use tracing::warn;

use kw_core::policy;
use kw_core::ports::{ClockPort, DomainRuleRepositoryPort};
use kw_core::DomainCheck;

pub struct CheckDomain {
    rules: Arc<dyn DomainRuleRepositoryPort>,
    clock: Arc<dyn ClockPort>,
}

impl CheckDomain {
    pub fn new(rules: Arc<dyn DomainRuleRepositoryPort>, clock: Arc<dyn ClockPort>) -> Self {
        Self { rules, clock }
    }

    /// Never fails: a storage error fails closed with a message that is
    /// distinguishable from a genuine deny, so callers treating the result
    /// as advisory can tell the two apart.
    pub async fn execute(&self, email: &str) -> DomainCheck {
        let Some(domain) = policy::email_domain(email) else {
            return DomainCheck::denied(None, "Invalid email format");
        };

        let allow_rule = match self.rules.find_allow_rule(&domain).await {
            Ok(rule) => rule,
            Err(e) => {
                warn!(domain, "allow-rule lookup failed: {e}");
                return DomainCheck::denied(Some(domain), "Error checking domain status");
            }
        };

        // A block-rule lookup failure is tolerated: the allow decision
        // already happened and the original flow continues past it.
        let block_rule = match self.rules.find_block_rule(&domain).await {
            Ok(rule) => rule,
            Err(e) => {
                warn!(domain, "block-rule lookup failed: {e}");
                None
            }
        };

        policy::evaluate_rules(
            &domain,
            allow_rule.as_ref(),
            block_rule.as_ref(),
            self.clock.now(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{DateTime, Utc};
    use mockall::mock;

    use kw_core::ports::DomainRuleRepositoryError;
    use kw_core::{DomainRule, RuleKind};

    mock! {
        Rules {}

        #[async_trait]
        impl DomainRuleRepositoryPort for Rules {
            async fn find_allow_rule(
                &self,
                domain: &str,
            ) -> Result<Option<DomainRule>, DomainRuleRepositoryError>;

            async fn find_block_rule(
                &self,
                domain: &str,
            ) -> Result<Option<DomainRule>, DomainRuleRepositoryError>;
        }
    }

    struct FixedClock(DateTime<Utc>);

    impl ClockPort for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.0
        }
    }

    fn allow_rule() -> DomainRule {
        DomainRule {
            id: "rule-1".to_string(),
            domain: "nhs.uk".to_string(),
            kind: RuleKind::Allowed,
            note: None,
            is_active: true,
            expires_at: None,
            created_by: None,
        }
    }

    fn check_domain(rules: MockRules) -> CheckDomain {
        CheckDomain::new(Arc::new(rules), Arc::new(FixedClock(Utc::now())))
    }

    #[tokio::test]
    async fn allowed_domain_passes() {
        let mut rules = MockRules::new();
        rules
            .expect_find_allow_rule()
            .returning(|_| Ok(Some(allow_rule())));
        rules.expect_find_block_rule().returning(|_| Ok(None));

        let check = check_domain(rules).execute("nurse@nhs.uk").await;
        assert!(check.allowed);
        assert_eq!(check.domain.as_deref(), Some("nhs.uk"));
    }

    #[tokio::test]
    async fn allow_lookup_error_fails_closed_with_distinct_message() {
        let mut rules = MockRules::new();
        rules
            .expect_find_allow_rule()
            .returning(|_| Err(DomainRuleRepositoryError::Storage("boom".to_string())));

        let check = check_domain(rules).execute("nurse@nhs.uk").await;
        assert!(!check.allowed);
        assert_eq!(check.message, "Error checking domain status");
    }

    #[tokio::test]
    async fn block_lookup_error_is_tolerated() {
        let mut rules = MockRules::new();
        rules
            .expect_find_allow_rule()
            .returning(|_| Ok(Some(allow_rule())));
        rules
            .expect_find_block_rule()
            .returning(|_| Err(DomainRuleRepositoryError::Storage("boom".to_string())));

        let check = check_domain(rules).execute("nurse@nhs.uk").await;
        assert!(check.allowed);
    }

    #[tokio::test]
    async fn malformed_email_is_denied_without_lookups() {
        let rules = MockRules::new();
        let check = check_domain(rules).execute("not-an-email").await;
        assert!(!check.allowed);
        assert_eq!(check.message, "Invalid email format");
    }
}
