//! Port interfaces between use cases and infrastructure.
//!
//! Ports keep the domain free of storage and delivery concerns; diesel and
//! reqwest implementations live in `kw-infra`, fakes and mocks in tests.

pub mod access_code_repository;
pub mod access_log;
pub mod access_request_repository;
pub mod clock;
pub mod domain_rule_repository;
pub mod errors;
pub mod property_repository;
pub mod sender;
pub mod verification_code_repository;

pub use access_code_repository::AccessCodeRepositoryPort;
pub use access_log::AccessLogPort;
pub use access_request_repository::{AccessRequestRepositoryPort, DecideWriteOutcome};
pub use clock::ClockPort;
pub use domain_rule_repository::DomainRuleRepositoryPort;
pub use errors::{
    AccessCodeRepositoryError, AccessLogError, AccessRequestRepositoryError,
    DomainRuleRepositoryError, PropertyRepositoryError, SendError,
    VerificationCodeRepositoryError,
};
pub use property_repository::PropertyRepositoryPort;
pub use sender::{EmailSenderPort, SmsSenderPort};
pub use verification_code_repository::VerificationCodeRepositoryPort;
