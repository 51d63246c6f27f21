pub mod access_code_repo;
pub mod access_log_repo;
pub mod access_request_repo;
pub mod domain_rule_repo;
pub mod property_repo;
pub mod verification_code_repo;

pub use access_code_repo::DieselAccessCodeRepository;
pub use access_log_repo::DieselAccessLogRepository;
pub use access_request_repo::DieselAccessRequestRepository;
pub use domain_rule_repo::DieselDomainRuleRepository;
pub use property_repo::DieselPropertyRepository;
pub use verification_code_repo::DieselVerificationCodeRepository;
