pub mod access_code_row;
pub mod access_log_row;
pub mod access_request_row;
pub mod domain_rule_row;
pub mod property_row;
pub mod verification_code_row;

pub use access_code_row::{AccessCodeRow, NewAccessCodeRow};
pub use access_log_row::{AccessLogRow, NewAccessLogRow};
pub use access_request_row::{AccessRequestRow, NewAccessRequestRow};
pub use domain_rule_row::{AllowedDomainRow, BlockedDomainRow};
pub use property_row::{EmergencyContactRow, OwnerProfileRow, PropertyRow};
pub use verification_code_row::{NewVerificationCodeRow, VerificationCodeRow};
