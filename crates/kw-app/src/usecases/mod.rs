//! Use cases for the access-request lifecycle engine.

pub mod check_domain;
pub mod create_access_request;
pub mod decide_access_request;
pub mod ensure_active_code;
pub mod generate_access_code;
pub mod pending_requests;
pub mod recent_access_log;
pub mod validate_access_code;
pub mod verify_access_request;

pub use check_domain::CheckDomain;
pub use create_access_request::{
    CreateAccessRequest, CreateAccessRequestInput, CreatedAccessRequest, REQUEST_TTL_MINUTES,
};
pub use decide_access_request::{DecideAccessRequest, DecisionAction, DecisionOutcome};
pub use ensure_active_code::EnsureActiveCode;
pub use generate_access_code::{GenerateAccessCode, GenerateAccessCodeInput};
pub use pending_requests::PendingRequestsForOwner;
pub use recent_access_log::RecentAccessLog;
pub use validate_access_code::{CodeValidation, ValidateAccessCode, ValidateAccessCodeInput};
pub use verify_access_request::{VerifiedRequest, VerifyAccessRequest};
