//! Access-request lifecycle domain: codes, requests, verification and the
//! audit trail.

pub mod code;
pub mod log;
pub mod request;
pub mod state_machine;
pub mod verification;

pub use code::{AccessCode, CodeType, CodeUnusableReason};
pub use log::{AccessLogEntry, AccessMethod};
pub use request::{AccessRequest, LocationData, RequestMeta, RequestStatus};
pub use state_machine::{RequestEvent, RequestStateMachine, TransitionError};
pub use verification::{Channel, VerificationCode, VerificationOutcome};
