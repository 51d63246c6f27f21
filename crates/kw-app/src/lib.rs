//! # kw-app
//!
//! Application layer for Keyward: use cases orchestrating the domain ports,
//! the notification dispatcher and the audit logger.

pub mod access_logger;
pub mod error;
pub mod notify;
pub mod usecases;

pub use access_logger::AccessLogger;
pub use error::AccessFlowError;
pub use notify::NotificationDispatcher;
