//! # kw-infra
//!
//! Infrastructure adapters for Keyward: diesel/SQLite repositories behind
//! the `kw-core` ports, plus HTTP-based email and SMS senders.

pub mod db;
pub mod notify;
pub mod time;

pub use time::SystemClock;
