use chrono::{DateTime, Utc};

/// Clock port so every expiry rule stays testable.
pub trait ClockPort: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}
