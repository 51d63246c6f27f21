use async_trait::async_trait;

use super::errors::SendError;

/// Outbound email delivery. One send per recipient; implementations must
/// not share failure domains between recipients.
#[async_trait]
pub trait EmailSenderPort: Send + Sync {
    async fn send(&self, to: &str, subject: &str, html_body: &str) -> Result<(), SendError>;
}

/// Outbound SMS delivery. Optional: an unconfigured sender returns
/// [`SendError::NotConfigured`] and callers degrade to email.
#[async_trait]
pub trait SmsSenderPort: Send + Sync {
    async fn send(&self, to: &str, body: &str) -> Result<(), SendError>;
}
