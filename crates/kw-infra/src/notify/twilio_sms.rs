//! SMS delivery through a Twilio-compatible REST API.
//!
//! Form-encoded POST to the account's Messages endpoint with basic auth.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use kw_core::ports::{SendError, SmsSenderPort};

const SEND_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct TwilioConfig {
    pub account_sid: String,
    pub auth_token: String,
    pub from_number: String,
    /// API root, overridable for tests; defaults to the public endpoint.
    pub api_base: String,
}

impl TwilioConfig {
    pub fn new(account_sid: String, auth_token: String, from_number: String) -> Self {
        Self {
            account_sid,
            auth_token,
            from_number,
            api_base: "https://api.twilio.com".to_string(),
        }
    }
}

pub struct TwilioSmsSender {
    client: reqwest::Client,
    config: TwilioConfig,
}

impl TwilioSmsSender {
    pub fn new(config: TwilioConfig) -> Result<Self, SendError> {
        let client = reqwest::Client::builder()
            .timeout(SEND_TIMEOUT)
            .build()
            .map_err(|e| SendError::Delivery(e.to_string()))?;
        Ok(Self { client, config })
    }

    fn messages_url(&self) -> String {
        format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.config.api_base.trim_end_matches('/'),
            self.config.account_sid
        )
    }
}

#[async_trait]
impl SmsSenderPort for TwilioSmsSender {
    async fn send(&self, to: &str, body: &str) -> Result<(), SendError> {
        let params = [
            ("To", to),
            ("From", self.config.from_number.as_str()),
            ("Body", body),
        ];
        let response = self
            .client
            .post(self.messages_url())
            .basic_auth(&self.config.account_sid, Some(&self.config.auth_token))
            .form(&params)
            .send()
            .await
            .map_err(|e| SendError::Delivery(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SendError::Delivery(format!(
                "SMS API returned {status}: {body}"
            )));
        }
        debug!(to, "SMS API accepted message");
        Ok(())
    }
}

/// Stand-in used when Twilio credentials are absent; callers degrade to
/// email-only notification.
pub struct DisabledSmsSender;

#[async_trait]
impl SmsSenderPort for DisabledSmsSender {
    async fn send(&self, _to: &str, _body: &str) -> Result<(), SendError> {
        Err(SendError::NotConfigured)
    }
}
