//! Email delivery through a transactional mail HTTP API.
//!
//! One JSON POST per recipient; the API key is a bearer token. Timeouts are
//! short because every caller treats delivery as best-effort.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tracing::debug;

use kw_core::ports::{EmailSenderPort, SendError};

const SEND_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct MailerConfig {
    /// Full message endpoint, e.g. `https://api.mailprovider.example/v1/messages`.
    pub api_url: String,
    pub api_key: String,
    /// From header, e.g. `Keyward <noreply@keyward.app>`.
    pub from: String,
}

pub struct HttpApiMailer {
    client: reqwest::Client,
    config: MailerConfig,
}

#[derive(Serialize)]
struct OutboundMessage<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    html: &'a str,
}

impl HttpApiMailer {
    pub fn new(config: MailerConfig) -> Result<Self, SendError> {
        let client = reqwest::Client::builder()
            .timeout(SEND_TIMEOUT)
            .build()
            .map_err(|e| SendError::Delivery(e.to_string()))?;
        Ok(Self { client, config })
    }
}

#[async_trait]
impl EmailSenderPort for HttpApiMailer {
    async fn send(&self, to: &str, subject: &str, html_body: &str) -> Result<(), SendError> {
        let message = OutboundMessage {
            from: &self.config.from,
            to,
            subject,
            html: html_body,
        };
        let response = self
            .client
            .post(&self.config.api_url)
            .bearer_auth(&self.config.api_key)
            .json(&message)
            .send()
            .await
            .map_err(|e| SendError::Delivery(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SendError::Delivery(format!(
                "mail API returned {status}: {body}"
            )));
        }
        debug!(to, "mail API accepted message");
        Ok(())
    }
}

/// Stand-in used when no mail credentials are configured.
pub struct DisabledMailer;

#[async_trait]
impl EmailSenderPort for DisabledMailer {
    async fn send(&self, _to: &str, _subject: &str, _html_body: &str) -> Result<(), SendError> {
        Err(SendError::NotConfigured)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mailer(url: String) -> HttpApiMailer {
        HttpApiMailer::new(MailerConfig {
            api_url: url,
            api_key: "test-key".to_string(),
            from: "Keyward <noreply@keyward.test>".to_string(),
        })
        .expect("build mailer")
    }

    #[tokio::test]
    async fn posts_message_with_bearer_auth() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/messages")
            .match_header("authorization", "Bearer test-key")
            .match_body(mockito::Matcher::PartialJson(serde_json::json!({
                "to": "a@b.com",
                "subject": "Hello",
            })))
            .with_status(202)
            .create_async()
            .await;

        let result = mailer(format!("{}/v1/messages", server.url()))
            .send("a@b.com", "Hello", "<p>Hi</p>")
            .await;

        assert!(result.is_ok());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn non_success_status_is_a_delivery_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/v1/messages")
            .with_status(500)
            .with_body("upstream broke")
            .create_async()
            .await;

        let result = mailer(format!("{}/v1/messages", server.url()))
            .send("a@b.com", "Hello", "<p>Hi</p>")
            .await;

        match result {
            Err(SendError::Delivery(msg)) => assert!(msg.contains("500")),
            other => panic!("expected delivery error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn disabled_mailer_reports_not_configured() {
        let result = DisabledMailer.send("a@b.com", "Hello", "x").await;
        assert!(matches!(result, Err(SendError::NotConfigured)));
    }
}
