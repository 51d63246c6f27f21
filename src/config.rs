//! Environment-driven server configuration.
//!
//! Every knob is a `KEYWARD_*` variable; `.env` files are honored via
//! dotenvy at startup. Mail and SMS credentials are optional — missing
//! credentials disable the channel instead of failing boot.

use std::env;
use std::net::SocketAddr;

use anyhow::{Context, Result};

use kw_infra::notify::{MailerConfig, TwilioConfig};

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    pub database_url: String,
    /// External base URL embedded in owner-action links.
    pub base_url: String,
    pub mailer: Option<MailerConfig>,
    pub twilio: Option<TwilioConfig>,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        let bind: SocketAddr = env::var("KEYWARD_BIND")
            .unwrap_or_else(|_| "127.0.0.1:8080".to_string())
            .parse()
            .context("KEYWARD_BIND is not a valid socket address")?;

        let database_url =
            env::var("KEYWARD_DATABASE_URL").unwrap_or_else(|_| "keyward.db".to_string());

        let base_url =
            env::var("KEYWARD_BASE_URL").unwrap_or_else(|_| format!("http://{bind}"));

        let mailer = match (
            env::var("KEYWARD_MAIL_API_URL"),
            env::var("KEYWARD_MAIL_API_KEY"),
        ) {
            (Ok(api_url), Ok(api_key)) => Some(MailerConfig {
                api_url,
                api_key,
                from: env::var("KEYWARD_MAIL_FROM")
                    .unwrap_or_else(|_| "Keyward <noreply@keyward.app>".to_string()),
            }),
            _ => None,
        };

        let twilio = match (
            env::var("KEYWARD_TWILIO_ACCOUNT_SID"),
            env::var("KEYWARD_TWILIO_AUTH_TOKEN"),
            env::var("KEYWARD_TWILIO_FROM_NUMBER"),
        ) {
            (Ok(sid), Ok(token), Ok(from)) => Some(TwilioConfig::new(sid, token, from)),
            _ => None,
        };

        Ok(Self {
            bind,
            database_url,
            base_url,
            mailer,
            twilio,
        })
    }
}
