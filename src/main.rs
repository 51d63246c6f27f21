#![forbid(unsafe_code)]

mod config;
mod http;
mod state;

use anyhow::Result;
use tracing::info;

use crate::config::ServerConfig;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ServerConfig::from_env()?;
    let state = AppState::build(&config)?;

    let app = http::router(state);
    let listener = tokio::net::TcpListener::bind(config.bind).await?;
    info!(
        "keyward listening on http://{} (base_url={}, mail={}, sms={})",
        config.bind,
        config.base_url,
        config.mailer.is_some(),
        config.twilio.is_some(),
    );
    axum::serve(listener, app).await?;
    Ok(())
}

fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("keyward=info,kw_app=info,kw_infra=info,info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();
}
