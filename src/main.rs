use std::sync::Arc;

use tracing::{error, info, warn};

mod auth;
mod config;
mod error;
mod routes;
mod state;
mod streamlabs;
mod top;
mod twitch;
mod wizebot;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("stream_tops=info")),
        )
        .init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "invalid configuration");
            std::process::exit(1);
        }
    };

    let twitch = &config.twitch;
    if twitch.client_id.is_none() || twitch.broadcaster_id.is_none() {
        warn!("Twitch credentials incomplete, Twitch tops will be null");
    }
    if twitch.access_token.is_none() && twitch.refresh_token.is_none() {
        warn!("no Twitch access or refresh token configured, visit /api/twitch/authorize");
    }
    if config.streamlabs_api_key.is_none() {
        warn!("STREAMLABS_API_KEY not set, donator will report as not configured");
    }
    if config.wizebot_api_key.is_none() {
        warn!("WIZEBOT_API_KEY not set, top viewer will be null");
    }

    let port = config.port;
    info!(
        timezone = %config.timezone,
        cache_ttl_secs = config.top_cache_ttl.as_secs(),
        cors_origins = ?config.cors_allowed_origins,
        "configuration loaded"
    );

    let state = Arc::new(AppState::new(config));
    let app = routes::router(state);

    let listener = match tokio::net::TcpListener::bind(("0.0.0.0", port)).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(error = %e, port, "failed to bind");
            std::process::exit(1);
        }
    };

    info!(port, "stream-tops listening");

    if let Err(e) = axum::serve(listener, app).await {
        error!(error = %e, "server error");
        std::process::exit(1);
    }
}
