use anyhow::Context;
use dotenvy::dotenv;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use media_publisher::app;
use media_publisher::config::settings::AppConfig;
use media_publisher::infrastructure::media::client::ArmMediaClient;
use media_publisher::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting server...");

    let config = AppConfig::new().context("missing required configuration")?;
    let media = ArmMediaClient::new(&config).context("failed to build Media Services client")?;
    let port = config.server_port;

    let state = AppState::new(config, Arc::new(media)).context("invalid DRM configuration")?;
    let app = app::create_app(state);

    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Server running on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
