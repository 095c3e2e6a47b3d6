use anyhow::Context;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use building_companion::api;
use building_companion::app::build_state;
use building_companion::config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "building_companion=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Building Companion");

    let config = AppConfig::load().context("Failed to load configuration")?;

    let state = build_state(&config)
        .await
        .context("Failed to initialize application services")?;

    // Warm the history list so the first screen load is immediate.
    let outcome = state.history.refresh().await;
    info!("Initial access history load: {:?}", outcome);

    let app = api::router(state);

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
