use tracing_subscriber::EnvFilter;

use ecycle_kiosk::config;
use ecycle_kiosk::state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    color_eyre::install()?;

    // Structured JSON logging, collected by the kiosk's log shipper
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    let path = config::config_path()?;
    let config = config::load_config(&path)?.with_env_overrides(|key| std::env::var(key).ok());

    let state = AppState::from_config(&config).await;

    // The UI lists confirmed feedback as soon as it loads.
    if !state.monitor().is_offline() {
        if let Err(e) = state.queue.refresh().await {
            tracing::warn!(error = %e, "initial feedback load failed");
        }
    }

    let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
    tracing::info!(
        addr = %listener.local_addr()?,
        collection = %config.collection,
        "kiosk service listening"
    );

    axum::serve(listener, ecycle_kiosk::router(state)).await?;
    Ok(())
}
