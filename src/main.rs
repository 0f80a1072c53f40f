use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use lingua_gateway::{create_routes, AppState, Config};

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("lingua_gateway=debug,tower_http=debug"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // Load configuration - an explicit CONFIG_PATH must load, defaults only when no file exists
    let explicit = std::env::var("CONFIG_PATH").ok();
    let fallbacks = ["conf.yaml", "conf.json"];

    let config = match Config::discover(explicit.as_deref(), &fallbacks)? {
        Some((config, path)) => {
            info!("Loaded configuration from: {}", path);
            config
        }
        None => {
            info!("No config file found (tried {:?}); using defaults", fallbacks);
            Config::default()
        }
    }
    .with_env_overrides();

    let bind_host = config.server.host.clone();
    let bind_port = config.server.port;

    // Clients are built once and shared by every request
    let app_state = AppState::new(config)?;
    let app = create_routes(app_state);

    let listener = tokio::net::TcpListener::bind((bind_host.as_str(), bind_port)).await?;
    info!("Starting server on {}", listener.local_addr()?);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
