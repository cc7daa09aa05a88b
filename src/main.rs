use anyhow::{Context, Result};
use reqwest::Client;
use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use vehicle_filter::{
    AppState,
    config::Settings,
    create_router,
    script_loader::{HttpScriptFetcher, ScriptLoader},
};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file first. Ignore errors (e.g., file not found)
    dotenv::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vehicle_filter=info,tower_http=info".into()),
        )
        .with(fmt::layer())
        .init();

    tracing::info!("Initializing vehicle filter server...");

    // Load configuration
    let settings = match Settings::new() {
        Ok(s) => {
            tracing::info!("Configuration loaded successfully.");
            s
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e);
        }
    };

    let http_client = Arc::new(
        Client::builder()
            .user_agent(concat!("vehicle_filter/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build shared reqwest client")?,
    );
    tracing::info!("Shared HTTP client created.");

    // One loader per process; every later request for the same URL reuses its result
    let script_loader = Arc::new(ScriptLoader::new(Arc::new(HttpScriptFetcher::new(http_client))));
    let preload = settings.script_url_list();
    if !preload.is_empty() {
        match script_loader.load_once(&preload).await {
            Ok(()) => tracing::info!("Preloaded {} external scripts.", preload.len()),
            Err(e) => tracing::warn!("External script preload failed: {}", e),
        }
    }

    let addr: SocketAddr = settings
        .server_address
        .parse()
        .with_context(|| format!("Invalid server address format: {}", settings.server_address))?;

    let app_state = AppState::new(settings, script_loader);
    let app = create_router(app_state);

    // Create a TCP listener
    let listener = match TcpListener::bind(&addr).await {
        Ok(l) => {
            tracing::info!("Server listening on {}", addr);
            l
        }
        Err(e) => {
            tracing::error!("Failed to bind to address {}: {}", addr, e);
            return Err(e.into());
        }
    };

    // Run the server
    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}
