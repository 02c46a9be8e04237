use std::sync::Arc;

use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use edumate::{
    config::Config,
    extract::RemoteExtractor,
    inference::HttpInferenceClient,
    session::{AppState, SessionServer},
    storage::SqliteStorage,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    // Initialize logging
    init_logging(&config);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "EduMate session service starting..."
    );

    // Initialize storage
    let storage = match SqliteStorage::new(&config.database).await {
        Ok(s) => {
            info!(path = %config.database.path.display(), "Database initialized");
            s
        }
        Err(e) => {
            error!(error = %e, "Failed to initialize database");
            return Err(e.into());
        }
    };

    // Initialize inference client
    let inference = match HttpInferenceClient::new(&config.inference, config.request.clone()) {
        Ok(c) => {
            info!(base_url = %config.inference.base_url, "Inference client initialized");
            c
        }
        Err(e) => {
            error!(error = %e, "Failed to initialize inference client");
            return Err(e.into());
        }
    };

    // Initialize text extractor
    let extractor = match RemoteExtractor::new(&config.inference, &config.request) {
        Ok(x) => x,
        Err(e) => {
            error!(error = %e, "Failed to initialize text extractor");
            return Err(e.into());
        }
    };

    // Create application state
    let state = Arc::new(AppState::new(
        config,
        storage,
        Arc::new(inference),
        Arc::new(extractor),
    ));

    // Start session server
    let server = SessionServer::new(state);

    info!("Session ready, waiting for intents on stdin...");

    if let Err(e) = server.run().await {
        error!(error = %e, "Server error");
        return Err(e.into());
    }

    info!("Session shutdown complete");
    Ok(())
}

/// Initialize tracing/logging
fn init_logging(config: &Config) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format {
        edumate::config::LogFormat::Json => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        edumate::config::LogFormat::Pretty => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }
}
