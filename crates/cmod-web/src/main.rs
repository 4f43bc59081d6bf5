use anyhow::{Context, Result};
use cmod_core::board::BoardStorage;
use cmod_core::config::Config;
use cmod_storage::FileSystemStorage;
use cmod_web::{create_app, AppState};
use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cmod_web=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let data_dir = env::var("CMOD_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(".cmod"));
    let storage = FileSystemStorage::new(&data_dir)
        .with_context(|| format!("Failed to open data directory {}", data_dir.display()))?;
    let config = Config::load_or_default(&storage.config_path())
        .with_context(|| format!("Invalid configuration in {}", data_dir.display()))?;

    let port = match env::var("PORT") {
        Ok(port) => port.parse::<u16>().context("PORT must be a valid number")?,
        Err(_) => config.web.port,
    };
    let bind_addr = config.web.bind.clone();

    let board = storage.load_or_default().context("Failed to load board")?;
    info!(
        "Loaded board from {} ({} comments)",
        data_dir.display(),
        board.comments.count()
    );

    let state = AppState::new(board, Arc::new(storage), &config)?;
    let app = create_app(state);

    let listener = tokio::net::TcpListener::bind(format!("{}:{}", bind_addr, port))
        .await
        .with_context(|| format!("Failed to bind to {}:{}", bind_addr, port))?;

    info!("Server starting on http://{}:{}", bind_addr, port);

    axum::serve(listener, app)
        .await
        .context("Server failed to start")?;

    Ok(())
}
