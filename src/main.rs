use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use kyndkart_api::auth::TokenKeys;
use kyndkart_api::database::{MemoryStore, PgStore, Store};
use kyndkart_api::state::AppState;

#[derive(Debug, Parser)]
#[command(name = "kyndkart-api")]
#[command(about = "KyndKart donation and task tracking API server")]
#[command(version)]
struct Args {
    #[arg(long, help = "Address to bind (overrides HOST)")]
    host: Option<String>,

    #[arg(long, help = "Port to listen on (overrides KYNDKART_PORT / PORT)")]
    port: Option<u16>,

    #[arg(long, help = "Use the in-memory store even if DATABASE_URL is set")]
    memory: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("kyndkart_api=info,tower_http=info")),
        )
        .init();

    let args = Args::parse();

    let config = kyndkart_api::config::config();
    config.validate()?;
    tracing::info!("Starting KyndKart API in {:?} mode", config.environment);

    let pg = match (&config.database.url, args.memory) {
        (Some(url), false) => Some(
            PgStore::connect(url, &config.database)
                .await
                .context("failed to connect to database")?,
        ),
        _ => None,
    };
    let store: Arc<dyn Store> = match &pg {
        Some(pg) => Arc::new(pg.clone()),
        None => {
            tracing::warn!("Using in-memory store; data will not survive a restart");
            Arc::new(MemoryStore::new())
        }
    };

    let state = AppState::new(store, TokenKeys::from_config(&config.security));
    let app = kyndkart_api::app(state, config);

    let host = args.host.unwrap_or_else(|| config.server.host.clone());
    let port = args.port.unwrap_or(config.server.port);
    let bind_addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("KyndKart API listening on http://{}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    if let Some(pg) = pg {
        pg.close().await;
    }
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
