use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use metalens_core::{AnalysisStore, MemoryStore, SqliteStore};
use metalens_server::{AppState, Config, build_router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "metalens_server={level},metalens_core={level},tower_http={level}",
                level = &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting metalens server v{}", env!("CARGO_PKG_VERSION"));

    let store: Arc<dyn AnalysisStore> = match &config.database_path {
        Some(path) => Arc::new(
            SqliteStore::open(path)
                .with_context(|| format!("failed to open database {}", path.display()))?,
        ),
        None => {
            info!("METALENS_DATABASE not set, analyses are kept in memory");
            Arc::new(MemoryStore::new())
        }
    };

    let state = AppState::new(store, config.clone())?;

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
