//! Pizza API server: reads config from env (and `.env`), prepares the SQLite database, serves the router.

use pizza_api::{app, connect, ensure_tables, from_env, seed_sample_data, AppState, SqlEntityStore};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("pizza_api=info,tower_http=info")),
        )
        .init();

    let config = from_env()?;
    tracing::info!(database_url = %config.database_url, "opening database");
    let pool = connect(&config.database_url, config.max_connections).await?;
    ensure_tables(&pool).await?;

    let store = SqlEntityStore::new(pool.clone());
    if config.seed_sample_data {
        seed_sample_data(&store).await?;
    }

    let router = app(AppState::new(store), config.body_limit_bytes);
    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    pool.close().await;
    tracing::info!("shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
