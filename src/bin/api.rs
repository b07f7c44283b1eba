use anyhow::Result;
use slowka::{
    ai::AiClient, app_state::AppState, config::Config, repositories::WordRepository, routes,
    vocabulary::WordBank,
};
use std::sync::Arc;
use tokio::signal;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // Load configuration
    let config = Config::from_env()?;

    // Create database connection pool
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(10)
        .connect(config.database_url())
        .await?;

    // Run migrations
    sqlx::migrate!("./migrations").run(&pool).await?;

    let word_bank = WordBank::load(Arc::new(WordRepository::new(pool.clone()))).await?;
    let ai = AiClient::from_config(&config)?;
    info!("AI service at {}", ai.base_url());

    let state = AppState::new(pool, word_bank, Arc::new(ai), config.jwt_secret());
    let app = routes::router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    info!("Listening on {}", listener.local_addr()?);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        return;
    }
    info!("Received shutdown signal");
}
