//! Application state management

use gatehouse_core::AppConfig;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

/// Application state shared across handlers
///
/// The configuration (including the token signing key) is immutable after
/// startup; the pool is the only shared resource that blocks.
pub struct AppState {
    /// Application configuration
    pub config: AppConfig,
    /// PostgreSQL connection pool
    pub db: PgPool,
}

impl AppState {
    /// Create application state from pre-built parts
    pub fn new(config: AppConfig, db: PgPool) -> Self {
        Self { config, db }
    }

    /// Create application state, connecting the pool from configuration
    pub async fn connect(config: AppConfig) -> Result<Self, sqlx::Error> {
        let db = PgPoolOptions::new()
            .max_connections(config.database.max_connections)
            .connect(&config.database.url)
            .await?;

        Ok(Self { config, db })
    }
}
