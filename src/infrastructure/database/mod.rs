pub mod entities;
pub mod errors;
pub mod migrator;
pub mod repositories;

pub use repositories::SeaOrmProductoRepository;

use std::time::Duration;

use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tracing::info;

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Database URL (e.g., "sqlite://./catalog.db?mode=rwc" or "postgres://...")
    pub url: String,
    /// Upper bound of pooled connections
    pub max_connections: u32,
    /// Seconds to wait for a connection before giving up
    pub connect_timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://./catalog.db?mode=rwc".to_string(),
            max_connections: 10,
            connect_timeout_secs: 5,
        }
    }
}

impl DatabaseConfig {
    /// Private in-memory SQLite database, one connection so every query
    /// sees the same database.
    pub fn in_memory() -> Self {
        Self {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            ..Self::default()
        }
    }
}

/// Initialize the database connection pool.
///
/// Called once at startup; the returned pool is cloned into every consumer
/// and lives until shutdown.
pub async fn init_database(config: &DatabaseConfig) -> Result<DatabaseConnection, sea_orm::DbErr> {
    info!("Connecting to database: {}", config.url);
    let mut options = ConnectOptions::new(config.url.clone());
    options
        .max_connections(config.max_connections)
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
        .sqlx_logging(false);
    let db = Database::connect(options).await?;
    info!("Database connected successfully");
    Ok(db)
}
