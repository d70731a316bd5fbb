// In crates/database/src/lib.rs

use std::str::FromStr;

use app_config::types::DatabaseSettings;
use async_trait::async_trait;
use core_types::{Alert, NewAlert, Quote, Symbol};
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

mod alerts;
pub mod error;
mod quotes;
pub mod types;

// Re-export the most important types for easy access.
pub use error::{Error, Result};
pub use types::AlertQuery;

/// Persistence of daily quotes.
#[async_trait]
pub trait QuoteStore: Send + Sync {
    /// All stored quotes for `symbol`, oldest first.
    async fn load_quotes(&self, symbol: &Symbol) -> Result<Vec<Quote>>;

    /// Replaces every stored quote for `symbol` with `quotes` in one transaction.
    async fn replace_quotes(&self, symbol: &Symbol, quotes: &[Quote]) -> Result<()>;
}

/// Persistence of alerts.
#[async_trait]
pub trait AlertStore: Send + Sync {
    /// Stores a new alert with status unhandled.
    ///
    /// Returns `None` when an alert with the same symbol, kind and trade date
    /// already exists.
    async fn insert_alert(&self, alert: &NewAlert) -> Result<Option<Alert>>;

    /// Matching alerts, newest first.
    async fn find_alerts(&self, query: &AlertQuery) -> Result<Vec<Alert>>;

    /// Marks an unhandled alert as acknowledged. Returns `false` if no unhandled
    /// alert has that id.
    async fn acknowledge_alert(&self, id: i64) -> Result<bool>;
}

/// A wrapper around the `sqlx` connection pool.
#[derive(Debug, Clone)]
pub struct Db(SqlitePool);

/// Opens the SQLite database, creating the file if needed, and runs migrations.
pub async fn connect(settings: &DatabaseSettings) -> Result<Db> {
    let options = SqliteConnectOptions::from_str(&settings.url)?.create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(settings.max_connections)
        .connect_with(options)
        .await?;

    let db = Db(pool);
    db.migrate().await?;
    tracing::info!(url = %settings.url, "Database ready.");
    Ok(db)
}

impl Db {
    pub fn from_pool(pool: SqlitePool) -> Self {
        Self(pool)
    }

    /// Brings the schema up to date.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("../../migrations").run(&self.0).await?;
        Ok(())
    }
}
