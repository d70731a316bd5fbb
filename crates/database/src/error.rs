// In crates/database/src/error.rs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to connect to the database")]
    ConnectionError(#[from] sqlx::Error),
    #[error("Database migration failed: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),
    #[error("Database operation failed")]
    OperationFailed(#[source] sqlx::Error),
    #[error("Stored value in column '{column}' is unreadable: '{value}'")]
    CorruptRow { column: &'static str, value: String },
}

pub type Result<T> = std::result::Result<T, Error>;
