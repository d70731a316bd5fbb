// In crates/app-config/src/error.rs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to load configuration")]
    LoadError(#[from] config::ConfigError),

    #[error("Invalid watchlist entry: {0}")]
    InvalidSymbol(#[from] core_types::Error),

    #[error(transparent)]
    InvalidStrategy(#[from] strategies::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
