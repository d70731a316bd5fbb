// In crates/engine/src/error.rs

use core_types::Symbol;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// The market-data source could not serve the symbol.
    #[error("Market data unavailable: {0}")]
    DataSource(#[from] api_client::Error),

    /// A successful fetch returned no usable rows.
    #[error("No price history for {0}")]
    EmptyHistory(Symbol),

    #[error("Persistence failed: {0}")]
    Persistence(#[from] database::Error),

    #[error("{operation} timed out after {seconds}s")]
    Timeout { operation: &'static str, seconds: u64 },

    #[error(transparent)]
    Strategy(#[from] strategies::Error),

    #[error("Evaluation task for {symbol} failed: {reason}")]
    TaskFailed { symbol: Symbol, reason: String },
}

pub type Result<T> = std::result::Result<T, Error>;
