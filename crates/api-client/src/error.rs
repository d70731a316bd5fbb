// In crates/api-client/src/error.rs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to build the API client: {0}")]
    ClientBuildError(String),
    #[error("Symbol is not served by this source: {0}")]
    UnsupportedSymbol(#[from] core_types::Error),
    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
    #[error("Deserialization failed: {0}")]
    DeserializationFailed(#[from] serde_json::Error),
    #[error("API error: status {status}, body: {body}")]
    ApiError { status: u16, body: String },
}

pub type Result<T> = std::result::Result<T, Error>;
