// In crates/notifier/src/error.rs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to build the notification client: {0}")]
    ClientBuildError(String),
    #[error("Notification request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
    #[error("Unexpected notification response: {0}")]
    DeserializationFailed(#[from] serde_json::Error),
    #[error("Access token unavailable: errcode {code}, {message}")]
    TokenUnavailable { code: i64, message: String },
    #[error("Message rejected: errcode {code}, {message}")]
    Rejected { code: i64, message: String },
}

pub type Result<T> = std::result::Result<T, Error>;
