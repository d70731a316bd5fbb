// In crates/strategies/src/error.rs

use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum Error {
    #[error("Not enough history to evaluate: need {required} usable quotes, have {available}")]
    InsufficientData { required: usize, available: usize },

    #[error("Invalid strategy parameters: {0}")]
    InvalidParameters(String),
}

pub type Result<T> = std::result::Result<T, Error>;
