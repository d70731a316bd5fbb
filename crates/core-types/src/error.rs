// In crates/core-types/src/error.rs

use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum Error {
    #[error("Unrecognised symbol '{0}', expected a code like 600549.SH or 000001.SZ")]
    InvalidSymbol(String),

    #[error("Invalid {field}: '{value}'")]
    InvalidValue { field: &'static str, value: String },
}

pub type Result<T> = std::result::Result<T, Error>;
