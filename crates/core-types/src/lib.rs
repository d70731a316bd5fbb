// In crates/core-types/src/lib.rs

pub mod clock;
pub mod error;
pub mod types;

// Re-export the most important types for easy access from other crates.
pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{Error, Result};
pub use types::{Alert, AlertKind, AlertStatus, Exchange, NewAlert, Quote, Signal, Symbol};
