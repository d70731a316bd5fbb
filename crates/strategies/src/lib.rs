// In crates/strategies/src/lib.rs

use core_types::{Quote, Signal};

pub mod crossover;
pub mod error;
pub mod factory;
pub mod moving_average;
pub mod ten_day_line;
pub mod trend;
pub mod types;
pub mod volume;

#[cfg(test)]
mod fixtures;

pub use error::{Error, Result};
pub use factory::build_strategy;
pub use moving_average::with_moving_average;
pub use ten_day_line::TenDayLine;
pub use trend::{Trend, TrendClassifier};
pub use types::{StrategyParams, VolumeRule};

/// The universal interface for a signal strategy.
///
/// A strategy looks at a date-ascending quote history whose moving averages have
/// already been populated and decides whether the most recent day carries a signal.
/// Strategies hold no state between calls; every assessment is recomputed from the
/// history it is given.
pub trait Strategy {
    /// The name of the strategy.
    fn name(&self) -> &'static str;

    /// Returns `Ok(None)` when the latest day does not qualify, and
    /// `Err(Error::InsufficientData)` when the history is too short to judge.
    fn assess(&self, quotes: &[Quote]) -> Result<Option<Signal>>;
}
