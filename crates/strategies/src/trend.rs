// In crates/strategies/src/trend.rs

use crate::types::StrategyParams;
use crate::{Error, Result};
use core_types::Quote;
use rust_decimal::Decimal;
use serde::Serialize;

/// Direction of the moving-average line over the trend-check window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Trend {
    Up,
    Down,
    /// The average moved less than the flat threshold; nothing to act on.
    Flat,
}

/// Labels the most recent averages as rising, falling or flat.
#[derive(Debug, Clone)]
pub struct TrendClassifier {
    window: usize,
    flat_rate: Decimal,
}

impl TrendClassifier {
    pub fn new(window: usize, flat_rate: Decimal) -> Self {
        Self { window, flat_rate }
    }

    pub fn from_params(params: &StrategyParams) -> Self {
        Self::new(params.trend_check_days, params.trend_flat_rate)
    }

    /// Classifies the last `window` values of an ascending average series.
    pub fn classify(&self, averages: &[Decimal]) -> Result<Trend> {
        if self.window == 0 || averages.len() < self.window {
            return Err(Error::InsufficientData { required: self.window, available: averages.len() });
        }

        let recent = &averages[averages.len() - self.window..];
        let first = recent[0];
        let last = recent[recent.len() - 1];

        // A zero average is degenerate data; never alert on it.
        if first.is_zero() {
            return Ok(Trend::Flat);
        }

        let change = ((last - first) / first).abs();
        if change < self.flat_rate {
            Ok(Trend::Flat)
        } else if last > first {
            Ok(Trend::Up)
        } else {
            Ok(Trend::Down)
        }
    }

    /// Classifies the populated averages of a date-ascending quote slice.
    pub fn classify_quotes(&self, quotes: &[Quote]) -> Result<Trend> {
        let averages: Vec<Decimal> = quotes.iter().filter_map(|q| q.moving_average).collect();
        self.classify(&averages)
    }
}
