// In crates/strategies/src/types.rs

use crate::{Error, Result};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Volume confirmation multipliers for one side of the market.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct VolumeRule {
    /// Latest volume must reach this multiple of the windowed average volume.
    pub avg_multiplier: Decimal,
    /// Latest volume must reach this multiple of the previous day's volume.
    pub prev_multiplier: Decimal,
}

/// Parameters of the ten-day-line strategy with volume confirmation.
///
/// Every field has a default, so a config file only needs to name the values it
/// overrides.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct StrategyParams {
    /// Moving-average window in trading days.
    pub ma_period: usize,
    /// Number of recent averages used to classify the trend.
    pub trend_check_days: usize,
    /// Relative change below which the trend counts as flat (0.003 = 0.3%).
    pub trend_flat_rate: Decimal,
    /// Minimum relative distance between close and average for a valid breakout.
    pub breakout_rate: Decimal,
    /// Maximum consecutive closes below the average before a buy cross.
    pub max_below_days: usize,
    /// Maximum consecutive closes above the average before a sell cross.
    pub max_above_days: usize,
    /// Window for the average volume, including the latest day.
    pub volume_avg_days: usize,
    pub buy_volume: VolumeRule,
    pub sell_volume: VolumeRule,
    /// Calendar days during which a repeat alert of the same kind is suppressed.
    pub cooldown_days: u32,
}

impl Default for StrategyParams {
    fn default() -> Self {
        Self {
            ma_period: 10,
            trend_check_days: 3,
            trend_flat_rate: dec!(0.003),
            breakout_rate: dec!(0.005),
            max_below_days: 3,
            max_above_days: 5,
            volume_avg_days: 5,
            buy_volume: VolumeRule { avg_multiplier: dec!(1.5), prev_multiplier: dec!(1.2) },
            sell_volume: VolumeRule { avg_multiplier: dec!(1.3), prev_multiplier: dec!(1.1) },
            cooldown_days: 2,
        }
    }
}

impl StrategyParams {
    /// Checks that windows are usable and every threshold is positive.
    pub fn validate(&self) -> Result<()> {
        if self.ma_period == 0 {
            return Err(Error::InvalidParameters("ma_period must be at least 1".into()));
        }
        if self.trend_check_days < 2 {
            return Err(Error::InvalidParameters("trend_check_days must be at least 2".into()));
        }
        if self.volume_avg_days == 0 {
            return Err(Error::InvalidParameters("volume_avg_days must be at least 1".into()));
        }
        let thresholds = [
            ("trend_flat_rate", self.trend_flat_rate),
            ("breakout_rate", self.breakout_rate),
            ("buy_volume.avg_multiplier", self.buy_volume.avg_multiplier),
            ("buy_volume.prev_multiplier", self.buy_volume.prev_multiplier),
            ("sell_volume.avg_multiplier", self.sell_volume.avg_multiplier),
            ("sell_volume.prev_multiplier", self.sell_volume.prev_multiplier),
        ];
        for (name, value) in thresholds {
            if value <= Decimal::ZERO {
                return Err(Error::InvalidParameters(format!("{name} must be positive, got {value}")));
            }
        }
        Ok(())
    }

    /// The fewest averaged, traded quotes the strategy needs before it will judge.
    pub fn min_history(&self) -> usize {
        self.trend_check_days.max(self.volume_avg_days).max(2)
    }
}
