// In crates/strategies/src/volume.rs

use crate::types::{StrategyParams, VolumeRule};
use core_types::{AlertKind, Quote};
use rust_decimal::Decimal;

/// Confirms a cross only when the latest day trades on expanding volume.
#[derive(Debug, Clone)]
pub struct VolumeFilter {
    window: usize,
    buy: VolumeRule,
    sell: VolumeRule,
}

impl VolumeFilter {
    pub fn new(window: usize, buy: VolumeRule, sell: VolumeRule) -> Self {
        Self { window, buy, sell }
    }

    pub fn from_params(params: &StrategyParams) -> Self {
        Self::new(params.volume_avg_days, params.buy_volume, params.sell_volume)
    }

    /// Returns `true` if the latest quote's volume satisfies the rule for `kind`.
    ///
    /// The average is taken over the last `window` quotes including the latest one.
    /// Histories too short for the window never confirm.
    pub fn confirms(&self, kind: AlertKind, quotes: &[Quote]) -> bool {
        if self.window == 0 || quotes.len() < self.window.max(2) {
            return false;
        }

        let rule = match kind {
            AlertKind::Buy => self.buy,
            AlertKind::Sell => self.sell,
        };

        let recent = &quotes[quotes.len() - self.window..];
        let total: Decimal = recent.iter().map(|q| Decimal::from(q.volume)).sum();
        let average = total / Decimal::from(self.window as u64);

        let latest = Decimal::from(quotes[quotes.len() - 1].volume);
        let prev = Decimal::from(quotes[quotes.len() - 2].volume);

        latest >= average * rule.avg_multiplier && latest >= prev * rule.prev_multiplier
    }
}
