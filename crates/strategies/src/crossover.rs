// In crates/strategies/src/crossover.rs

use crate::trend::Trend;
use crate::types::StrategyParams;
use core_types::{AlertKind, Quote};
use rust_decimal::Decimal;

/// Finds a golden or death cross of the close over its moving average on the latest day.
#[derive(Debug, Clone)]
pub struct CrossoverDetector {
    breakout_rate: Decimal,
    max_below_days: usize,
    max_above_days: usize,
}

impl CrossoverDetector {
    pub fn new(breakout_rate: Decimal, max_below_days: usize, max_above_days: usize) -> Self {
        Self { breakout_rate, max_below_days, max_above_days }
    }

    pub fn from_params(params: &StrategyParams) -> Self {
        Self::new(params.breakout_rate, params.max_below_days, params.max_above_days)
    }

    /// Checks the last two days of `trend_window` for a qualifying cross.
    ///
    /// `trend_window` is date-ascending and ends with the previous and latest day.
    /// Buy is checked first; the two crosses point in opposite directions so at most
    /// one can match.
    pub fn detect(&self, trend: Trend, trend_window: &[Quote]) -> Option<AlertKind> {
        let [.., prev, latest] = trend_window else {
            return None;
        };

        if self.is_buy(trend, prev, latest, trend_window) {
            Some(AlertKind::Buy)
        } else if self.is_sell(trend, prev, latest, trend_window) {
            Some(AlertKind::Sell)
        } else {
            None
        }
    }

    fn is_buy(&self, trend: Trend, prev: &Quote, latest: &Quote, window: &[Quote]) -> bool {
        let (Some(prev_avg), Some(avg)) = (prev.moving_average, latest.moving_average) else {
            return false;
        };

        // Golden cross: under the line yesterday, over it today.
        if !(prev.close < prev_avg && latest.close > avg) {
            return false;
        }
        if trend != Trend::Up || avg.is_zero() {
            return false;
        }
        if (latest.close - avg) / avg < self.breakout_rate {
            return false;
        }

        days_before_cross(window, |close, avg| close < avg) <= self.max_below_days
    }

    fn is_sell(&self, trend: Trend, prev: &Quote, latest: &Quote, window: &[Quote]) -> bool {
        let (Some(prev_avg), Some(avg)) = (prev.moving_average, latest.moving_average) else {
            return false;
        };

        // Death cross: over the line yesterday, under it today.
        if !(prev.close > prev_avg && latest.close < avg) {
            return false;
        }
        if trend != Trend::Down || avg.is_zero() {
            return false;
        }
        if (avg - latest.close) / avg < self.breakout_rate {
            return false;
        }

        days_before_cross(window, |close, avg| close > avg) <= self.max_above_days
    }
}

/// Counts consecutive days on one side of the line, walking back from the day before the cross.
///
/// Only the trend window is walked, so with the default three-day window the count tops
/// out at two and the below/above caps bind only when `trend_check_days` is raised.
fn days_before_cross(window: &[Quote], on_side: impl Fn(Decimal, Decimal) -> bool) -> usize {
    window
        .iter()
        .rev()
        .skip(1)
        .take_while(|q| q.moving_average.is_some_and(|avg| on_side(q.close, avg)))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::quote;
    use rust_decimal_macros::dec;

    fn day(n: u32, close: &str, avg: Decimal) -> Quote {
        let mut q = quote(n, close, 1000);
        q.moving_average = Some(avg);
        q
    }

    fn detector() -> CrossoverDetector {
        CrossoverDetector::from_params(&StrategyParams::default())
    }

    #[test]
    fn golden_cross_in_an_uptrend_is_a_buy() {
        let window = [day(14, "11.30", dec!(10.85)), day(15, "10.80", dec!(10.89)), day(16, "11.60", dec!(11.00))];
        assert_eq!(detector().detect(Trend::Up, &window), Some(AlertKind::Buy));
    }

    #[test]
    fn golden_cross_against_the_trend_is_ignored() {
        let window = [day(14, "11.30", dec!(10.85)), day(15, "10.80", dec!(10.89)), day(16, "11.60", dec!(11.00))];
        assert_eq!(detector().detect(Trend::Down, &window), None);
        assert_eq!(detector().detect(Trend::Flat, &window), None);
    }

    #[test]
    fn marginal_breakout_is_noise() {
        let window = [day(14, "11.30", dec!(10.85)), day(15, "10.80", dec!(10.89)), day(16, "10.95", dec!(10.94))];
        assert_eq!(detector().detect(Trend::Up, &window), None);
    }

    #[test]
    fn death_cross_in_a_downtrend_is_a_sell() {
        let window = [day(14, "10.70", dec!(11.15)), day(15, "11.20", dec!(11.11)), day(16, "10.40", dec!(11.00))];
        assert_eq!(detector().detect(Trend::Down, &window), Some(AlertKind::Sell));
    }

    #[test]
    fn no_cross_when_already_above_the_line() {
        let window = [day(14, "11.30", dec!(10.85)), day(15, "11.40", dec!(10.95)), day(16, "11.60", dec!(11.00))];
        assert_eq!(detector().detect(Trend::Up, &window), None);
    }

    #[test]
    fn long_stretches_below_the_line_disqualify_a_buy() {
        let strict = CrossoverDetector::new(dec!(0.005), 1, 5);
        let window = [day(14, "10.50", dec!(10.85)), day(15, "10.80", dec!(10.89)), day(16, "11.60", dec!(11.00))];
        assert_eq!(strict.detect(Trend::Up, &window), None);
        assert_eq!(detector().detect(Trend::Up, &window), Some(AlertKind::Buy));
    }

    #[test]
    fn below_cap_binds_once_the_trend_window_is_wider() {
        let window = [
            day(11, "10.40", dec!(10.80)),
            day(12, "10.50", dec!(10.82)),
            day(13, "10.60", dec!(10.84)),
            day(14, "10.70", dec!(10.86)),
            day(15, "10.80", dec!(10.89)),
            day(16, "11.60", dec!(11.00)),
        ];
        assert_eq!(days_before_cross(&window, |c, a| c < a), 5);
        assert_eq!(detector().detect(Trend::Up, &window), None);
        assert_eq!(detector().detect(Trend::Up, &window[2..]), Some(AlertKind::Buy));
    }

    #[test]
    fn counting_stops_at_the_first_day_on_the_other_side() {
        let window = [
            day(12, "10.00", dec!(10.50)),
            day(13, "11.00", dec!(10.50)),
            day(14, "10.00", dec!(10.60)),
            day(15, "10.00", dec!(10.70)),
            day(16, "11.00", dec!(10.80)),
        ];
        assert_eq!(days_before_cross(&window, |c, a| c < a), 2);
    }

    #[test]
    fn too_short_window_has_no_cross() {
        assert_eq!(detector().detect(Trend::Up, &[day(16, "11.60", dec!(11.00))]), None);
    }
}
