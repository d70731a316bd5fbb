// In crates/strategies/src/ten_day_line.rs

use crate::crossover::CrossoverDetector;
use crate::trend::{Trend, TrendClassifier};
use crate::types::StrategyParams;
use crate::volume::VolumeFilter;
use crate::{Error, Result, Strategy};
use core_types::{Quote, Signal};

/// The ten-day-line strategy: a close crossing its moving average in the direction of
/// the average's trend, by a meaningful margin, on expanding volume.
#[derive(Debug, Clone)]
pub struct TenDayLine {
    /// The configuration for this strategy instance.
    params: StrategyParams,
    classifier: TrendClassifier,
    detector: CrossoverDetector,
    volume: VolumeFilter,
}

impl TenDayLine {
    /// Creates a new `TenDayLine` strategy instance from its parameters.
    pub fn new(params: StrategyParams) -> Self {
        Self {
            classifier: TrendClassifier::from_params(&params),
            detector: CrossoverDetector::from_params(&params),
            volume: VolumeFilter::from_params(&params),
            params,
        }
    }

    pub fn params(&self) -> &StrategyParams {
        &self.params
    }
}

impl Strategy for TenDayLine {
    fn name(&self) -> &'static str {
        "TenDayLine"
    }

    fn assess(&self, quotes: &[Quote]) -> Result<Option<Signal>> {
        // 1. Only days that have an average and actually traded take part.
        let mut usable: Vec<Quote> = quotes
            .iter()
            .filter(|q| q.moving_average.is_some() && q.volume > 0)
            .cloned()
            .collect();
        usable.sort_by_key(|q| q.trade_date);

        let required = self.params.min_history();
        if usable.len() < required {
            return Err(Error::InsufficientData { required, available: usable.len() });
        }

        // 2. A flat line means no actionable trend.
        let trend_window = &usable[usable.len() - self.params.trend_check_days..];
        let trend = self.classifier.classify_quotes(trend_window)?;
        if trend == Trend::Flat {
            return Ok(None);
        }

        // 3. The crossover itself.
        let Some(kind) = self.detector.detect(trend, trend_window) else {
            return Ok(None);
        };

        // 4. Volume has to back the move.
        if !self.volume.confirms(kind, &usable) {
            return Ok(None);
        }

        let latest = &usable[usable.len() - 1];
        let Some(moving_average) = latest.moving_average else {
            return Ok(None);
        };

        Ok(Some(Signal {
            symbol: latest.symbol.clone(),
            name: latest.name.clone(),
            kind,
            trade_date: latest.trade_date,
            price: latest.close,
            moving_average,
            volume: latest.volume,
        }))
    }
}
