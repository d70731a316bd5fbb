// In crates/engine/src/snapshot.rs

use chrono::NaiveDate;
use core_types::{Alert, Quote, Symbol};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;

/// What a dashboard shows for one symbol.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonitorSnapshot {
    pub symbol: Symbol,
    pub name: String,
    pub latest_close: Option<Decimal>,
    pub latest_moving_average: Option<Decimal>,
    pub latest_trade_date: Option<NaiveDate>,
    pub latest_volume: u64,
    /// Mean volume of the last five displayed days, zero with fewer than five.
    pub average_volume_5d: u64,
    /// The most recent days, oldest first.
    pub recent_quotes: Vec<Quote>,
    /// Unhandled alerts, newest first.
    pub unhandled_alerts: Vec<Alert>,
    pub message: String,
}

const VOLUME_DAYS: usize = 5;

impl MonitorSnapshot {
    pub(crate) fn build(
        symbol: &Symbol,
        quotes: &[Quote],
        days: usize,
        new_alert: Option<&Alert>,
        unhandled_alerts: Vec<Alert>,
    ) -> Self {
        let recent_quotes = quotes[quotes.len().saturating_sub(days)..].to_vec();
        let latest = recent_quotes.last();

        let average_volume_5d = if recent_quotes.len() >= VOLUME_DAYS {
            let window = &recent_quotes[recent_quotes.len() - VOLUME_DAYS..];
            let total: Decimal = window.iter().map(|q| Decimal::from(q.volume)).sum();
            (total / Decimal::from(VOLUME_DAYS as u64)).round_dp(0).to_u64().unwrap_or(0)
        } else {
            0
        };

        let message = match new_alert {
            Some(alert) => format!(
                "{} [{} alert] {} ({}) price {:.2} | ten-day average {:.2} | volume {} lots",
                alert.triggered_at.format("%H:%M:%S"),
                alert.kind,
                alert.name,
                alert.symbol,
                alert.price,
                alert.moving_average,
                alert.volume,
            ),
            None => "No ten-day line signal with volume confirmation, monitoring continues.".to_string(),
        };

        Self {
            symbol: symbol.clone(),
            name: latest.map(|q| q.name.clone()).unwrap_or_default(),
            latest_close: latest.map(|q| q.close),
            latest_moving_average: latest.and_then(|q| q.moving_average),
            latest_trade_date: latest.map(|q| q.trade_date),
            latest_volume: latest.map_or(0, |q| q.volume),
            average_volume_5d,
            recent_quotes,
            unhandled_alerts,
            message,
        }
    }
}
