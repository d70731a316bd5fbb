// In crates/engine/src/gateway.rs

use std::sync::Arc;
use std::time::Duration;

use api_client::MarketDataSource;
use chrono::{NaiveTime, TimeDelta};
use core_types::{Clock, Quote, Symbol};
use database::QuoteStore;
use strategies::with_moving_average;

use crate::{Error, Result};

/// Serves a symbol's daily history from the store while it is fresh, and refreshes
/// it from the market-data source otherwise.
#[derive(Clone)]
pub struct QuoteCache {
    store: Arc<dyn QuoteStore>,
    source: Arc<dyn MarketDataSource>,
    clock: Arc<dyn Clock>,
    freshness_days: u32,
    fetch_timeout: Duration,
    ma_period: usize,
}

impl QuoteCache {
    pub fn new(
        store: Arc<dyn QuoteStore>,
        source: Arc<dyn MarketDataSource>,
        clock: Arc<dyn Clock>,
        freshness_days: u32,
        fetch_timeout: Duration,
        ma_period: usize,
    ) -> Self {
        Self { store, source, clock, freshness_days, fetch_timeout, ma_period }
    }

    /// The symbol's quotes, oldest first.
    pub async fn get_history(&self, symbol: &Symbol) -> Result<Vec<Quote>> {
        let cached = self.store.load_quotes(symbol).await?;
        if self.is_fresh(&cached) {
            tracing::debug!(%symbol, days = cached.len(), "Serving quotes from the store.");
            return Ok(cached);
        }

        tracing::info!(%symbol, source = self.source.name(), "Stored quotes are stale, refreshing.");
        let fetched = tokio::time::timeout(self.fetch_timeout, self.source.fetch_daily_history(symbol))
            .await
            .map_err(|_| Error::Timeout {
                operation: "market data fetch",
                seconds: self.fetch_timeout.as_secs(),
            })??;

        if fetched.is_empty() {
            return Err(Error::EmptyHistory(symbol.clone()));
        }

        let quotes = with_moving_average(fetched, self.ma_period);
        self.store.replace_quotes(symbol, &quotes).await?;
        Ok(quotes)
    }

    /// Fresh when the newest trading day, taken at midnight UTC, is no older than
    /// `freshness_days` before now.
    fn is_fresh(&self, cached: &[Quote]) -> bool {
        let Some(newest) = cached.iter().map(|q| q.trade_date).max() else {
            return false;
        };
        let newest = newest.and_time(NaiveTime::MIN).and_utc();
        match self.clock.now().checked_sub_signed(TimeDelta::days(i64::from(self.freshness_days))) {
            Some(horizon) => newest >= horizon,
            None => true,
        }
    }
}
