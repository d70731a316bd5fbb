// In crates/api-client/src/lib.rs

use std::collections::BTreeMap;
use std::time::Duration;

use app_config::MarketDataSettings;
use async_trait::async_trait;
use chrono::NaiveDate;
use core_types::{Exchange, Quote, Symbol};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde_json::Value;

pub mod error;
pub mod types;

// Re-export public types
pub use error::{Error, Result};
pub use types::*;

/// A provider of daily price history.
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    fn name(&self) -> &'static str;

    /// Fetches every daily quote the source has for `symbol`, oldest first.
    /// The returned quotes carry no moving average.
    async fn fetch_daily_history(&self, symbol: &Symbol) -> Result<Vec<Quote>>;
}

impl ApiClient {
    /// Constructs a new ApiClient from MarketDataSettings.
    pub fn new(settings: &MarketDataSettings) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .user_agent(settings.user_agent.clone())
            .build()
            .map_err(|e| Error::ClientBuildError(e.to_string()))?;

        Ok(ApiClient {
            http_client,
            base_url: settings.base_url.clone(),
            begin_date: settings.begin_date.clone(),
            end_date: settings.end_date.clone(),
        })
    }
}

#[async_trait]
impl MarketDataSource for ApiClient {
    fn name(&self) -> &'static str {
        "sina"
    }

    async fn fetch_daily_history(&self, symbol: &Symbol) -> Result<Vec<Quote>> {
        let code = source_code(symbol)?;
        tracing::debug!(%symbol, code = %code, "Requesting daily history.");

        let response = self
            .http_client
            .get(&self.base_url)
            .query(&[
                ("symbol", code.as_str()),
                ("begin_date", self.begin_date.as_str()),
                ("end_date", self.end_date.as_str()),
                ("type", "oneajson"),
            ])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(Error::ApiError { status: status.as_u16(), body });
        }

        let quotes = parse_daily_history(symbol, &body)?;
        tracing::info!(%symbol, days = quotes.len(), "Fetched daily history.");
        Ok(quotes)
    }
}

/// Maps `600549.SH` to `sh600549` and `000001.SZ` to `sz000001`.
pub fn source_code(symbol: &Symbol) -> Result<String> {
    let prefix = match symbol.exchange()? {
        Exchange::Shanghai => "sh",
        Exchange::Shenzhen => "sz",
    };
    Ok(format!("{}{}", prefix, symbol.code()?))
}

/// Converts a daily chart response body into quotes, oldest first.
///
/// Rows that are too short or carry an unreadable date or price are skipped. An
/// unreadable volume becomes zero. Prices are rounded to two decimals, ties to even.
/// When the source repeats a date, the last row wins.
pub fn parse_daily_history(symbol: &Symbol, body: &str) -> Result<Vec<Quote>> {
    let raw: RawDailyChart = serde_json::from_str(body)?;
    let Some(data) = raw.data else {
        return Ok(Vec::new());
    };

    let mut by_date = BTreeMap::new();
    for row in &data.items {
        match parse_row(symbol, &data.name, row) {
            Some(quote) => {
                by_date.insert(quote.trade_date, quote);
            }
            None => tracing::debug!(%symbol, ?row, "Skipping unreadable row."),
        }
    }

    Ok(by_date.into_values().collect())
}

fn parse_row(symbol: &Symbol, name: &str, row: &[Value]) -> Option<Quote> {
    let [date, open, high, low, close, volume, ..] = row else {
        return None;
    };

    Some(Quote {
        symbol: symbol.clone(),
        name: name.to_string(),
        trade_date: parse_date(date)?,
        open: parse_price(open)?,
        high: parse_price(high)?,
        low: parse_price(low)?,
        close: parse_price(close)?,
        volume: parse_decimal(volume)
            .and_then(|v| v.trunc().to_u64())
            .unwrap_or(0),
        moving_average: None,
    })
}

fn parse_date(cell: &Value) -> Option<NaiveDate> {
    let text = cell.as_str()?.trim();
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(text, "%Y%m%d"))
        .ok()
}

fn parse_price(cell: &Value) -> Option<Decimal> {
    // `round_dp` rounds half to even.
    parse_decimal(cell).map(|d| d.round_dp(2))
}

fn parse_decimal(cell: &Value) -> Option<Decimal> {
    match cell {
        Value::String(s) => s.trim().parse().ok(),
        Value::Number(n) => n.to_string().parse().ok(),
        _ => None,
    }
}
