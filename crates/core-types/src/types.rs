// In crates/core-types/src/types.rs

use crate::{Error, Result};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// An exchange-qualified ticker, e.g. `600549.SH`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Symbol(pub String);

/// The exchanges a `Symbol` suffix may name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exchange {
    Shanghai,
    Shenzhen,
}

impl Symbol {
    /// Parses and normalises a ticker, upper-casing the exchange suffix.
    pub fn parse(raw: &str) -> Result<Self> {
        let symbol = Symbol(raw.trim().to_string());
        let (code, _) = symbol.split()?;
        let suffix = if symbol.exchange()? == Exchange::Shanghai { "SH" } else { "SZ" };
        Ok(Symbol(format!("{}.{}", code, suffix)))
    }

    /// The bare security code without the exchange suffix.
    pub fn code(&self) -> Result<&str> {
        self.split().map(|(code, _)| code)
    }

    pub fn exchange(&self) -> Result<Exchange> {
        let (_, suffix) = self.split()?;
        match suffix.to_ascii_uppercase().as_str() {
            "SH" => Ok(Exchange::Shanghai),
            "SZ" => Ok(Exchange::Shenzhen),
            _ => Err(Error::InvalidSymbol(self.0.clone())),
        }
    }

    fn split(&self) -> Result<(&str, &str)> {
        match self.0.split_once('.') {
            Some((code, suffix))
                if !code.is_empty() && code.chars().all(|c| c.is_ascii_digit()) && !suffix.is_empty() =>
            {
                Ok((code, suffix))
            }
            _ => Err(Error::InvalidSymbol(self.0.clone())),
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One trading day for one symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub symbol: Symbol,
    /// The security's display name as reported by the data source.
    pub name: String,
    pub trade_date: NaiveDate,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    /// Traded volume in lots.
    pub volume: u64,
    /// The simple moving average ending on this day, once computed.
    pub moving_average: Option<Decimal>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertKind {
    Buy,
    Sell,
}

impl AlertKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertKind::Buy => "buy",
            AlertKind::Sell => "sell",
        }
    }
}

impl fmt::Display for AlertKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AlertKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "buy" => Ok(AlertKind::Buy),
            "sell" => Ok(AlertKind::Sell),
            other => Err(Error::InvalidValue { field: "alert kind", value: other.to_string() }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertStatus {
    #[default]
    Unhandled,
    Acknowledged,
}

impl AlertStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertStatus::Unhandled => "unhandled",
            AlertStatus::Acknowledged => "acknowledged",
        }
    }
}

impl fmt::Display for AlertStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AlertStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "unhandled" => Ok(AlertStatus::Unhandled),
            "acknowledged" => Ok(AlertStatus::Acknowledged),
            other => Err(Error::InvalidValue { field: "alert status", value: other.to_string() }),
        }
    }
}

/// A confirmed crossover on the latest trading day, before cooldown and persistence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Signal {
    pub symbol: Symbol,
    pub name: String,
    pub kind: AlertKind,
    pub trade_date: NaiveDate,
    pub price: Decimal,
    pub moving_average: Decimal,
    pub volume: u64,
}

/// An alert that has not been stored yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAlert {
    pub symbol: Symbol,
    pub name: String,
    pub kind: AlertKind,
    pub price: Decimal,
    pub moving_average: Decimal,
    pub volume: u64,
    /// Trade date of the quote that triggered the alert.
    pub trade_date: NaiveDate,
    pub triggered_at: DateTime<Utc>,
}

impl NewAlert {
    pub fn from_signal(signal: Signal, triggered_at: DateTime<Utc>) -> Self {
        Self {
            symbol: signal.symbol,
            name: signal.name,
            kind: signal.kind,
            price: signal.price,
            moving_average: signal.moving_average,
            volume: signal.volume,
            trade_date: signal.trade_date,
            triggered_at,
        }
    }
}

/// A persisted alert record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Alert {
    pub id: i64,
    pub symbol: Symbol,
    pub name: String,
    pub kind: AlertKind,
    pub price: Decimal,
    pub moving_average: Decimal,
    pub volume: u64,
    pub trade_date: NaiveDate,
    pub triggered_at: DateTime<Utc>,
    pub status: AlertStatus,
}

impl Alert {
    pub fn from_new(id: i64, new: NewAlert) -> Self {
        Self {
            id,
            symbol: new.symbol,
            name: new.name,
            kind: new.kind,
            price: new.price,
            moving_average: new.moving_average,
            volume: new.volume,
            trade_date: new.trade_date,
            triggered_at: new.triggered_at,
            status: AlertStatus::Unhandled,
        }
    }
}
