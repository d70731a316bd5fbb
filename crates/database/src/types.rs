// In crates/database/src/types.rs

use chrono::{DateTime, NaiveDate, Utc};
use core_types::{AlertKind, AlertStatus, Symbol};

/// Filters for `AlertStore::find_alerts`. Unset fields match everything.
#[derive(Debug, Clone, Default)]
pub struct AlertQuery {
    pub symbol: Option<Symbol>,
    pub kind: Option<AlertKind>,
    pub status: Option<AlertStatus>,
    /// Earliest trigger date, inclusive.
    pub trade_date_from: Option<NaiveDate>,
    /// Latest trigger date, inclusive.
    pub trade_date_to: Option<NaiveDate>,
    /// Earliest trigger time, inclusive.
    pub triggered_from: Option<DateTime<Utc>>,
    pub limit: Option<u32>,
}

impl AlertQuery {
    pub fn for_symbol(symbol: &Symbol) -> Self {
        Self { symbol: Some(symbol.clone()), ..Default::default() }
    }

    pub fn kind(mut self, kind: AlertKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn status(mut self, status: AlertStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn since(mut self, date: NaiveDate) -> Self {
        self.trade_date_from = Some(date);
        self
    }

    pub fn triggered_since(mut self, at: DateTime<Utc>) -> Self {
        self.triggered_from = Some(at);
        self
    }

    pub fn until(mut self, date: NaiveDate) -> Self {
        self.trade_date_to = Some(date);
        self
    }
}
