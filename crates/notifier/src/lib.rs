// In crates/notifier/src/lib.rs

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use core_types::{Alert, AlertKind, Symbol};
use rust_decimal::Decimal;
use serde::Serialize;

pub mod error;
pub mod wechat;

pub use error::{Error, Result};
pub use wechat::WeChatNotifier;

/// A channel alerts are pushed to. Delivery is best-effort.
#[async_trait]
pub trait Notifier: Send + Sync {
    fn name(&self) -> &'static str;

    async fn notify(&self, payload: &AlertPayload) -> Result<()>;
}

/// What a notification says about an alert.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlertPayload {
    pub alert_id: i64,
    pub symbol: Symbol,
    pub name: String,
    pub kind: AlertKind,
    pub price: Decimal,
    pub moving_average: Decimal,
    pub volume: u64,
    pub trade_date: NaiveDate,
    pub triggered_at: DateTime<Utc>,
}

impl From<&Alert> for AlertPayload {
    fn from(alert: &Alert) -> Self {
        Self {
            alert_id: alert.id,
            symbol: alert.symbol.clone(),
            name: alert.name.clone(),
            kind: alert.kind,
            price: alert.price,
            moving_average: alert.moving_average,
            volume: alert.volume,
            trade_date: alert.trade_date,
            triggered_at: alert.triggered_at,
        }
    }
}

impl AlertPayload {
    pub fn title(&self) -> String {
        let kind = match self.kind {
            AlertKind::Buy => "Buy",
            AlertKind::Sell => "Sell",
        };
        format!("[{} alert] {} ({})", kind, self.name, self.symbol)
    }

    /// The plain-text message body.
    pub fn message(&self) -> String {
        format!(
            "{}\nPrice: {:.2}\nTen-day average: {:.2}\nVolume: {} lots\nTrade date: {}\nTriggered: {}\n\n(ten-day line crossover with volume confirmation)",
            self.title(),
            self.price,
            self.moving_average,
            group_thousands(self.volume),
            self.trade_date,
            self.triggered_at.format("%Y-%m-%d %H:%M"),
        )
    }
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}

/// Writes alerts to the log. Used when no push channel is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    fn name(&self) -> &'static str {
        "log"
    }

    async fn notify(&self, payload: &AlertPayload) -> Result<()> {
        tracing::warn!(
            alert_id = payload.alert_id,
            symbol = %payload.symbol,
            kind = %payload.kind,
            price = %payload.price,
            moving_average = %payload.moving_average,
            volume = payload.volume,
            "{}",
            payload.title()
        );
        Ok(())
    }
}
