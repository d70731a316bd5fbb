// In crates/engine/src/emitter.rs

use std::sync::Arc;
use std::time::Duration;

use chrono::{Days, NaiveDate, NaiveTime};
use core_types::{Alert, AlertKind, Clock, NewAlert, Signal, Symbol};
use database::{AlertQuery, AlertStore};
use notifier::{AlertPayload, Notifier};

use crate::Result;

/// Turns signals into stored alerts and pushes each new alert out once.
#[derive(Clone)]
pub struct AlertEmitter {
    store: Arc<dyn AlertStore>,
    notifier: Arc<dyn Notifier>,
    clock: Arc<dyn Clock>,
    cooldown_days: u32,
    notify_timeout: Duration,
}

impl AlertEmitter {
    pub fn new(
        store: Arc<dyn AlertStore>,
        notifier: Arc<dyn Notifier>,
        clock: Arc<dyn Clock>,
        cooldown_days: u32,
        notify_timeout: Duration,
    ) -> Self {
        Self { store, notifier, clock, cooldown_days, notify_timeout }
    }

    /// True when an alert of this kind was triggered at or after midnight UTC of
    /// `latest_trade_date` minus the cooldown days.
    pub async fn is_duplicate(
        &self,
        symbol: &Symbol,
        kind: AlertKind,
        latest_trade_date: NaiveDate,
    ) -> Result<bool> {
        let since = latest_trade_date
            .checked_sub_days(Days::new(u64::from(self.cooldown_days)))
            .unwrap_or(NaiveDate::MIN)
            .and_time(NaiveTime::MIN)
            .and_utc();
        let query =
            AlertQuery { limit: Some(1), ..AlertQuery::for_symbol(symbol).kind(kind).triggered_since(since) };
        Ok(!self.store.find_alerts(&query).await?.is_empty())
    }

    /// Records the alert for `signal` and notifies about it, unless it is a repeat.
    pub async fn emit(&self, signal: Signal) -> Result<Option<Alert>> {
        if self.is_duplicate(&signal.symbol, signal.kind, signal.trade_date).await? {
            tracing::info!(symbol = %signal.symbol, kind = %signal.kind, "Signal within cooldown, suppressed.");
            return Ok(None);
        }

        let new_alert = NewAlert::from_signal(signal, self.clock.now());
        let Some(alert) = self.store.insert_alert(&new_alert).await? else {
            tracing::info!(symbol = %new_alert.symbol, kind = %new_alert.kind, "Alert was recorded concurrently, suppressed.");
            return Ok(None);
        };

        tracing::info!(
            alert_id = alert.id,
            symbol = %alert.symbol,
            kind = %alert.kind,
            price = %alert.price,
            moving_average = %alert.moving_average,
            volume = alert.volume,
            "Alert raised."
        );
        self.notify(&alert).await;
        Ok(Some(alert))
    }

    // Delivery failures never undo the stored alert.
    async fn notify(&self, alert: &Alert) {
        let payload = AlertPayload::from(alert);
        match tokio::time::timeout(self.notify_timeout, self.notifier.notify(&payload)).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => tracing::error!(
                alert_id = alert.id,
                notifier = self.notifier.name(),
                error = %e,
                "Notification failed."
            ),
            Err(_) => tracing::error!(
                alert_id = alert.id,
                notifier = self.notifier.name(),
                "Notification timed out."
            ),
        }
    }
}
