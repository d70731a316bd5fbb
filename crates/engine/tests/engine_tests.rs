
use chrono::{TimeZone, Utc};
use core_types::{AlertKind, AlertStatus, FixedClock, NewAlert, Symbol};
use engine::{Engine, EngineConfig, Error, QuoteCache, Services};
use mock_services::*;
use rust_decimal_macros::dec;
use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Duration;
use strategies::StrategyParams;

fn xtc() -> Symbol {
    Symbol("600549.SH".into())
}

fn pingan() -> Symbol {
    Symbol("000001.SZ".into())
}

/// Evaluation runs on the morning after the last fixture day.
fn clock() -> Arc<FixedClock> {
    Arc::new(FixedClock(Utc.with_ymd_and_hms(2024, 3, 16, 8, 0, 0).unwrap()))
}

fn config() -> EngineConfig {
    EngineConfig {
        strategy: StrategyParams::default(),
        freshness_days: 7,
        recent_days: 15,
        call_timeout: Duration::from_millis(200),
    }
}

struct Harness {
    quotes: InMemoryQuoteStore,
    alerts: InMemoryAlertStore,
    source: CountingSource,
    notifier: RecordingNotifier,
}

impl Harness {
    fn new() -> Self {
        Self {
            quotes: InMemoryQuoteStore::default(),
            alerts: InMemoryAlertStore::default(),
            source: CountingSource::default(),
            notifier: RecordingNotifier::default(),
        }
    }

    fn services(&self) -> Services {
        Services {
            quotes: Arc::new(self.quotes.clone()),
            alerts: Arc::new(self.alerts.clone()),
            source: Arc::new(self.source.clone()),
            notifier: Arc::new(self.notifier.clone()),
            clock: clock(),
        }
    }

    fn engine(&self) -> Engine {
        Engine::new(&config(), self.services()).unwrap()
    }

    fn cache(&self) -> QuoteCache {
        self.cache_at(clock())
    }

    fn cache_at(&self, clock: Arc<FixedClock>) -> QuoteCache {
        let services = self.services();
        QuoteCache::new(services.quotes, services.source, clock, 7, Duration::from_millis(200), 10)
    }
}

fn prior_alert(kind: AlertKind, trade_day: u32) -> NewAlert {
    NewAlert {
        symbol: xtc(),
        name: "Xiamen Tungsten".into(),
        kind,
        price: dec!(11.00),
        moving_average: dec!(10.90),
        volume: 1800,
        trade_date: day(trade_day),
        triggered_at: Utc.with_ymd_and_hms(2024, 3, trade_day, 8, 0, 0).unwrap(),
    }
}

#[tokio::test]
async fn golden_cross_with_volume_raises_one_buy_alert() {
    let h = Harness::new();
    h.source.serve(&xtc(), series(&xtc(), &GOLDEN_CROSS, &volumes(2000))).await;

    let alert = h.engine().evaluate(&xtc()).await.unwrap().expect("a buy alert");

    assert_eq!(alert.kind, AlertKind::Buy);
    assert_eq!(alert.status, AlertStatus::Unhandled);
    assert_eq!(alert.trade_date, day(16));
    assert_eq!(alert.price, dec!(11.60));
    assert_eq!(alert.moving_average, dec!(11.00));
    assert_eq!(alert.volume, 2000);
    assert_eq!(alert.triggered_at, clock().0);

    assert_eq!(h.alerts.all().await, vec![alert.clone()]);
    let sent = h.notifier.sent().await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].alert_id, alert.id);
}

#[tokio::test]
async fn ordinary_volume_raises_nothing() {
    let h = Harness::new();
    // About 1.1x the five-day average.
    h.source.serve(&xtc(), series(&xtc(), &GOLDEN_CROSS, &volumes(1128))).await;

    assert_eq!(h.engine().evaluate(&xtc()).await.unwrap(), None);
    assert!(h.alerts.all().await.is_empty());
    assert!(h.notifier.sent().await.is_empty());
}

#[tokio::test]
async fn death_cross_with_volume_raises_a_sell_alert() {
    let h = Harness::new();
    h.source.serve(&xtc(), series(&xtc(), &DEATH_CROSS, &volumes(2000))).await;

    let alert = h.engine().evaluate(&xtc()).await.unwrap().expect("a sell alert");
    assert_eq!(alert.kind, AlertKind::Sell);
    assert_eq!(alert.price, dec!(10.40));
}

#[tokio::test]
async fn buy_within_cooldown_is_suppressed() {
    let h = Harness::new();
    h.source.serve(&xtc(), series(&xtc(), &GOLDEN_CROSS, &volumes(2000))).await;
    h.alerts.insert_direct(prior_alert(AlertKind::Buy, 14)).await;

    assert_eq!(h.engine().evaluate(&xtc()).await.unwrap(), None);
    assert_eq!(h.alerts.all().await.len(), 1);
    assert!(h.notifier.sent().await.is_empty());
}

#[tokio::test]
async fn cooldown_follows_when_the_prior_alert_was_triggered() {
    let h = Harness::new();
    h.source.serve(&xtc(), series(&xtc(), &GOLDEN_CROSS, &volumes(2000))).await;
    // Trade date well outside the window, but raised late from stale data on the 15th.
    let late = NewAlert {
        triggered_at: Utc.with_ymd_and_hms(2024, 3, 15, 8, 0, 0).unwrap(),
        ..prior_alert(AlertKind::Buy, 10)
    };
    h.alerts.insert_direct(late).await;

    assert_eq!(h.engine().evaluate(&xtc()).await.unwrap(), None);
    assert_eq!(h.alerts.all().await.len(), 1);
    assert!(h.notifier.sent().await.is_empty());
}

#[tokio::test]
async fn alert_triggered_before_the_window_does_not_block() {
    let h = Harness::new();
    h.source.serve(&xtc(), series(&xtc(), &GOLDEN_CROSS, &volumes(2000))).await;
    // Last second before midnight of the 14th.
    let early = NewAlert {
        triggered_at: Utc.with_ymd_and_hms(2024, 3, 13, 23, 59, 59).unwrap(),
        ..prior_alert(AlertKind::Buy, 13)
    };
    h.alerts.insert_direct(early).await;

    assert!(h.engine().evaluate(&xtc()).await.unwrap().is_some());
}

#[tokio::test]
async fn buy_after_cooldown_is_raised_again() {
    let h = Harness::new();
    h.source.serve(&xtc(), series(&xtc(), &GOLDEN_CROSS, &volumes(2000))).await;
    h.alerts.insert_direct(prior_alert(AlertKind::Buy, 13)).await;
    // A sell does not block a buy.
    h.alerts.insert_direct(prior_alert(AlertKind::Sell, 15)).await;

    assert!(h.engine().evaluate(&xtc()).await.unwrap().is_some());
    assert_eq!(h.alerts.all().await.len(), 3);
    assert_eq!(h.notifier.sent().await.len(), 1);
}

#[tokio::test]
async fn repeated_evaluation_raises_the_alert_once() {
    let h = Harness::new();
    h.source.serve(&xtc(), series(&xtc(), &GOLDEN_CROSS, &volumes(2000))).await;
    let engine = h.engine();

    assert!(engine.evaluate(&xtc()).await.unwrap().is_some());
    assert_eq!(engine.evaluate(&xtc()).await.unwrap(), None);
    assert_eq!(h.notifier.sent().await.len(), 1);
}

#[tokio::test]
async fn fresh_cache_is_served_without_fetching() {
    let h = Harness::new();
    let stored = series(&xtc(), &GOLDEN_CROSS, &volumes(2000));
    h.quotes.insert_direct(&xtc(), stored.clone()).await;

    let history = h.cache().get_history(&xtc()).await.unwrap();

    assert_eq!(history, stored);
    assert_eq!(h.source.calls(), 0);
    assert_eq!(h.quotes.replace_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn history_exactly_at_the_horizon_is_stale_after_midnight() {
    let h = Harness::new();
    let full = series(&xtc(), &GOLDEN_CROSS, &volumes(2000));
    h.quotes.insert_direct(&xtc(), full.clone()).await;
    h.source.serve(&xtc(), full).await;

    // Newest day is the 16th; seven days later at midnight it is still fresh.
    let midnight = Arc::new(FixedClock(Utc.with_ymd_and_hms(2024, 3, 23, 0, 0, 0).unwrap()));
    h.cache_at(midnight).get_history(&xtc()).await.unwrap();
    assert_eq!(h.source.calls(), 0);

    let morning = Arc::new(FixedClock(Utc.with_ymd_and_hms(2024, 3, 23, 8, 0, 0).unwrap()));
    h.cache_at(morning).get_history(&xtc()).await.unwrap();
    assert_eq!(h.source.calls(), 1);
    assert_eq!(h.quotes.replace_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn stale_cache_is_refetched_once_and_replaced() {
    let h = Harness::new();
    let full = series(&xtc(), &GOLDEN_CROSS, &volumes(2000));
    h.quotes.insert_direct(&xtc(), full[..5].to_vec()).await;
    h.source.serve(&xtc(), full).await;

    let history = h.cache().get_history(&xtc()).await.unwrap();

    assert_eq!(h.source.calls(), 1);
    assert_eq!(h.quotes.replace_calls.load(Ordering::SeqCst), 1);
    assert_eq!(history.len(), 16);
    assert_eq!(history[15].moving_average, Some(dec!(11.00)));

    let stored = h.quotes.stored(&xtc()).await;
    let dates: HashSet<_> = stored.iter().map(|q| q.trade_date).collect();
    assert_eq!(stored.len(), 16);
    assert_eq!(dates.len(), 16);
}

#[tokio::test]
async fn empty_fetch_is_empty_history() {
    let h = Harness::new();
    h.source.serve(&xtc(), Vec::new()).await;

    assert!(matches!(h.cache().get_history(&xtc()).await, Err(Error::EmptyHistory(_))));
    assert_eq!(h.engine().evaluate(&xtc()).await.unwrap(), None);
}

#[tokio::test]
async fn short_history_raises_nothing() {
    let h = Harness::new();
    h.source.serve(&xtc(), series(&xtc(), &GOLDEN_CROSS[..12], &[1000; 12])).await;

    assert_eq!(h.engine().evaluate(&xtc()).await.unwrap(), None);
}

#[tokio::test]
async fn unknown_exchange_is_a_data_source_error() {
    let h = Harness::new();
    let result = h.engine().evaluate(&Symbol("700.HK".into())).await;
    assert!(matches!(result, Err(Error::DataSource(api_client::Error::UnsupportedSymbol(_)))));
}

#[tokio::test]
async fn slow_source_times_out() {
    let mut h = Harness::new();
    h.source.delay = Some(Duration::from_secs(5));
    h.source.serve(&xtc(), series(&xtc(), &GOLDEN_CROSS, &volumes(2000))).await;

    let result = h.engine().evaluate(&xtc()).await;
    assert!(matches!(result, Err(Error::Timeout { .. })));
}

#[tokio::test]
async fn notification_failure_keeps_the_alert() {
    let h = Harness::new();
    h.source.serve(&xtc(), series(&xtc(), &GOLDEN_CROSS, &volumes(2000))).await;
    let failing = FailingNotifier::default();
    let services = engine::Services { notifier: Arc::new(failing.clone()), ..h.services() };
    let engine = Engine::new(&config(), services).unwrap();

    let alert = engine.evaluate(&xtc()).await.unwrap();

    assert!(alert.is_some());
    assert_eq!(h.alerts.all().await.len(), 1);
    assert_eq!(failing.attempts.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn persistence_failure_aborts_the_symbol() {
    let h = Harness::new();
    let services = Services { quotes: Arc::new(BrokenQuoteStore), ..h.services() };
    let engine = Engine::new(&config(), services).unwrap();

    assert!(matches!(engine.evaluate(&xtc()).await, Err(Error::Persistence(_))));
    assert_eq!(h.source.calls(), 0);
}

#[tokio::test]
async fn batch_failures_stay_with_their_symbol() {
    let h = Harness::new();
    h.source.serve(&xtc(), series(&xtc(), &GOLDEN_CROSS, &volumes(2000))).await;
    // Nothing served for the second symbol: the source answers 503.

    let outcomes = h.engine().evaluate_all(&[xtc(), pingan()]).await;

    assert_eq!(outcomes.len(), 2);
    assert_eq!(outcomes[0].0, xtc());
    assert!(matches!(outcomes[0].1, Ok(Some(_))));
    assert_eq!(outcomes[1].0, pingan());
    assert!(matches!(outcomes[1].1, Err(Error::DataSource(api_client::Error::ApiError { status: 503, .. }))));
}

#[tokio::test]
async fn invalid_parameters_are_rejected_at_construction() {
    let h = Harness::new();
    let config = EngineConfig {
        strategy: StrategyParams { trend_check_days: 1, ..Default::default() },
        ..config()
    };
    assert!(matches!(Engine::new(&config, h.services()), Err(Error::Strategy(_))));
}

#[tokio::test]
async fn snapshot_reports_recent_days_and_unhandled_alerts() {
    let h = Harness::new();
    h.source.serve(&xtc(), series(&xtc(), &GOLDEN_CROSS, &volumes(2000))).await;
    let older = h.alerts.insert_direct(prior_alert(AlertKind::Sell, 2)).await;
    let engine = h.engine();

    let snapshot = engine.latest_state(&xtc(), None).await.unwrap();

    assert_eq!(snapshot.name, "Xiamen Tungsten");
    assert_eq!(snapshot.recent_quotes.len(), 15);
    assert_eq!(snapshot.recent_quotes[0].trade_date, day(2));
    assert_eq!(snapshot.latest_trade_date, Some(day(16)));
    assert_eq!(snapshot.latest_close, Some(dec!(11.60)));
    assert_eq!(snapshot.latest_moving_average, Some(dec!(11.00)));
    assert_eq!(snapshot.latest_volume, 2000);
    assert_eq!(snapshot.average_volume_5d, 1200);
    assert!(snapshot.message.contains("[buy alert]"));

    let ids: Vec<_> = snapshot.unhandled_alerts.iter().map(|a| a.id).collect();
    assert_eq!(ids.len(), 2);
    assert_eq!(ids[1], older.id);

    assert!(engine.acknowledge(older.id).await.unwrap());
    let snapshot = engine.latest_state(&xtc(), Some(3)).await.unwrap();
    assert_eq!(snapshot.recent_quotes.len(), 3);
    assert_eq!(snapshot.unhandled_alerts.len(), 1);
    assert!(snapshot.message.starts_with("No ten-day line signal"));
}
