// In crates/engine/src/lib.rs

pub mod emitter;
pub mod error;
pub mod gateway;
pub mod snapshot;

use std::sync::Arc;
use std::time::Duration;

use api_client::MarketDataSource;
use app_config::Settings;
use core_types::{Alert, AlertStatus, Clock, Quote, Symbol};
use database::{AlertQuery, AlertStore, QuoteStore};
use futures::future;
use notifier::Notifier;
use strategies::{Strategy, StrategyParams, build_strategy, with_moving_average};

pub use emitter::AlertEmitter;
pub use error::{Error, Result};
pub use gateway::QuoteCache;
pub use snapshot::MonitorSnapshot;

/// The knobs the engine is built with.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub strategy: StrategyParams,
    /// Stored quotes whose newest day is at most this many days before now are not refetched.
    pub freshness_days: u32,
    /// Default number of days in a display snapshot.
    pub recent_days: usize,
    /// Upper bound for every network call.
    pub call_timeout: Duration,
}

impl EngineConfig {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            strategy: settings.strategy.clone(),
            freshness_days: settings.monitor.freshness_days,
            recent_days: settings.monitor.recent_days,
            call_timeout: Duration::from_secs(settings.monitor.evaluation_timeout_secs),
        }
    }
}

/// The external collaborators of the engine.
#[derive(Clone)]
pub struct Services {
    pub quotes: Arc<dyn QuoteStore>,
    pub alerts: Arc<dyn AlertStore>,
    pub source: Arc<dyn MarketDataSource>,
    pub notifier: Arc<dyn Notifier>,
    pub clock: Arc<dyn Clock>,
}

/// Evaluates symbols against the ten-day-line strategy and raises alerts.
///
/// Each symbol runs the same sequential pipeline: quote cache, moving average,
/// strategy assessment, cooldown check, then persistence and notification. The engine
/// is cheap to clone and does no scheduling of its own.
#[derive(Clone)]
pub struct Engine {
    strategy: Arc<dyn Strategy + Send + Sync>,
    cache: QuoteCache,
    emitter: AlertEmitter,
    alerts: Arc<dyn AlertStore>,
    ma_period: usize,
    recent_days: usize,
}

impl Engine {
    pub fn new(config: &EngineConfig, services: Services) -> Result<Self> {
        let strategy: Arc<dyn Strategy + Send + Sync> = Arc::from(build_strategy(&config.strategy)?);
        tracing::info!(strategy = strategy.name(), source = services.source.name(), notifier = services.notifier.name(), "Engine initialised.");

        let cache = QuoteCache::new(
            services.quotes,
            services.source,
            services.clock.clone(),
            config.freshness_days,
            config.call_timeout,
            config.strategy.ma_period,
        );
        let emitter = AlertEmitter::new(
            services.alerts.clone(),
            services.notifier,
            services.clock,
            config.strategy.cooldown_days,
            config.call_timeout,
        );

        Ok(Self {
            strategy,
            cache,
            emitter,
            alerts: services.alerts,
            ma_period: config.strategy.ma_period,
            recent_days: config.recent_days,
        })
    }

    /// Runs the pipeline for one symbol now. Returns the alert it raised, if any.
    pub async fn evaluate(&self, symbol: &Symbol) -> Result<Option<Alert>> {
        let (_, alert) = self.run_pipeline(symbol).await?;
        Ok(alert)
    }

    /// Evaluates every symbol concurrently. A failure only affects its own symbol.
    pub async fn evaluate_all(&self, symbols: &[Symbol]) -> Vec<(Symbol, Result<Option<Alert>>)> {
        let handles: Vec<_> = symbols
            .iter()
            .map(|symbol| {
                let engine = self.clone();
                let symbol = symbol.clone();
                tokio::spawn(async move { engine.evaluate(&symbol).await })
            })
            .collect();

        let results = future::join_all(handles).await;

        symbols
            .iter()
            .cloned()
            .zip(results)
            .map(|(symbol, joined)| {
                let result = joined.unwrap_or_else(|e| {
                    Err(Error::TaskFailed { symbol: symbol.clone(), reason: e.to_string() })
                });
                match &result {
                    Ok(Some(alert)) => tracing::info!(%symbol, alert_id = alert.id, kind = %alert.kind, "Evaluation raised an alert."),
                    Ok(None) => tracing::debug!(%symbol, "Evaluation finished without an alert."),
                    Err(e) => tracing::error!(%symbol, error = %e, "Evaluation failed."),
                }
                (symbol, result)
            })
            .collect()
    }

    /// Runs the pipeline and reports the state a dashboard displays, covering the
    /// last `days` trading days (the configured default when `None`).
    pub async fn latest_state(&self, symbol: &Symbol, days: Option<usize>) -> Result<MonitorSnapshot> {
        let (quotes, alert) = self.run_pipeline(symbol).await?;
        let unhandled = self
            .alerts
            .find_alerts(&AlertQuery::for_symbol(symbol).status(AlertStatus::Unhandled))
            .await?;

        Ok(MonitorSnapshot::build(
            symbol,
            &quotes,
            days.unwrap_or(self.recent_days),
            alert.as_ref(),
            unhandled,
        ))
    }

    /// Marks an alert as handled. Returns `false` if there was no unhandled alert with that id.
    pub async fn acknowledge(&self, alert_id: i64) -> Result<bool> {
        Ok(self.alerts.acknowledge_alert(alert_id).await?)
    }

    async fn run_pipeline(&self, symbol: &Symbol) -> Result<(Vec<Quote>, Option<Alert>)> {
        let history = match self.cache.get_history(symbol).await {
            Err(Error::EmptyHistory(_)) => {
                tracing::warn!(%symbol, "Source returned no usable history.");
                return Ok((Vec::new(), None));
            }
            other => other?,
        };

        let quotes = with_moving_average(history, self.ma_period);

        let signal = match self.strategy.assess(&quotes) {
            Ok(Some(signal)) => signal,
            Ok(None) => {
                tracing::debug!(%symbol, "No qualifying crossover.");
                return Ok((quotes, None));
            }
            Err(strategies::Error::InsufficientData { required, available }) => {
                tracing::info!(%symbol, required, available, "Not enough history to evaluate.");
                return Ok((quotes, None));
            }
            Err(e) => return Err(e.into()),
        };

        tracing::info!(%symbol, kind = %signal.kind, trade_date = %signal.trade_date, "Crossover confirmed.");
        let alert = self.emitter.emit(signal).await?;
        Ok((quotes, alert))
    }
}
