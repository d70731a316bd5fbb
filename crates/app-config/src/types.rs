// In crates/app-config/src/types.rs

use crate::Result;
use core_types::Symbol;
use serde::Deserialize;
use strategies::StrategyParams;

#[derive(Deserialize, Debug, Clone)]
pub struct Settings {
    /// The application's general settings.
    pub app: AppSettings,
    /// Settings for the database connection.
    pub database: DatabaseSettings,
    /// Settings for the daily market-data source.
    pub market_data: MarketDataSettings,
    #[serde(default)]
    pub notifier: NotifierSettings,
    #[serde(default)]
    pub monitor: MonitorSettings,
    /// Thresholds of the ten-day-line strategy; omitted values use the defaults.
    #[serde(default)]
    pub strategy: StrategyParams,
}

impl Settings {
    pub(crate) fn validate(&self) -> Result<()> {
        self.strategy.validate()?;
        self.monitor.watchlist()?;
        Ok(())
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct AppSettings {
    /// The environment the application is running in (e.g., "development", "production").
    pub environment: String,
    /// The log level for the application.
    pub log_level: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct DatabaseSettings {
    /// The SQLite connection URL, e.g. `sqlite://data/monitor.db`.
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

#[derive(Deserialize, Debug, Clone)]
pub struct MarketDataSettings {
    /// Endpoint serving the daily chart data.
    pub base_url: String,
    /// First day requested, as `YYYYMMDD`.
    #[serde(default = "default_begin_date")]
    pub begin_date: String,
    /// Last day requested, as `YYYYMMDD`.
    #[serde(default = "default_end_date")]
    pub end_date: String,
    #[serde(default = "default_market_timeout")]
    pub timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct NotifierSettings {
    /// WeChat test-account credentials. Without them alerts are only logged.
    pub wechat: Option<WeChatSettings>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct WeChatSettings {
    pub app_id: String,
    pub app_secret: String,
    /// The recipient's open id.
    pub open_id: String,
    #[serde(default = "default_wechat_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_wechat_timeout")]
    pub timeout_secs: u64,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct MonitorSettings {
    /// Exchange-qualified tickers evaluated by a batch run.
    pub symbols: Vec<String>,
    /// Cached quotes newer than this many days are used without refetching.
    pub freshness_days: u32,
    /// Number of days returned by the display snapshot.
    pub recent_days: usize,
    /// Upper bound for each network call made while evaluating one symbol.
    pub evaluation_timeout_secs: u64,
    /// Pause between batch runs in watch mode.
    pub poll_interval_secs: u64,
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self {
            symbols: vec!["600549.SH".into(), "000001.SZ".into()],
            freshness_days: 7,
            recent_days: 15,
            evaluation_timeout_secs: 30,
            poll_interval_secs: 24 * 60 * 60,
        }
    }
}

impl MonitorSettings {
    /// Parses the configured tickers.
    pub fn watchlist(&self) -> Result<Vec<Symbol>> {
        let symbols = self
            .symbols
            .iter()
            .map(|s| Symbol::parse(s))
            .collect::<core_types::Result<Vec<_>>>()?;
        Ok(symbols)
    }
}

/// Helper functions for serde defaults
fn default_max_connections() -> u32 { 5 }
fn default_begin_date() -> String { "20240101".into() }
fn default_end_date() -> String { "20990101".into() }
fn default_market_timeout() -> u64 { 15 }
fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".into()
}
fn default_wechat_base_url() -> String { "https://api.weixin.qq.com".into() }
fn default_wechat_timeout() -> u64 { 20 }
