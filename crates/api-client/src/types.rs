// In crates/api-client/src/types.rs

use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;

/// Client for the Sina Finance daily chart endpoint.
#[derive(Debug, Clone)]
pub struct ApiClient {
    /// The persistent HTTP client, carrying the timeout and user agent.
    pub http_client: Client,
    /// The chart data endpoint.
    pub base_url: String,
    /// First day requested, as `YYYYMMDD`.
    pub begin_date: String,
    /// Last day requested, as `YYYYMMDD`.
    pub end_date: String,
}

/// The envelope of a daily chart response.
#[derive(Debug, Deserialize)]
pub struct RawDailyChart {
    pub data: Option<RawChartData>,
}

#[derive(Debug, Deserialize)]
pub struct RawChartData {
    /// Display name of the security.
    #[serde(default)]
    pub name: String,
    /// One row per trading day, a JSON array of mixed strings and numbers:
    /// date, open, high, low, close, volume.
    #[serde(default)]
    pub items: Vec<Vec<Value>>,
}
