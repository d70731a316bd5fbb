// In crates/app-config/src/lib.rs

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File, FileFormat};

pub mod error;
pub mod types;

// Re-export the most important types for easy access.
pub use error::{Error, Result};
pub use types::{
    AppSettings, DatabaseSettings, MarketDataSettings, MonitorSettings, NotifierSettings, Settings,
    WeChatSettings,
};

/// Loads the application settings from various sources.
///
/// This function orchestrates the layered configuration loading:
/// 1. Reads from a default `base.toml` file.
/// 2. Merges settings from an environment-specific file (e.g., `development.toml`).
/// 3. Merges settings from environment variables.
pub fn load_settings() -> Result<Settings> {
    // Get the current environment. Default to "development" if not set.
    let environment = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "development".into());

    let builder = Config::builder()
        .add_source(File::with_name("config/base"))
        .add_source(File::with_name(&format!("config/{}", environment)).required(false))
        // e.g. `APP__DATABASE__URL=...`, `APP__MONITOR__SYMBOLS=600549.SH,000001.SZ`
        .add_source(
            Environment::with_prefix("APP")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("monitor.symbols"),
        );

    finish(builder)
}

/// Builds settings from a single TOML document, without file or environment layers.
pub fn settings_from_toml(document: &str) -> Result<Settings> {
    finish(Config::builder().add_source(File::from_str(document, FileFormat::Toml)))
}

fn finish(builder: ConfigBuilder<DefaultState>) -> Result<Settings> {
    // Deserialize the configuration into our `Settings` struct.
    let settings: Settings = builder.build()?.try_deserialize()?;
    settings.validate()?;
    Ok(settings)
}
