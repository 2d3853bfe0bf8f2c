//! Configuration loader

use config::{Config, Environment, File, FileFormat};
use std::path::Path;

use super::types::AppConfig;
use crate::common::errors::{QuoteError, Result};

/// Load configuration from file and environment variables
///
/// Priority (highest to lowest):
/// 1. Environment variables (prefixed with APP_, `__` between sections,
///    e.g. `APP_ENGINE__DEFAULT_PAIR=WBTC/USDC`)
/// 2. Configuration file (TOML format)
/// 3. Default values
pub fn load_config(config_path: Option<&str>) -> Result<AppConfig> {
    let mut builder = Config::builder();

    if let Some(path) = config_path {
        if Path::new(path).exists() {
            builder = builder.add_source(File::with_name(path).required(false));
        }
    }

    builder = builder.add_source(
        Environment::with_prefix("APP")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder
        .build()
        .map_err(|e| QuoteError::Configuration(e.to_string()))?;

    let config: AppConfig = config
        .try_deserialize()
        .map_err(|e| QuoteError::Configuration(e.to_string()))?;
    validate(config)
}

/// Parse configuration from a TOML string, without environment overrides
pub fn parse_config(toml: &str) -> Result<AppConfig> {
    let config = Config::builder()
        .add_source(File::from_str(toml, FileFormat::Toml))
        .build()?;
    validate(config.try_deserialize()?)
}

/// Reject values that deserialize fine but cannot be used
fn validate(config: AppConfig) -> Result<AppConfig> {
    if let Some(seconds) = config.engine.max_price_age_seconds {
        if config.engine.max_price_age().is_none() {
            return Err(QuoteError::Configuration(format!(
                "engine.max_price_age_seconds = {} is out of range",
                seconds
            )));
        }
    }
    if config.price_feed.heartbeat_ms == 0 {
        return Err(QuoteError::Configuration(
            "price_feed.heartbeat_ms must be positive".to_string(),
        ));
    }
    Ok(config)
}
