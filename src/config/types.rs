//! Configuration types

use serde::{Deserialize, Serialize};

use crate::common::errors::Result;
use crate::engine::DEFAULT_LEVERAGE;
use crate::feeds::account::POLYGON_CHAIN_ID;
use crate::feeds::prices::{StaticPriceSource, DEFAULT_HEARTBEAT_MS};
use crate::registry::{PairId, TokenMap, TokenSymbol};

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Trade form defaults and quote policy
    #[serde(default)]
    pub engine: EngineSettings,
    /// Price feed polling
    #[serde(default)]
    pub price_feed: PriceFeedConfig,
    /// Wallet/account expectations
    #[serde(default)]
    pub account: AccountConfig,
    /// General application settings
    #[serde(default)]
    pub settings: AppSettings,
}

/// Settings for the trade calculation engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineSettings {
    /// Pair selected when the form opens
    #[serde(default)]
    pub default_pair: PairId,
    /// Funding token selected when the form opens
    #[serde(default = "default_funding_token")]
    pub default_funding_token: TokenSymbol,
    /// Leverage selected when the form opens
    #[serde(default = "default_leverage")]
    pub default_leverage: f64,
    /// Withhold quotes when prices are older than this. Unset disables the check.
    #[serde(default)]
    pub max_price_age_seconds: Option<u64>,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            default_pair: PairId::default(),
            default_funding_token: default_funding_token(),
            default_leverage: default_leverage(),
            max_price_age_seconds: None,
        }
    }
}

impl EngineSettings {
    /// Staleness limit as a duration. `None` when the check is disabled or
    /// the configured number of seconds does not fit a `chrono::Duration`.
    pub fn max_price_age(&self) -> Option<chrono::Duration> {
        let seconds = i64::try_from(self.max_price_age_seconds?).ok()?;
        chrono::Duration::try_seconds(seconds)
    }
}

fn default_funding_token() -> TokenSymbol {
    TokenSymbol::Usdc
}

fn default_leverage() -> f64 {
    DEFAULT_LEVERAGE
}

/// Price feed configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceFeedConfig {
    /// Polling interval in milliseconds
    #[serde(default = "default_heartbeat_ms")]
    pub heartbeat_ms: u64,
    /// Fixed USD prices, used by the CLI and for offline runs
    #[serde(default)]
    pub static_prices: Option<TokenMap<f64>>,
    /// Raw oracle answers (8 decimals), used when `static_prices` is unset
    #[serde(default)]
    pub oracle_answers: Option<TokenMap<i64>>,
}

impl PriceFeedConfig {
    /// Fixed price source described by this section, if any
    pub fn static_source(&self) -> Result<Option<StaticPriceSource>> {
        if let Some(prices) = self.static_prices {
            return Ok(Some(StaticPriceSource::new(prices)));
        }
        match &self.oracle_answers {
            Some(answers) => {
                let answers = TokenMap::from_fn(|symbol| i128::from(answers[symbol]));
                StaticPriceSource::from_oracle_answers(&answers).map(Some)
            }
            None => Ok(None),
        }
    }
}

impl Default for PriceFeedConfig {
    fn default() -> Self {
        Self {
            heartbeat_ms: default_heartbeat_ms(),
            static_prices: None,
            oracle_answers: None,
        }
    }
}

fn default_heartbeat_ms() -> u64 {
    DEFAULT_HEARTBEAT_MS
}

/// Account configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountConfig {
    /// Chain the token registry addresses live on
    #[serde(default = "default_target_chain_id")]
    pub target_chain_id: u64,
    /// Wallet address whose balances are checked
    #[serde(default)]
    pub address: Option<String>,
    /// Fixed whole-token holdings for `address`, for offline runs
    #[serde(default)]
    pub static_balances: Option<TokenMap<f64>>,
}

impl Default for AccountConfig {
    fn default() -> Self {
        Self {
            target_chain_id: default_target_chain_id(),
            address: None,
            static_balances: None,
        }
    }
}

fn default_target_chain_id() -> u64 {
    POLYGON_CHAIN_ID
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
