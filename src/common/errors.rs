//! Error types for the quote engine and its collaborators

use thiserror::Error;

/// Result type alias using our QuoteError
pub type Result<T> = std::result::Result<T, QuoteError>;

/// Main error type for library operations
///
/// Quote computation itself never fails: insufficient input and degenerate
/// prices produce an absent quote instead. These variants cover the
/// boundaries around the engine (parsing, configuration, feeds).
#[derive(Error, Debug)]
pub enum QuoteError {
    /// Token symbol not present in the registry
    #[error("Unknown token symbol: {0}")]
    UnknownToken(String),

    /// Trading pair identifier not present in the registry
    #[error("Unknown trading pair: {0}")]
    UnknownPair(String),

    /// Unrecognised order type or direction string
    #[error("Invalid trade parameter: {0}")]
    InvalidParameter(String),

    /// Price source failed to deliver a snapshot
    #[error("Price source error: {0}")]
    PriceSource(String),

    /// Balance source failed to deliver a snapshot
    #[error("Balance source error: {0}")]
    BalanceSource(String),

    /// On-chain integer amount could not be represented
    #[error("Amount conversion error: {0}")]
    AmountConversion(String),

    /// JSON serialization/deserialization errors
    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Generic internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<config::ConfigError> for QuoteError {
    fn from(err: config::ConfigError) -> Self {
        QuoteError::Configuration(err.to_string())
    }
}
