//! Trade parameter enums shared by the engine, config and CLI

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::errors::QuoteError;

/// How the position is entered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderType {
    /// Open at the current oracle price
    #[default]
    Market,
    /// Open at a user supplied price
    Limit,
}

impl std::fmt::Display for OrderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderType::Market => write!(f, "MARKET"),
            OrderType::Limit => write!(f, "LIMIT"),
        }
    }
}

impl FromStr for OrderType {
    type Err = QuoteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "MARKET" => Ok(OrderType::Market),
            "LIMIT" => Ok(OrderType::Limit),
            other => Err(QuoteError::InvalidParameter(format!("order type '{}'", other))),
        }
    }
}

/// Position direction relative to the pair's base token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    /// Borrow the quote token, hold the base token
    #[default]
    Long,
    /// Borrow the base token, hold the quote token
    Short,
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Long => write!(f, "LONG"),
            Direction::Short => write!(f, "SHORT"),
        }
    }
}

impl FromStr for Direction {
    type Err = QuoteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "LONG" => Ok(Direction::Long),
            "SHORT" => Ok(Direction::Short),
            other => Err(QuoteError::InvalidParameter(format!("direction '{}'", other))),
        }
    }
}

/// Strict parse of a user supplied decimal string.
///
/// Blank input counts as zero. Returns `None` for anything that is not a
/// finite number, including overflowing literals such as `1e999`.
pub fn try_parse_amount(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Some(0.0);
    }
    trimmed.parse::<f64>().ok().filter(|value| value.is_finite())
}

/// Lenient parse used when reading stored form fields: unparsable text
/// yields zero, which the sizing step treats as "not enough input".
pub fn parse_amount(raw: &str) -> f64 {
    try_parse_amount(raw).unwrap_or(0.0)
}
