//! LeverageQuote Library
//!
//! Sizes flash-loan leveraged positions: given a trading pair, direction,
//! funding token and amount, leverage and order type, it derives the
//! collateral and debt of the position, the protocol fees and the open
//! price, and keeps that quote current as prices move.

pub mod common;
pub mod config;
pub mod engine;
pub mod feeds;
pub mod registry;

// Re-export commonly used types
pub use common::errors::{QuoteError, Result};
pub use common::types::{Direction, OrderType};
pub use crate::config::types::{AppConfig, EngineSettings};
pub use engine::{
    compute_quote, EngineState, FeeSchedule, InputUpdate, SharedEngine, SubscriptionId,
    TradeEngine, TradeInputs, TradeQuote,
};
pub use feeds::{
    AccountState, BalanceFeed, BalanceSnapshot, PriceFeed, PriceSnapshot, PriceSource,
    StaticPriceSource,
};
pub use registry::{pair_of, token_of, PairId, Token, TokenMap, TokenSymbol};
