use serde::{Deserialize, Serialize};

use crate::common::format::{format_token_amount, format_usd};
use crate::common::types::{Direction, OrderType};
use crate::registry::TokenSymbol;

/// Fully sized leveraged position derived from the inputs and prices
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeQuote {
    pub order_type: OrderType,
    pub direction: Direction,
    /// Base/quote rate the position opens at
    pub open_price: f64,
    pub funding_amount: f64,
    pub funding_token: TokenSymbol,
    pub collateral_amount: f64,
    pub collateral_token: TokenSymbol,
    /// Flash loan principal plus its fee, owed in `debt_token`
    pub debt_amount: f64,
    pub debt_token: TokenSymbol,
    pub leverage_multiplier: f64,
    pub limit_price: f64,
    pub stop_loss_price: f64,
    pub take_profit_price: f64,
    pub zap_fee_usd: f64,
    pub swap_fee_usd: f64,
    pub flashloan_fee_usd: f64,
}

impl TradeQuote {
    /// Sum of every protocol fee in USD
    pub fn total_fees_usd(&self) -> f64 {
        self.zap_fee_usd + self.swap_fee_usd + self.flashloan_fee_usd
    }

    /// One-line human readable summary
    pub fn summary(&self) -> String {
        format!(
            "{} {} {} {} collateral / {} {} debt @ {} (fees ${})",
            self.order_type,
            self.direction,
            format_token_amount(self.collateral_token, self.collateral_amount),
            self.collateral_token,
            format_token_amount(self.debt_token, self.debt_amount),
            self.debt_token,
            self.open_price,
            format_usd(self.total_fees_usd()),
        )
    }
}

/// The two externally visible engine states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineState {
    /// Not enough input, or prices unusable
    NoQuote,
    Quoted,
}
