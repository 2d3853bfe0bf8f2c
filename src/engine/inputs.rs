use serde::{Deserialize, Serialize};
use std::fmt;

use crate::common::types::{parse_amount, try_parse_amount, Direction, OrderType};
use crate::config::types::EngineSettings;
use crate::feeds::balances::BalanceSnapshot;
use crate::registry::{token_of, PairId, TokenSymbol};

/// Lowest leverage the trade form offers
pub const MIN_LEVERAGE: f64 = 1.5;

/// Leverage used when nothing else is configured
pub const DEFAULT_LEVERAGE: f64 = 2.0;

/// Raw trade form state, owned by the engine
///
/// Amounts and prices stay as the strings the user typed so partially
/// entered values ("", "0.") survive round trips through the form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeInputs {
    pub order_type: OrderType,
    pub direction: Direction,
    pub pair: PairId,
    pub funding_amount: String,
    pub funding_token: TokenSymbol,
    pub leverage_multiplier: f64,
    pub limit_price: String,
    pub stop_loss_price: String,
    pub take_profit_price: String,
}

impl TradeInputs {
    /// Form defaults, with pair, funding token and leverage taken from settings
    pub fn from_settings(settings: &EngineSettings) -> Self {
        Self {
            pair: settings.default_pair,
            funding_token: settings.default_funding_token,
            leverage_multiplier: settings.default_leverage,
            ..Self::default()
        }
    }

    /// Leverage range the form allows for the current funding token
    pub fn leverage_bounds(&self) -> (f64, f64) {
        (MIN_LEVERAGE, token_of(self.funding_token).max_leverage)
    }

    pub fn leverage_within_bounds(&self) -> bool {
        let (min, max) = self.leverage_bounds();
        self.leverage_multiplier >= min && self.leverage_multiplier <= max
    }

    pub(crate) fn funding_amount_value(&self) -> f64 {
        parse_amount(&self.funding_amount)
    }
}

impl Default for TradeInputs {
    fn default() -> Self {
        Self {
            order_type: OrderType::Market,
            direction: Direction::Long,
            pair: PairId::WethUsdc,
            funding_amount: String::new(),
            funding_token: TokenSymbol::Usdc,
            leverage_multiplier: DEFAULT_LEVERAGE,
            limit_price: String::new(),
            stop_loss_price: String::new(),
            take_profit_price: String::new(),
        }
    }
}

/// Partial edit of [`TradeInputs`]; `None` fields are left untouched
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InputUpdate {
    pub order_type: Option<OrderType>,
    pub direction: Option<Direction>,
    pub pair: Option<PairId>,
    pub funding_amount: Option<String>,
    pub funding_token: Option<TokenSymbol>,
    pub leverage_multiplier: Option<f64>,
    pub limit_price: Option<String>,
    pub stop_loss_price: Option<String>,
    pub take_profit_price: Option<String>,
}

/// Why an [`InputUpdate`] was discarded
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Rejection {
    UnparsableFundingAmount,
    NegativeFundingAmount(f64),
    InvalidLeverage(f64),
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::UnparsableFundingAmount => write!(f, "funding amount is not a number"),
            Rejection::NegativeFundingAmount(v) => write!(f, "negative funding amount {}", v),
            Rejection::InvalidLeverage(v) => write!(f, "invalid leverage multiplier {}", v),
        }
    }
}

impl InputUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn order_type(mut self, order_type: OrderType) -> Self {
        self.order_type = Some(order_type);
        self
    }

    pub fn direction(mut self, direction: Direction) -> Self {
        self.direction = Some(direction);
        self
    }

    pub fn pair(mut self, pair: PairId) -> Self {
        self.pair = Some(pair);
        self
    }

    pub fn funding_amount(mut self, amount: impl Into<String>) -> Self {
        self.funding_amount = Some(amount.into());
        self
    }

    /// Amount edit that spends the whole balance of `token`
    pub fn max_funding(balances: &BalanceSnapshot, token: TokenSymbol) -> Self {
        Self::new().funding_amount(balances.get(token).to_string())
    }

    pub fn funding_token(mut self, token: TokenSymbol) -> Self {
        self.funding_token = Some(token);
        self
    }

    pub fn leverage_multiplier(mut self, leverage: f64) -> Self {
        self.leverage_multiplier = Some(leverage);
        self
    }

    pub fn limit_price(mut self, price: impl Into<String>) -> Self {
        self.limit_price = Some(price.into());
        self
    }

    pub fn stop_loss_price(mut self, price: impl Into<String>) -> Self {
        self.stop_loss_price = Some(price.into());
        self
    }

    pub fn take_profit_price(mut self, price: impl Into<String>) -> Self {
        self.take_profit_price = Some(price.into());
        self
    }

    /// Check the numeric fields. Any failure rejects the whole update.
    pub fn validate(&self) -> Result<(), Rejection> {
        if let Some(amount) = &self.funding_amount {
            let value = try_parse_amount(amount).ok_or(Rejection::UnparsableFundingAmount)?;
            if value < 0.0 {
                return Err(Rejection::NegativeFundingAmount(value));
            }
        }
        if let Some(leverage) = self.leverage_multiplier {
            if leverage.is_nan() || leverage < 0.0 {
                return Err(Rejection::InvalidLeverage(leverage));
            }
        }
        Ok(())
    }

    /// Merge into `inputs`. Validation is the caller's job.
    ///
    /// Any update that sets the funding token clears the funding amount, even
    /// when the token is unchanged or the same update carried a new amount.
    pub(crate) fn apply_to(self, inputs: &mut TradeInputs) {
        let token_switched = self.funding_token.is_some();

        if let Some(v) = self.order_type {
            inputs.order_type = v;
        }
        if let Some(v) = self.direction {
            inputs.direction = v;
        }
        if let Some(v) = self.pair {
            inputs.pair = v;
        }
        if let Some(v) = self.funding_amount {
            inputs.funding_amount = v;
        }
        if let Some(v) = self.funding_token {
            inputs.funding_token = v;
        }
        if let Some(v) = self.leverage_multiplier {
            inputs.leverage_multiplier = v;
        }
        if let Some(v) = self.limit_price {
            inputs.limit_price = v;
        }
        if let Some(v) = self.stop_loss_price {
            inputs.stop_loss_price = v;
        }
        if let Some(v) = self.take_profit_price {
            inputs.take_profit_price = v;
        }

        if token_switched {
            inputs.funding_amount.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let inputs = TradeInputs::default();
        assert_eq!(inputs.order_type, OrderType::Market);
        assert_eq!(inputs.direction, Direction::Long);
        assert_eq!(inputs.pair, PairId::WethUsdc);
        assert_eq!(inputs.funding_token, TokenSymbol::Usdc);
        assert_eq!(inputs.leverage_multiplier, 2.0);
        assert!(inputs.funding_amount.is_empty());
        assert!(inputs.limit_price.is_empty());
    }

    #[test]
    fn test_from_settings() {
        let settings = EngineSettings {
            default_pair: PairId::WbtcUsdc,
            default_funding_token: TokenSymbol::Wbtc,
            default_leverage: 3.0,
            max_price_age_seconds: None,
        };
        let inputs = TradeInputs::from_settings(&settings);
        assert_eq!(inputs.pair, PairId::WbtcUsdc);
        assert_eq!(inputs.funding_token, TokenSymbol::Wbtc);
        assert_eq!(inputs.leverage_multiplier, 3.0);
        assert_eq!(inputs.order_type, OrderType::Market);
    }

    #[test]
    fn test_validate_rejects_negative_values() {
        assert_eq!(
            InputUpdate::new().funding_amount("-5").validate(),
            Err(Rejection::NegativeFundingAmount(-5.0))
        );
        assert_eq!(
            InputUpdate::new().leverage_multiplier(-1.0).validate(),
            Err(Rejection::InvalidLeverage(-1.0))
        );
        assert!(InputUpdate::new().leverage_multiplier(f64::NAN).validate().is_err());
        // blank and zero are fine; they just produce no quote
        assert!(InputUpdate::new().funding_amount("").validate().is_ok());
        assert!(InputUpdate::new().funding_amount("0").validate().is_ok());
        assert!(InputUpdate::new().leverage_multiplier(0.0).validate().is_ok());
    }

    #[test]
    fn test_apply_merges_only_present_fields() {
        let mut inputs = TradeInputs::default();
        InputUpdate::new()
            .direction(Direction::Short)
            .funding_amount("250")
            .apply_to(&mut inputs);

        assert_eq!(inputs.direction, Direction::Short);
        assert_eq!(inputs.funding_amount, "250");
        assert_eq!(inputs.pair, PairId::WethUsdc);
        assert_eq!(inputs.leverage_multiplier, 2.0);
    }

    #[test]
    fn test_token_switch_clears_amount() {
        let mut inputs = TradeInputs::default();
        inputs.funding_amount = "1000".to_string();

        InputUpdate::new()
            .funding_token(TokenSymbol::Weth)
            .funding_amount("3")
            .apply_to(&mut inputs);

        assert_eq!(inputs.funding_token, TokenSymbol::Weth);
        assert_eq!(inputs.funding_amount, "");
    }

    #[test]
    fn test_reselecting_same_token_also_clears_amount() {
        let mut inputs = TradeInputs::default();
        inputs.funding_amount = "1000".to_string();

        InputUpdate::new()
            .funding_token(TokenSymbol::Usdc)
            .apply_to(&mut inputs);

        assert_eq!(inputs.funding_token, TokenSymbol::Usdc);
        assert_eq!(inputs.funding_amount, "");
    }

    #[test]
    fn test_validate_rejects_unparsable_amount() {
        for raw in ["abc", "1e999", "12,5", "NaN"] {
            assert_eq!(
                InputUpdate::new().funding_amount(raw).validate(),
                Err(Rejection::UnparsableFundingAmount),
                "{}",
                raw
            );
        }
        // the rest of the update is irrelevant once the amount is bad
        assert!(InputUpdate::new()
            .direction(Direction::Short)
            .funding_amount("abc")
            .validate()
            .is_err());
    }

    #[test]
    fn test_leverage_bounds_follow_funding_token() {
        let mut inputs = TradeInputs::default();
        assert_eq!(inputs.leverage_bounds(), (1.5, 5.0));
        assert!(inputs.leverage_within_bounds());

        inputs.funding_token = TokenSymbol::Matic;
        inputs.leverage_multiplier = 3.0;
        assert_eq!(inputs.leverage_bounds(), (1.5, 2.5));
        assert!(!inputs.leverage_within_bounds());

        inputs.leverage_multiplier = 1.0;
        assert!(!inputs.leverage_within_bounds());
    }
}
