//! Position sizing and fee calculation
//!
//! Leverage is built atomically: the funding token is zapped into the
//! collateral token, then a flash loan of the debt token is swapped into the
//! rest of the target collateral. The loan (plus its fee) becomes the
//! position's debt.
//!
//! ```text
//! funding ──zap──▶ collateral ◀──swap── flash loan (debt token)
//! ```

use crate::common::types::{parse_amount, Direction, OrderType};
use crate::feeds::prices::PriceSnapshot;
use crate::registry::TokenSymbol;

use super::inputs::TradeInputs;
use super::quote::TradeQuote;

/// Fee for converting the funding token into the collateral token
pub const ZAP_FEE_RATE: f64 = 0.003;
/// Fee for swapping the borrowed debt token into the collateral token
pub const SWAP_FEE_RATE: f64 = 0.0005;
/// Flash loan premium
pub const FLASHLOAN_FEE_RATE: f64 = 0.0009;

/// Protocol fee rates applied while building a position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeeSchedule {
    pub zap_fee_rate: f64,
    pub swap_fee_rate: f64,
    pub flashloan_fee_rate: f64,
}

impl Default for FeeSchedule {
    fn default() -> Self {
        Self {
            zap_fee_rate: ZAP_FEE_RATE,
            swap_fee_rate: SWAP_FEE_RATE,
            flashloan_fee_rate: FLASHLOAN_FEE_RATE,
        }
    }
}

/// Which tokens a position holds and owes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionLegs {
    pub collateral: TokenSymbol,
    pub debt: TokenSymbol,
}

impl PositionLegs {
    /// A long borrows the quote token to hold more base; a short does the reverse
    pub fn for_direction(base: TokenSymbol, quote: TokenSymbol, direction: Direction) -> Self {
        match direction {
            Direction::Long => Self {
                collateral: base,
                debt: quote,
            },
            Direction::Short => Self {
                collateral: quote,
                debt: base,
            },
        }
    }
}

/// Size the position described by `inputs` at `prices`.
///
/// Returns `None` when the funding amount is not positive, when a LIMIT
/// order has no positive limit price, when any price needed is zero or
/// unusable, or when the arithmetic does not produce finite numbers.
pub fn compute_quote(
    inputs: &TradeInputs,
    prices: &PriceSnapshot,
    fees: &FeeSchedule,
) -> Option<TradeQuote> {
    let (base, quote) = inputs.pair.symbols();
    let legs = PositionLegs::for_direction(base, quote, inputs.direction);
    let funding_token = inputs.funding_token;

    let funding_amount = parse_amount(&inputs.funding_amount);
    let limit_price = parse_amount(&inputs.limit_price);
    if funding_amount <= 0.0 || (inputs.order_type == OrderType::Limit && limit_price <= 0.0) {
        return None;
    }

    let open_price = match inputs.order_type {
        OrderType::Market => prices.rate(base, quote)?,
        OrderType::Limit => limit_price,
    };

    let funding_to_collateral = prices.rate(funding_token, legs.collateral)?;
    let debt_to_collateral = prices.rate(legs.debt, legs.collateral)?;
    let funding_usd = prices.usd(funding_token);
    let debt_usd = prices.usd(legs.debt);

    let target_collateral = funding_amount * funding_to_collateral * inputs.leverage_multiplier;

    let (collateral_from_funding, zap_fee_usd) = if funding_token != legs.collateral {
        (
            funding_amount * funding_to_collateral * (1.0 - fees.zap_fee_rate),
            funding_amount * fees.zap_fee_rate * funding_usd,
        )
    } else {
        (funding_amount, 0.0)
    };

    let needed_from_flashloan = target_collateral - collateral_from_funding;
    let flashloan_amount = needed_from_flashloan / (debt_to_collateral * (1.0 - fees.swap_fee_rate));
    let flashloan_fee = flashloan_amount * fees.flashloan_fee_rate;

    let quote = TradeQuote {
        order_type: inputs.order_type,
        direction: inputs.direction,
        open_price,
        funding_amount,
        funding_token,
        collateral_amount: collateral_from_funding + needed_from_flashloan,
        collateral_token: legs.collateral,
        debt_amount: flashloan_amount + flashloan_fee,
        debt_token: legs.debt,
        leverage_multiplier: inputs.leverage_multiplier,
        limit_price,
        stop_loss_price: parse_amount(&inputs.stop_loss_price),
        take_profit_price: parse_amount(&inputs.take_profit_price),
        zap_fee_usd,
        swap_fee_usd: flashloan_amount * fees.swap_fee_rate * debt_usd,
        flashloan_fee_usd: flashloan_fee * debt_usd,
    };

    is_finite(&quote).then_some(quote)
}

fn is_finite(quote: &TradeQuote) -> bool {
    [
        quote.open_price,
        quote.collateral_amount,
        quote.debt_amount,
        quote.leverage_multiplier,
        quote.zap_fee_usd,
        quote.swap_fee_usd,
        quote.flashloan_fee_usd,
    ]
    .iter()
    .all(|v| v.is_finite())
}
