//! Conversion of raw on-chain integer amounts into token units

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;

use crate::common::errors::{QuoteError, Result};

/// Convert a raw integer amount with `decimals` fractional digits into a
/// floating point amount of whole tokens.
///
/// The conversion goes through `Decimal` so the scaling itself is exact;
/// only the final `f64` carries rounding.
pub fn units_to_f64(raw: i128, decimals: u32) -> Result<f64> {
    let amount = Decimal::try_from_i128_with_scale(raw, decimals)
        .map_err(|e| QuoteError::AmountConversion(format!("{} (raw {}, decimals {})", e, raw, decimals)))?;

    amount
        .to_f64()
        .ok_or_else(|| QuoteError::AmountConversion(format!("{} does not fit in f64", amount)))
}

/// Same as [`units_to_f64`] for unsigned balances
pub fn unsigned_units_to_f64(raw: u128, decimals: u32) -> Result<f64> {
    let raw = i128::try_from(raw)
        .map_err(|_| QuoteError::AmountConversion(format!("raw amount {} too large", raw)))?;
    units_to_f64(raw, decimals)
}

/// Inverse of [`unsigned_units_to_f64`]: whole tokens to raw integer units,
/// truncating anything below one raw unit.
pub fn f64_to_units(amount: f64, decimals: u32) -> Result<u128> {
    let whole = Decimal::from_f64(amount)
        .filter(|d| !d.is_sign_negative())
        .ok_or_else(|| QuoteError::AmountConversion(format!("{} is not a token amount", amount)))?;
    let scale = 10u64
        .checked_pow(decimals)
        .map(Decimal::from)
        .ok_or_else(|| QuoteError::AmountConversion(format!("unsupported decimals {}", decimals)))?;

    whole
        .checked_mul(scale)
        .and_then(|raw| raw.trunc().to_u128())
        .ok_or_else(|| QuoteError::AmountConversion(format!("{} overflows at {} decimals", amount, decimals)))
}
