//! Display formatting for token amounts and USD values

use crate::registry::TokenSymbol;

/// Number of fractional digits shown for an amount of `token`
pub fn display_precision(token: TokenSymbol) -> usize {
    match token {
        TokenSymbol::Usdc | TokenSymbol::Matic => 2,
        TokenSymbol::Weth => 5,
        TokenSymbol::Wbtc => 6,
    }
}

/// Format an amount of `token` with its display precision
pub fn format_token_amount(token: TokenSymbol, amount: f64) -> String {
    format!("{:.*}", display_precision(token), amount)
}

/// Format a USD value with a K/M suffix for large numbers
pub fn format_usd(value: f64) -> String {
    if value / 1_000_000.0 > 1.0 {
        format!("{:.2}M", value / 1_000_000.0)
    } else if value / 1_000.0 > 1.0 {
        format!("{:.2}K", value / 1_000.0)
    } else {
        format!("{:.2}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_precision() {
        assert_eq!(format_token_amount(TokenSymbol::Usdc, 1999.987), "1999.99");
        assert_eq!(format_token_amount(TokenSymbol::Weth, 0.0625), "0.06250");
        assert_eq!(format_token_amount(TokenSymbol::Wbtc, 0.05), "0.050000");
    }

    #[test]
    fn test_usd_suffixes() {
        assert_eq!(format_usd(999.5), "999.50");
        assert_eq!(format_usd(1500.0), "1.50K");
        assert_eq!(format_usd(2_500_000.0), "2.50M");
        // exactly one thousand is not above the threshold
        assert_eq!(format_usd(1000.0), "1000.00");
    }
}
