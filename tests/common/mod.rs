//! Common test utilities and fixtures

#![allow(dead_code)]

use leverage_quote::{PriceSnapshot, TokenMap, TradeEngine};

/// Prices used throughout the scenarios: 1 WETH = 2000 USDC
pub fn sample_prices() -> TokenMap<f64> {
    TokenMap {
        usdc: 1.0,
        matic: 0.8,
        weth: 2000.0,
        wbtc: 40_000.0,
    }
}

pub fn sample_snapshot() -> PriceSnapshot {
    PriceSnapshot::new(sample_prices())
}

/// Engine with default inputs and the sample prices applied
pub fn priced_engine() -> TradeEngine {
    let mut engine = TradeEngine::default();
    engine.on_prices(sample_snapshot());
    engine
}

/// Relative float comparison for values derived through several steps
pub fn assert_close(actual: f64, expected: f64) {
    let tolerance = 1e-9 * expected.abs().max(1.0);
    assert!(
        (actual - expected).abs() <= tolerance,
        "expected {} got {} (diff {})",
        expected,
        actual,
        (actual - expected).abs()
    );
}

/// Sample configuration file contents
pub mod config_files {
    pub const STATIC_PRICES: &str = r#"
        [engine]
        default_pair = "WETH/USDC"
        default_funding_token = "USDC"
        default_leverage = 2.0

        [price_feed]
        heartbeat_ms = 20

        [price_feed.static_prices]
        USDC = 1.0
        MATIC = 0.8
        WETH = 2000.0
        WBTC = 40000.0
    "#;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_prices_ready() {
        let snapshot = sample_snapshot();
        assert!(snapshot.ready);
        assert_eq!(snapshot.usd.weth, 2000.0);
    }
}
