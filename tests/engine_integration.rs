//! Integration tests for the trade calculation engine
//!
//! These drive the engine only through its public API: input updates, price
//! snapshots and the published quote.

mod common;

use common::{assert_close, priced_engine, sample_prices};
use leverage_quote::engine::{FLASHLOAN_FEE_RATE, SWAP_FEE_RATE, ZAP_FEE_RATE};
use leverage_quote::{
    Direction, EngineState, InputUpdate, OrderType, PairId, PriceSnapshot, TokenSymbol,
    TradeEngine,
};
use pretty_assertions::assert_eq;
use std::sync::{Arc, Mutex};

// ============================================================================
// Worked scenario
// ============================================================================

#[test]
fn test_long_weth_usdc_scenario() {
    let mut engine = priced_engine();
    assert!(engine.update_inputs(
        InputUpdate::new()
            .pair(PairId::WethUsdc)
            .direction(Direction::Long)
            .funding_token(TokenSymbol::Usdc)
            .leverage_multiplier(2.0)
    ));
    assert!(engine.update_inputs(InputUpdate::new().funding_amount("1000")));

    let quote = engine.quote().expect("quote for a funded market order");

    let funding_to_collateral = 1.0 / 2000.0;
    let debt_to_collateral = 1.0 / 2000.0;
    let target_collateral = 1000.0 * funding_to_collateral * 2.0;
    let collateral_from_funding = 1000.0 * funding_to_collateral * (1.0 - ZAP_FEE_RATE);
    let needed = target_collateral - collateral_from_funding;
    let flashloan = needed / (debt_to_collateral * (1.0 - SWAP_FEE_RATE));
    let flashloan_fee = flashloan * FLASHLOAN_FEE_RATE;

    assert_eq!(quote.order_type, OrderType::Market);
    assert_eq!(quote.direction, Direction::Long);
    assert_eq!(quote.collateral_token, TokenSymbol::Weth);
    assert_eq!(quote.debt_token, TokenSymbol::Usdc);
    assert_eq!(quote.funding_token, TokenSymbol::Usdc);
    assert_eq!(quote.funding_amount, 1000.0);
    assert_eq!(quote.leverage_multiplier, 2.0);

    assert_close(quote.open_price, 2000.0);
    assert_close(quote.zap_fee_usd, 3.0);
    assert_close(collateral_from_funding, 0.4985);
    assert_close(needed, 0.5015);
    assert_close(quote.collateral_amount, 1.0);
    assert_close(quote.debt_amount, flashloan + flashloan_fee);
    assert_close(quote.swap_fee_usd, flashloan * SWAP_FEE_RATE * 1.0);
    assert_close(quote.flashloan_fee_usd, flashloan_fee * 1.0);

    // about 1003.5 USDC borrowed, repaid with the premium on top
    assert!(flashloan > 1003.0 && flashloan < 1004.0);
    assert!(quote.debt_amount > flashloan);
}

// ============================================================================
// Quote properties
// ============================================================================

#[test]
fn test_unlevered_collateral_funding_has_no_debt() {
    for pair in PairId::ALL {
        for direction in [Direction::Long, Direction::Short] {
            let collateral = match direction {
                Direction::Long => pair.base(),
                Direction::Short => pair.quote(),
            };

            let mut engine = priced_engine();
            engine.update_inputs(
                InputUpdate::new()
                    .pair(pair)
                    .direction(direction)
                    .funding_token(collateral)
                    .leverage_multiplier(1.0),
            );
            engine.update_inputs(InputUpdate::new().funding_amount("3.25"));

            let quote = engine.quote().expect("quote");
            assert_eq!(quote.collateral_amount, 3.25, "{} {}", pair, direction);
            assert_eq!(quote.debt_amount, 0.0, "{} {}", pair, direction);
            assert_eq!(quote.total_fees_usd(), 0.0);
        }
    }
}

#[test]
fn test_leverage_never_shrinks_collateral() {
    let prices = sample_prices();
    for pair in PairId::ALL {
        for funding in TokenSymbol::ALL {
            for leverage in [1.0, 1.5, 2.0, 3.0] {
                let mut engine = priced_engine();
                engine.update_inputs(
                    InputUpdate::new()
                        .pair(pair)
                        .funding_token(funding)
                        .leverage_multiplier(leverage),
                );
                engine.update_inputs(InputUpdate::new().funding_amount("100"));

                let quote = engine.quote().expect("quote");
                let unlevered = 100.0 * prices[funding] / prices[quote.collateral_token];
                // collateral hits the leveraged target; fees show up as extra debt
                assert!(
                    quote.collateral_amount >= unlevered * (1.0 - ZAP_FEE_RATE) - 1e-9,
                    "{} funded with {} at {}x",
                    pair,
                    funding,
                    leverage
                );
                assert!(quote.collateral_amount >= unlevered * leverage * (1.0 - 1e-12));
            }
        }
    }
}

#[test]
fn test_recompute_is_idempotent() {
    let mut engine = priced_engine();
    engine.update_inputs(InputUpdate::new().funding_amount("777.77").leverage_multiplier(3.3));
    let first = engine.quote().cloned();

    // same prices again, and an update that changes nothing
    engine.on_prices(PriceSnapshot::new(sample_prices()));
    engine.update_inputs(InputUpdate::new());
    assert_eq!(engine.quote().cloned(), first);
}

// ============================================================================
// Input rules
// ============================================================================

#[test]
fn test_switching_funding_token_clears_amount() {
    for token in [TokenSymbol::Weth, TokenSymbol::Matic, TokenSymbol::Wbtc] {
        let mut engine = priced_engine();
        engine.update_inputs(InputUpdate::new().funding_amount("1000"));
        assert!(engine.quote().is_some());

        assert!(engine.update_inputs(InputUpdate::new().funding_token(token)));
        assert_eq!(engine.inputs().funding_amount, "");
        assert_eq!(engine.state(), EngineState::NoQuote);
    }

    // picking the current token again still clears the amount
    let mut engine = priced_engine();
    engine.update_inputs(InputUpdate::new().funding_amount("1000"));
    engine.update_inputs(InputUpdate::new().funding_token(TokenSymbol::Usdc));
    assert_eq!(engine.inputs().funding_amount, "");
}

#[test]
fn test_invalid_amounts_are_a_no_op() {
    let mut engine = priced_engine();
    for prior in ["", "0", "12.5", "1000"] {
        engine.update_inputs(InputUpdate::new().funding_amount(prior));
        let quote_before = engine.quote().cloned();

        for bad in ["-5", "abc", "1e999"] {
            assert!(!engine.update_inputs(InputUpdate::new().funding_amount(bad)));
            assert_eq!(engine.inputs().funding_amount, prior);
            assert_eq!(engine.quote().cloned(), quote_before);
        }
    }
}

#[test]
fn test_zero_amount_makes_quote_absent() {
    let mut engine = priced_engine();
    engine.update_inputs(InputUpdate::new().funding_amount("1000"));
    assert_eq!(engine.state(), EngineState::Quoted);

    engine.update_inputs(InputUpdate::new().funding_amount("0"));
    assert_eq!(engine.state(), EngineState::NoQuote);
    assert!(engine.quote().is_none());
}

#[test]
fn test_limit_switch_seeds_market_price() {
    let mut engine = priced_engine();
    engine.update_inputs(InputUpdate::new().funding_amount("1000"));
    engine.update_inputs(InputUpdate::new().order_type(OrderType::Limit));

    assert_eq!(engine.inputs().limit_price, "2000.00");
    let quote = engine.quote().expect("seeded limit order is quotable");
    assert_eq!(quote.order_type, OrderType::Limit);
    assert_eq!(quote.open_price, 2000.0);

    // later ticks do not move the user's limit price
    let mut moved = sample_prices();
    moved.weth = 2100.0;
    engine.on_prices(PriceSnapshot::new(moved));
    assert_eq!(engine.inputs().limit_price, "2000.00");
    assert_eq!(engine.quote().unwrap().open_price, 2000.0);
}

#[test]
fn test_limit_switch_keeps_user_price() {
    let mut engine = priced_engine();
    engine.update_inputs(InputUpdate::new().limit_price("1800"));
    engine.update_inputs(InputUpdate::new().order_type(OrderType::Limit));
    assert_eq!(engine.inputs().limit_price, "1800");
}

#[test]
fn test_limit_order_without_price_has_no_quote() {
    let mut engine = priced_engine();
    engine.update_inputs(InputUpdate::new().funding_amount("1000"));
    engine.update_inputs(
        InputUpdate::new()
            .order_type(OrderType::Limit)
            .limit_price("0"),
    );
    assert!(engine.quote().is_none());

    engine.update_inputs(InputUpdate::new().limit_price("1950"));
    assert_eq!(engine.quote().unwrap().open_price, 1950.0);
}

// ============================================================================
// Degenerate prices
// ============================================================================

#[test]
fn test_unready_price_feed_gives_no_quote() {
    let mut engine = TradeEngine::default();
    engine.update_inputs(InputUpdate::new().funding_amount("1000"));
    assert_eq!(engine.state(), EngineState::NoQuote);

    engine.on_prices(PriceSnapshot::new(sample_prices()));
    assert_eq!(engine.state(), EngineState::Quoted);

    let mut broken = sample_prices();
    broken.weth = 0.0;
    engine.on_prices(PriceSnapshot::new(broken));
    assert_eq!(engine.state(), EngineState::NoQuote);
}

// ============================================================================
// Subscription ordering
// ============================================================================

#[test]
fn test_subscriber_sees_post_update_quote() {
    let mut engine = priced_engine();
    let observed = Arc::new(Mutex::new(Vec::new()));
    let sink = observed.clone();
    engine.subscribe(move |quote| {
        sink.lock().unwrap().push(quote.cloned());
    });

    engine.update_inputs(InputUpdate::new().funding_amount("500"));
    engine.update_inputs(InputUpdate::new().leverage_multiplier(3.0));

    let observed = observed.lock().unwrap();
    assert_eq!(observed.len(), 2);
    assert_eq!(observed[0].as_ref().unwrap().leverage_multiplier, 2.0);
    assert_eq!(observed.last().unwrap().as_ref(), engine.quote());
}
