//! Trade calculation engine
//!
//! The engine owns the trade form inputs, the latest price snapshot and the
//! derived quote. Every accepted input edit and every price update re-runs
//! the sizing step synchronously, then notifies subscribers.
//!
//! ```text
//!  update_inputs ──validate──▶ merge ──┐
//!                                      ├──▶ compute_quote ──▶ publish
//!  on_prices ──────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use leverage_quote::engine::{InputUpdate, TradeEngine};
//! use leverage_quote::feeds::PriceSnapshot;
//! use leverage_quote::registry::TokenMap;
//!
//! let mut engine = TradeEngine::default();
//! engine.on_prices(PriceSnapshot::new(TokenMap { usdc: 1.0, matic: 0.5, weth: 2000.0, wbtc: 40000.0 }));
//! assert!(engine.update_inputs(InputUpdate::new().funding_amount("1000")));
//! assert!(engine.quote().is_some());
//! ```

mod inputs;
mod quote;
mod shared;
mod sizing;

use chrono::Utc;
use tracing::{debug, trace};

use crate::common::format::format_token_amount;
use crate::common::types::OrderType;
use crate::config::types::EngineSettings;
use crate::feeds::balances::BalanceSnapshot;
use crate::feeds::prices::PriceSnapshot;

pub use inputs::{InputUpdate, Rejection, TradeInputs, DEFAULT_LEVERAGE, MIN_LEVERAGE};
pub use quote::{EngineState, TradeQuote};
pub use shared::{spawn_price_listener, SharedEngine};
pub use sizing::{
    compute_quote, FeeSchedule, PositionLegs, FLASHLOAN_FEE_RATE, SWAP_FEE_RATE, ZAP_FEE_RATE,
};

/// Handle returned by [`TradeEngine::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type QuoteCallback = Box<dyn FnMut(Option<&TradeQuote>) + Send>;

/// Owns trade inputs and keeps the derived quote consistent with them
pub struct TradeEngine {
    settings: EngineSettings,
    fees: FeeSchedule,
    inputs: TradeInputs,
    prices: PriceSnapshot,
    quote: Option<TradeQuote>,
    subscribers: Vec<(SubscriptionId, QuoteCallback)>,
    next_subscription: u64,
}

impl TradeEngine {
    pub fn new(settings: EngineSettings) -> Self {
        Self {
            inputs: TradeInputs::from_settings(&settings),
            settings,
            fees: FeeSchedule::default(),
            prices: PriceSnapshot::empty(),
            quote: None,
            subscribers: Vec::new(),
            next_subscription: 0,
        }
    }

    pub fn inputs(&self) -> &TradeInputs {
        &self.inputs
    }

    /// Latest derived quote, `None` while inputs or prices are insufficient
    pub fn quote(&self) -> Option<&TradeQuote> {
        self.quote.as_ref()
    }

    pub fn state(&self) -> EngineState {
        match self.quote {
            Some(_) => EngineState::Quoted,
            None => EngineState::NoQuote,
        }
    }

    pub fn prices(&self) -> &PriceSnapshot {
        &self.prices
    }

    pub fn fees(&self) -> &FeeSchedule {
        &self.fees
    }

    /// Current base/quote rate of the selected pair
    pub fn market_price(&self) -> Option<f64> {
        let (base, quote) = self.inputs.pair.symbols();
        self.prices.rate(base, quote)
    }

    /// Leverage range the form should offer for the current funding token
    pub fn leverage_bounds(&self) -> (f64, f64) {
        self.inputs.leverage_bounds()
    }

    /// Apply a partial edit.
    ///
    /// Returns `false` and leaves everything untouched when the update carries
    /// a funding amount that is negative or not a number, or an invalid
    /// leverage. Otherwise the edit is
    /// merged, the quote recomputed, subscribers notified and `true` returned.
    pub fn update_inputs(&mut self, update: InputUpdate) -> bool {
        if let Err(rejection) = update.validate() {
            debug!(%rejection, "Input update rejected");
            return false;
        }

        let switched_to_limit =
            update.order_type == Some(OrderType::Limit) && self.inputs.order_type != OrderType::Limit;

        update.apply_to(&mut self.inputs);

        if switched_to_limit && self.inputs.limit_price.is_empty() {
            self.seed_limit_price();
        }

        self.recompute();
        true
    }

    /// Price feed entry point: store the snapshot and recompute
    pub fn on_prices(&mut self, prices: PriceSnapshot) {
        self.prices = prices;
        self.recompute();
    }

    /// Restore default inputs and drop the quote (logout, reconnect)
    pub fn reset(&mut self) {
        self.inputs = TradeInputs::from_settings(&self.settings);
        self.recompute();
    }

    /// Register a callback invoked with the new quote whenever it changes
    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(Option<&TradeQuote>) + Send + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    /// Remove a callback. Returns false if the id was unknown.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sub, _)| *sub != id);
        self.subscribers.len() != before
    }

    /// How much more of the funding token the account needs, if any
    pub fn funding_shortfall(&self, balances: &BalanceSnapshot) -> Option<f64> {
        balances.shortfall(self.inputs.funding_token, self.inputs.funding_amount_value())
    }

    /// USD value of the entered funding amount. `None` until the funding
    /// token has a usable price.
    pub fn funding_amount_usd(&self) -> Option<f64> {
        let price = self.prices.usd(self.inputs.funding_token);
        if !self.prices.ready || !price.is_finite() || price <= 0.0 {
            return None;
        }
        Some(self.inputs.funding_amount_value() * price)
    }

    /// Fund the position with the whole balance of the funding token
    pub fn fund_max(&mut self, balances: &BalanceSnapshot) -> bool {
        self.update_inputs(InputUpdate::max_funding(balances, self.inputs.funding_token))
    }

    fn seed_limit_price(&mut self) {
        let Some(price) = self.market_price() else {
            debug!(pair = %self.inputs.pair, "No market price to seed limit price");
            return;
        };
        self.inputs.limit_price = format_token_amount(self.inputs.pair.quote(), price);
        debug!(limit_price = %self.inputs.limit_price, "Seeded limit price from market");
    }

    fn prices_are_fresh(&self) -> bool {
        match self.settings.max_price_age() {
            Some(max_age) => !self.prices.is_stale(max_age, Utc::now()),
            None => true,
        }
    }

    /// Read inputs and prices, compute, then publish. Subscribers only ever
    /// see a fully computed quote.
    fn recompute(&mut self) {
        let next = if self.prices_are_fresh() {
            compute_quote(&self.inputs, &self.prices, &self.fees)
        } else {
            debug!("Price snapshot stale, withholding quote");
            None
        };

        if next == self.quote {
            trace!("Quote unchanged");
            return;
        }

        match &next {
            Some(quote) => debug!(summary = %quote.summary(), "Quote updated"),
            None => debug!("Quote cleared"),
        }

        self.quote = next;
        let quote = self.quote.as_ref();
        for (_, callback) in self.subscribers.iter_mut() {
            callback(quote);
        }
    }
}

impl Default for TradeEngine {
    fn default() -> Self {
        Self::new(EngineSettings::default())
    }
}
