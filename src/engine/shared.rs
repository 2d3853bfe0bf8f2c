//! Thread-safe handle to a [`TradeEngine`]
//!
//! Inputs, prices and the quote sit behind one mutex, so every recompute is
//! a single read-compute-publish step and a quote can never mix inputs from
//! one edit with prices from another tick.

use std::sync::Arc;
use tokio::sync::{watch, Mutex, MutexGuard};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use super::{InputUpdate, TradeEngine, TradeInputs, TradeQuote};
use crate::feeds::prices::PriceSnapshot;

/// Cloneable, shareable engine handle
#[derive(Clone)]
pub struct SharedEngine {
    inner: Arc<Mutex<TradeEngine>>,
}

impl SharedEngine {
    pub fn new(engine: TradeEngine) -> Self {
        Self {
            inner: Arc::new(Mutex::new(engine)),
        }
    }

    /// Exclusive access for anything not covered by the helpers below
    pub async fn lock(&self) -> MutexGuard<'_, TradeEngine> {
        self.inner.lock().await
    }

    pub async fn update_inputs(&self, update: InputUpdate) -> bool {
        self.inner.lock().await.update_inputs(update)
    }

    pub async fn on_prices(&self, prices: PriceSnapshot) {
        self.inner.lock().await.on_prices(prices);
    }

    pub async fn quote(&self) -> Option<TradeQuote> {
        self.inner.lock().await.quote().cloned()
    }

    pub async fn inputs(&self) -> TradeInputs {
        self.inner.lock().await.inputs().clone()
    }
}

/// Feed every snapshot published on `prices` into `engine`.
///
/// The current snapshot is applied immediately if it is ready. The task ends
/// when the price feed is dropped.
pub fn spawn_price_listener(
    engine: SharedEngine,
    mut prices: watch::Receiver<PriceSnapshot>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let initial = *prices.borrow_and_update();
        if initial.ready {
            engine.on_prices(initial).await;
        }

        while prices.changed().await.is_ok() {
            let snapshot = *prices.borrow_and_update();
            debug!(updated_at = ?snapshot.updated_at, "Applying price snapshot");
            engine.on_prices(snapshot).await;
        }
        info!("Price channel closed, listener exiting");
    })
}
