//! USD price feed refreshed on a fixed heartbeat
//!
//! The feed polls a [`PriceSource`] and publishes every successful read as a
//! [`PriceSnapshot`] on a `watch` channel. A failed poll keeps the previous
//! snapshot, so consumers always see the last good prices.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::interval;
use tracing::{debug, info, instrument, warn};

use super::units::units_to_f64;
use crate::common::errors::Result;
use crate::registry::{TokenMap, TokenSymbol};

/// Heartbeat of the on-chain USD oracles the prices come from
pub const DEFAULT_HEARTBEAT_MS: u64 = 27_000;

/// Decimals used by the USD oracle answers
pub const ORACLE_DECIMALS: u32 = 8;

/// Latest USD price for every supported token
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceSnapshot {
    /// USD price per whole token; zero means "not known yet"
    pub usd: TokenMap<f64>,
    /// False until the first successful read
    pub ready: bool,
    pub updated_at: Option<DateTime<Utc>>,
}

impl PriceSnapshot {
    /// All-zero snapshot used before the first read
    pub fn empty() -> Self {
        Self {
            usd: TokenMap::default(),
            ready: false,
            updated_at: None,
        }
    }

    /// Fresh snapshot stamped with the current time
    pub fn new(usd: TokenMap<f64>) -> Self {
        Self::at(usd, Utc::now())
    }

    pub fn at(usd: TokenMap<f64>, updated_at: DateTime<Utc>) -> Self {
        Self {
            usd,
            ready: true,
            updated_at: Some(updated_at),
        }
    }

    pub fn usd(&self, symbol: TokenSymbol) -> f64 {
        self.usd[symbol]
    }

    /// How many units of `to` one unit of `from` is worth.
    ///
    /// Returns `None` when either price is zero, negative or not finite.
    pub fn rate(&self, from: TokenSymbol, to: TokenSymbol) -> Option<f64> {
        let numerator = self.usd(from);
        let denominator = self.usd(to);
        if !is_usable_price(numerator) || !is_usable_price(denominator) {
            return None;
        }
        Some(numerator / denominator)
    }

    /// True if the snapshot was taken more than `max_age` before `now`.
    /// A snapshot without a timestamp is always stale.
    pub fn is_stale(&self, max_age: chrono::Duration, now: DateTime<Utc>) -> bool {
        match self.updated_at {
            Some(ts) => now - ts > max_age,
            None => true,
        }
    }
}

impl Default for PriceSnapshot {
    fn default() -> Self {
        Self::empty()
    }
}

/// Convert raw oracle answers (scaled by [`ORACLE_DECIMALS`]) into USD prices
pub fn prices_from_oracle_answers(answers: &TokenMap<i128>) -> Result<TokenMap<f64>> {
    let mut usd = TokenMap::default();
    for (symbol, answer) in answers.iter() {
        usd[symbol] = units_to_f64(*answer, ORACLE_DECIMALS)?;
    }
    Ok(usd)
}

fn is_usable_price(price: f64) -> bool {
    price.is_finite() && price > 0.0
}

/// Source of USD prices (oracle contracts, an API, a fixture...)
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// Read the current USD price of every supported token
    async fn latest_prices(&self) -> Result<TokenMap<f64>>;

    /// Name used in logs
    fn source_name(&self) -> &'static str;
}

/// Price source that always answers with the same prices
#[derive(Debug, Clone)]
pub struct StaticPriceSource {
    prices: TokenMap<f64>,
}

impl StaticPriceSource {
    pub fn new(prices: TokenMap<f64>) -> Self {
        Self { prices }
    }

    /// Build from raw answers captured from the oracle contracts
    pub fn from_oracle_answers(answers: &TokenMap<i128>) -> Result<Self> {
        Ok(Self::new(prices_from_oracle_answers(answers)?))
    }
}

#[async_trait]
impl PriceSource for StaticPriceSource {
    async fn latest_prices(&self) -> Result<TokenMap<f64>> {
        Ok(self.prices)
    }

    fn source_name(&self) -> &'static str {
        "static"
    }
}

/// Heartbeat-driven price feed
pub struct PriceFeed {
    source: Arc<dyn PriceSource>,
    heartbeat: Duration,
    sender: Arc<watch::Sender<PriceSnapshot>>,
    shutdown: Option<mpsc::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl PriceFeed {
    pub fn new(source: Arc<dyn PriceSource>) -> Self {
        let (sender, _) = watch::channel(PriceSnapshot::empty());
        Self {
            source,
            heartbeat: Duration::from_millis(DEFAULT_HEARTBEAT_MS),
            sender: Arc::new(sender),
            shutdown: None,
            task: None,
        }
    }

    /// Set the polling interval
    pub fn with_heartbeat(mut self, heartbeat: Duration) -> Self {
        self.heartbeat = heartbeat;
        self
    }

    /// Receiver that observes every published snapshot
    pub fn subscribe(&self) -> watch::Receiver<PriceSnapshot> {
        self.sender.subscribe()
    }

    /// Last published snapshot
    pub fn latest(&self) -> PriceSnapshot {
        *self.sender.borrow()
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Poll the source once and publish the result.
    ///
    /// On failure the previous snapshot stays published and the error is
    /// returned to the caller.
    pub async fn refresh(&self) -> Result<PriceSnapshot> {
        let snapshot = poll(self.source.as_ref()).await?;
        self.sender.send_replace(snapshot);
        Ok(snapshot)
    }

    /// Start polling on the heartbeat. Calling this while running is a no-op.
    pub fn start(&mut self) {
        if self.is_running() {
            return;
        }

        let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);
        let source = self.source.clone();
        let sender = self.sender.clone();
        let heartbeat = self.heartbeat;

        info!(
            source = source.source_name(),
            heartbeat_ms = heartbeat.as_millis() as u64,
            "Starting price feed"
        );

        let task = tokio::spawn(async move {
            // the first tick completes immediately, so prices load on start
            let mut ticker = interval(heartbeat);
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        match poll(source.as_ref()).await {
                            Ok(snapshot) => {
                                sender.send_replace(snapshot);
                            }
                            Err(e) => {
                                warn!(source = source.source_name(), "Price refresh failed: {}", e);
                            }
                        }
                    }
                    _ = shutdown_rx.recv() => {
                        debug!("Price feed shutdown signal received");
                        break;
                    }
                }
            }
        });

        self.shutdown = Some(shutdown_tx);
        self.task = Some(task);
    }

    /// Stop polling. Calling this while stopped is a no-op.
    pub fn stop(&mut self) {
        let Some(task) = self.task.take() else {
            return;
        };
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.try_send(());
        }
        task.abort();
        info!("Price feed stopped");
    }
}

impl Drop for PriceFeed {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

#[instrument(skip(source), fields(source = source.source_name()))]
async fn poll(source: &dyn PriceSource) -> Result<PriceSnapshot> {
    let usd = source.latest_prices().await?;
    debug!(?usd, "Fetched USD prices");
    Ok(PriceSnapshot::new(usd))
}
