//! Token balances of the connected account

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

use super::account::AccountState;
use super::units::{f64_to_units, unsigned_units_to_f64};
use crate::common::errors::{QuoteError, Result};
use crate::registry::{token_of, TokenMap, TokenSymbol};

/// Holdings of every supported token, in whole-token units
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BalanceSnapshot {
    pub amounts: TokenMap<f64>,
}

impl BalanceSnapshot {
    pub fn new(amounts: TokenMap<f64>) -> Self {
        Self { amounts }
    }

    /// Convert raw on-chain balances using each token's decimals
    pub fn from_raw(raw: &TokenMap<u128>) -> Result<Self> {
        let mut amounts = TokenMap::default();
        for (symbol, value) in raw.iter() {
            amounts[symbol] = unsigned_units_to_f64(*value, token_of(symbol).decimals)?;
        }
        Ok(Self { amounts })
    }

    pub fn get(&self, symbol: TokenSymbol) -> f64 {
        self.amounts[symbol]
    }

    /// True when the holding of `symbol` is at least `amount`
    pub fn covers(&self, symbol: TokenSymbol, amount: f64) -> bool {
        self.shortfall(symbol, amount).is_none()
    }

    /// How much of `symbol` is missing to pay `amount`, if anything
    pub fn shortfall(&self, symbol: TokenSymbol, amount: f64) -> Option<f64> {
        let held = self.get(symbol);
        if amount > held {
            Some(amount - held)
        } else {
            None
        }
    }
}

/// Source of raw on-chain balances for an address
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BalanceSource: Send + Sync {
    /// Raw integer balances (native currency included) for `address`
    async fn raw_balances(&self, address: &str) -> Result<TokenMap<u128>>;
}

/// Balance source with fixed holdings, for offline runs and the CLI
#[derive(Debug, Clone)]
pub struct StaticBalanceSource {
    raw: TokenMap<u128>,
}

impl StaticBalanceSource {
    pub fn new(raw: TokenMap<u128>) -> Self {
        Self { raw }
    }

    /// Build from whole-token amounts, scaled by each token's decimals
    pub fn from_whole(amounts: &TokenMap<f64>) -> Result<Self> {
        let mut raw = TokenMap::default();
        for (symbol, amount) in amounts.iter() {
            raw[symbol] = f64_to_units(*amount, token_of(symbol).decimals)?;
        }
        Ok(Self::new(raw))
    }
}

#[async_trait]
impl BalanceSource for StaticBalanceSource {
    async fn raw_balances(&self, _address: &str) -> Result<TokenMap<u128>> {
        Ok(self.raw)
    }
}

/// Keeps the connected account's balances current
pub struct BalanceFeed {
    source: Arc<dyn BalanceSource>,
    target_chain_id: u64,
    latest: BalanceSnapshot,
}

impl BalanceFeed {
    pub fn new(source: Arc<dyn BalanceSource>, target_chain_id: u64) -> Self {
        Self {
            source,
            target_chain_id,
            latest: BalanceSnapshot::default(),
        }
    }

    pub fn latest(&self) -> &BalanceSnapshot {
        &self.latest
    }

    /// Re-read balances for `account`.
    ///
    /// A disconnected account or one on the wrong chain resets every balance
    /// to zero. A failed read keeps the previous snapshot and returns the
    /// error.
    pub async fn refresh(&mut self, account: &AccountState) -> Result<&BalanceSnapshot> {
        let address = match &account.address {
            Some(address) if account.is_on_target_chain(self.target_chain_id) => address,
            _ => {
                debug!("Account not ready, clearing balances");
                self.latest = BalanceSnapshot::default();
                return Ok(&self.latest);
            }
        };

        let raw = self
            .source
            .raw_balances(address)
            .await
            .map_err(|e| QuoteError::BalanceSource(e.to_string()))?;
        self.latest = BalanceSnapshot::from_raw(&raw)?;
        info!(%address, "Balances refreshed");
        Ok(&self.latest)
    }
}
