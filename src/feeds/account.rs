//! Connected wallet context consumed by the balance feed

use serde::{Deserialize, Serialize};

/// Polygon PoS mainnet
pub const POLYGON_CHAIN_ID: u64 = 137;

/// What the wallet layer currently reports about the user's account
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountState {
    /// Connected account address, if the user approved access
    pub address: Option<String>,
    /// Chain the wallet provider is pointed at
    pub chain_id: Option<u64>,
}

impl AccountState {
    pub fn connected(address: impl Into<String>, chain_id: u64) -> Self {
        Self {
            address: Some(address.into()),
            chain_id: Some(chain_id),
        }
    }

    pub fn disconnected() -> Self {
        Self::default()
    }

    pub fn is_connected(&self) -> bool {
        self.address.is_some()
    }

    pub fn is_on_target_chain(&self, target_chain_id: u64) -> bool {
        self.chain_id == Some(target_chain_id)
    }

    /// Balances and quotes are only meaningful for a connected account on the
    /// chain the token registry describes
    pub fn is_ready(&self, target_chain_id: u64) -> bool {
        self.is_connected() && self.is_on_target_chain(target_chain_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_readiness() {
        let account = AccountState::connected("0xabc", POLYGON_CHAIN_ID);
        assert!(account.is_ready(POLYGON_CHAIN_ID));

        let wrong_chain = AccountState::connected("0xabc", 1);
        assert!(wrong_chain.is_connected());
        assert!(!wrong_chain.is_ready(POLYGON_CHAIN_ID));

        assert!(!AccountState::disconnected().is_ready(POLYGON_CHAIN_ID));
    }
}
