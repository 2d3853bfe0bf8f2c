use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::tokens::{token_of, Token, TokenSymbol};
use crate::common::errors::QuoteError;

/// Supported trading pairs, written BASE/QUOTE
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PairId {
    #[default]
    #[serde(rename = "WETH/USDC")]
    WethUsdc,
    #[serde(rename = "WBTC/USDC")]
    WbtcUsdc,
    #[serde(rename = "WETH/WBTC")]
    WethWbtc,
    #[serde(rename = "MATIC/USDC")]
    MaticUsdc,
    #[serde(rename = "MATIC/WETH")]
    MaticWeth,
    #[serde(rename = "MATIC/WBTC")]
    MaticWbtc,
}

impl PairId {
    pub const ALL: [PairId; 6] = [
        PairId::WethUsdc,
        PairId::WbtcUsdc,
        PairId::WethWbtc,
        PairId::MaticUsdc,
        PairId::MaticWeth,
        PairId::MaticWbtc,
    ];

    /// Base and quote symbols
    pub fn symbols(&self) -> (TokenSymbol, TokenSymbol) {
        use TokenSymbol::*;
        match self {
            PairId::WethUsdc => (Weth, Usdc),
            PairId::WbtcUsdc => (Wbtc, Usdc),
            PairId::WethWbtc => (Weth, Wbtc),
            PairId::MaticUsdc => (Matic, Usdc),
            PairId::MaticWeth => (Matic, Weth),
            PairId::MaticWbtc => (Matic, Wbtc),
        }
    }

    pub fn base(&self) -> TokenSymbol {
        self.symbols().0
    }

    pub fn quote(&self) -> TokenSymbol {
        self.symbols().1
    }
}

impl std::fmt::Display for PairId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (base, quote) = self.symbols();
        write!(f, "{}/{}", base, quote)
    }
}

impl FromStr for PairId {
    type Err = QuoteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (base, quote) = s
            .split_once('/')
            .ok_or_else(|| QuoteError::UnknownPair(s.to_string()))?;
        let base: TokenSymbol = base.parse().map_err(|_| QuoteError::UnknownPair(s.to_string()))?;
        let quote: TokenSymbol = quote.parse().map_err(|_| QuoteError::UnknownPair(s.to_string()))?;

        PairId::ALL
            .into_iter()
            .find(|pair| pair.symbols() == (base, quote))
            .ok_or_else(|| QuoteError::UnknownPair(s.to_string()))
    }
}

/// Resolve a pair to its (base, quote) token metadata
pub fn pair_of(pair: PairId) -> (&'static Token, &'static Token) {
    let (base, quote) = pair.symbols();
    (token_of(base), token_of(quote))
}
