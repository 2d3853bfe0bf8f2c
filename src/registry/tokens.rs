use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};
use std::str::FromStr;

use crate::common::errors::QuoteError;

/// Supported token symbols
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TokenSymbol {
    Usdc,
    Matic,
    Weth,
    Wbtc,
}

impl TokenSymbol {
    /// Every supported symbol, in catalog order
    pub const ALL: [TokenSymbol; 4] = [
        TokenSymbol::Usdc,
        TokenSymbol::Matic,
        TokenSymbol::Weth,
        TokenSymbol::Wbtc,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TokenSymbol::Usdc => "USDC",
            TokenSymbol::Matic => "MATIC",
            TokenSymbol::Weth => "WETH",
            TokenSymbol::Wbtc => "WBTC",
        }
    }
}

impl std::fmt::Display for TokenSymbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TokenSymbol {
    type Err = QuoteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TokenSymbol::ALL
            .into_iter()
            .find(|symbol| symbol.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| QuoteError::UnknownToken(s.to_string()))
    }
}

/// Static token metadata
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Token {
    pub symbol: TokenSymbol,
    /// On-chain decimals of the ERC20 (or native currency)
    pub decimals: u32,
    /// Contract address on the target chain
    pub address: &'static str,
    /// Whether this is the chain's native currency
    pub is_native: bool,
    /// Fraction of collateral value counted towards the liquidation limit
    pub liquidation_threshold: f64,
    /// Highest leverage the protocol allows when funding with this token
    pub max_leverage: f64,
    pub logo_url: &'static str,
}

pub const USDC: Token = Token {
    symbol: TokenSymbol::Usdc,
    decimals: 6,
    address: "0x2791Bca1f2de4661ED88A30C99A7a9449Aa84174",
    is_native: false,
    liquidation_threshold: 0.85,
    max_leverage: 5.0,
    logo_url: "/token-images/usdc.png",
};

pub const MATIC: Token = Token {
    symbol: TokenSymbol::Matic,
    decimals: 18,
    address: "0x0d500B1d8E8eF31E21C99d1Db9A6444d3ADf1270",
    is_native: true,
    liquidation_threshold: 0.7,
    max_leverage: 2.5,
    logo_url: "/token-images/matic.png",
};

pub const WETH: Token = Token {
    symbol: TokenSymbol::Weth,
    decimals: 18,
    address: "0x7ceB23fD6bC0adD59E62ac25578270cFf1b9f619",
    is_native: false,
    liquidation_threshold: 0.825,
    max_leverage: 4.5,
    logo_url: "/token-images/weth.png",
};

pub const WBTC: Token = Token {
    symbol: TokenSymbol::Wbtc,
    decimals: 8,
    address: "0x1BFD67037B42Cf73acF2047067bd4F2C47D9BfD6",
    is_native: false,
    liquidation_threshold: 0.75,
    max_leverage: 3.0,
    logo_url: "/token-images/wbtc.png",
};

/// Look up the metadata for a symbol
pub fn token_of(symbol: TokenSymbol) -> &'static Token {
    match symbol {
        TokenSymbol::Usdc => &USDC,
        TokenSymbol::Matic => &MATIC,
        TokenSymbol::Weth => &WETH,
        TokenSymbol::Wbtc => &WBTC,
    }
}

/// A value for every supported token
///
/// Being a plain struct with one field per symbol, a `TokenMap` can never be
/// missing an entry, so lookups cannot fail. The lowercase aliases cover
/// config sources that normalise key case.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TokenMap<T> {
    #[serde(rename = "USDC", alias = "usdc")]
    pub usdc: T,
    #[serde(rename = "MATIC", alias = "matic")]
    pub matic: T,
    #[serde(rename = "WETH", alias = "weth")]
    pub weth: T,
    #[serde(rename = "WBTC", alias = "wbtc")]
    pub wbtc: T,
}

impl<T> TokenMap<T> {
    /// Build a map by evaluating `f` for each symbol
    pub fn from_fn(mut f: impl FnMut(TokenSymbol) -> T) -> Self {
        Self {
            usdc: f(TokenSymbol::Usdc),
            matic: f(TokenSymbol::Matic),
            weth: f(TokenSymbol::Weth),
            wbtc: f(TokenSymbol::Wbtc),
        }
    }

    /// Iterate over `(symbol, value)` pairs in catalog order
    pub fn iter(&self) -> impl Iterator<Item = (TokenSymbol, &T)> {
        TokenSymbol::ALL.into_iter().map(move |symbol| (symbol, &self[symbol]))
    }
}

impl<T> Index<TokenSymbol> for TokenMap<T> {
    type Output = T;

    fn index(&self, symbol: TokenSymbol) -> &T {
        match symbol {
            TokenSymbol::Usdc => &self.usdc,
            TokenSymbol::Matic => &self.matic,
            TokenSymbol::Weth => &self.weth,
            TokenSymbol::Wbtc => &self.wbtc,
        }
    }
}

impl<T> IndexMut<TokenSymbol> for TokenMap<T> {
    fn index_mut(&mut self, symbol: TokenSymbol) -> &mut T {
        match symbol {
            TokenSymbol::Usdc => &mut self.usdc,
            TokenSymbol::Matic => &mut self.matic,
            TokenSymbol::Weth => &mut self.weth,
            TokenSymbol::Wbtc => &mut self.wbtc,
        }
    }
}
