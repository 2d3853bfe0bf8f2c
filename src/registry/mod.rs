//! Static token and trading pair catalogs
//!
//! Both registries are immutable lookup tables keyed by enums, so an unknown
//! symbol or pair can only appear at a string parsing boundary.

mod pairs;
mod tokens;

pub use pairs::{pair_of, PairId};
pub use tokens::{token_of, Token, TokenMap, TokenSymbol, MATIC, USDC, WBTC, WETH};
