//! Read-only collaborators that feed the quote engine
//!
//! - [`prices`]: USD prices on a heartbeat, published over a `watch` channel
//! - [`balances`]: the connected account's holdings
//! - [`account`]: wallet connection and chain state

pub mod account;
pub mod balances;
pub mod prices;
pub mod units;

pub use account::{AccountState, POLYGON_CHAIN_ID};
pub use balances::{BalanceFeed, BalanceSnapshot, BalanceSource, StaticBalanceSource};
pub use prices::{PriceFeed, PriceSnapshot, PriceSource, StaticPriceSource};
