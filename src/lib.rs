//! ccxt-htx: unified trading API for HTX (formerly Huobi)
//!
//! Spot, isolated/cross margin, USDT-margined contracts and coin-margined
//! swaps and futures behind the one [`Exchange`] trait.

pub mod client;
pub mod errors;
pub mod exchanges;
pub mod types;
pub mod utils;

// Re-exports
pub use client::{ExchangeConfig, HttpClient, RateLimiter};
pub use errors::{CcxtError, CcxtResult};
pub use exchanges::{Htx, HtxOptions, HtxParams};
pub use types::Exchange;
