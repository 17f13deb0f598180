//! Market data: ticker normalization, provider trait, Yahoo Finance provider.

pub mod provider;
pub mod ticker;
pub mod yahoo;

pub use provider::{DataError, Lookback, MarketDataProvider};
pub use ticker::{bare_symbol, normalize, DEFAULT_EXCHANGE_SUFFIX};
pub use yahoo::{YahooProvider, DEFAULT_YAHOO_BASE_URL, DEFAULT_YAHOO_COOKIE_URL};
