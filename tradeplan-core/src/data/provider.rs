//! Market data provider trait and structured error types.
//!
//! The MarketDataProvider trait abstracts over the data source so the
//! pipeline can be driven by Yahoo Finance in production and by in-memory
//! fixtures in tests.

use chrono::{Duration, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{MarketSnapshot, Series};

/// Structured error types for data operations.
///
/// These are designed to be displayable directly in the CLI.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("rate limited by provider")]
    RateLimited,

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("symbol not found: {symbol}")]
    SymbolNotFound { symbol: String },

    #[error("data error: {0}")]
    Other(String),
}

/// Calendar days added to a session lookback to cover weekends and holidays.
pub const SESSION_PADDING_DAYS: i64 = 30;

/// How much history to request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Lookback {
    /// Calendar months back from today (detail analysis).
    Months(u32),
    /// The last N trading sessions (watchlist scan).
    Sessions(usize),
}

impl Lookback {
    /// Calendar range that covers this lookback, ending at `today`.
    ///
    /// Sessions are padded by a month so the range still reaches back past
    /// long exchange closures (e.g. the Lebaran break); the result is cut
    /// back with [`Lookback::trim`].
    pub fn date_range(self, today: NaiveDate) -> (NaiveDate, NaiveDate) {
        let start = match self {
            Lookback::Months(m) => today
                .checked_sub_months(Months::new(m))
                .unwrap_or(NaiveDate::MIN),
            Lookback::Sessions(n) => today - Duration::days(n as i64 * 2 + SESSION_PADDING_DAYS),
        };
        (start, today)
    }

    /// Drop bars outside the lookback.
    pub fn trim(self, series: Series) -> Series {
        match self {
            Lookback::Months(_) => series,
            Lookback::Sessions(n) => series.tail(n),
        }
    }
}

/// Trait for market data providers.
pub trait MarketDataProvider {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Fetch the price history and fundamentals for a qualified symbol.
    ///
    /// An unknown symbol may surface either as `SymbolNotFound` or as an
    /// empty series; callers treat both as "no data".
    fn fetch(&self, symbol: &str, lookback: Lookback) -> Result<MarketSnapshot, DataError>;
}
