//! Fundamentals snapshot reported alongside the price history.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Marker rendered for a fundamental the provider did not report.
pub const NOT_AVAILABLE: &str = "N/A";

/// Descriptive fundamentals. Any field may be absent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FundamentalsSnapshot {
    pub trailing_pe: Option<f64>,
    pub price_to_book: Option<f64>,
    pub market_cap: Option<f64>,
}

impl FundamentalsSnapshot {
    pub fn is_empty(&self) -> bool {
        self.trailing_pe.is_none() && self.price_to_book.is_none() && self.market_cap.is_none()
    }
}

/// Display adapter for an optional ratio: two decimals or `N/A`.
pub struct Ratio(pub Option<f64>);

impl fmt::Display for Ratio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(v) if v.is_finite() => write!(f, "{v:.2}"),
            _ => f.write_str(NOT_AVAILABLE),
        }
    }
}

/// Display adapter for a market capitalisation: scaled with a suffix or `N/A`.
pub struct MarketCap(pub Option<f64>);

impl fmt::Display for MarketCap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let v = match self.0 {
            Some(v) if v.is_finite() => v,
            _ => return f.write_str(NOT_AVAILABLE),
        };
        let abs = v.abs();
        if abs >= 1e12 {
            write!(f, "{:.2}T", v / 1e12)
        } else if abs >= 1e9 {
            write!(f, "{:.2}B", v / 1e9)
        } else if abs >= 1e6 {
            write!(f, "{:.2}M", v / 1e6)
        } else {
            write!(f, "{v:.0}")
        }
    }
}
