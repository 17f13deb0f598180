//! Bar — one trading session of OHLCV data.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// OHLCV bar for a single session.
///
/// Bars are immutable once fetched. Within a [`Series`](super::Series) they
/// are ordered by date ascending with at most one bar per date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl Bar {
    /// Returns true if any OHLC field is NaN (provider left a hole).
    pub fn is_void(&self) -> bool {
        self.open.is_nan() || self.high.is_nan() || self.low.is_nan() || self.close.is_nan()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_bar() -> Bar {
        Bar {
            date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            open: 9000.0,
            high: 9100.0,
            low: 8950.0,
            close: 9050.0,
            volume: 12_500_000,
        }
    }

    #[test]
    fn complete_bar_is_not_void() {
        assert!(!sample_bar().is_void());
    }

    #[test]
    fn bar_detects_void() {
        let mut bar = sample_bar();
        bar.close = f64::NAN;
        assert!(bar.is_void());
    }

    #[test]
    fn missing_volume_alone_is_not_void() {
        let mut bar = sample_bar();
        bar.volume = 0;
        assert!(!bar.is_void());
    }
}
