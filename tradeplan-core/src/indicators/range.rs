//! Windowed range — highest high / lowest low over a trailing window.
//!
//! Used as naive resistance (upper band) and support (lower band). Unlike a
//! strict Donchian channel the window degrades to "all bars so far" while
//! fewer than `window` bars exist, so there is no warmup.
//!
//! Void (NaN) prices are skipped; a window with no finite price is `None`.

use super::Indicator;
use crate::domain::Bar;

/// Which side of the range to compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeBand {
    /// Resistance: max(high).
    Upper,
    /// Support: min(low).
    Lower,
}

#[derive(Debug, Clone)]
pub struct WindowedRange {
    window: usize,
    band: RangeBand,
    name: String,
}

impl WindowedRange {
    pub fn upper(window: usize) -> Self {
        let window = window.max(1);
        Self {
            window,
            band: RangeBand::Upper,
            name: format!("range_high_{window}"),
        }
    }

    pub fn lower(window: usize) -> Self {
        let window = window.max(1);
        Self {
            window,
            band: RangeBand::Lower,
            name: format!("range_low_{window}"),
        }
    }

    /// Band value over the trailing window ending at the last bar.
    pub fn latest(&self, bars: &[Bar]) -> Option<f64> {
        let start = bars.len().saturating_sub(self.window);
        self.extreme(&bars[start..])
    }

    fn extreme(&self, window: &[Bar]) -> Option<f64> {
        let values = window.iter().map(|bar| match self.band {
            RangeBand::Upper => bar.high,
            RangeBand::Lower => bar.low,
        });
        values.filter(|v| !v.is_nan()).reduce(match self.band {
            RangeBand::Upper => f64::max,
            RangeBand::Lower => f64::min,
        })
    }
}

impl Indicator for WindowedRange {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        0
    }

    fn compute(&self, bars: &[Bar]) -> Vec<Option<f64>> {
        (0..bars.len())
            .map(|i| {
                let start = (i + 1).saturating_sub(self.window);
                self.extreme(&bars[start..=i])
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, DEFAULT_EPSILON};
    use chrono::NaiveDate;

    fn make_ohlc_bars(data: &[(f64, f64, f64, f64)]) -> Vec<Bar> {
        let base_date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        data.iter()
            .enumerate()
            .map(|(i, &(open, high, low, close))| Bar {
                date: base_date + chrono::Duration::days(i as i64),
                open,
                high,
                low,
                close,
                volume: 1000,
            })
            .collect()
    }

    fn sample() -> Vec<Bar> {
        make_ohlc_bars(&[
            (10.0, 12.0, 9.0, 11.0),
            (11.0, 15.0, 10.0, 14.0),
            (14.0, 14.0, 13.0, 13.5),
            (13.5, 16.0, 12.0, 15.0),
            (15.0, 15.5, 14.0, 14.5),
        ])
    }

    #[test]
    fn upper_3() {
        let result = WindowedRange::upper(3).compute(&sample());
        // Degraded windows at the start
        assert_approx(result[0].unwrap(), 12.0, DEFAULT_EPSILON);
        assert_approx(result[1].unwrap(), 15.0, DEFAULT_EPSILON);
        // [2] = max(12, 15, 14) = 15
        assert_approx(result[2].unwrap(), 15.0, DEFAULT_EPSILON);
        // [3] = max(15, 14, 16) = 16
        assert_approx(result[3].unwrap(), 16.0, DEFAULT_EPSILON);
        // [4] = max(14, 16, 15.5) = 16
        assert_approx(result[4].unwrap(), 16.0, DEFAULT_EPSILON);
    }

    #[test]
    fn lower_3() {
        let result = WindowedRange::lower(3).compute(&sample());
        assert_approx(result[2].unwrap(), 9.0, DEFAULT_EPSILON);
        assert_approx(result[3].unwrap(), 10.0, DEFAULT_EPSILON);
        assert_approx(result[4].unwrap(), 12.0, DEFAULT_EPSILON);
    }

    #[test]
    fn latest_degrades_to_all_bars() {
        let bars = sample();
        assert_eq!(WindowedRange::upper(20).latest(&bars), Some(16.0));
        assert_eq!(WindowedRange::lower(20).latest(&bars), Some(9.0));
    }

    #[test]
    fn latest_uses_trailing_window() {
        let bars = sample();
        assert_eq!(WindowedRange::upper(2).latest(&bars), Some(16.0));
        assert_eq!(WindowedRange::lower(2).latest(&bars), Some(12.0));
    }

    #[test]
    fn void_prices_are_skipped() {
        let mut bars = sample();
        bars[3].high = f64::NAN;
        assert_eq!(WindowedRange::upper(2).latest(&bars), Some(15.5));
    }

    #[test]
    fn empty_is_none() {
        assert_eq!(WindowedRange::upper(20).latest(&[]), None);
        assert!(WindowedRange::lower(20).compute(&[]).is_empty());
    }

    #[test]
    fn zero_window_acts_as_one() {
        let bars = sample();
        assert_eq!(WindowedRange::upper(0).latest(&bars), Some(15.5));
    }
}
