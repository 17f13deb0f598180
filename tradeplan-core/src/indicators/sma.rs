//! Simple Moving Average (SMA).
//!
//! Rolling mean of close prices over a lookback window.
//! Lookback: period - 1 (first value at index period-1).

use super::Indicator;
use crate::domain::Bar;

#[derive(Debug, Clone)]
pub struct Sma {
    period: usize,
    name: String,
}

impl Sma {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "SMA period must be >= 1");
        Self {
            period,
            name: format!("sma_{period}"),
        }
    }

    /// SMA of the window ending at the last bar, if enough bars exist.
    pub fn latest(&self, bars: &[Bar]) -> Option<f64> {
        if bars.len() < self.period {
            return None;
        }
        let window = &bars[bars.len() - self.period..];
        if window.iter().any(|b| b.close.is_nan()) {
            return None;
        }
        Some(window.iter().map(|b| b.close).sum::<f64>() / self.period as f64)
    }
}

impl Indicator for Sma {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period.saturating_sub(1)
    }

    fn compute(&self, bars: &[Bar]) -> Vec<Option<f64>> {
        let n = bars.len();
        let mut result = vec![None; n];

        if n < self.period {
            return result;
        }

        // NaN closes are excluded from the running sum and counted instead,
        // so a window is defined only when that count drops back to zero.
        let mut sum = 0.0;
        let mut nan_count = 0usize;
        for (i, bar) in bars.iter().enumerate() {
            if bar.close.is_nan() {
                nan_count += 1;
            } else {
                sum += bar.close;
            }

            if i >= self.period {
                let leaving = bars[i - self.period].close;
                if leaving.is_nan() {
                    nan_count -= 1;
                } else {
                    sum -= leaving;
                }
            }

            if i + 1 >= self.period && nan_count == 0 {
                result[i] = Some(sum / self.period as f64);
            }
        }

        result
    }
}
