//! The indicator set computed fresh for every analysis request.

use serde::{Deserialize, Serialize};

use super::{Indicator, Sma, WindowedRange};
use crate::domain::Series;

/// Short moving average period.
pub const MA_SHORT: usize = 20;
/// Long moving average period.
pub const MA_LONG: usize = 50;
/// Default trailing window for support/resistance.
pub const DEFAULT_SR_WINDOW: usize = 20;

/// Latest-bar indicator values. `None` means "not defined", never zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSet {
    pub ma20: Option<f64>,
    pub ma50: Option<f64>,
    /// Resistance: highest high over the trailing window.
    pub windowed_high: Option<f64>,
    /// Support: lowest low over the trailing window.
    pub windowed_low: Option<f64>,
    pub last_close: Option<f64>,
    pub previous_close: Option<f64>,
    pub last_volume: Option<u64>,
}

impl IndicatorSet {
    /// Day-over-day change of the close in percent, unrounded.
    pub fn change_pct(&self) -> Option<f64> {
        percent_change(self.previous_close?, self.last_close?)
    }
}

/// `(latest - previous) / previous * 100`, undefined for a zero or void base.
pub fn percent_change(previous: f64, latest: f64) -> Option<f64> {
    if previous == 0.0 || previous.is_nan() || latest.is_nan() {
        return None;
    }
    Some((latest - previous) / previous * 100.0)
}

/// Compute the indicator set for a series with a support/resistance `window`.
///
/// A series with fewer than two bars yields an all-`None` set.
pub fn compute(series: &Series, window: usize) -> IndicatorSet {
    let bars = series.bars();
    if bars.len() < 2 {
        return IndicatorSet::default();
    }

    let last = &bars[bars.len() - 1];
    let previous = &bars[bars.len() - 2];
    IndicatorSet {
        ma20: Sma::new(MA_SHORT).latest(bars),
        ma50: Sma::new(MA_LONG).latest(bars),
        windowed_high: WindowedRange::upper(window).latest(bars),
        windowed_low: WindowedRange::lower(window).latest(bars),
        last_close: Some(last.close).filter(|c| !c.is_nan()),
        previous_close: Some(previous.close).filter(|c| !c.is_nan()),
        last_volume: Some(last.volume),
    }
}

/// Per-bar moving average lines for the chart collaborator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Overlay {
    pub ma20: Vec<Option<f64>>,
    pub ma50: Vec<Option<f64>>,
}

pub fn overlay(series: &Series) -> Overlay {
    Overlay {
        ma20: Sma::new(MA_SHORT).compute(series.bars()),
        ma50: Sma::new(MA_LONG).compute(series.bars()),
    }
}
