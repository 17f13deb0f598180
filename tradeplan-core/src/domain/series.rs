//! Series — the ordered bars returned for one symbol.

use serde::{Deserialize, Serialize};

use super::Bar;

/// Ordered sequence of bars for one symbol over a lookback window.
///
/// A series may be empty (unknown symbol, no trading data). Callers report
/// that as a distinct condition instead of computing on it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub symbol: String,
    bars: Vec<Bar>,
}

impl Series {
    /// Build a series, sorting by date and dropping duplicate dates.
    ///
    /// When two bars share a date the later one in the input wins.
    pub fn new(symbol: impl Into<String>, mut bars: Vec<Bar>) -> Self {
        // Stable sort keeps input order among equal dates, so the last
        // occurrence is the one retained below.
        bars.sort_by_key(|b| b.date);
        let mut deduped: Vec<Bar> = Vec::with_capacity(bars.len());
        for bar in bars {
            match deduped.last_mut() {
                Some(prev) if prev.date == bar.date => *prev = bar,
                _ => deduped.push(bar),
            }
        }
        Self {
            symbol: symbol.into(),
            bars: deduped,
        }
    }

    pub fn empty(symbol: impl Into<String>) -> Self {
        Self::new(symbol, Vec::new())
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn last(&self) -> Option<&Bar> {
        self.bars.last()
    }

    /// Close prices in date order.
    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    /// Keep only the trailing `n` bars.
    pub fn tail(mut self, n: usize) -> Self {
        let len = self.bars.len();
        if len > n {
            self.bars.drain(..len - n);
        }
        self
    }
}
