//! Watchlist scan: last two sessions per symbol, then one recommendation.
//!
//! A symbol that fails to fetch, or has fewer than two sessions, is skipped
//! and recorded; the scan only fails when every symbol was skipped.

use std::fmt;

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use tradeplan_core::data::{bare_symbol, normalize, MarketDataProvider};
use tradeplan_core::indicators::set::percent_change;
use tradeplan_core::narrative::NarrativeGenerator;
use tradeplan_core::prompt::{compose_watchlist, Percent};

use crate::config::AppConfig;
use crate::pipeline::PipelineError;
use crate::request::ScanRequest;

/// Day-over-day move of one watchlist symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanRow {
    /// Bare ticker.
    pub symbol: String,
    pub previous_close: f64,
    pub last_close: f64,
    pub change_pct: f64,
}

impl ScanRow {
    /// Build a row from two closes; `None` when the previous close is zero or either close is void.
    pub fn new(symbol: impl Into<String>, previous_close: f64, last_close: f64) -> Option<Self> {
        let change_pct = percent_change(previous_close, last_close)?;
        Some(Self {
            symbol: symbol.into(),
            previous_close,
            last_close,
            change_pct,
        })
    }

    /// Prompt line, e.g. `BBCA: close 9000.00, change +1.12%`.
    pub fn line(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ScanRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: close {:.2}, change {}",
            self.symbol,
            self.last_close,
            Percent(Some(self.change_pct))
        )
    }
}

/// A symbol left out of the scan, with the reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedSymbol {
    pub symbol: String,
    pub reason: String,
}

/// Rows collected before the generation call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollectedScan {
    pub rows: Vec<ScanRow>,
    pub skipped: Vec<SkippedSymbol>,
}

/// A finished scan.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanReport {
    /// Rows in request order.
    pub rows: Vec<ScanRow>,
    pub skipped: Vec<SkippedSymbol>,
    pub prompt: String,
    /// The generator's recommendation.
    pub summary: String,
}

impl ScanReport {
    pub fn lines(&self) -> Vec<String> {
        self.rows.iter().map(ScanRow::line).collect()
    }
}

/// Fetch the last two sessions for every requested symbol.
pub fn collect(
    req: &ScanRequest,
    config: &AppConfig,
    provider: &dyn MarketDataProvider,
) -> CollectedScan {
    let mut out = CollectedScan::default();
    let lookback = req.lookback();

    for raw in &req.symbols {
        let qualified = normalize(raw, &config.exchange_suffix);
        let symbol = bare_symbol(&qualified, &config.exchange_suffix).to_string();

        let reason = match provider.fetch(&qualified, lookback) {
            Err(e) => e.to_string(),
            Ok(snapshot) => {
                let closes = lookback.trim(snapshot.series).closes();
                match closes.as_slice() {
                    [.., previous, latest] => match ScanRow::new(symbol.clone(), *previous, *latest) {
                        Some(row) => {
                            out.rows.push(row);
                            continue;
                        }
                        None => "previous close is zero or a close is missing".to_string(),
                    },
                    _ => format!("only {} session(s) available", closes.len()),
                }
            }
        };

        warn!(symbol = %qualified, %reason, "skipping watchlist symbol");
        out.skipped.push(SkippedSymbol { symbol, reason });
    }

    info!(
        rows = out.rows.len(),
        skipped = out.skipped.len(),
        "watchlist collected"
    );
    out
}

/// Compose the watchlist prompt and ask for a recommendation.
///
/// Fails with [`PipelineError::ScanFailed`] when no symbol produced a row.
pub fn summarize(
    collected: CollectedScan,
    api_key: &SecretString,
    generator: &dyn NarrativeGenerator,
) -> Result<ScanReport, PipelineError> {
    let CollectedScan { rows, skipped } = collected;
    if rows.is_empty() {
        return Err(PipelineError::ScanFailed { skipped });
    }

    let lines: Vec<String> = rows.iter().map(ScanRow::line).collect();
    let prompt = compose_watchlist(&lines);
    info!(generator = generator.name(), rows = rows.len(), "requesting watchlist summary");
    let summary = generator.generate(api_key, &prompt)?;

    Ok(ScanReport {
        rows,
        skipped,
        prompt,
        summary,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn line_format() {
        let row = ScanRow::new("BBCA", 8900.0, 9000.0).unwrap();
        assert_eq!(row.line(), "BBCA: close 9000.00, change +1.12%");
    }

    #[test]
    fn negative_change_keeps_sign() {
        let row = ScanRow::new("TLKM", 4000.0, 3900.0).unwrap();
        assert_eq!(row.line(), "TLKM: close 3900.00, change -2.50%");
    }

    #[test]
    fn zero_previous_close_has_no_row() {
        assert!(ScanRow::new("X", 0.0, 100.0).is_none());
    }

    #[test]
    fn void_latest_close_has_no_row() {
        assert!(ScanRow::new("X", 100.0, f64::NAN).is_none());
    }

    proptest! {
        #[test]
        fn line_sign_follows_move(
            previous in 1.0f64..100_000.0,
            latest in 1.0f64..100_000.0,
        ) {
            let row = ScanRow::new("SYM", previous, latest).unwrap();
            let line = row.line();
            prop_assert!(line.starts_with("SYM: close "));
            prop_assert!(line.ends_with('%'));
            let change = line.rsplit("change ").next().unwrap();
            if latest >= previous {
                prop_assert!(change.starts_with('+'));
            } else {
                prop_assert!(change.starts_with('-'));
            }
        }
    }
}
