//! Explicit request and command objects.
//!
//! Every user action is a `Command` value handed to [`crate::execute`], so
//! the pipeline can be driven (and tested) without any UI.

use tradeplan_core::data::Lookback;
use tradeplan_core::prompt::StrategyMode;

use crate::config::AppConfig;
use crate::pipeline::{AnalysisResult, PreparedAnalysis};
use crate::watchlist::ScanReport;

/// Sessions fetched per watchlist symbol (latest and previous).
pub const SCAN_SESSIONS: usize = 2;

/// One detail analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    /// Bare or qualified ticker as typed by the user.
    pub symbol: String,
    pub mode: StrategyMode,
    pub lookback: Lookback,
}

impl AnalysisRequest {
    pub fn new(symbol: impl Into<String>, mode: StrategyMode, lookback_months: u32) -> Self {
        Self {
            symbol: symbol.into(),
            mode,
            lookback: Lookback::Months(lookback_months),
        }
    }

    /// Request using the configured default mode and lookback.
    pub fn from_config(symbol: impl Into<String>, config: &AppConfig) -> Self {
        Self::new(symbol, config.default_mode, config.lookback_months)
    }
}

/// One watchlist scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanRequest {
    pub symbols: Vec<String>,
}

impl ScanRequest {
    pub fn new(symbols: Vec<String>) -> Self {
        Self { symbols }
    }

    /// Scan the configured watchlist.
    pub fn watchlist(config: &AppConfig) -> Self {
        Self::new(config.watchlist.clone())
    }

    pub fn lookback(&self) -> Lookback {
        Lookback::Sessions(SCAN_SESSIONS)
    }
}

/// A user-initiated action.
///
/// `Prepare` followed by `Narrate` is `Analyze` split in two, for front-ends
/// that render the data before the generation call returns.
#[derive(Debug, Clone)]
pub enum Command {
    /// Fetch, compute, and compose; no generation call.
    Prepare(AnalysisRequest),
    /// Generate the plan for an already prepared analysis.
    Narrate(Box<PreparedAnalysis>),
    Analyze(AnalysisRequest),
    Scan(ScanRequest),
}

/// What a completed command produced.
#[derive(Debug, Clone)]
pub enum Outcome {
    Prepared(Box<PreparedAnalysis>),
    Analysis(Box<AnalysisResult>),
    Scan(ScanReport),
}

impl Outcome {
    pub fn into_prepared(self) -> Option<PreparedAnalysis> {
        match self {
            Outcome::Prepared(prepared) => Some(*prepared),
            _ => None,
        }
    }

    pub fn into_analysis(self) -> Option<AnalysisResult> {
        match self {
            Outcome::Analysis(result) => Some(*result),
            _ => None,
        }
    }

    pub fn into_scan(self) -> Option<ScanReport> {
        match self {
            Outcome::Scan(report) => Some(report),
            _ => None,
        }
    }
}
