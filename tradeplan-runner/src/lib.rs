//! TradePlan Runner — configuration, analysis pipeline, watchlist scan, export.
//!
//! This crate builds on `tradeplan-core` to provide:
//! - TOML configuration and per-invocation settings (config + credential)
//! - Explicit `Command` values dispatched by [`execute`]
//! - The detail analysis pipeline (fetch, indicators, prompt, narrative)
//! - The watchlist scan
//! - Narrative and chart artifact export

pub mod config;
pub mod export;
pub mod pipeline;
pub mod request;
pub mod watchlist;

pub use config::{AppConfig, ConfigError, GeminiConfig, Settings, YahooConfig};
pub use export::{
    chart_csv, save_analysis, save_chart_csv, save_narrative, ExportError, SavedArtifacts,
    NARRATIVE_MIME,
};
pub use pipeline::{AnalysisResult, Pipeline, PipelineError, PreparedAnalysis};
pub use request::{AnalysisRequest, Command, Outcome, ScanRequest, SCAN_SESSIONS};
pub use watchlist::{ScanReport, ScanRow, SkippedSymbol};

use tradeplan_core::data::MarketDataProvider;
use tradeplan_core::narrative::NarrativeGenerator;

/// Run one command against the given collaborators.
pub fn execute(
    command: Command,
    settings: &Settings,
    provider: &dyn MarketDataProvider,
    generator: &dyn NarrativeGenerator,
) -> Result<Outcome, PipelineError> {
    Pipeline::new(settings, provider, generator).execute(command)
}
