//! Analysis pipeline — wires together fetch, indicators, prompt, and narrative.
//!
//! Entry points:
//! - `Pipeline::prepare()`: fetch + compute + compose. No generation call.
//! - `Pipeline::narrate()`: one generation call for a prepared analysis.
//! - `Pipeline::analyze()`: both, for callers that don't render in between.
//! - `Pipeline::execute()`: dispatch a [`Command`].
//!
//! The credential is checked before anything touches the network. Nothing
//! is cached; every call re-fetches and re-computes.

use thiserror::Error;
use tracing::info;

use tradeplan_core::data::{bare_symbol, normalize, DataError, MarketDataProvider};
use tradeplan_core::domain::{FundamentalsSnapshot, Series};
use tradeplan_core::indicators::{self, IndicatorSet, Overlay};
use tradeplan_core::narrative::{GenerationError, NarrativeGenerator};
use tradeplan_core::prompt::{compose, StrategyMode};

use secrecy::SecretString;

use crate::config::Settings;
use crate::request::{AnalysisRequest, Command, Outcome, ScanRequest};
use crate::watchlist::{self, ScanReport, SkippedSymbol};

/// Errors from one pipeline invocation.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("no API key supplied: pass --api-key or set GEMINI_API_KEY")]
    MissingCredential,

    #[error("no price data found for {symbol}")]
    DataUnavailable { symbol: String },

    #[error("market data error: {0}")]
    Data(#[from] DataError),

    #[error("narrative generation failed: {0}")]
    Generation(#[from] GenerationError),

    #[error("watchlist scan produced no data ({} symbol(s) skipped)", skipped.len())]
    ScanFailed { skipped: Vec<SkippedSymbol> },
}

/// Everything computed for a detail analysis before the generation call.
#[derive(Debug, Clone)]
pub struct PreparedAnalysis {
    /// Bare ticker, e.g. "BBCA".
    pub symbol: String,
    /// Provider symbol, e.g. "BBCA.JK".
    pub qualified_symbol: String,
    pub mode: StrategyMode,
    pub series: Series,
    pub indicators: IndicatorSet,
    pub overlay: Overlay,
    pub fundamentals: FundamentalsSnapshot,
    pub prompt: String,
}

/// A finished detail analysis. Lives for one rendering cycle.
#[derive(Debug, Clone)]
pub struct AnalysisResult {
    pub prepared: PreparedAnalysis,
    pub narrative: String,
}

impl AnalysisResult {
    pub fn symbol(&self) -> &str {
        &self.prepared.symbol
    }
}

/// One configured pipeline. Holds only borrowed, read-only state.
pub struct Pipeline<'a> {
    settings: &'a Settings,
    provider: &'a dyn MarketDataProvider,
    generator: &'a dyn NarrativeGenerator,
}

impl<'a> Pipeline<'a> {
    pub fn new(
        settings: &'a Settings,
        provider: &'a dyn MarketDataProvider,
        generator: &'a dyn NarrativeGenerator,
    ) -> Self {
        Self {
            settings,
            provider,
            generator,
        }
    }

    fn api_key(&self) -> Result<&SecretString, PipelineError> {
        self.settings
            .api_key
            .as_ref()
            .ok_or(PipelineError::MissingCredential)
    }

    /// Fetch, compute, and compose for one request.
    pub fn prepare(&self, req: &AnalysisRequest) -> Result<PreparedAnalysis, PipelineError> {
        self.api_key()?;

        let config = &self.settings.config;
        let qualified = normalize(&req.symbol, &config.exchange_suffix);
        let symbol = bare_symbol(&qualified, &config.exchange_suffix).to_string();

        info!(symbol = %qualified, mode = %req.mode, provider = self.provider.name(), "fetching market data");
        let snapshot = match self.provider.fetch(&qualified, req.lookback) {
            Ok(snapshot) => snapshot,
            Err(DataError::SymbolNotFound { .. }) => {
                return Err(PipelineError::DataUnavailable { symbol: qualified })
            }
            Err(e) => return Err(e.into()),
        };
        if snapshot.series.is_empty() {
            return Err(PipelineError::DataUnavailable { symbol: qualified });
        }

        let series = snapshot.series;
        let indicators = indicators::compute(&series, config.sr_window);
        let overlay = indicators::overlay(&series);
        let prompt = compose(req.mode, &symbol, &indicators, &snapshot.fundamentals);
        info!(symbol = %qualified, bars = series.len(), "indicators computed");

        Ok(PreparedAnalysis {
            symbol,
            qualified_symbol: qualified,
            mode: req.mode,
            series,
            indicators,
            overlay,
            fundamentals: snapshot.fundamentals,
            prompt,
        })
    }

    /// Ask the generator for the trading plan of a prepared analysis.
    pub fn narrate(&self, prepared: &PreparedAnalysis) -> Result<String, PipelineError> {
        let api_key = self.api_key()?;
        info!(symbol = %prepared.qualified_symbol, generator = self.generator.name(), "requesting narrative");
        Ok(self.generator.generate(api_key, &prepared.prompt)?)
    }

    /// Run the whole detail pipeline.
    pub fn analyze(&self, req: &AnalysisRequest) -> Result<AnalysisResult, PipelineError> {
        let prepared = self.prepare(req)?;
        let narrative = self.narrate(&prepared)?;
        Ok(AnalysisResult {
            prepared,
            narrative,
        })
    }

    /// Scan symbols for day-over-day moves and request a recommendation.
    pub fn scan(&self, req: &ScanRequest) -> Result<ScanReport, PipelineError> {
        let api_key = self.api_key()?;
        let collected = watchlist::collect(req, &self.settings.config, self.provider);
        watchlist::summarize(collected, api_key, self.generator)
    }

    /// Dispatch a command to the matching pipeline entry point.
    pub fn execute(&self, command: Command) -> Result<Outcome, PipelineError> {
        match command {
            Command::Prepare(req) => self
                .prepare(&req)
                .map(|p| Outcome::Prepared(Box::new(p))),
            Command::Narrate(prepared) => {
                let narrative = self.narrate(&prepared)?;
                Ok(Outcome::Analysis(Box::new(AnalysisResult {
                    prepared: *prepared,
                    narrative,
                })))
            }
            Command::Analyze(req) => self
                .analyze(&req)
                .map(|r| Outcome::Analysis(Box::new(r))),
            Command::Scan(req) => self.scan(&req).map(Outcome::Scan),
        }
    }
}
