//! In-memory collaborators shared by the runner integration tests.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use chrono::{Duration, NaiveDate};
use secrecy::{ExposeSecret, SecretString};
use tradeplan_core::data::{DataError, Lookback, MarketDataProvider};
use tradeplan_core::domain::{Bar, FundamentalsSnapshot, MarketSnapshot, Series};
use tradeplan_core::narrative::{GenerationError, NarrativeGenerator};
use tradeplan_runner::{AppConfig, Settings};

/// Daily bars with the given closes, one calendar day apart.
pub fn bars(closes: &[f64]) -> Vec<Bar> {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| Bar {
            date: start + Duration::days(i as i64),
            open: close,
            high: close + 50.0,
            low: close - 50.0,
            close,
            volume: 1_000_000 + i as u64,
        })
        .collect()
}

pub fn settings_with_key() -> Settings {
    Settings::new(AppConfig::default(), Some("test-key".into()))
}

pub fn settings_without_key() -> Settings {
    Settings::new(AppConfig::default(), None)
}

pub enum Canned {
    Bars(Vec<Bar>, FundamentalsSnapshot),
    NotFound,
    Unreachable,
}

/// Provider answering from a fixed table keyed by qualified symbol.
#[derive(Default)]
pub struct MockProvider {
    table: HashMap<String, Canned>,
    pub calls: Cell<usize>,
    pub requested: RefCell<Vec<(String, Lookback)>>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bars(mut self, symbol: &str, closes: &[f64]) -> Self {
        self.table.insert(
            symbol.to_string(),
            Canned::Bars(bars(closes), FundamentalsSnapshot::default()),
        );
        self
    }

    pub fn with_fundamentals(
        mut self,
        symbol: &str,
        closes: &[f64],
        fundamentals: FundamentalsSnapshot,
    ) -> Self {
        self.table
            .insert(symbol.to_string(), Canned::Bars(bars(closes), fundamentals));
        self
    }

    pub fn with(mut self, symbol: &str, canned: Canned) -> Self {
        self.table.insert(symbol.to_string(), canned);
        self
    }
}

impl MarketDataProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    fn fetch(&self, symbol: &str, lookback: Lookback) -> Result<MarketSnapshot, DataError> {
        self.calls.set(self.calls.get() + 1);
        self.requested
            .borrow_mut()
            .push((symbol.to_string(), lookback));
        match self.table.get(symbol) {
            Some(Canned::Bars(bars, fundamentals)) => Ok(MarketSnapshot {
                series: Series::new(symbol, bars.clone()),
                fundamentals: *fundamentals,
            }),
            Some(Canned::NotFound) => Err(DataError::SymbolNotFound {
                symbol: symbol.to_string(),
            }),
            Some(Canned::Unreachable) => {
                Err(DataError::NetworkUnreachable("connection refused".into()))
            }
            None => Ok(MarketSnapshot {
                series: Series::empty(symbol),
                fundamentals: FundamentalsSnapshot::default(),
            }),
        }
    }
}

/// Generator that records prompts and echoes a fixed reply or failure.
pub struct MockGenerator {
    reply: Option<String>,
    pub prompts: RefCell<Vec<String>>,
    pub keys: RefCell<Vec<String>>,
}

impl MockGenerator {
    pub fn replying(text: &str) -> Self {
        Self {
            reply: Some(text.to_string()),
            prompts: RefCell::new(Vec::new()),
            keys: RefCell::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            reply: None,
            prompts: RefCell::new(Vec::new()),
            keys: RefCell::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.prompts.borrow().len()
    }
}

impl NarrativeGenerator for MockGenerator {
    fn name(&self) -> &str {
        "mock"
    }

    fn generate(&self, api_key: &SecretString, prompt: &str) -> Result<String, GenerationError> {
        self.prompts.borrow_mut().push(prompt.to_string());
        self.keys
            .borrow_mut()
            .push(api_key.expose_secret().to_string());
        match &self.reply {
            Some(text) => Ok(text.clone()),
            None => Err(GenerationError::Api {
                status: 429,
                message: "quota exceeded".into(),
            }),
        }
    }
}
