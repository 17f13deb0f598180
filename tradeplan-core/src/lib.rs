//! TradePlan Core — domain types, market data, indicators, prompts, narrative generation.
//!
//! This crate contains everything one analysis needs except orchestration:
//! - Domain types (bars, series, fundamentals)
//! - Ticker normalization and the market data provider trait (Yahoo Finance)
//! - Indicators: moving averages and windowed support/resistance
//! - Strategy templates and prompt composition
//! - The narrative generator trait (Google Gemini)

pub mod data;
pub mod domain;
pub mod indicators;
pub mod narrative;
pub mod prompt;
