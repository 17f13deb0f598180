//! Prompt composition for the narrative generator.

pub mod compose;
pub mod strategy;
pub mod templates;

pub use compose::{compose, compose_watchlist, Percent, Price, UNDEFINED};
pub use strategy::{StrategyMode, UnknownStrategyMode};
pub use templates::{BUY_CONDITION_INSTRUCTION, PLAN_INSTRUCTION, SELL_CONDITION_INSTRUCTION};
