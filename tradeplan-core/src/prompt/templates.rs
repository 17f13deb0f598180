//! Literal prompt templates, one per strategy mode.
//!
//! `{symbol}` is replaced with the bare ticker. Every template ends with
//! [`PLAN_INSTRUCTION`], so each composed prompt asks for both an entry and
//! an exit condition regardless of mode.

use super::StrategyMode;

/// Required entry-side instruction.
pub const BUY_CONDITION_INSTRUCTION: &str =
    "State the BUY condition: the entry price or price zone and the signal that confirms it.";

/// Required exit-side instruction.
pub const SELL_CONDITION_INSTRUCTION: &str =
    "State the SELL condition: a take-profit target and a stop-loss level.";

/// Closing instruction shared by every detail template.
pub const PLAN_INSTRUCTION: &str = "Finish with a concise trading plan.\n\
State the BUY condition: the entry price or price zone and the signal that confirms it.\n\
State the SELL condition: a take-profit target and a stop-loss level.\n\
Base every level on the data block below and say when a figure is not available.";

const AGGRESSIVE: &str = "You are an expert in bandarmology (broker flow) and price action, \
focused on the stock {symbol}.\n\
Analyse whether the recent price move is backed by a surge in volume (a sign of \
accumulation by large players) or by thin volume (a likely false breakout).\n\
Give tight Entry, Take Profit and Stop Loss instructions.";

const CONSERVATIVE: &str = "You are a value investor focused on the fundamentals of {symbol}.\n\
Analyse the margin of safety and the key financial ratios, and say whether the \
current price offers value relative to them.";

const LONG_TERM_GROWTH: &str = "You are a growth investor focused on the future of {symbol}.\n\
Assess the long-term growth prospects and whether the current price trend supports \
accumulating the stock over the coming years.";

/// Persona and analytical focus for a mode, with `{symbol}` still in place.
pub fn persona(mode: StrategyMode) -> &'static str {
    match mode {
        StrategyMode::Aggressive => AGGRESSIVE,
        StrategyMode::Conservative => CONSERVATIVE,
        StrategyMode::LongTermGrowth => LONG_TERM_GROWTH,
    }
}

/// Template used to wrap a watchlist scan.
pub const WATCHLIST_TEMPLATE: &str = "You are a short-term trader reviewing today's \
session for a watchlist of stocks.\n\
Rank the stocks below from most to least attractive for a trade today, and pick \
the best candidates.\n\
For each pick, state the BUY condition (entry price or zone) and the SELL condition \
(take-profit target and stop-loss level).";
