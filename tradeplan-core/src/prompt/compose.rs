//! Prompt composition: template + data block.

use std::fmt;

use super::templates::{persona, PLAN_INSTRUCTION, WATCHLIST_TEMPLATE};
use super::StrategyMode;
use crate::domain::{FundamentalsSnapshot, MarketCap, Ratio};
use crate::indicators::IndicatorSet;

/// Placeholder for a technical value that could not be computed.
pub const UNDEFINED: &str = "not available";

/// Display adapter for an optional price: two decimals or [`UNDEFINED`].
pub struct Price(pub Option<f64>);

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(v) if v.is_finite() => write!(f, "{v:.2}"),
            _ => f.write_str(UNDEFINED),
        }
    }
}

/// Display adapter for an optional percent change: signed, two decimals.
pub struct Percent(pub Option<f64>);

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(v) if v.is_finite() => write!(f, "{v:+.2}%"),
            _ => f.write_str(UNDEFINED),
        }
    }
}

/// Compose the detail-analysis prompt.
///
/// Output depends only on the arguments.
pub fn compose(
    mode: StrategyMode,
    symbol: &str,
    indicators: &IndicatorSet,
    fundamentals: &FundamentalsSnapshot,
) -> String {
    let mut out = persona(mode).replace("{symbol}", symbol);
    out.push_str("\n\n");
    out.push_str(PLAN_INSTRUCTION);
    out.push_str("\n\n");
    out.push_str(&data_block(symbol, indicators, fundamentals).join("\n"));
    out
}

/// Data block lines, in prompt order.
fn data_block(
    symbol: &str,
    ind: &IndicatorSet,
    fundamentals: &FundamentalsSnapshot,
) -> Vec<String> {
    let volume = match ind.last_volume {
        Some(v) => v.to_string(),
        None => UNDEFINED.to_string(),
    };
    vec![
        format!("Data for {symbol}:"),
        format!("- Current price: {}", Price(ind.last_close)),
        format!("- Day change: {}", Percent(ind.change_pct())),
        format!("- Latest volume: {volume}"),
        format!("- Support (windowed low): {}", Price(ind.windowed_low)),
        format!("- Resistance (windowed high): {}", Price(ind.windowed_high)),
        format!("- MA20: {}", Price(ind.ma20)),
        format!("- MA50: {}", Price(ind.ma50)),
        format!("- P/E (trailing): {}", Ratio(fundamentals.trailing_pe)),
        format!("- Price to book: {}", Ratio(fundamentals.price_to_book)),
        format!("- Market cap: {}", MarketCap(fundamentals.market_cap)),
    ]
}

/// Wrap watchlist scan lines into the recommendation prompt.
pub fn compose_watchlist(lines: &[String]) -> String {
    let mut out = String::from(WATCHLIST_TEMPLATE);
    out.push_str("\n\nToday's moves:\n");
    out.push_str(&lines.join("\n"));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::{BUY_CONDITION_INSTRUCTION, SELL_CONDITION_INSTRUCTION};

    fn full_set() -> IndicatorSet {
        IndicatorSet {
            ma20: Some(8950.5),
            ma50: Some(8800.0),
            windowed_high: Some(9100.0),
            windowed_low: Some(8700.0),
            last_close: Some(9000.0),
            previous_close: Some(8900.0),
            last_volume: Some(41_000_000),
        }
    }

    #[test]
    fn every_mode_asks_for_buy_and_sell() {
        for mode in StrategyMode::ALL {
            let prompt = compose(mode, "BBCA", &full_set(), &FundamentalsSnapshot::default());
            assert!(prompt.contains(BUY_CONDITION_INSTRUCTION), "{mode}");
            assert!(prompt.contains(SELL_CONDITION_INSTRUCTION), "{mode}");
        }
    }

    #[test]
    fn data_block_renders_values() {
        let fundamentals = FundamentalsSnapshot {
            trailing_pe: Some(24.317),
            price_to_book: Some(4.6),
            market_cap: Some(1.1e15),
        };
        let prompt = compose(StrategyMode::Aggressive, "BBCA", &full_set(), &fundamentals);
        assert!(prompt.contains("stock BBCA"));
        assert!(prompt.contains("- Current price: 9000.00"));
        assert!(prompt.contains("- Day change: +1.12%"));
        assert!(prompt.contains("- Support (windowed low): 8700.00"));
        assert!(prompt.contains("- Resistance (windowed high): 9100.00"));
        assert!(prompt.contains("- MA20: 8950.50"));
        assert!(prompt.contains("- Latest volume: 41000000"));
        assert!(prompt.contains("- P/E (trailing): 24.32"));
        assert!(prompt.contains("- Market cap: 1100.00T"));
    }

    #[test]
    fn data_block_closes_the_prompt_in_order() {
        let prompt = compose(StrategyMode::Aggressive, "BBCA", &full_set(), &Default::default());
        let tail: Vec<&str> = prompt.lines().rev().take(11).collect();
        assert_eq!(tail.len(), 11);
        assert_eq!(tail[10], "Data for BBCA:");
        assert_eq!(tail[7], "- Latest volume: 41000000");
        assert_eq!(tail[3], "- MA50: 8800.00");
        assert_eq!(tail[0], "- Market cap: N/A");
        assert!(!prompt.ends_with('\n'));
    }

    #[test]
    fn undefined_values_use_placeholders() {
        let prompt = compose(
            StrategyMode::LongTermGrowth,
            "GOTO",
            &IndicatorSet::default(),
            &FundamentalsSnapshot::default(),
        );
        assert!(prompt.contains("- MA20: not available"));
        assert!(prompt.contains("- Support (windowed low): not available"));
        assert!(prompt.contains("- P/E (trailing): N/A"));
        assert!(prompt.contains("- Price to book: N/A"));
        assert!(prompt.contains("- Market cap: N/A"));
        assert!(!prompt.contains("0.00"));
    }

    #[test]
    fn compose_is_deterministic() {
        let a = compose(StrategyMode::Conservative, "BBRI", &full_set(), &Default::default());
        let b = compose(StrategyMode::Conservative, "BBRI", &full_set(), &Default::default());
        assert_eq!(a, b);
    }

    #[test]
    fn modes_differ_in_persona() {
        let set = full_set();
        let f = FundamentalsSnapshot::default();
        let aggressive = compose(StrategyMode::Aggressive, "BBCA", &set, &f);
        let conservative = compose(StrategyMode::Conservative, "BBCA", &set, &f);
        assert_ne!(aggressive, conservative);
        assert!(conservative.contains("margin of safety"));
    }

    #[test]
    fn watchlist_prompt_keeps_line_order() {
        let lines = vec![
            "BBCA: close 9000.00, change +1.12%".to_string(),
            "TLKM: close 3100.00, change -0.64%".to_string(),
        ];
        let prompt = compose_watchlist(&lines);
        let a = prompt.find("BBCA").unwrap();
        let t = prompt.find("TLKM").unwrap();
        assert!(a < t);
        assert!(prompt.contains("BUY condition"));
        assert!(prompt.contains("SELL condition"));
    }
}
