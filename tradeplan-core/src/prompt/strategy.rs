//! Strategy modes selectable for an analysis.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Investing style that selects the prompt template.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StrategyMode {
    /// Breakout and volume-driven momentum.
    #[default]
    Aggressive,
    /// Value investing with a margin of safety.
    Conservative,
    /// Long-term growth.
    LongTermGrowth,
}

impl StrategyMode {
    pub const ALL: [StrategyMode; 3] = [
        StrategyMode::Aggressive,
        StrategyMode::Conservative,
        StrategyMode::LongTermGrowth,
    ];

    /// Stable machine label (used on the command line and in config).
    pub fn label(self) -> &'static str {
        match self {
            StrategyMode::Aggressive => "aggressive",
            StrategyMode::Conservative => "conservative",
            StrategyMode::LongTermGrowth => "long-term-growth",
        }
    }

    /// Human-readable title.
    pub fn title(self) -> &'static str {
        match self {
            StrategyMode::Aggressive => "Aggressive (Breakout & Volume Flow)",
            StrategyMode::Conservative => "Conservative (Value Investing)",
            StrategyMode::LongTermGrowth => "Long-Term (Growth)",
        }
    }
}

impl fmt::Display for StrategyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown strategy mode '{0}'. Valid: aggressive, conservative, long-term-growth")]
pub struct UnknownStrategyMode(pub String);

impl FromStr for StrategyMode {
    type Err = UnknownStrategyMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "aggressive" | "agresif" | "momentum" => Ok(StrategyMode::Aggressive),
            "conservative" | "konservatif" | "value" => Ok(StrategyMode::Conservative),
            "long-term-growth" | "long-term" | "growth" | "jangka-panjang" => {
                Ok(StrategyMode::LongTermGrowth)
            }
            _ => Err(UnknownStrategyMode(s.to_string())),
        }
    }
}
