//! Domain types for TradePlan

pub mod bar;
pub mod fundamentals;
pub mod series;

pub use bar::Bar;
pub use fundamentals::{FundamentalsSnapshot, MarketCap, Ratio, NOT_AVAILABLE};
pub use series::Series;

/// Everything one market data fetch returns for a symbol.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarketSnapshot {
    pub series: Series,
    pub fundamentals: FundamentalsSnapshot,
}
