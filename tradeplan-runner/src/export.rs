//! Artifact export — narrative text file and chart CSV.
//!
//! File names carry the bare symbol and a caller-supplied date so the
//! pipeline itself never reads the clock:
//! - `Analysis_{SYMBOL}_{YYYYMMDD}.txt` (text/plain)
//! - `Chart_{SYMBOL}_{YYYYMMDD}.csv`

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use thiserror::Error;
use tracing::info;

use tradeplan_core::domain::Series;
use tradeplan_core::indicators::Overlay;

use crate::pipeline::AnalysisResult;

/// MIME type of the saved narrative.
pub const NARRATIVE_MIME: &str = "text/plain";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("CSV output is not UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Paths written by [`save_analysis`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedArtifacts {
    pub narrative: PathBuf,
    pub chart: PathBuf,
}

// ─── File names ─────────────────────────────────────────────────────

pub fn narrative_file_name(symbol: &str, date: NaiveDate) -> String {
    format!("Analysis_{}_{}.txt", symbol, date.format("%Y%m%d"))
}

pub fn chart_file_name(symbol: &str, date: NaiveDate) -> String {
    format!("Chart_{}_{}.csv", symbol, date.format("%Y%m%d"))
}

// ─── Narrative ──────────────────────────────────────────────────────

/// Write the narrative as plain text into `dir`, returning the file path.
pub fn save_narrative(
    dir: &Path,
    symbol: &str,
    date: NaiveDate,
    text: &str,
) -> Result<PathBuf, ExportError> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(narrative_file_name(symbol, date));
    std::fs::write(&path, text)?;
    info!(path = %path.display(), "narrative saved");
    Ok(path)
}

// ─── Chart CSV ──────────────────────────────────────────────────────

fn cell(value: Option<f64>) -> String {
    value.map(|v| format!("{v:.4}")).unwrap_or_default()
}

/// Render bars plus MA overlay as CSV.
///
/// Columns: date, open, high, low, close, volume, ma20, ma50. An undefined
/// moving average is an empty cell.
pub fn chart_csv(series: &Series, overlay: &Overlay) -> Result<String, ExportError> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["date", "open", "high", "low", "close", "volume", "ma20", "ma50"])?;

    for (i, bar) in series.bars().iter().enumerate() {
        wtr.write_record([
            bar.date.to_string(),
            format!("{:.4}", bar.open),
            format!("{:.4}", bar.high),
            format!("{:.4}", bar.low),
            format!("{:.4}", bar.close),
            bar.volume.to_string(),
            cell(overlay.ma20.get(i).copied().flatten()),
            cell(overlay.ma50.get(i).copied().flatten()),
        ])?;
    }

    let bytes = wtr.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8(bytes)?)
}

pub fn save_chart_csv(
    dir: &Path,
    symbol: &str,
    date: NaiveDate,
    series: &Series,
    overlay: &Overlay,
) -> Result<PathBuf, ExportError> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(chart_file_name(symbol, date));
    std::fs::write(&path, chart_csv(series, overlay)?)?;
    info!(path = %path.display(), "chart data saved");
    Ok(path)
}

/// Save both artifacts of a finished analysis.
pub fn save_analysis(
    dir: &Path,
    result: &AnalysisResult,
    date: NaiveDate,
) -> Result<SavedArtifacts, ExportError> {
    let prepared = &result.prepared;
    Ok(SavedArtifacts {
        narrative: save_narrative(dir, &prepared.symbol, date, &result.narrative)?,
        chart: save_chart_csv(dir, &prepared.symbol, date, &prepared.series, &prepared.overlay)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tradeplan_core::domain::Bar;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn file_names_use_compact_date() {
        assert_eq!(
            narrative_file_name("BBCA", d(2024, 3, 5)),
            "Analysis_BBCA_20240305.txt"
        );
        assert_eq!(chart_file_name("TLKM", d(2024, 12, 31)), "Chart_TLKM_20241231.csv");
    }

    #[test]
    fn chart_csv_leaves_undefined_cells_empty() {
        let bars = vec![
            Bar {
                date: d(2024, 3, 1),
                open: 100.0,
                high: 110.0,
                low: 95.0,
                close: 105.0,
                volume: 1_000,
            },
            Bar {
                date: d(2024, 3, 4),
                open: 105.0,
                high: 112.0,
                low: 101.0,
                close: 110.0,
                volume: 2_000,
            },
        ];
        let series = Series::new("X.JK", bars);
        let overlay = Overlay {
            ma20: vec![None, Some(107.5)],
            ma50: vec![None, None],
        };
        let csv = chart_csv(&series, &overlay).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "date,open,high,low,close,volume,ma20,ma50");
        assert_eq!(lines[1], "2024-03-01,100.0000,110.0000,95.0000,105.0000,1000,,");
        assert_eq!(lines[2], "2024-03-04,105.0000,112.0000,101.0000,110.0000,2000,107.5000,");
    }

    #[test]
    fn empty_series_is_header_only() {
        let csv = chart_csv(&Series::empty("X"), &Overlay::default()).unwrap();
        assert_eq!(csv.lines().count(), 1);
    }
}
