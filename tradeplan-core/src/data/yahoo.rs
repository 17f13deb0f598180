//! Yahoo Finance data provider.
//!
//! Fetches daily OHLCV bars from Yahoo's v8 chart API and a fundamentals
//! snapshot from the v10 quoteSummary API. One request per endpoint, no
//! retry: failures surface to the caller as-is.
//!
//! Yahoo Finance has no official API and is subject to unannounced format changes.

use super::provider::{DataError, Lookback, MarketDataProvider};
use crate::domain::{Bar, FundamentalsSnapshot, MarketSnapshot, Series};
use chrono::NaiveDate;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

/// Default host for both Yahoo endpoints.
pub const DEFAULT_YAHOO_BASE_URL: &str = "https://query2.finance.yahoo.com";

/// Host that hands out the session cookie the crumb is bound to.
pub const DEFAULT_YAHOO_COOKIE_URL: &str = "https://fc.yahoo.com";

/// Yahoo Finance v8 chart API response.
#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartResult,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    result: Option<Vec<ChartData>>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<QuoteData>,
}

#[derive(Debug, Deserialize)]
struct QuoteData {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<u64>>,
}

/// Yahoo Finance v10 quoteSummary response (only the modules we request).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SummaryResponse {
    quote_summary: SummaryResult,
}

#[derive(Debug, Deserialize)]
struct SummaryResult {
    result: Option<Vec<SummaryModules>>,
    error: Option<ApiError>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SummaryModules {
    #[serde(default)]
    summary_detail: Option<SummaryDetail>,
    #[serde(default)]
    default_key_statistics: Option<KeyStatistics>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SummaryDetail {
    #[serde(default, rename = "trailingPE")]
    trailing_pe: Option<RawValue>,
    #[serde(default)]
    market_cap: Option<RawValue>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct KeyStatistics {
    #[serde(default)]
    price_to_book: Option<RawValue>,
}

/// Yahoo wraps numbers as `{"raw": 1.0, "fmt": "1.00"}`, or `{}` when absent.
#[derive(Debug, Default, Deserialize)]
struct RawValue {
    #[serde(default)]
    raw: Option<f64>,
}

fn raw(value: Option<RawValue>) -> Option<f64> {
    value.and_then(|v| v.raw).filter(|v| v.is_finite())
}

/// Yahoo Finance data provider.
///
/// The client keeps a cookie jar: quoteSummary only answers requests that
/// carry the session cookie from [`DEFAULT_YAHOO_COOKIE_URL`] plus the
/// matching crumb.
pub struct YahooProvider {
    client: reqwest::blocking::Client,
    base_url: String,
    cookie_url: String,
}

impl YahooProvider {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_cookie_url(base_url, DEFAULT_YAHOO_COOKIE_URL)
    }

    pub fn with_cookie_url(base_url: impl Into<String>, cookie_url: impl Into<String>) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
            .cookie_store(true)
            .build()
            .expect("failed to build HTTP client");

        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            cookie_url: cookie_url.into(),
        }
    }

    /// Build the chart API URL for a symbol and date range.
    fn chart_url(&self, symbol: &str, start: NaiveDate, end: NaiveDate) -> String {
        let start_ts = start.and_time(chrono::NaiveTime::default()).and_utc().timestamp();
        let end_ts = end
            .and_hms_opt(23, 59, 59)
            .map(|dt| dt.and_utc().timestamp())
            .unwrap_or(start_ts);
        format!(
            "{}/v8/finance/chart/{symbol}?period1={start_ts}&period2={end_ts}&interval=1d",
            self.base_url
        )
    }

    fn crumb_url(&self) -> String {
        format!("{}/v1/test/getcrumb", self.base_url)
    }

    fn summary_request(&self, symbol: &str, crumb: &str) -> reqwest::blocking::RequestBuilder {
        self.client
            .get(format!("{}/v10/finance/quoteSummary/{symbol}", self.base_url))
            .query(&[
                ("modules", "summaryDetail,defaultKeyStatistics"),
                ("crumb", crumb),
            ])
    }

    fn send(
        &self,
        request: reqwest::blocking::RequestBuilder,
        symbol: &str,
    ) -> Result<reqwest::blocking::Response, DataError> {
        let resp = request
            .send()
            .map_err(|e| DataError::NetworkUnreachable(e.to_string()))?;

        let status = resp.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(DataError::RateLimited);
        }
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(DataError::SymbolNotFound {
                symbol: symbol.to_string(),
            });
        }
        if !status.is_success() {
            return Err(DataError::Other(format!("HTTP {status} for {symbol}")));
        }
        Ok(resp)
    }

    fn fetch_series(&self, symbol: &str, lookback: Lookback) -> Result<Series, DataError> {
        let today = chrono::Local::now().date_naive();
        let (start, end) = lookback.date_range(today);
        let url = self.chart_url(symbol, start, end);
        debug!(%url, "yahoo chart request");
        let resp = self.send(self.client.get(&url), symbol)?;
        let chart: ChartResponse = resp.json().map_err(|e| {
            DataError::ResponseFormatChanged(format!("failed to parse chart for {symbol}: {e}"))
        })?;
        let bars = parse_chart(symbol, chart)?;
        Ok(lookback.trim(Series::new(symbol, bars)))
    }

    /// Session cookie plus crumb handshake required by quoteSummary.
    fn fetch_crumb(&self) -> Result<String, DataError> {
        // The cookie host answers 404 but still sets the session cookie.
        debug!(url = %self.cookie_url, "yahoo session cookie request");
        self.client
            .get(&self.cookie_url)
            .send()
            .map_err(|e| DataError::NetworkUnreachable(e.to_string()))?;

        let url = self.crumb_url();
        debug!(%url, "yahoo crumb request");
        let text = self
            .send(self.client.get(&url), "crumb")?
            .text()
            .map_err(|e| DataError::NetworkUnreachable(e.to_string()))?;
        parse_crumb(&text)
    }

    fn fetch_fundamentals(&self, symbol: &str) -> Result<FundamentalsSnapshot, DataError> {
        let crumb = self.fetch_crumb()?;
        debug!(symbol, "yahoo quoteSummary request");
        let resp = self.send(self.summary_request(symbol, &crumb), symbol)?;
        let summary: SummaryResponse = resp.json().map_err(|e| {
            DataError::ResponseFormatChanged(format!("failed to parse summary for {symbol}: {e}"))
        })?;
        parse_summary(summary)
    }
}

/// A crumb is a short opaque token; anything else means the handshake failed.
fn parse_crumb(body: &str) -> Result<String, DataError> {
    let crumb = body.trim();
    if crumb.is_empty()
        || crumb.len() > 64
        || crumb.contains(|c: char| c.is_whitespace() || c == '<' || c == '{')
    {
        return Err(DataError::ResponseFormatChanged(
            "unexpected crumb response".into(),
        ));
    }
    Ok(crumb.to_string())
}

/// Pair a fetched series with its fundamentals.
///
/// Only a non-empty detail (`Months`) fetch calls `fetch`. A failed call
/// degrades to an all-absent snapshot instead of failing the request.
fn attach_fundamentals<F>(
    symbol: &str,
    series: Series,
    lookback: Lookback,
    fetch: F,
) -> MarketSnapshot
where
    F: FnOnce() -> Result<FundamentalsSnapshot, DataError>,
{
    let fundamentals = match lookback {
        Lookback::Months(_) if !series.is_empty() => match fetch() {
            Ok(snapshot) => {
                if snapshot.is_empty() {
                    debug!(symbol, "provider reported no fundamentals");
                }
                snapshot
            }
            Err(e) => {
                warn!(symbol, error = %e, "fundamentals unavailable");
                FundamentalsSnapshot::default()
            }
        },
        _ => FundamentalsSnapshot::default(),
    };

    MarketSnapshot {
        series,
        fundamentals,
    }
}

/// Parse the chart API response into bars.
///
/// Rows where every OHLCV field is missing (holidays) are skipped. An
/// empty result is returned as an empty vector, not an error.
fn parse_chart(symbol: &str, resp: ChartResponse) -> Result<Vec<Bar>, DataError> {
    let result = match resp.chart.result {
        Some(result) => result,
        None => {
            return match resp.chart.error {
                Some(err) if err.code == "Not Found" => Err(DataError::SymbolNotFound {
                    symbol: symbol.to_string(),
                }),
                Some(err) => Err(DataError::ResponseFormatChanged(format!(
                    "{}: {}",
                    err.code, err.description
                ))),
                None => Ok(Vec::new()),
            };
        }
    };

    let Some(data) = result.into_iter().next() else {
        return Ok(Vec::new());
    };
    // Yahoo omits `timestamp` entirely when the range has no sessions.
    let Some(timestamps) = data.timestamp else {
        return Ok(Vec::new());
    };
    let quote = data
        .indicators
        .quote
        .into_iter()
        .next()
        .ok_or_else(|| DataError::ResponseFormatChanged("no quote data".into()))?;

    let mut bars = Vec::with_capacity(timestamps.len());
    for (i, &ts) in timestamps.iter().enumerate() {
        let date = chrono::DateTime::from_timestamp(ts, 0)
            .map(|dt| dt.naive_utc().date())
            .ok_or_else(|| DataError::ResponseFormatChanged(format!("invalid timestamp: {ts}")))?;

        let open = quote.open.get(i).copied().flatten();
        let high = quote.high.get(i).copied().flatten();
        let low = quote.low.get(i).copied().flatten();
        let close = quote.close.get(i).copied().flatten();
        let volume = quote.volume.get(i).copied().flatten();

        if open.is_none() && high.is_none() && low.is_none() && close.is_none() && volume.is_none()
        {
            continue;
        }

        bars.push(Bar {
            date,
            open: open.unwrap_or(f64::NAN),
            high: high.unwrap_or(f64::NAN),
            low: low.unwrap_or(f64::NAN),
            close: close.unwrap_or(f64::NAN),
            volume: volume.unwrap_or(0),
        });
    }

    let void = bars.iter().filter(|b| b.is_void()).count();
    if void > 0 {
        debug!(symbol, void, "bars with missing prices kept as undefined");
    }

    Ok(bars)
}

fn parse_summary(resp: SummaryResponse) -> Result<FundamentalsSnapshot, DataError> {
    let modules = match resp.quote_summary.result {
        Some(result) => result.into_iter().next().unwrap_or_default(),
        None => {
            return Err(match resp.quote_summary.error {
                Some(err) => {
                    DataError::ResponseFormatChanged(format!("{}: {}", err.code, err.description))
                }
                None => DataError::ResponseFormatChanged("empty summary".into()),
            })
        }
    };

    let detail = modules.summary_detail.unwrap_or_default();
    let stats = modules.default_key_statistics.unwrap_or_default();
    Ok(FundamentalsSnapshot {
        trailing_pe: raw(detail.trailing_pe),
        price_to_book: raw(stats.price_to_book),
        market_cap: raw(detail.market_cap),
    })
}

impl MarketDataProvider for YahooProvider {
    fn name(&self) -> &str {
        "yahoo_finance"
    }

    fn fetch(&self, symbol: &str, lookback: Lookback) -> Result<MarketSnapshot, DataError> {
        let series = self.fetch_series(symbol, lookback)?;
        Ok(attach_fundamentals(symbol, series, lookback, || {
            self.fetch_fundamentals(symbol)
        }))
    }
}
