//! Yahoo Finance chart API client.

use crate::data::{FetchError, HistoryRequest, PriceBar, PriceSeries, PriceSource};
use chrono::DateTime;
use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";

// The chart endpoint rejects requests without a browser-like agent.
const USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

#[derive(Deserialize, Debug)]
struct ChartEnvelope {
    chart: ChartBody,
}

#[derive(Deserialize, Debug)]
struct ChartBody {
    result: Option<Vec<ChartResult>>,
    error: Option<ChartError>,
}

#[derive(Deserialize, Debug)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Deserialize, Debug)]
struct ChartResult {
    meta: ChartMeta,
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: Indicators,
}

#[derive(Deserialize, Debug)]
struct ChartMeta {
    symbol: Option<String>,
    #[serde(default)]
    gmtoffset: i64,
}

#[derive(Deserialize, Debug)]
struct Indicators {
    #[serde(default)]
    quote: Vec<Quote>,
    #[serde(default)]
    adjclose: Vec<AdjClose>,
}

#[derive(Deserialize, Debug, Default)]
struct Quote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<f64>>,
}

#[derive(Deserialize, Debug)]
struct AdjClose {
    #[serde(default)]
    adjclose: Vec<Option<f64>>,
}

/// Blocking client for `/v8/finance/chart/{ticker}`.
pub struct YahooFinanceClient {
    client: Client,
    base_url: String,
}

impl YahooFinanceClient {
    /// Build a client against `base_url`. `timeout` of None keeps the
    /// reqwest default.
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> Result<Self, FetchError> {
        let mut builder = Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn chart_url(&self, ticker: &str) -> String {
        format!("{}/v8/finance/chart/{}", self.base_url, ticker)
    }
}

impl PriceSource for YahooFinanceClient {
    fn fetch_history(
        &self,
        ticker: &str,
        request: &HistoryRequest,
    ) -> Result<PriceSeries, FetchError> {
        let query = [
            ("range", request.range.as_str()),
            ("interval", request.interval.as_str()),
            ("includePrePost", "false"),
            ("events", "div,splits"),
        ];

        log::debug!("GET {} {:?}", self.chart_url(ticker), query);
        let response = self.client.get(self.chart_url(ticker)).query(&query).send()?;
        let status = response.status();
        let body = response.text()?;

        decode_response(ticker, status, &body)
    }
}

/// Map an HTTP status and body to a series or a provider error.
///
/// On failure statuses a Yahoo error body wins over the bare status code.
pub fn decode_response(
    ticker: &str,
    status: StatusCode,
    body: &str,
) -> Result<PriceSeries, FetchError> {
    let parsed = parse_chart_response(ticker, body);
    if status.is_success() {
        return parsed;
    }

    // Yahoo reports unknown symbols as 404 with a JSON error body.
    match parsed {
        Err(err @ FetchError::Api { .. }) => Err(err),
        _ => Err(FetchError::Status(status.as_u16())),
    }
}

/// Decode a chart API body into a series.
///
/// Rows missing any of open/high/low/close are dropped, a missing volume
/// counts as zero. A body with no result yields an empty series.
pub fn parse_chart_response(ticker: &str, body: &str) -> Result<PriceSeries, FetchError> {
    let envelope: ChartEnvelope = serde_json::from_str(body)?;

    if let Some(error) = envelope.chart.error {
        return Err(FetchError::Api {
            code: error.code,
            description: error.description,
        });
    }

    let Some(result) = envelope.chart.result.and_then(|r| r.into_iter().next()) else {
        return Ok(PriceSeries::new(ticker, Vec::new()));
    };

    let ticker = result.meta.symbol.unwrap_or_else(|| ticker.to_string());
    let offset = result.meta.gmtoffset;
    let quote = result.indicators.quote.into_iter().next().unwrap_or_default();
    let adjclose = result
        .indicators
        .adjclose
        .into_iter()
        .next()
        .map(|a| a.adjclose)
        .unwrap_or_default();

    let value = |column: &[Option<f64>], i: usize| column.get(i).copied().flatten();

    let bars = result
        .timestamp
        .iter()
        .enumerate()
        .filter_map(|(i, &ts)| {
            let date = DateTime::from_timestamp(ts + offset, 0)?.date_naive();
            Some(PriceBar {
                date,
                open: value(&quote.open, i)?,
                high: value(&quote.high, i)?,
                low: value(&quote.low, i)?,
                close: value(&quote.close, i)?,
                adj_close: value(&adjclose, i),
                volume: value(&quote.volume, i).map(|v| v.max(0.0) as u64).unwrap_or(0),
            })
        })
        .collect();

    Ok(PriceSeries::new(ticker, bars))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const BTC_BODY: &str = r#"{
        "chart": {
            "result": [{
                "meta": {"currency": "USD", "symbol": "BTC-USD", "gmtoffset": 0},
                "timestamp": [1709251200, 1709337600, 1709424000],
                "indicators": {
                    "quote": [{
                        "open":   [61000.5, 62000.0, null],
                        "high":   [63000.0, 62500.0, null],
                        "low":    [60000.0, 61000.0, null],
                        "close":  [62400.0, 62050.0, null],
                        "volume": [31000000000, null, null]
                    }],
                    "adjclose": [{"adjclose": [62400.0, 62050.0, null]}]
                }
            }],
            "error": null
        }
    }"#;

    #[test]
    fn parses_daily_bars_and_drops_empty_rows() {
        let series = parse_chart_response("BTC-USD", BTC_BODY).unwrap();

        assert_eq!(series.ticker, "BTC-USD");
        assert_eq!(series.len(), 2);
        assert_eq!(series.bars[0].date, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert_eq!(series.bars[0].close, 62400.0);
        assert_eq!(series.bars[0].volume, 31_000_000_000);
        assert_eq!(series.bars[1].volume, 0);
        assert_eq!(series.bars[1].adj_close, Some(62050.0));
    }

    #[test]
    fn gmt_offset_shifts_the_calendar_date() {
        let body = r#"{"chart":{"result":[{
            "meta":{"symbol":"X","gmtoffset":-18000},
            "timestamp":[1709251200],
            "indicators":{"quote":[{"open":[1.0],"high":[1.0],"low":[1.0],"close":[1.0],"volume":[1]}]}
        }],"error":null}}"#;

        let series = parse_chart_response("X", body).unwrap();
        assert_eq!(series.bars[0].date, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
        assert_eq!(series.bars[0].adj_close, None);
    }

    #[test]
    fn provider_error_is_surfaced() {
        let body = r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found, symbol may be delisted"}}}"#;

        let err = parse_chart_response("NOPE-USD", body).unwrap_err();
        assert!(matches!(err, FetchError::Api { ref code, .. } if code == "Not Found"));
        assert_eq!(err.to_string(), "Not Found: No data found, symbol may be delisted");
    }

    #[test]
    fn missing_result_is_an_empty_series() {
        let body = r#"{"chart":{"result":[],"error":null}}"#;
        let series = parse_chart_response("ADA-USD", body).unwrap();
        assert!(series.is_empty());
        assert_eq!(series.ticker, "ADA-USD");
    }

    #[test]
    fn garbage_body_is_malformed() {
        let err = parse_chart_response("BTC-USD", "<html>rate limited</html>").unwrap_err();
        assert!(matches!(err, FetchError::Malformed(_)));
    }

    #[test]
    fn not_found_body_becomes_provider_error() {
        let body = r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found, symbol may be delisted"}}}"#;

        let err = decode_response("NOPE-USD", StatusCode::NOT_FOUND, body).unwrap_err();
        assert!(matches!(err, FetchError::Api { ref code, .. } if code == "Not Found"));
    }

    #[test]
    fn rate_limit_text_becomes_status_error() {
        let err = decode_response("BTC-USD", StatusCode::TOO_MANY_REQUESTS, "Too Many Requests")
            .unwrap_err();
        assert!(matches!(err, FetchError::Status(429)));
        assert_eq!(err.to_string(), "provider returned HTTP 429");
    }

    #[test]
    fn server_error_with_chart_body_is_still_a_status_error() {
        let err = decode_response("BTC-USD", StatusCode::INTERNAL_SERVER_ERROR, BTC_BODY)
            .unwrap_err();
        assert!(matches!(err, FetchError::Status(500)));
    }

    #[test]
    fn success_status_returns_the_series() {
        let series = decode_response("BTC-USD", StatusCode::OK, BTC_BODY).unwrap();
        assert_eq!(series.len(), 2);
    }

    #[test]
    fn base_url_trailing_slash_is_ignored() {
        let client = YahooFinanceClient::new("http://localhost:9/", None).unwrap();
        assert_eq!(client.chart_url("ETH-USD"), "http://localhost:9/v8/finance/chart/ETH-USD");
    }
}
