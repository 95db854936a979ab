//! Price Series Module
//! Daily OHLCV rows for a single ticker and their tabular form.

use chrono::NaiveDate;
use polars::prelude::*;

/// Column names of the exported table, in order.
pub const COLUMNS: [&str; 7] = ["Date", "Open", "High", "Low", "Close", "Adj Close", "Volume"];

/// Format used for the date index in the table.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// One trading day.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub adj_close: Option<f64>,
    pub volume: u64,
}

/// Daily history for one ticker, oldest first.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    pub ticker: String,
    pub bars: Vec<PriceBar>,
}

impl PriceSeries {
    pub fn new(ticker: impl Into<String>, mut bars: Vec<PriceBar>) -> Self {
        bars.sort_by_key(|bar| bar.date);
        Self {
            ticker: ticker.into(),
            bars,
        }
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// (date, close) pairs for plotting.
    pub fn closes(&self) -> impl Iterator<Item = (NaiveDate, f64)> + '_ {
        self.bars.iter().map(|bar| (bar.date, bar.close))
    }

    /// Min and max closing price, or None when empty.
    pub fn close_range(&self) -> Option<(f64, f64)> {
        self.bars.iter().map(|bar| bar.close).fold(None, |acc, close| {
            Some(match acc {
                None => (close, close),
                Some((lo, hi)) => (lo.min(close), hi.max(close)),
            })
        })
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.bars.first().map(|bar| bar.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.bars.last().map(|bar| bar.date)
    }

    /// Build the date-indexed table: Date first, then OHLC, Adj Close, Volume.
    pub fn to_dataframe(&self) -> PolarsResult<DataFrame> {
        let dates: Vec<String> = self
            .bars
            .iter()
            .map(|bar| bar.date.format(DATE_FORMAT).to_string())
            .collect();
        let open: Vec<f64> = self.bars.iter().map(|bar| bar.open).collect();
        let high: Vec<f64> = self.bars.iter().map(|bar| bar.high).collect();
        let low: Vec<f64> = self.bars.iter().map(|bar| bar.low).collect();
        let close: Vec<f64> = self.bars.iter().map(|bar| bar.close).collect();
        let adj_close: Vec<Option<f64>> = self.bars.iter().map(|bar| bar.adj_close).collect();
        let volume: Vec<u64> = self.bars.iter().map(|bar| bar.volume).collect();

        DataFrame::new(vec![
            Column::new(COLUMNS[0].into(), dates),
            Column::new(COLUMNS[1].into(), open),
            Column::new(COLUMNS[2].into(), high),
            Column::new(COLUMNS[3].into(), low),
            Column::new(COLUMNS[4].into(), close),
            Column::new(COLUMNS[5].into(), adj_close),
            Column::new(COLUMNS[6].into(), volume),
        ])
    }
}
