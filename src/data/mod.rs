//! Data module - symbol catalog, price history fetching and CSV export

mod catalog;
mod export;
mod provider;
pub(crate) mod series;
mod yahoo;

pub use catalog::{Symbol, SymbolCatalog};
pub use export::{CsvExporter, ExportError};
pub use provider::{FetchError, HistoryRequest, PriceSource};
pub use series::{PriceBar, PriceSeries, COLUMNS, DATE_FORMAT};
pub use yahoo::{decode_response, parse_chart_response, YahooFinanceClient, DEFAULT_BASE_URL};
