//! Price source abstraction.
//!
//! [`PriceSource`] is the seam between the session controller and whatever
//! market-data backend answers history requests. The production backend is
//! [`YahooFinanceClient`](super::YahooFinanceClient); tests plug in an
//! in-memory source instead.

use crate::data::PriceSeries;
use thiserror::Error;

/// Errors raised while talking to a market-data provider.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network failure, timeout, or undecodable body.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The provider answered with an error of its own.
    #[error("{code}: {description}")]
    Api { code: String, description: String },

    /// Non-success HTTP status without a usable error body.
    #[error("provider returned HTTP {0}")]
    Status(u16),

    /// The body was not the expected JSON shape.
    #[error("malformed response: {0}")]
    Malformed(#[from] serde_json::Error),

    /// Could not build the HTTP client.
    #[error("client setup failed: {0}")]
    Client(String),
}

/// Trailing window and bar size of a history request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRequest {
    /// Provider range token, e.g. "1mo".
    pub range: String,
    /// Provider interval token, e.g. "1d".
    pub interval: String,
}

impl Default for HistoryRequest {
    fn default() -> Self {
        Self {
            range: "1mo".to_string(),
            interval: "1d".to_string(),
        }
    }
}

/// Anything that can answer "give me the recent history for this ticker".
///
/// Implementations block until the provider answers. They are shared with a
/// worker thread, hence `Send + Sync`.
pub trait PriceSource: Send + Sync {
    fn fetch_history(
        &self,
        ticker: &str,
        request: &HistoryRequest,
    ) -> Result<PriceSeries, FetchError>;
}
