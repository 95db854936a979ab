//! Symbol Catalog Module
//! Fixed list of supported cryptocurrencies and their Yahoo tickers.

use crate::session::TrackerError;

/// Display name → ticker, in the order shown in the selector.
const SYMBOLS: [(&str, &str); 10] = [
    ("Bitcoin", "BTC-USD"),
    ("Ethereum", "ETH-USD"),
    ("Ripple", "XRP-USD"),
    ("Litecoin", "LTC-USD"),
    ("Cardano", "ADA-USD"),
    ("Solana", "SOL-USD"),
    ("Dogecoin", "DOGE-USD"),
    ("Polkadot", "DOT-USD"),
    ("Chainlink", "LINK-USD"),
    ("Polygon", "MATIC-USD"),
];

/// A resolved catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Symbol {
    pub name: &'static str,
    pub ticker: &'static str,
}

/// Static mapping of human-readable names to exchange tickers.
#[derive(Debug, Clone, Copy, Default)]
pub struct SymbolCatalog;

impl SymbolCatalog {
    pub fn new() -> Self {
        Self
    }

    /// Display names in selector order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> {
        SYMBOLS.iter().map(|(name, _)| *name)
    }

    /// Resolve the user's raw selection text.
    ///
    /// Surrounding whitespace is ignored. An empty selection and a name that
    /// is not in the catalog are reported as distinct errors.
    pub fn resolve(&self, selection: &str) -> Result<Symbol, TrackerError> {
        let selection = selection.trim();
        if selection.is_empty() {
            return Err(TrackerError::NoSelection);
        }

        SYMBOLS
            .iter()
            .find(|(name, _)| *name == selection)
            .map(|&(name, ticker)| Symbol { name, ticker })
            .ok_or_else(|| TrackerError::UnknownSymbol(selection.to_string()))
    }
}
