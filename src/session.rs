//! Session state and the actions the control window triggers.
//!
//! [`TrackerController`] owns the last-fetched snapshot and runs the three
//! user actions (fetch, export, render) against it. Every failure comes back
//! as a [`TrackerError`] whose `Display` text is the message shown to the
//! user; nothing here touches the GUI.

use crate::charts::{ChartImage, ChartRenderer, RenderError};
use crate::config::ChartConfig;
use crate::data::{
    CsvExporter, ExportError, FetchError, HistoryRequest, PriceSeries, PriceSource, Symbol,
    SymbolCatalog,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TrackerError {
    #[error("Please select a cryptocurrency.")]
    NoSelection,
    #[error("Invalid cryptocurrency selected.")]
    UnknownSymbol(String),
    #[error("Failed to fetch data: {0}")]
    Fetch(#[from] FetchError),
    #[error("Failed to fetch data: request for {0} was aborted")]
    Aborted(String),
    #[error("No data found for {0}.")]
    EmptySeries(String),
    #[error("No data to save. Please fetch data first.")]
    NoDataToSave,
    #[error("Failed to save data: {0}")]
    Export(#[from] ExportError),
    #[error("No data to plot. Please fetch data first.")]
    NoDataToPlot,
    #[error("Failed to render chart: {0}")]
    Render(#[from] RenderError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// A message for the user, shown as a modal dialog and in the status line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            title: "Success".to_string(),
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            title: "Error".to_string(),
            message: message.into(),
        }
    }
}

impl From<&TrackerError> for Notice {
    fn from(err: &TrackerError) -> Self {
        Notice::error(err.to_string())
    }
}

/// The label and series of one successful fetch. Always replaced as a unit.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub label: String,
    pub series: PriceSeries,
}

/// In-memory state for the lifetime of the running app.
#[derive(Debug, Clone, Default)]
pub struct Session {
    current: Option<Snapshot>,
}

impl Session {
    pub fn snapshot(&self) -> Option<&Snapshot> {
        self.current.as_ref()
    }

    pub fn label(&self) -> Option<&str> {
        self.current.as_ref().map(|s| s.label.as_str())
    }

    pub fn series(&self) -> Option<&PriceSeries> {
        self.current.as_ref().map(|s| &s.series)
    }

    pub fn has_data(&self) -> bool {
        self.current.is_some()
    }

    fn replace(&mut self, snapshot: Snapshot) {
        self.current = Some(snapshot);
    }
}

pub struct TrackerController {
    catalog: SymbolCatalog,
    source: Arc<dyn PriceSource>,
    request: HistoryRequest,
    chart: ChartConfig,
    session: Session,
}

impl TrackerController {
    pub fn new(source: Arc<dyn PriceSource>, request: HistoryRequest, chart: ChartConfig) -> Self {
        Self {
            catalog: SymbolCatalog::new(),
            source,
            request,
            chart,
            session: Session::default(),
        }
    }

    pub fn catalog(&self) -> &SymbolCatalog {
        &self.catalog
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn source(&self) -> Arc<dyn PriceSource> {
        Arc::clone(&self.source)
    }

    pub fn history_request(&self) -> &HistoryRequest {
        &self.request
    }

    /// Validate the selection before any network call is made.
    pub fn prepare_fetch(&self, selection: &str) -> Result<Symbol, TrackerError> {
        self.catalog.resolve(selection)
    }

    /// Apply a finished fetch. The session only changes on a non-empty series.
    pub fn complete_fetch(
        &mut self,
        symbol: Symbol,
        result: Result<PriceSeries, FetchError>,
    ) -> Result<Notice, TrackerError> {
        let series = result?;
        if series.is_empty() {
            return Err(TrackerError::EmptySeries(symbol.name.to_string()));
        }

        log::info!(
            "fetched {} rows for {} ({})",
            series.len(),
            symbol.name,
            symbol.ticker
        );
        self.session.replace(Snapshot {
            label: symbol.name.to_string(),
            series,
        });
        Ok(Notice::info(format!("Data fetched for {}.", symbol.name)))
    }

    /// Resolve, fetch and apply on the calling thread.
    pub fn fetch(&mut self, selection: &str) -> Result<Notice, TrackerError> {
        let symbol = self.prepare_fetch(selection)?;
        let result = self.source.fetch_history(symbol.ticker, &self.request);
        self.complete_fetch(symbol, result)
    }

    /// Fails when there is nothing to save; called before the save dialog opens.
    pub fn ensure_exportable(&self) -> Result<&Snapshot, TrackerError> {
        self.session.snapshot().ok_or(TrackerError::NoDataToSave)
    }

    /// Default file name offered by the save dialog.
    pub fn suggested_file_name(&self) -> Option<String> {
        self.session
            .series()
            .map(|series| format!("{}.csv", series.ticker))
    }

    /// Path chosen in the save dialog, with `.csv` added when it has no
    /// extension.
    pub fn csv_destination(path: PathBuf) -> PathBuf {
        if path.extension().is_none() {
            path.with_extension("csv")
        } else {
            path
        }
    }

    /// Write the current series to `path`. `None` means the dialog was
    /// cancelled: nothing is written and nothing is reported.
    pub fn export(&self, path: Option<&Path>) -> Result<Option<Notice>, TrackerError> {
        let snapshot = self.ensure_exportable()?;
        let Some(path) = path else {
            return Ok(None);
        };

        let rows = CsvExporter::write_csv(&snapshot.series, path)?;
        log::info!("saved {} rows of {} to {}", rows, snapshot.label, path.display());
        Ok(Some(Notice::info(format!("Data saved to {}", path.display()))))
    }

    /// Render the closing-price chart for the current series.
    pub fn render(&self) -> Result<ChartImage, TrackerError> {
        let snapshot = self.session.snapshot().ok_or(TrackerError::NoDataToPlot)?;
        Ok(ChartRenderer::render(
            &snapshot.series,
            &snapshot.label,
            &self.chart,
        )?)
    }
}
