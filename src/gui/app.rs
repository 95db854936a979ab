//! Crypto Tracker Main Application
//! Control window wiring: selector, fetch/save/graph actions, chart popups.

use crate::config::AppConfig;
use crate::data::{PriceSource, YahooFinanceClient};
use crate::gui::{ChartWindows, ControlPanel, ControlPanelAction, FetchPoll, FetchTask};
use crate::session::{Notice, NoticeLevel, TrackerController, TrackerError};
use anyhow::Context as _;
use rfd::{MessageButtons, MessageDialog, MessageLevel};
use std::sync::Arc;

/// Main application window.
pub struct CryptoTrackerApp {
    controller: TrackerController,
    control_panel: ControlPanel,
    chart_windows: ChartWindows,

    fetch_task: FetchTask,
}

impl CryptoTrackerApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: AppConfig) -> anyhow::Result<Self> {
        let client = YahooFinanceClient::new(
            config.provider.base_url.clone(),
            config.provider.timeout(),
        )
        .context("failed to create market data client")?;

        Ok(Self::with_source(Arc::new(client), &config))
    }

    pub fn with_source(source: Arc<dyn PriceSource>, config: &AppConfig) -> Self {
        Self {
            controller: TrackerController::new(
                source,
                config.provider.history_request(),
                config.chart,
            ),
            control_panel: ControlPanel::new(),
            chart_windows: ChartWindows::new(),
            fetch_task: FetchTask::new(),
        }
    }

    /// Validate the selection, then fetch on a background thread.
    fn handle_fetch(&mut self) {
        if self.fetch_task.is_pending() {
            return; // Already fetching
        }

        let symbol = match self.controller.prepare_fetch(&self.control_panel.selection) {
            Ok(symbol) => symbol,
            Err(e) => return self.report_error(e),
        };

        log::info!("fetching {} ({})", symbol.name, symbol.ticker);
        self.control_panel
            .set_busy(&format!("Fetching data for {}...", symbol.name));

        self.fetch_task.start(
            symbol,
            self.controller.source(),
            self.controller.history_request().clone(),
        );
    }

    /// Check for fetch results
    fn check_fetch_results(&mut self) {
        match self.fetch_task.poll() {
            FetchPoll::Idle | FetchPoll::Waiting => {}
            FetchPoll::Finished(outcome) => {
                self.control_panel.busy = false;
                match self.controller.complete_fetch(outcome.symbol, outcome.result) {
                    Ok(notice) => self.present(&notice),
                    Err(e) => self.report_error(e),
                }
            }
            FetchPoll::Aborted(symbol) => {
                self.control_panel.busy = false;
                log::error!("fetch worker for {} exited without a result", symbol.name);
                self.report_error(TrackerError::Aborted(symbol.name.to_string()));
            }
        }
    }

    /// Ask for a destination and write the CSV.
    fn handle_save(&mut self) {
        if let Err(e) = self.controller.ensure_exportable() {
            return self.report_error(e);
        }

        let mut dialog = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .set_title("Save CSV File");
        if let Some(name) = self.controller.suggested_file_name() {
            dialog = dialog.set_file_name(name);
        }

        let path = dialog.save_file().map(TrackerController::csv_destination);

        match self.controller.export(path.as_deref()) {
            Ok(Some(notice)) => self.present(&notice),
            Ok(None) => log::debug!("save cancelled"),
            Err(e) => self.report_error(e),
        }
    }

    /// Render the chart and open it in a new window.
    fn handle_show_graph(&mut self, ctx: &egui::Context) {
        match self.controller.render() {
            Ok(chart) => {
                log::info!("opening chart window \"{}\"", chart.window_title);
                self.control_panel.status = format!("Showing {}", chart.title);
                self.control_panel.status_level = Some(NoticeLevel::Info);
                self.chart_windows.open(ctx, chart);
            }
            Err(e) => self.report_error(e),
        }
    }

    fn report_error(&mut self, error: TrackerError) {
        log::warn!("{}", error);
        self.present(&Notice::from(&error));
    }

    /// Status line plus a modal dialog.
    fn present(&mut self, notice: &Notice) {
        self.control_panel.set_status(notice);

        let level = match notice.level {
            NoticeLevel::Info => MessageLevel::Info,
            NoticeLevel::Error => MessageLevel::Error,
        };
        let _ = MessageDialog::new()
            .set_level(level)
            .set_title(notice.title.as_str())
            .set_description(notice.message.as_str())
            .set_buttons(MessageButtons::Ok)
            .show();
    }
}

impl eframe::App for CryptoTrackerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Check for background results
        self.check_fetch_results();

        // Request repaint while fetching
        if self.fetch_task.is_pending() {
            ctx.request_repaint();
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            let action = self
                .control_panel
                .show(ui, self.controller.catalog().names());

            match action {
                ControlPanelAction::Fetch => self.handle_fetch(),
                ControlPanelAction::SaveCsv => self.handle_save(),
                ControlPanelAction::ShowGraph => self.handle_show_graph(ctx),
                ControlPanelAction::None => {}
            }
        });

        self.chart_windows.show(ctx);
    }
}
