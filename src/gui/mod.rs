//! GUI module - User interface components

mod app;
mod chart_window;
mod control_panel;
mod fetch_task;

pub use app::CryptoTrackerApp;
pub use chart_window::ChartWindows;
pub use control_panel::{ControlPanel, ControlPanelAction};
pub use fetch_task::{FetchOutcome, FetchPoll, FetchTask};
