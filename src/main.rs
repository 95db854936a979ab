//! Crypto Tracker - Cryptocurrency Price History Fetcher & Chart Viewer

use crypto_tracker::config::{AppConfig, CONFIG_FILE};
use crypto_tracker::gui::CryptoTrackerApp;
use eframe::egui;

fn main() -> eframe::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match AppConfig::load(CONFIG_FILE) {
        Ok(config) => config,
        Err(e) => {
            log::warn!("{}; using defaults", e);
            AppConfig::default()
        }
    };

    // Configure native options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([360.0, 320.0])
            .with_min_inner_size([320.0, 300.0])
            .with_title("Cryptocurrency Tracker"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "Cryptocurrency Tracker",
        options,
        Box::new(|cc| Ok(Box::new(CryptoTrackerApp::new(cc, config)?))),
    )
}
