//! Control Panel Widget
//! Cryptocurrency selector, the three action buttons and the status line.

use crate::session::{Notice, NoticeLevel};
use egui::{Color32, ComboBox, RichText};

/// Persistent controls of the main window.
pub struct ControlPanel {
    /// Raw selector text; may be typed as well as picked.
    pub selection: String,
    pub status: String,
    pub status_level: Option<NoticeLevel>,
    pub busy: bool,
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self {
            selection: String::new(),
            status: "Ready".to_string(),
            status_level: None,
            busy: false,
        }
    }
}

impl ControlPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw the control panel
    pub fn show<'a>(
        &mut self,
        ui: &mut egui::Ui,
        names: impl Iterator<Item = &'a str>,
    ) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        ui.vertical_centered(|ui| {
            ui.add_space(10.0);
            ui.label(RichText::new("Select Cryptocurrency:").size(16.0));
            ui.add_space(8.0);

            // Editable combo: free text plus a dropdown of catalog names.
            ui.horizontal(|ui| {
                ui.add(
                    egui::TextEdit::singleline(&mut self.selection)
                        .hint_text("Bitcoin")
                        .desired_width(170.0),
                );
                ComboBox::from_id_salt("crypto_symbol")
                    .width(24.0)
                    .selected_text("")
                    .show_ui(ui, |ui| {
                        for name in names {
                            if ui.selectable_label(self.selection == name, name).clicked() {
                                self.selection = name.to_string();
                            }
                        }
                    });
            });

            ui.add_space(12.0);

            let button_size = egui::vec2(200.0, 32.0);
            let fetch_label = if self.busy { "Fetching..." } else { "Fetch Data" };
            ui.add_enabled_ui(!self.busy, |ui| {
                let button = egui::Button::new(RichText::new(fetch_label).size(14.0))
                    .min_size(button_size);
                if ui.add(button).clicked() {
                    action = ControlPanelAction::Fetch;
                }
            });

            ui.add_space(6.0);
            let save = egui::Button::new(RichText::new("Save Data to CSV").size(14.0))
                .min_size(button_size);
            if ui.add(save).clicked() {
                action = ControlPanelAction::SaveCsv;
            }

            ui.add_space(6.0);
            let graph =
                egui::Button::new(RichText::new("Show Graph").size(14.0)).min_size(button_size);
            if ui.add(graph).clicked() {
                action = ControlPanelAction::ShowGraph;
            }

            ui.add_space(12.0);
            ui.separator();

            if self.busy {
                ui.spinner();
            }
            let status_color = match self.status_level {
                Some(NoticeLevel::Error) => Color32::from_rgb(220, 53, 69),
                Some(NoticeLevel::Info) => Color32::from_rgb(40, 167, 69),
                None => Color32::GRAY,
            };
            ui.label(RichText::new(&self.status).size(11.0).color(status_color));
        });

        action
    }

    pub fn set_status(&mut self, notice: &Notice) {
        self.status = notice.message.clone();
        self.status_level = Some(notice.level);
    }

    pub fn set_busy(&mut self, status: &str) {
        self.busy = true;
        self.status = status.to_string();
        self.status_level = None;
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    Fetch,
    SaveCsv,
    ShowGraph,
}
