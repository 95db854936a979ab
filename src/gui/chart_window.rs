//! Chart Windows
//! One independent, closable viewport per "Show Graph" press.

use crate::charts::ChartImage;
use egui::{ColorImage, TextureHandle, TextureOptions, ViewportBuilder, ViewportClass, ViewportId};

const WINDOW_PADDING: f32 = 16.0;

struct ChartWindow {
    viewport_id: ViewportId,
    window_title: String,
    texture: TextureHandle,
    open: bool,
}

/// All chart popups currently on screen.
#[derive(Default)]
pub struct ChartWindows {
    windows: Vec<ChartWindow>,
    next_id: u64,
}

impl ChartWindows {
    pub fn new() -> Self {
        Self::default()
    }

    /// Upload the chart as a texture and queue a new window for it.
    pub fn open(&mut self, ctx: &egui::Context, chart: ChartImage) {
        let id = self.next_id;
        self.next_id += 1;

        let pixels = ColorImage::from_rgba_unmultiplied(chart.size(), chart.image.as_raw());
        let texture = ctx.load_texture(format!("chart-{id}"), pixels, TextureOptions::LINEAR);

        self.windows.push(ChartWindow {
            viewport_id: ViewportId::from_hash_of(("chart_window", id)),
            window_title: chart.window_title,
            texture,
            open: true,
        });
    }

    /// Draw every open chart window and drop the ones the user closed.
    pub fn show(&mut self, ctx: &egui::Context) {
        for window in &mut self.windows {
            let size = window.texture.size_vec2();
            let builder = ViewportBuilder::default()
                .with_title(window.window_title.clone())
                .with_inner_size(size + egui::vec2(WINDOW_PADDING, WINDOW_PADDING));

            ctx.show_viewport_immediate(window.viewport_id, builder, |ctx, class| {
                if matches!(class, ViewportClass::Embedded) {
                    // Backend without multi-viewport support.
                    egui::Window::new(window.window_title.as_str())
                        .id(egui::Id::new(window.viewport_id))
                        .open(&mut window.open)
                        .resizable(false)
                        .show(ctx, |ui| {
                            ui.image((window.texture.id(), size));
                        });
                    return;
                }

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.centered_and_justified(|ui| {
                        ui.image((window.texture.id(), size));
                    });
                });

                if ctx.input(|i| i.viewport().close_requested()) {
                    window.open = false;
                }
            });
        }

        self.windows.retain(|w| w.open);
    }
}
