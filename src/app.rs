use eframe::egui::{self, Align2, Color32, FontId, Id, LayerId, Order};

use crate::state::{AppState, View};
use crate::ui::{panels, plot, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct LiveTrendApp {
    pub state: AppState,
}

impl LiveTrendApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    /// Load the first file dropped this frame; later ones are ignored.
    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        if dropped.len() > 1 {
            log::warn!("{} files dropped, loading only the first", dropped.len());
        }
        let Some(file) = dropped.into_iter().next() else {
            return;
        };

        if let Some(path) = &file.path {
            self.state.open_path(path);
        } else if let Some(bytes) = &file.bytes {
            self.state.open_bytes(&file.name, bytes);
        }
    }
}

impl eframe::App for LiveTrendApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_dropped_files(ctx);

        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: series ----
        egui::SidePanel::left("series_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: chart or rows ----
        egui::CentralPanel::default().show(ctx, |ui| match self.state.view {
            View::Chart => plot::live_plot(ui, &self.state),
            View::Table => table::record_table(ui, &self.state),
        });

        drop_overlay(ctx);
    }
}

/// Dim the window while files hover over it.
fn drop_overlay(ctx: &egui::Context) {
    if ctx.input(|i| i.raw.hovered_files.is_empty()) {
        return;
    }
    let painter = ctx.layer_painter(LayerId::new(Order::Foreground, Id::new("file_drop_target")));
    let screen_rect = ctx.screen_rect();
    painter.rect_filled(screen_rect, 0.0, Color32::from_black_alpha(192));
    painter.text(
        screen_rect.center(),
        Align2::CENTER_CENTER,
        "Drop to load",
        FontId::proportional(24.0),
        Color32::WHITE,
    );
}
