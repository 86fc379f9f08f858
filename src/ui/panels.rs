use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use live_trend::chart::ChartOptions;
use live_trend::data::dictionary;

use crate::state::{AppState, View};

// ---------------------------------------------------------------------------
// Left side panel – series toggles
// ---------------------------------------------------------------------------

/// Render the left series panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Series");
    ui.separator();

    let Some(chart) = &state.chart else {
        ui.label("No file loaded.");
        ui.label("Drop an .xlsx file onto the window.");
        return;
    };

    // Clone what we need so we can mutate state inside the loop.
    let series: Vec<(String, String, bool)> = chart
        .series
        .iter()
        .map(|s| (s.field.clone(), s.label.clone(), s.visible_by_default))
        .collect();
    let annotations: Vec<(String, String)> = chart
        .annotations
        .iter()
        .zip(&chart.axis)
        .filter_map(|(note, axis)| Some((axis.to_string(), note.clone()?)))
        .collect();
    let axis_field = chart.axis_field.clone();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.label(format!("X axis: {}", dictionary::label_for(&axis_field)));
            ui.separator();

            ui.horizontal(|ui: &mut Ui| {
                ui.strong("Lines");
                if ui.small_button("Default").clicked() {
                    state.reset_series();
                }
            });

            let mut toggled = None;
            for (field, label, is_default) in &series {
                let color = state.colors.color_for(field);
                let mut text = RichText::new(label).color(color);
                if *is_default {
                    text = text.strong();
                }
                let mut checked = state.visible.contains(field);
                if ui.checkbox(&mut checked, text).changed() {
                    toggled = Some(field.clone());
                }
            }
            if let Some(field) = toggled {
                state.toggle_series(&field);
            }

            ui.separator();
            egui::CollapsingHeader::new(
                RichText::new(format!("Annotations  ({})", annotations.len())).strong(),
            )
            .default_open(true)
            .show(ui, |ui: &mut Ui| {
                if annotations.is_empty() {
                    ui.label("None in this file.");
                }
                for (axis, note) in &annotations {
                    ui.label(format!("{axis}  {note}"));
                }
            });
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.menu_button("Live data", |ui: &mut Ui| live_data_menu(ui, state));

        ui.separator();

        ui.selectable_value(&mut state.view, View::Chart, "Chart");
        ui.selectable_value(&mut state.view, View::Table, "Table");

        ui.separator();

        let mut options: ChartOptions = state.options;
        if ui
            .selectable_label(options.minmax_scaling, "Min-Max Scaling")
            .clicked()
        {
            options.minmax_scaling = !options.minmax_scaling;
        }
        if ui
            .selectable_label(options.show_annotations, "Annotations")
            .clicked()
        {
            options.show_annotations = !options.show_annotations;
        }
        state.set_options(options);

        ui.separator();

        if let (Some(name), Some(chart)) = (&state.source_name, &state.chart) {
            ui.label(format!("{name}: {} points", chart.len()));
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

fn live_data_menu(ui: &mut Ui, state: &mut AppState) {
    if ui.button("Refresh index").clicked() {
        state.refresh_index();
    }
    ui.separator();

    let files = match &state.live_index {
        Some(index) if !index.files.is_empty() => index.files.clone(),
        Some(_) => {
            ui.label("index.json lists no files");
            return;
        }
        None => {
            ui.label(format!("No index in {}", state.data_dir.display()));
            return;
        }
    };

    ScrollArea::vertical()
        .max_height(400.0)
        .show(ui, |ui: &mut Ui| {
            for file in &files {
                let current = state.source_name.as_deref().is_some_and(|s| s.ends_with(file.as_str()));
                if ui.selectable_label(current, file).clicked() {
                    state.open_indexed(file);
                    ui.close_menu();
                }
            }
        });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open live data")
        .add_filter("Supported files", &["xlsx", "xlsm", "xls", "xlsb", "ods", "csv"])
        .add_filter("Excel", &["xlsx", "xlsm", "xls", "xlsb"])
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        state.open_path(&path);
    }
}
