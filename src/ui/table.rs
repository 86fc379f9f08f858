use eframe::egui::{ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};

use live_trend::data::dictionary;

use crate::state::AppState;

/// Render the loaded rows with both header lines, as the workbook shows them.
pub fn record_table(ui: &mut Ui, state: &AppState) {
    let Some(table) = &state.table else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("No file loaded");
        });
        return;
    };

    ScrollArea::horizontal().show(ui, |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .columns(Column::auto().at_least(64.0), table.columns.len())
            .header(36.0, |mut header| {
                for col in &table.columns {
                    header.col(|ui: &mut Ui| {
                        ui.vertical(|ui: &mut Ui| {
                            ui.strong(col);
                            ui.small(dictionary::label_for(col));
                        });
                    });
                }
            })
            .body(|body| {
                body.rows(18.0, table.len(), |mut row| {
                    let record = &table.records[row.index()];
                    for col in &table.columns {
                        row.col(|ui: &mut Ui| {
                            let text = record
                                .values
                                .get(col)
                                .map(|v| v.to_string())
                                .unwrap_or_default();
                            ui.label(text);
                        });
                    }
                });
            });
    });
}
