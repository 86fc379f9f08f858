use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use live_trend::chart::{self, ChartOptions, ChartSpec};
use live_trend::color::SeriesColors;
use live_trend::data::loader;
use live_trend::data::model::Table;
use live_trend::data::series::{self, ChartData, LIVE_SELECTION};
use live_trend::live_index::LiveIndex;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Central panel content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Chart,
    Table,
}

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded table (None until the user loads a file).
    pub table: Option<Table>,

    /// Series picked out of `table`.
    pub chart: Option<ChartData>,

    /// Chart definition for the current selection and options (cached).
    pub spec: Option<ChartSpec>,

    /// Display name of the loaded file.
    pub source_name: Option<String>,

    /// Fields of the series currently drawn.
    pub visible: BTreeSet<String>,

    pub colors: SeriesColors,
    pub options: ChartOptions,
    pub view: View,

    /// Directory holding `index.json` and the workbooks it lists.
    pub data_dir: PathBuf,
    pub live_index: Option<LiveIndex>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(data_dir: PathBuf) -> Self {
        let mut state = Self {
            table: None,
            chart: None,
            spec: None,
            source_name: None,
            visible: BTreeSet::new(),
            colors: SeriesColors::default(),
            options: ChartOptions::default(),
            view: View::Chart,
            data_dir,
            live_index: None,
            status_message: None,
        };
        state.refresh_index();
        state
    }

    /// Load a file from disk, reporting failures in the status bar.
    pub fn open_path(&mut self, path: &Path) {
        let name = path.display().to_string();
        let result = loader::load_file(path).with_context(|| format!("loading {name}"));
        self.finish_load(name, result);
    }

    /// Load an in-memory file (drops that carry bytes instead of a path).
    pub fn open_bytes(&mut self, name: &str, bytes: &[u8]) {
        let result = loader::load_bytes(name, bytes).with_context(|| format!("loading {name}"));
        self.finish_load(name.to_string(), result);
    }

    fn finish_load(&mut self, name: String, result: Result<Table>) {
        match result.and_then(|table| self.set_table(name, table)) {
            Ok(()) => {}
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    /// Ingest a newly loaded table: select series, reset visibility and colours.
    pub fn set_table(&mut self, name: String, table: Table) -> Result<()> {
        let chart = series::select(&table, &LIVE_SELECTION)
            .with_context(|| format!("charting {name}"))?;

        log::info!(
            "Loaded {} rows from {name} with columns {:?}",
            chart.len(),
            table.columns
        );

        self.visible = chart.default_visible().map(str::to_string).collect();
        self.colors = SeriesColors::new(&chart.series);
        self.chart = Some(chart);
        self.table = Some(table);
        self.source_name = Some(name);
        self.status_message = None;
        self.rebuild();
        Ok(())
    }

    /// Recompute the chart definition after a visibility or option change.
    pub fn rebuild(&mut self) {
        self.spec = self
            .chart
            .as_ref()
            .map(|data| chart::build(data, &self.visible, &self.colors, self.options));
    }

    /// Show or hide one series.
    pub fn toggle_series(&mut self, field: &str) {
        if !self.visible.remove(field) {
            self.visible.insert(field.to_string());
        }
        self.rebuild();
    }

    /// Back to the default two lines.
    pub fn reset_series(&mut self) {
        if let Some(chart) = &self.chart {
            self.visible = chart.default_visible().map(str::to_string).collect();
        }
        self.rebuild();
    }

    pub fn set_options(&mut self, options: ChartOptions) {
        if options != self.options {
            self.options = options;
            self.rebuild();
        }
    }

    /// Re-read `index.json`; a missing index just empties the menu.
    pub fn refresh_index(&mut self) {
        self.live_index = match LiveIndex::read(&self.data_dir) {
            Ok(index) => Some(index),
            Err(e) => {
                log::debug!("no live-data index: {e}");
                None
            }
        };
    }

    /// Open an entry of the live-data index.
    pub fn open_indexed(&mut self, file_name: &str) {
        let path = self.data_dir.join(file_name);
        self.open_path(&path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_xlsxwriter::Workbook;

    fn live_xlsx() -> Vec<u8> {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        let header = ["timeMinute", "watchUcnt", "watchUcntRank", "likeCnt", "c", "music"];
        for (c, name) in header.iter().enumerate() {
            sheet.write_string(0, c as u16, *name).unwrap();
        }
        for r in 1..=3u32 {
            sheet.write_string(r, 0, format!("20:0{r}")).unwrap();
            sheet.write_number(r, 1, 100.0 * r as f64).unwrap();
            sheet.write_number(r, 2, r as f64).unwrap();
            sheet.write_number(r, 3, 7.0).unwrap();
        }
        sheet.write_string(2, 4, "Alice").unwrap();
        sheet.write_string(2, 5, "SongX").unwrap();
        workbook.save_to_buffer().unwrap()
    }

    fn state() -> AppState {
        AppState::new(PathBuf::from("/nonexistent/live_data"))
    }

    #[test]
    fn test_dropped_workbook_draws_two_default_lines() {
        let mut state = state();
        state.open_bytes("live.xlsx", &live_xlsx());

        assert!(state.status_message.is_none());
        let spec = state.spec.as_ref().unwrap();
        assert_eq!(spec.lines.len(), 2);
        assert_eq!(spec.x_labels, vec!["20:01", "20:02", "20:03"]);
        assert_eq!(spec.markers.len(), 1);
        assert_eq!(spec.markers[0].text, "主C：Alice，音乐：SongX");
    }

    #[test]
    fn test_toggle_and_reset_series() {
        let mut state = state();
        state.open_bytes("live.xlsx", &live_xlsx());

        state.toggle_series("likeCnt");
        assert_eq!(state.spec.as_ref().unwrap().lines.len(), 3);
        state.toggle_series("watchUcnt");
        assert_eq!(state.spec.as_ref().unwrap().lines.len(), 2);
        state.reset_series();
        let fields: Vec<&str> = state
            .spec
            .as_ref()
            .unwrap()
            .lines
            .iter()
            .map(|l| l.field.as_str())
            .collect();
        assert_eq!(fields, vec!["watchUcnt", "watchUcntRank"]);
    }

    #[test]
    fn test_failures_are_reported_not_fatal() {
        let mut state = state();
        state.open_bytes("live.xlsx", &live_xlsx());

        state.open_bytes("broken.xlsx", b"not a workbook");
        let msg = state.status_message.clone().unwrap();
        assert!(msg.contains("broken.xlsx"), "{msg}");
        // previous chart stays on screen
        assert_eq!(state.source_name.as_deref(), Some("live.xlsx"));

        state.open_bytes("no_axis.csv", b"watchUcnt\n5\n");
        let msg = state.status_message.clone().unwrap();
        assert!(msg.contains("timeMinute"), "{msg}");
    }

    #[test]
    fn test_missing_index_leaves_menu_empty() {
        let state = state();
        assert!(state.live_index.is_none());
    }
}
