mod app;
mod state;
mod ui;

use std::path::PathBuf;

use app::LiveTrendApp;
use clap::{Parser, ValueHint};
use eframe::egui;
use live_trend::live_index::DEFAULT_DIR;
use state::AppState;

/// Chart live-stream minute data from a spreadsheet.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Spreadsheet to open on start (.xlsx, .xls, .ods, .csv)
    #[arg(value_hint = ValueHint::FilePath)]
    file: Option<PathBuf>,

    /// Directory holding index.json and the workbooks it lists
    #[arg(long, default_value = DEFAULT_DIR, value_hint = ValueHint::DirPath)]
    data_dir: PathBuf,
}

fn main() -> eframe::Result {
    env_logger::init();
    let cli = Cli::parse();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0])
            .with_drag_and_drop(true),
        ..Default::default()
    };

    eframe::run_native(
        "Live Trend – Live Data Viewer",
        options,
        Box::new(move |cc| {
            ui::fonts::install_cjk_fallback(&cc.egui_ctx);

            let mut state = AppState::new(cli.data_dir);
            if let Some(path) = &cli.file {
                state.open_path(path);
            }
            Ok(Box::new(LiveTrendApp::new(state)))
        }),
    )
}
