use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, ValueHint};

use live_trend::convert::convert_file;

/// Convert the `data.data_string` payload of a JSON export into an XLSX
/// workbook with field names and their Chinese labels as the first two rows.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the source JSON file
    #[arg(value_hint = ValueHint::FilePath)]
    json_path: PathBuf,

    /// Directory where the XLSX file is written (created if missing)
    #[arg(value_hint = ValueHint::DirPath)]
    output_dir: PathBuf,

    /// XLSX file name [default: <json stem>.xlsx]
    #[arg(long)]
    output_name: Option<String>,
}

fn run(cli: &Cli) -> Result<()> {
    let conversion = convert_file(&cli.json_path, &cli.output_dir, cli.output_name.as_deref())
        .with_context(|| format!("converting {}", cli.json_path.display()))?;

    log::debug!("columns: {:?}", conversion.columns);
    println!("Wrote {}", conversion.path.display());
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
