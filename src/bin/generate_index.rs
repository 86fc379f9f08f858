use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use clap::{Parser, ValueHint};

use live_trend::live_index::{DEFAULT_DIR, LiveIndex};

/// Write `<dir>/index.json` listing the `.xlsx` files the viewer can open.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Live-data directory
    #[arg(default_value = DEFAULT_DIR, value_hint = ValueHint::DirPath)]
    dir: PathBuf,
}

fn run(cli: &Cli) -> Result<()> {
    if !cli.dir.is_dir() {
        bail!("{} 目录不存在", cli.dir.display());
    }
    let (path, index) = LiveIndex::generate(&cli.dir)
        .with_context(|| format!("indexing {}", cli.dir.display()))?;
    println!("写入 {}，共 {} 个文件", path.display(), index.files.len());
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
