//! JSON export → bilingual XLSX.
//!
//! ```text
//!  source .json ── payload::RawPayload ── data_string
//!                                              │ InnerPayload::decode
//!                                              ▼
//!                         InnerPayload::records → Table
//!                                              │ layout::LIVE_LAYOUT
//!                                              ▼
//!                       writer::write_workbook → <dest>/<name>.xlsx
//! ```

pub mod layout;
pub mod payload;
pub mod writer;

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use layout::LIVE_LAYOUT;
use payload::{InnerPayload, RawPayload};

/// Outcome of a successful conversion.
#[derive(Debug, Clone, PartialEq)]
pub struct Conversion {
    pub path: PathBuf,
    pub rows: usize,
    pub columns: Vec<String>,
}

// Step names carried by `Error::Stage`.
pub const STAGE_LOAD: &str = "loading JSON";
pub const STAGE_UNWRAP: &str = "unwrapping data_string";
pub const STAGE_EXTRACT: &str = "extracting data.series";
pub const STAGE_WRITE: &str = "writing workbook";

trait StageExt<T> {
    fn stage(self, stage: &'static str) -> Result<T>;
}

impl<T> StageExt<T> for Result<T> {
    fn stage(self, stage: &'static str) -> Result<T> {
        self.map_err(|e| Error::Stage {
            stage,
            source: Box::new(e),
        })
    }
}

/// Convert one JSON export into `output_dir`. `output_name` overrides the
/// default `<json stem>.xlsx`. Nothing is written unless every stage succeeds.
///
/// Failures come back as [`Error::Stage`] naming the step; [`Error::root`]
/// gives the underlying error.
pub fn convert_file(
    json_path: &Path,
    output_dir: &Path,
    output_name: Option<&str>,
) -> Result<Conversion> {
    let raw = RawPayload::from_file(json_path).stage(STAGE_LOAD)?;
    let inner = raw
        .data_string()
        .and_then(InnerPayload::decode)
        .stage(STAGE_UNWRAP)?;
    let table = inner.records().stage(STAGE_EXTRACT)?;

    let columns = LIVE_LAYOUT.arrange(&table.columns);
    let path = writer::output_file_name(json_path, output_name)
        .and_then(|name| writer::write_workbook(&table, &columns, output_dir, &name))
        .stage(STAGE_WRITE)?;

    Ok(Conversion {
        path,
        rows: table.len(),
        columns,
    })
}
