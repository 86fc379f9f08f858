use std::io;
use std::path::PathBuf;

/// Errors produced by the loaders, the payload unwrapper and the writer.
///
/// Every variant is terminal for the run that hit it.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The input is not a readable spreadsheet, or it has no header row.
    #[error("cannot parse spreadsheet: {0}")]
    Parse(String),

    /// The axis column is not present in the table.
    #[error("required axis column '{column}' is missing")]
    MissingAxis { column: String },

    /// `data.data_string` is absent or does not decode to a JSON object.
    #[error("malformed payload: {0}")]
    MalformedPayload(String),

    /// An expected path inside the decoded payload is missing or has the wrong shape.
    #[error("path not found: {0}")]
    PathNotFound(String),

    /// The payload decoded fine but holds no records.
    #[error("{0} is empty, nothing to write")]
    NoRecords(String),

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("workbook error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// `--output-name` must be a bare file name.
    #[error("output name '{0}' must be a plain file name")]
    InvalidOutputName(String),

    /// Converter step that failed, wrapping the underlying error.
    #[error("{stage}")]
    Stage {
        stage: &'static str,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }

    /// The error underneath any stage wrappers.
    pub fn root(&self) -> &Error {
        match self {
            Error::Stage { source, .. } => source.root(),
            other => other,
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
