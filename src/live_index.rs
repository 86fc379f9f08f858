//! `live_data/index.json`: the list of workbooks the viewer can open.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub const INDEX_FILE: &str = "index.json";

/// Default live-data directory, relative to the working directory.
pub const DEFAULT_DIR: &str = "live_data";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LiveIndex {
    /// `.xlsx` file names, newest (lexically greatest) first.
    pub files: Vec<String>,
}

impl LiveIndex {
    /// List the `.xlsx` files directly inside `dir`.
    pub fn scan(dir: &Path) -> Result<Self> {
        let entries = std::fs::read_dir(dir).map_err(|e| Error::io(dir, e))?;

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| Error::io(dir, e))?;
            let path = entry.path();
            let is_xlsx = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("xlsx"));
            if is_xlsx && path.is_file() {
                files.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        files.sort_unstable_by(|a, b| b.cmp(a));
        Ok(LiveIndex { files })
    }

    /// Scan `dir` and write `dir/index.json`.
    pub fn generate(dir: &Path) -> Result<(PathBuf, Self)> {
        let index = Self::scan(dir)?;
        let path = dir.join(INDEX_FILE);
        let text = serde_json::to_string_pretty(&index)?;
        std::fs::write(&path, text).map_err(|e| Error::io(&path, e))?;
        Ok((path, index))
    }

    /// Read `dir/index.json`.
    pub fn read(dir: &Path) -> Result<Self> {
        let path = dir.join(INDEX_FILE);
        let text = std::fs::read_to_string(&path).map_err(|e| Error::io(&path, e))?;
        Ok(serde_json::from_str(&text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_lists_xlsx_newest_first() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["2024-05-01.xlsx", "2024-05-03.XLSX", "直播_2024-05-02.xlsx", "notes.txt"] {
            std::fs::write(dir.path().join(name), b"").unwrap();
        }
        std::fs::create_dir(dir.path().join("old.xlsx")).unwrap();

        let (path, index) = LiveIndex::generate(dir.path()).unwrap();

        assert_eq!(
            index.files,
            vec!["直播_2024-05-02.xlsx", "2024-05-03.XLSX", "2024-05-01.xlsx"]
        );
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("直播_2024-05-02.xlsx"), "non-ASCII kept as-is");
        assert!(text.contains("\n  \"files\""));
        assert_eq!(LiveIndex::read(dir.path()).unwrap(), index);
    }

    #[test]
    fn test_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let err = LiveIndex::generate(&dir.path().join("live_data")).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }
}
