//! Input discovery.
//!
//! Lists the files a batch will process: every regular file directly under
//! the input directory, dot-files included, sorted by file name. Subdirectories are
//! not descended into. Nothing is filtered by extension; a file the codec
//! cannot read becomes a failed outcome in the report rather than being
//! silently skipped.
//!
//! ```text
//! input/
//! ├── .b.png           # record 1
//! ├── a.png            # record 2
//! ├── c.jpg            # record 3
//! ├── notes.txt        # record 4 (will fail to decode)
//! └── raw/             # directory, skipped
//!     └── c.png
//! ```

use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Cannot list {path}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}

/// One discovered input file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageRecord {
    /// Full path to the source file.
    pub source_path: PathBuf,
    /// File name relative to the input directory (e.g. `photo.png`).
    pub relative_name: String,
}

/// Enumerate input files in discovery order.
pub fn discover(input_dir: &Path) -> Result<Vec<ImageRecord>, ScanError> {
    let walker = WalkDir::new(input_dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name();

    let mut records = Vec::new();
    for entry in walker {
        let entry = entry.map_err(|source| ScanError::Walk {
            path: input_dir.to_path_buf(),
            source,
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().to_string();
        records.push(ImageRecord {
            source_path: entry.into_path(),
            relative_name: name,
        });
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn names(records: &[ImageRecord]) -> Vec<&str> {
        records.iter().map(|r| r.relative_name.as_str()).collect()
    }

    #[test]
    fn empty_directory_has_no_records() {
        let tmp = TempDir::new().unwrap();
        assert!(discover(tmp.path()).unwrap().is_empty());
    }

    #[test]
    fn records_sorted_by_file_name() {
        let tmp = TempDir::new().unwrap();
        for name in ["c.png", "a.png", "b.jpg"] {
            fs::write(tmp.path().join(name), b"x").unwrap();
        }
        let records = discover(tmp.path()).unwrap();
        assert_eq!(names(&records), vec!["a.png", "b.jpg", "c.png"]);
    }

    #[test]
    fn source_path_is_inside_input_dir() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("a.png"), b"x").unwrap();
        let records = discover(tmp.path()).unwrap();
        assert_eq!(records[0].source_path, tmp.path().join("a.png"));
    }

    #[test]
    fn dot_files_are_records() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(".b.png"), b"x").unwrap();
        fs::write(tmp.path().join("a.png"), b"x").unwrap();
        assert_eq!(names(&discover(tmp.path()).unwrap()), vec![".b.png", "a.png"]);
    }

    #[test]
    fn subdirectories_not_descended() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir(tmp.path().join("raw")).unwrap();
        fs::write(tmp.path().join("raw").join("c.png"), b"x").unwrap();
        fs::write(tmp.path().join("a.png"), b"x").unwrap();
        assert_eq!(names(&discover(tmp.path()).unwrap()), vec!["a.png"]);
    }

    #[test]
    fn non_image_files_are_still_records() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("notes.txt"), b"hello").unwrap();
        assert_eq!(names(&discover(tmp.path()).unwrap()), vec!["notes.txt"]);
    }

    #[test]
    fn missing_directory_is_error() {
        let tmp = TempDir::new().unwrap();
        let result = discover(&tmp.path().join("absent"));
        assert!(matches!(result, Err(ScanError::Walk { .. })));
    }
}
