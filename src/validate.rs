//! Batch preconditions.
//!
//! Checked once before any file is read. A failure here aborts the whole
//! batch: these conditions indicate a misconfigured invocation, not a bad
//! input file.
//!
//! - the input directory exists and is a directory
//! - the output directory exists (it is never created implicitly)
//! - the output directory is empty (outputs are never overwritten)

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PreconditionError {
    #[error("Input directory not found: {0}")]
    InputNotFound(PathBuf),
    #[error("Output directory does not exist: {0}")]
    OutputMissing(PathBuf),
    #[error("Output path is not a directory: {0}")]
    OutputNotDirectory(PathBuf),
    #[error("Output directory is not empty: {0}")]
    OutputNotEmpty(PathBuf),
    #[error("Cannot read {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Check the input and output directories. Touches nothing.
pub fn validate_paths(input_dir: &Path, output_dir: &Path) -> Result<(), PreconditionError> {
    if !input_dir.is_dir() {
        return Err(PreconditionError::InputNotFound(input_dir.to_path_buf()));
    }
    fs::read_dir(input_dir).map_err(|source| PreconditionError::Unreadable {
        path: input_dir.to_path_buf(),
        source,
    })?;

    if !output_dir.exists() {
        return Err(PreconditionError::OutputMissing(output_dir.to_path_buf()));
    }
    if !output_dir.is_dir() {
        return Err(PreconditionError::OutputNotDirectory(
            output_dir.to_path_buf(),
        ));
    }
    let mut entries = fs::read_dir(output_dir).map_err(|source| PreconditionError::Unreadable {
        path: output_dir.to_path_buf(),
        source,
    })?;
    if entries.next().is_some() {
        return Err(PreconditionError::OutputNotEmpty(output_dir.to_path_buf()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn dirs() -> (TempDir, PathBuf, PathBuf) {
        let tmp = TempDir::new().unwrap();
        let input = tmp.path().join("in");
        let output = tmp.path().join("out");
        fs::create_dir(&input).unwrap();
        fs::create_dir(&output).unwrap();
        (tmp, input, output)
    }

    #[test]
    fn valid_pair_passes() {
        let (_tmp, input, output) = dirs();
        assert!(validate_paths(&input, &output).is_ok());
    }

    #[test]
    fn missing_input() {
        let (tmp, _input, output) = dirs();
        let result = validate_paths(&tmp.path().join("nope"), &output);
        assert!(matches!(result, Err(PreconditionError::InputNotFound(_))));
    }

    #[test]
    fn input_is_a_file() {
        let (tmp, _input, output) = dirs();
        let file = tmp.path().join("file.png");
        fs::write(&file, b"x").unwrap();
        assert!(matches!(
            validate_paths(&file, &output),
            Err(PreconditionError::InputNotFound(_))
        ));
    }

    #[test]
    fn missing_output_is_not_created() {
        let (tmp, input, _output) = dirs();
        let absent = tmp.path().join("absent");
        assert!(matches!(
            validate_paths(&input, &absent),
            Err(PreconditionError::OutputMissing(_))
        ));
        assert!(!absent.exists());
    }

    #[test]
    fn output_is_a_file() {
        let (tmp, input, _output) = dirs();
        let file = tmp.path().join("out.txt");
        fs::write(&file, b"x").unwrap();
        assert!(matches!(
            validate_paths(&input, &file),
            Err(PreconditionError::OutputNotDirectory(_))
        ));
    }

    #[test]
    fn non_empty_output() {
        let (_tmp, input, output) = dirs();
        fs::write(output.join("old.webp"), b"x").unwrap();
        assert!(matches!(
            validate_paths(&input, &output),
            Err(PreconditionError::OutputNotEmpty(_))
        ));
    }

    #[test]
    fn hidden_file_makes_output_non_empty() {
        let (_tmp, input, output) = dirs();
        fs::write(output.join(".keep"), b"").unwrap();
        assert!(matches!(
            validate_paths(&input, &output),
            Err(PreconditionError::OutputNotEmpty(_))
        ));
    }

    #[test]
    fn empty_subdirectory_makes_output_non_empty() {
        let (_tmp, input, output) = dirs();
        fs::create_dir(output.join("sub")).unwrap();
        assert!(validate_paths(&input, &output).is_err());
    }

    #[test]
    fn input_is_checked_before_output() {
        let (tmp, _input, _output) = dirs();
        let result = validate_paths(&tmp.path().join("a"), &tmp.path().join("b"));
        assert!(matches!(result, Err(PreconditionError::InputNotFound(_))));
    }
}
