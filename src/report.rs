//! Per-file outcomes and the batch report.
//!
//! The report is the only artifact a batch returns. Outcomes appear in
//! discovery order whether the batch ran sequentially or on a worker pool,
//! so two runs over the same input produce the same report.
//!
//! The report serializes to JSON for `imgbatch run --report`:
//!
//! ```json
//! {
//!   "task": "resize",
//!   "format": "webp",
//!   "quality": 80,
//!   "total": 2,
//!   "succeeded": 1,
//!   "failed": 1,
//!   "outcomes": [
//!     { "source_path": "in/a.png", "relative_name": "a.png", "status": "succeeded",
//!       "output_path": "out/a.webp" },
//!     { "source_path": "in/b.png", "relative_name": "b.png", "status": "failed",
//!       "stage": "decode", "error_detail": "Decode failed: ..." }
//!   ]
//! }
//! ```

use crate::config::{FormatName, TaskName};
use crate::scan::ImageRecord;
use serde::Serialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeStatus {
    Succeeded,
    Failed,
}

/// Pipeline stage a file failed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Decode,
    Filter,
    Encode,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stage::Decode => "decode",
            Stage::Filter => "filter",
            Stage::Encode => "encode",
        })
    }
}

/// Result of running one input file through the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessingOutcome {
    pub source_path: PathBuf,
    pub relative_name: String,
    pub status: OutcomeStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage: Option<Stage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_detail: Option<String>,
    /// Written file; present only on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_path: Option<PathBuf>,
}

impl ProcessingOutcome {
    pub fn succeeded(record: &ImageRecord, output_path: PathBuf) -> Self {
        Self {
            source_path: record.source_path.clone(),
            relative_name: record.relative_name.clone(),
            status: OutcomeStatus::Succeeded,
            stage: None,
            error_detail: None,
            output_path: Some(output_path),
        }
    }

    pub fn failed(record: &ImageRecord, stage: Stage, detail: impl Into<String>) -> Self {
        Self {
            source_path: record.source_path.clone(),
            relative_name: record.relative_name.clone(),
            status: OutcomeStatus::Failed,
            stage: Some(stage),
            error_detail: Some(detail.into()),
            output_path: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == OutcomeStatus::Succeeded
    }
}

/// Aggregate of every outcome in a batch, in discovery order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    pub task: TaskName,
    pub format: FormatName,
    /// Resolved quality; absent for lossless formats.
    pub quality: Option<u8>,
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub outcomes: Vec<ProcessingOutcome>,
}

impl BatchReport {
    pub fn new(
        task: TaskName,
        format: FormatName,
        quality: Option<u8>,
        outcomes: Vec<ProcessingOutcome>,
    ) -> Self {
        let succeeded = outcomes.iter().filter(|o| o.is_success()).count();
        Self {
            task,
            format,
            quality,
            total: outcomes.len(),
            succeeded,
            failed: outcomes.len() - succeeded,
            outcomes,
        }
    }

    /// Failed outcomes, in discovery order.
    pub fn failures(&self) -> impl Iterator<Item = &ProcessingOutcome> {
        self.outcomes.iter().filter(|o| !o.is_success())
    }

    pub fn all_succeeded(&self) -> bool {
        self.failed == 0
    }

    /// Write the report as pretty-printed JSON.
    pub fn write_json(&self, path: &Path) -> Result<(), ReportError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn record(name: &str) -> ImageRecord {
        ImageRecord {
            source_path: PathBuf::from("in").join(name),
            relative_name: name.to_string(),
        }
    }

    fn mixed_report() -> BatchReport {
        BatchReport::new(
            TaskName::Resize,
            FormatName::Webp,
            Some(80),
            vec![
                ProcessingOutcome::succeeded(&record("a.png"), PathBuf::from("out/a.webp")),
                ProcessingOutcome::failed(&record("b.png"), Stage::Decode, "corrupt"),
                ProcessingOutcome::succeeded(&record("c.png"), PathBuf::from("out/c.webp")),
            ],
        )
    }

    #[test]
    fn counts_are_derived_from_outcomes() {
        let report = mixed_report();
        assert_eq!(report.total, 3);
        assert_eq!(report.succeeded, 2);
        assert_eq!(report.failed, 1);
        assert!(!report.all_succeeded());
    }

    #[test]
    fn empty_report_is_success() {
        let report = BatchReport::new(TaskName::Blur, FormatName::Png, None, vec![]);
        assert_eq!(report.total, 0);
        assert!(report.all_succeeded());
    }

    #[test]
    fn failures_keep_order() {
        let report = mixed_report();
        let names: Vec<&str> = report
            .failures()
            .map(|o| o.relative_name.as_str())
            .collect();
        assert_eq!(names, vec!["b.png"]);
    }

    #[test]
    fn failed_outcome_has_no_output() {
        let outcome = ProcessingOutcome::failed(&record("x.png"), Stage::Encode, "disk full");
        assert_eq!(outcome.output_path, None);
        assert_eq!(outcome.stage, Some(Stage::Encode));
        assert_eq!(outcome.error_detail.as_deref(), Some("disk full"));
    }

    #[test]
    fn json_shape() {
        let value = serde_json::to_value(mixed_report()).unwrap();
        assert_eq!(value["task"], "resize");
        assert_eq!(value["format"], "webp");
        assert_eq!(value["quality"], 80);
        assert_eq!(value["failed"], 1);
        assert_eq!(value["outcomes"][0]["status"], "succeeded");
        assert!(value["outcomes"][0].get("stage").is_none());
        assert_eq!(value["outcomes"][1]["status"], "failed");
        assert_eq!(value["outcomes"][1]["stage"], "decode");
        assert!(value["outcomes"][1].get("output_path").is_none());
    }

    #[test]
    fn write_json_to_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("report.json");
        mixed_report().write_json(&path).unwrap();

        let parsed: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed["total"], 3);
    }
}
