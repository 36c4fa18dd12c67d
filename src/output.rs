//! CLI output formatting.
//!
//! # Output Format
//!
//! ## Run
//!
//! ```text
//! Processing 4 files: resize → webp (quality 80)
//! 001 a.png → a.webp
//! 002 b.png failed at decode
//!         Decode failed: b.png: Format error decoding Png: ...
//! 003 c.png → c.webp
//! 004 d.png → d.webp
//!
//! Processing complete with 1 of 4 failures
//!     Task: resize
//!     Format: WEBP
//!     Quality: 80
//!     Succeeded: 3/4
//! Failed files:
//!     b.png (decode): Decode failed: ...
//! ```
//!
//! At most [`MAX_LISTED_ERRORS`] failures are listed in the summary; the rest
//! are counted. Every failure is still shown in full on its progress line and
//! in the JSON report.
//!
//! ## Aborted
//!
//! ```text
//! Batch aborted: Output directory is not empty: out/
//! ```
//!
//! An aborted batch means the invocation needs fixing; a completed batch with
//! failures means individual files need inspecting.
//!
//! ## Check
//!
//! ```text
//! Input: photos/ (3 files)
//!     001 a.png → a.webp
//!     002 photo.jpg → photo.webp
//!     003 photo.png → photo.webp (collides with photo.jpg)
//! Output: out/ (empty, webp output)
//! ```
//!
//! # Architecture
//!
//! Each view has a `format_*` function (returns `Vec<String>`) for testability
//! and a `print_*` wrapper that writes to stdout. Format functions do no I/O.

use crate::config::FormatName;
use crate::naming::OutputPlan;
use crate::process::ProcessEvent;
use crate::report::{BatchReport, ProcessingOutcome};
use crate::scan::ImageRecord;
use std::path::Path;

/// Failures listed by name in the summary.
pub const MAX_LISTED_ERRORS: usize = 5;

// ============================================================================
// Shared helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn quality_label(quality: Option<u8>) -> String {
    match quality {
        Some(q) => format!("quality {q}"),
        None => "lossless".to_string(),
    }
}

// ============================================================================
// Run: progress
// ============================================================================

/// Format a single progress event for display.
pub fn format_process_event(event: &ProcessEvent) -> Vec<String> {
    match event {
        ProcessEvent::BatchStarted {
            total,
            task,
            format,
            quality,
            workers,
        } => {
            let noun = if *total == 1 { "file" } else { "files" };
            let mut line = format!(
                "Processing {total} {noun}: {task} \u{2192} {format} ({})",
                quality_label(*quality)
            );
            if *workers > 1 {
                line.push_str(&format!(" on {workers} workers"));
            }
            vec![line]
        }
        ProcessEvent::FileFinished { index, outcome, .. } => {
            format_outcome_lines(*index + 1, outcome)
        }
    }
}

fn format_outcome_lines(position: usize, outcome: &ProcessingOutcome) -> Vec<String> {
    let header = format!("{} {}", format_index(position), outcome.relative_name);
    match (&outcome.output_path, outcome.stage) {
        (Some(output), _) => vec![format!("{header} \u{2192} {}", file_name(output))],
        (None, stage) => {
            let stage = stage.map(|s| s.to_string()).unwrap_or_default();
            let mut lines = vec![format!("{header} failed at {stage}")];
            if let Some(detail) = &outcome.error_detail {
                lines.push(format!("{}{}", indent(2), detail));
            }
            lines
        }
    }
}

// ============================================================================
// Run: summary
// ============================================================================

/// Format the end-of-batch summary.
pub fn format_report(report: &BatchReport) -> Vec<String> {
    let mut lines = Vec::new();
    if report.all_succeeded() {
        lines.push("Processing complete".to_string());
    } else {
        lines.push(format!(
            "Processing complete with {} of {} failures",
            report.failed, report.total
        ));
    }
    lines.push(format!("{}Task: {}", indent(1), report.task));
    lines.push(format!(
        "{}Format: {}",
        indent(1),
        report.format.as_str().to_uppercase()
    ));
    if let Some(q) = report.quality {
        lines.push(format!("{}Quality: {q}", indent(1)));
    }
    lines.push(format!(
        "{}Succeeded: {}/{}",
        indent(1),
        report.succeeded,
        report.total
    ));

    if !report.all_succeeded() {
        lines.push("Failed files:".to_string());
        for outcome in report.failures().take(MAX_LISTED_ERRORS) {
            let stage = outcome.stage.map(|s| s.to_string()).unwrap_or_default();
            let detail = outcome.error_detail.as_deref().unwrap_or("");
            lines.push(format!(
                "{}{} ({stage}): {detail}",
                indent(1),
                outcome.relative_name
            ));
        }
        if report.failed > MAX_LISTED_ERRORS {
            lines.push(format!(
                "{}... and {} more errors",
                indent(1),
                report.failed - MAX_LISTED_ERRORS
            ));
        }
    }
    lines
}

pub fn print_report(report: &BatchReport) {
    println!();
    for line in format_report(report) {
        println!("{}", line);
    }
}

/// Format a batch-level abort.
pub fn format_aborted(error: &dyn std::error::Error) -> String {
    format!("Batch aborted: {error}")
}

pub fn print_aborted(error: &dyn std::error::Error) {
    eprintln!("{}", format_aborted(error));
}

/// Format a report file that could not be saved after the batch completed.
pub fn format_report_not_written(path: &Path, error: &dyn std::error::Error) -> String {
    format!("Report not written to {}: {error}", path.display())
}

pub fn print_report_not_written(path: &Path, error: &dyn std::error::Error) {
    eprintln!("{}", format_report_not_written(path, error));
}

// ============================================================================
// Check
// ============================================================================

/// Format the dry-run view of a batch: what would be read and written.
pub fn format_check_output(
    input_dir: &Path,
    output_dir: &Path,
    records: &[ImageRecord],
    plans: &[OutputPlan],
    format: FormatName,
) -> Vec<String> {
    let noun = if records.len() == 1 { "file" } else { "files" };
    let mut lines = vec![format!(
        "Input: {} ({} {noun})",
        input_dir.display(),
        records.len()
    )];
    for (i, (record, plan)) in records.iter().zip(plans).enumerate() {
        let target = match plan {
            OutputPlan::Claimed(name) => name.clone(),
            OutputPlan::Collision { name, claimed_by } => {
                format!("{name} (collides with {claimed_by})")
            }
        };
        lines.push(format!(
            "{}{} {} \u{2192} {target}",
            indent(1),
            format_index(i + 1),
            record.relative_name
        ));
    }
    lines.push(format!(
        "Output: {} (empty, {} output)",
        output_dir.display(),
        format
    ));
    lines
}

pub fn print_check_output(
    input_dir: &Path,
    output_dir: &Path,
    records: &[ImageRecord],
    plans: &[OutputPlan],
    format: FormatName,
) {
    for line in format_check_output(input_dir, output_dir, records, plans, format) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================
