//! # imgbatch
//!
//! Batch image transformer: apply one task (resize, grayscale, rotate, blur)
//! to every file in a folder and write the results as JPEG, WebP or PNG.
//!
//! # Architecture
//!
//! ```text
//! BatchConfig ─┐
//! Settings ────┼─> validate ─> scan ─> naming ─> per file: decode → filter → encode
//!              │                                              │
//!              └──────────────────────────────────────────────┴─> BatchReport
//! ```
//!
//! The engine is a library; the `imgbatch` binary only parses arguments,
//! installs logging and prints what the engine reports. A batch either aborts
//! before touching any file (bad configuration, missing or non-empty output
//! directory) or completes, with each file's success or failure recorded in
//! the [`report::BatchReport`]. One bad file never stops the others.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | Task/format names, `BatchConfig`, TOML `Settings` loading and merging |
//! | [`validate`] | Input/output directory preconditions |
//! | [`scan`] | Input discovery in file-name order |
//! | [`naming`] | `<stem>.<format>` output names and collision detection |
//! | [`imaging`] | Codec trait, built-in codec, filter registry, encoding policy |
//! | [`process`] | Batch orchestration, failure isolation, optional worker pool |
//! | [`report`] | Per-file outcomes and the serializable batch report |
//! | [`output`] | CLI output formatting |
//! | [`logging`] | `tracing` subscriber setup |
//!
//! # Example
//!
//! ```no_run
//! use imgbatch::config::{BatchConfig, FormatName, Settings, TaskName};
//! use imgbatch::process::run_batch;
//!
//! let config = BatchConfig::new("photos", "out", TaskName::Resize, FormatName::Webp, Some(80))?;
//! let report = run_batch(&config, &Settings::default(), None)?;
//! println!("{} of {} succeeded", report.succeeded, report.total);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;
pub mod imaging;
pub mod logging;
pub mod naming;
pub mod output;
pub mod process;
pub mod report;
pub mod scan;
pub mod validate;

#[cfg(test)]
pub(crate) mod test_helpers;
