//! Batch orchestration.
//!
//! Runs every discovered input file through the pipeline:
//!
//! ```text
//! Discovered → Decoding → Filtering → Encoding → Succeeded | Failed
//! ```
//!
//! ## Failure Isolation
//!
//! A decode error, filter error, output collision or write error for one file
//! is recorded as that file's [`ProcessingOutcome`] and the batch moves on.
//! There is no retry. Only batch-level problems abort the run, and they are all
//! checked before the first file is decoded:
//!
//! - invalid [`Settings`]
//! - [`PreconditionError`]: missing input, missing or non-empty output
//! - input directory listing failure
//!
//! ## Parallel Processing
//!
//! Sequential by default. With `processing.parallel` enabled, files run on a
//! dedicated [rayon](https://docs.rs/rayon) pool sized by
//! [`effective_threads`]. Outcomes are collected by index, so the report is in
//! discovery order either way. Workers share only read-only configuration;
//! each writes to its own output path, which [`plan_outputs`] guarantees is
//! unique within the batch.
//!
//! ## Progress Events
//!
//! When a channel is supplied, a [`ProcessEvent`] is sent when the batch starts
//! and after each file. The CLI prints them from a separate thread; the engine
//! never writes to stdout.

use crate::config::{BatchConfig, ConfigError, FormatName, Settings, TaskName, effective_threads};
use crate::imaging::{
    CodecError, EncodeParams, FilterError, FilterParams, ImageCodec, RustCodec, encoding, filters,
};
use crate::naming::{OutputPlan, plan_outputs};
use crate::report::{BatchReport, ProcessingOutcome, Stage};
use crate::scan::{ImageRecord, ScanError, discover};
use crate::validate::{PreconditionError, validate_paths};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that abort a whole batch.
#[derive(Error, Debug)]
pub enum BatchError {
    #[error(transparent)]
    Precondition(#[from] PreconditionError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Scan(#[from] ScanError),
    #[error("Cannot start worker pool: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),
}

/// Why a single file failed. Never escapes the orchestrator.
#[derive(Error, Debug)]
pub enum FileError {
    #[error(transparent)]
    Decode(CodecError),
    #[error(transparent)]
    Filter(FilterError),
    #[error(transparent)]
    Encode(CodecError),
    #[error("Output {name} is already claimed by {claimed_by}")]
    Collision { name: String, claimed_by: String },
}

impl FileError {
    pub fn stage(&self) -> Stage {
        match self {
            FileError::Decode(_) => Stage::Decode,
            FileError::Filter(_) => Stage::Filter,
            FileError::Encode(_) | FileError::Collision { .. } => Stage::Encode,
        }
    }
}

/// Progress events emitted while a batch runs.
#[derive(Debug, Clone)]
pub enum ProcessEvent {
    BatchStarted {
        total: usize,
        task: TaskName,
        format: FormatName,
        quality: Option<u8>,
        workers: usize,
    },
    /// A file reached a terminal state. `index` is its 0-based discovery position.
    FileFinished {
        index: usize,
        total: usize,
        outcome: ProcessingOutcome,
    },
}

/// Read-only inputs shared by every per-file pipeline.
struct Pipeline<'a, C: ImageCodec> {
    codec: &'a C,
    output_dir: &'a Path,
    task: TaskName,
    filter_params: FilterParams,
    encode_params: EncodeParams,
}

impl<C: ImageCodec> Pipeline<'_, C> {
    fn run(&self, record: &ImageRecord, plan: &OutputPlan) -> Result<PathBuf, FileError> {
        let name = match plan {
            OutputPlan::Claimed(name) => name,
            OutputPlan::Collision { name, claimed_by } => {
                return Err(FileError::Collision {
                    name: name.clone(),
                    claimed_by: claimed_by.clone(),
                });
            }
        };

        let decoded = self
            .codec
            .decode(&record.source_path)
            .map_err(FileError::Decode)?;
        debug!(
            file = %record.relative_name,
            width = decoded.image.width(),
            height = decoded.image.height(),
            orientation = ?decoded.orientation,
            "decoded"
        );

        let transformed =
            filters::apply(self.task, decoded, &self.filter_params).map_err(FileError::Filter)?;
        debug!(file = %record.relative_name, task = %self.task, "filtered");

        let dest = self.output_dir.join(name);
        self.codec
            .encode(&transformed, &self.encode_params, &dest)
            .map_err(FileError::Encode)?;
        debug!(file = %record.relative_name, output = %dest.display(), "encoded");

        Ok(dest)
    }

    fn outcome(&self, record: &ImageRecord, plan: &OutputPlan) -> ProcessingOutcome {
        match self.run(record, plan) {
            Ok(dest) => ProcessingOutcome::succeeded(record, dest),
            Err(e) => {
                warn!(
                    file = %record.relative_name,
                    stage = %e.stage(),
                    error = %e,
                    "file failed"
                );
                ProcessingOutcome::failed(record, e.stage(), e.to_string())
            }
        }
    }
}

/// Run a batch with the built-in codec.
pub fn run_batch(
    config: &BatchConfig,
    settings: &Settings,
    events: Option<Sender<ProcessEvent>>,
) -> Result<BatchReport, BatchError> {
    run_batch_with_codec(&RustCodec::new(), config, settings, events)
}

/// Run a batch with a specific codec (allows testing with a mock).
pub fn run_batch_with_codec(
    codec: &impl ImageCodec,
    config: &BatchConfig,
    settings: &Settings,
    events: Option<Sender<ProcessEvent>>,
) -> Result<BatchReport, BatchError> {
    settings.validate()?;
    validate_paths(&config.input_dir, &config.output_dir)?;
    let records = discover(&config.input_dir)?;

    let encode_params = encoding::resolve(config.format, config.quality);
    let plans = plan_outputs(
        records.iter().map(|r| r.relative_name.as_str()),
        config.format,
    );
    let workers = effective_threads(&settings.processing);
    let total = records.len();

    info!(
        input = %config.input_dir.display(),
        output = %config.output_dir.display(),
        task = %config.task,
        format = %config.format,
        quality = ?encode_params.quality(),
        files = total,
        workers,
        "batch started"
    );
    if let Some(tx) = &events {
        tx.send(ProcessEvent::BatchStarted {
            total,
            task: config.task,
            format: config.format,
            quality: encode_params.quality(),
            workers,
        })
        .ok();
    }

    let pipeline = Pipeline {
        codec,
        output_dir: &config.output_dir,
        task: config.task,
        filter_params: settings.filter_params(),
        encode_params,
    };
    let jobs: Vec<(usize, &ImageRecord, &OutputPlan)> = records
        .iter()
        .zip(&plans)
        .enumerate()
        .map(|(i, (record, plan))| (i, record, plan))
        .collect();

    let process_one = |&(index, record, plan): &(usize, &ImageRecord, &OutputPlan)| {
        let outcome = pipeline.outcome(record, plan);
        if let Some(tx) = &events {
            tx.send(ProcessEvent::FileFinished {
                index,
                total,
                outcome: outcome.clone(),
            })
            .ok();
        }
        outcome
    };

    let outcomes: Vec<ProcessingOutcome> = if workers > 1 {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .build()?;
        pool.install(|| jobs.par_iter().map(process_one).collect())
    } else {
        jobs.iter().map(process_one).collect()
    };

    let report = BatchReport::new(config.task, config.format, encode_params.quality(), outcomes);
    info!(
        total = report.total,
        succeeded = report.succeeded,
        failed = report.failed,
        "batch finished"
    );
    Ok(report)
}
