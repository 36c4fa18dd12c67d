use clap::{Args, Parser, Subcommand};
use imgbatch::config::{self, BatchConfig, ConfigError, FormatName, ProcessingConfig, Settings};
use imgbatch::report::{BatchReport, ReportError};
use imgbatch::{logging, naming, output, process, scan, validate};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Batch finished and every file succeeded.
const EXIT_OK: u8 = 0;
/// Batch aborted before any file was processed.
const EXIT_ABORTED: u8 = 1;
/// Batch finished with at least one failed file.
const EXIT_FAILURES: u8 = 2;
/// Batch finished but the `--report` file could not be written.
const EXIT_REPORT_NOT_WRITTEN: u8 = 3;

#[derive(Parser)]
#[command(name = "imgbatch")]
#[command(about = "Batch image transformer")]
#[command(long_about = "\
Batch image transformer

Applies one task to every file directly inside INPUT and writes one output
per file into OUTPUT, named <stem>.<format>.

Tasks:
  resize     Fit inside 128x128 (or the [resize] settings), Lanczos3
  grayscale  Convert to luminance
  rotate     Apply the EXIF orientation to the pixels (no-op without EXIF)
  blur       Gaussian blur (sigma from [blur] settings, default 2.0)

Formats: jpeg (progressive, default quality 85), webp (default quality 80),
png (lossless, --quality ignored).

OUTPUT must already exist and be empty. A file that cannot be decoded,
transformed or written is reported and skipped; the rest of the batch
continues.

Exit codes: 0 all files succeeded, 1 batch aborted, 2 some files failed,
3 batch finished but the --report file could not be written.

Run 'imgbatch gen-config' to generate a documented settings file.")]
#[command(version)]
struct Cli {
    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Process every file in INPUT into OUTPUT
    Run(RunArgs),
    /// Validate directories and show the planned outputs without processing
    Check(CheckArgs),
    /// Print a stock settings file with all options documented
    GenConfig,
}

#[derive(Args)]
struct RunArgs {
    /// Directory containing the source images
    input: PathBuf,
    /// Existing, empty directory for the results
    output: PathBuf,
    /// Transform to apply: resize, grayscale, rotate or blur
    #[arg(short, long)]
    task: String,
    /// Output encoding: jpeg, webp or png
    #[arg(short, long, default_value = "jpeg")]
    format: String,
    /// Lossy quality 0-100 (defaults: jpeg 85, webp 80; ignored for png)
    #[arg(short, long, allow_hyphen_values = true)]
    quality: Option<String>,
    /// Settings file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Number of parallel workers (overrides [processing] settings)
    #[arg(short, long)]
    jobs: Option<usize>,
    /// Write the full batch report as JSON to this path
    #[arg(long)]
    report: Option<PathBuf>,
}

#[derive(Args)]
struct CheckArgs {
    /// Directory containing the source images
    input: PathBuf,
    /// Existing, empty directory for the results
    output: PathBuf,
    /// Output encoding used to plan file names
    #[arg(short, long, default_value = "jpeg")]
    format: String,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.json_logs);

    match cli.command {
        Command::Run(args) => match run(&args) {
            Ok(report) => {
                output::print_report(&report);
                let saved = match &args.report {
                    Some(path) => save_report(&report, path),
                    None => Ok(()),
                };
                ExitCode::from(completed_exit_code(&report, &saved))
            }
            Err(e) => {
                output::print_aborted(e.as_ref());
                ExitCode::from(EXIT_ABORTED)
            }
        },
        Command::Check(args) => match check(&args) {
            Ok(()) => ExitCode::from(EXIT_OK),
            Err(e) => {
                output::print_aborted(e.as_ref());
                ExitCode::from(EXIT_ABORTED)
            }
        },
        Command::GenConfig => {
            print!("{}", config::stock_settings_toml());
            ExitCode::from(EXIT_OK)
        }
    }
}

fn run(args: &RunArgs) -> Result<BatchReport, Box<dyn std::error::Error>> {
    let batch = BatchConfig::new(
        &args.input,
        &args.output,
        args.task.parse()?,
        args.format.parse()?,
        args.quality.as_deref().map(config::parse_quality).transpose()?,
    )?;
    let mut settings = load_settings(args.config.as_deref())?;
    if let Some(jobs) = args.jobs {
        settings.processing = jobs_override(jobs)?;
    }

    let (tx, rx) = std::sync::mpsc::channel();
    let printer = std::thread::spawn(move || {
        for event in rx {
            for line in output::format_process_event(&event) {
                println!("{}", line);
            }
        }
    });
    let result = process::run_batch(&batch, &settings, Some(tx));
    // The sender is dropped with the batch, so the printer drains and exits.
    let _ = printer.join();
    Ok(result?)
}

fn save_report(report: &BatchReport, path: &Path) -> Result<(), ReportError> {
    let saved = report.write_json(path);
    if let Err(e) = &saved {
        output::print_report_not_written(path, e);
    }
    saved
}

/// Exit code of a batch that ran to completion. An unwritten report takes
/// precedence over file failures.
fn completed_exit_code(report: &BatchReport, saved: &Result<(), ReportError>) -> u8 {
    if saved.is_err() {
        EXIT_REPORT_NOT_WRITTEN
    } else if report.all_succeeded() {
        EXIT_OK
    } else {
        EXIT_FAILURES
    }
}

fn check(args: &CheckArgs) -> Result<(), Box<dyn std::error::Error>> {
    let format: FormatName = args.format.parse()?;
    validate::validate_paths(&args.input, &args.output)?;
    let records = scan::discover(&args.input)?;
    let plans = naming::plan_outputs(records.iter().map(|r| r.relative_name.as_str()), format);
    output::print_check_output(&args.input, &args.output, &records, &plans, format);
    Ok(())
}

fn load_settings(path: Option<&Path>) -> Result<Settings, ConfigError> {
    match path {
        Some(p) => config::load_settings(p),
        None => config::resolve_settings(None),
    }
}

fn jobs_override(jobs: usize) -> Result<ProcessingConfig, ConfigError> {
    if jobs == 0 {
        return Err(ConfigError::Validation("--jobs must be at least 1".into()));
    }
    Ok(ProcessingConfig {
        parallel: jobs > 1,
        max_processes: Some(jobs),
    })
}
