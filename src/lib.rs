//! Trifold: stratified train/val/test splitting for image datasets.
//!
//! Trifold takes a directory of labelled images, shuffles each class
//! independently, and copies the records into a `train/ val/ test/` tree in
//! the requested proportions. The source is scanned, never modified.
//!
//! # Modules
//!
//! - [`dataset`]: Source discovery, label resolution, and class grouping
//! - [`split`]: Split planning and execution
//! - [`inspect`]: Source statistics without copying
//! - [`check`]: Verification of an existing split tree
//! - [`error`]: Error types for trifold operations

pub mod check;
pub mod dataset;
pub mod error;
pub mod inspect;
pub mod split;

use std::fmt;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;

pub use error::TrifoldError;

/// The trifold CLI application.
#[derive(Parser)]
#[command(name = "trifold")]
#[command(version, about)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Split a source dataset into train/val/test trees.
    Split(SplitArgs),

    /// Report class distribution and pairing diagnostics without copying.
    Inspect(InspectArgs),

    /// Verify the structure of an existing split tree.
    Check(CheckArgs),
}

/// Arguments for the split subcommand.
#[derive(clap::Args)]
struct SplitArgs {
    /// Source directory containing the raw dataset.
    source: PathBuf,

    /// Destination root for the train/, val/ and test/ trees.
    #[arg(short, long, default_value = ".")]
    out: PathBuf,

    /// Fraction of each class assigned to train.
    #[arg(long, default_value_t = split::DEFAULT_TRAIN_FRACTION)]
    train: f64,

    /// Fraction of each class assigned to val; test takes the remainder.
    #[arg(long, default_value_t = split::DEFAULT_VAL_FRACTION)]
    val: f64,

    /// Seed for the shuffle; omit for a different split every run.
    #[arg(long)]
    seed: Option<u64>,

    /// Source layout ('auto', 'flat', or 'class-dirs').
    #[arg(long, default_value = "auto")]
    layout: String,

    /// Class-name file; defaults to data.yaml or classes.txt in the source.
    #[arg(long)]
    classes: Option<PathBuf>,

    /// Plan and report without copying anything.
    #[arg(long)]
    dry_run: bool,

    /// Output format for the report ('text' or 'json').
    #[arg(long, default_value = "text")]
    output: String,
}

/// Arguments for the inspect subcommand.
#[derive(clap::Args)]
struct InspectArgs {
    /// Source directory to inspect.
    source: PathBuf,

    /// Source layout ('auto', 'flat', or 'class-dirs').
    #[arg(long, default_value = "auto")]
    layout: String,

    /// Class-name file; defaults to data.yaml or classes.txt in the source.
    #[arg(long)]
    classes: Option<PathBuf>,

    /// Number of classes to show in the histogram.
    #[arg(long, default_value_t = 10)]
    top: usize,

    /// Probe matched images for pixel dimensions.
    #[arg(long)]
    dimensions: bool,

    /// Output format for the report ('text' or 'json').
    #[arg(long, default_value = "text")]
    output: String,
}

/// Arguments for the check subcommand.
#[derive(clap::Args)]
struct CheckArgs {
    /// Root of an existing split tree (contains train/, val/, test/).
    root: PathBuf,

    /// Treat warnings as errors (exit non-zero if any warnings).
    #[arg(long)]
    strict: bool,

    /// Output format for the report ('text' or 'json').
    #[arg(long, default_value = "text")]
    output: String,
}

/// Run the trifold CLI.
///
/// This is the main entry point for the CLI, called from `main.rs`.
pub fn run() -> Result<(), TrifoldError> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Split(args)) => run_split(args),
        Some(Commands::Inspect(args)) => run_inspect(args),
        Some(Commands::Check(args)) => run_check(args),
        None => {
            // No subcommand: print a short banner and exit successfully
            println!("trifold {}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("Stratified train/val/test splitting for image datasets.");
            println!();
            println!("Run 'trifold --help' for usage information.");
            Ok(())
        }
    }
}

/// Execute the split subcommand.
fn run_split(args: SplitArgs) -> Result<(), TrifoldError> {
    let layout = resolve_layout(&args.layout, &args.source)?;
    let label_map = load_label_map(args.classes.as_deref(), &args.source)?;

    info!("scanning {} ({} layout)", args.source.display(), layout);
    let dataset::ScanOutcome { grouping, skipped } =
        dataset::scan_source(&args.source, layout, &label_map)?;

    let opts = split::SplitOptions {
        ratios: split::SplitRatios {
            train: args.train,
            val: args.val,
        },
        seed: args.seed,
    };
    let plan = split::plan_split(grouping, &opts)?;

    let files_copied = if args.dry_run {
        None
    } else {
        Some(split::write_split_tree(&plan, &args.out)?.files_copied)
    };

    let report = split::SplitReport {
        source: args.source.clone(),
        dest: args.out.clone(),
        layout: layout.name().to_string(),
        label_source: label_map.source().to_string(),
        ratios: opts.ratios,
        seed: opts.seed,
        dry_run: args.dry_run,
        classes: split::ClassCounts::from_plan(&plan),
        totals: split::SplitCounts::from_plan(&plan),
        skipped,
        files_copied,
    };

    emit_report(&report, &args.output)
}

/// Execute the inspect subcommand.
fn run_inspect(args: InspectArgs) -> Result<(), TrifoldError> {
    let layout = resolve_layout(&args.layout, &args.source)?;
    let label_map = load_label_map(args.classes.as_deref(), &args.source)?;

    let opts = inspect::InspectOptions {
        top_labels: args.top,
        probe_dimensions: args.dimensions,
        ..inspect::InspectOptions::default()
    };
    let report = inspect::inspect_source(&args.source, layout, &label_map, &opts)?;

    emit_report(&report, &args.output)
}

/// Execute the check subcommand.
fn run_check(args: CheckArgs) -> Result<(), TrifoldError> {
    let report = check::check_split_tree(&args.root)?;
    emit_report(&report, &args.output)?;

    // Determine exit status
    let has_errors = report.error_count() > 0;
    let has_warnings = report.warning_count() > 0;

    if has_errors || (args.strict && has_warnings) {
        Err(TrifoldError::CheckFailed {
            error_count: report.error_count(),
            warning_count: report.warning_count(),
            report,
        })
    } else {
        Ok(())
    }
}

fn resolve_layout(raw: &str, source: &Path) -> Result<dataset::SourceLayout, TrifoldError> {
    match raw {
        "auto" => dataset::detect_layout(source),
        "flat" => Ok(dataset::SourceLayout::Flat),
        "class-dirs" => Ok(dataset::SourceLayout::ClassFolders),
        other => Err(TrifoldError::UnsupportedOption(format!(
            "--layout '{}' (supported: auto, flat, class-dirs)",
            other
        ))),
    }
}

fn load_label_map(
    classes: Option<&Path>,
    source: &Path,
) -> Result<dataset::LabelMap, TrifoldError> {
    match classes {
        Some(path) => dataset::LabelMap::from_classes_txt(path),
        None => dataset::LabelMap::discover(source),
    }
}

fn emit_report<R>(report: &R, output: &str) -> Result<(), TrifoldError>
where
    R: fmt::Display + Serialize,
{
    match output {
        "json" => println!("{}", serde_json::to_string_pretty(report)?),
        _ => print!("{report}"),
    }

    Ok(())
}
