use std::path::PathBuf;
use thiserror::Error;

use crate::check::CheckReport;

/// The main error type for trifold operations.
#[derive(Debug, Error)]
pub enum TrifoldError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Source path {path} is not a directory")]
    SourceNotADirectory { path: PathBuf },

    #[error("Failed while scanning {path}: {message}")]
    Scan { path: PathBuf, message: String },

    #[error("Failed to read class names from {path}: {source}")]
    LabelFileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse class names from {path}: {source}")]
    LabelFileParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("No usable image records found in {path}")]
    EmptyDataset { path: PathBuf },

    #[error("Invalid split fractions: {message}")]
    InvalidSplitFractions { message: String },

    #[error("Failed to copy {src} to {dest}: {source}")]
    CopyFailed {
        src: PathBuf,
        dest: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize report as JSON: {0}")]
    ReportJson(#[from] serde_json::Error),

    #[error("Check failed with {error_count} error(s) and {warning_count} warning(s)")]
    CheckFailed {
        error_count: usize,
        warning_count: usize,
        report: CheckReport,
    },

    #[error("Unsupported option: {0}")]
    UnsupportedOption(String),
}
