//! Check report types for structured split-tree verification.
//!
//! This module provides rich, structured check results that can be
//! displayed to users, written to files, or processed programmatically.

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

use crate::split::SplitCounts;

/// The result of checking a split tree.
///
/// Contains all issues found during the check, categorized by severity,
/// plus the file counts the walk observed.
#[derive(Clone, Debug, Default, Serialize)]
pub struct CheckReport {
    /// All issues found during the check.
    pub issues: Vec<CheckIssue>,

    /// Image files found per split.
    pub counts: SplitCounts,

    /// Distinct classes seen across all splits.
    pub classes: usize,
}

impl CheckReport {
    /// Creates a new empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an issue to the report.
    pub fn add(&mut self, issue: CheckIssue) {
        self.issues.push(issue);
    }

    /// Returns the number of errors in the report.
    pub fn error_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == Severity::Error)
            .count()
    }

    /// Returns the number of warnings in the report.
    pub fn warning_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == Severity::Warning)
            .count()
    }

    /// Returns true if there are no errors.
    pub fn is_ok(&self) -> bool {
        self.error_count() == 0
    }

    /// Returns true if there are no issues at all.
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

impl fmt::Display for CheckReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Checked {} file(s) across {} class(es) (train {} / val {} / test {})",
            self.counts.total, self.classes, self.counts.train, self.counts.val, self.counts.test
        )?;

        if self.issues.is_empty() {
            return writeln!(f, "Check passed: no issues found");
        }

        writeln!(
            f,
            "Check completed with {} error(s) and {} warning(s):",
            self.error_count(),
            self.warning_count()
        )?;
        writeln!(f)?;

        for issue in &self.issues {
            writeln!(f, "  {}", issue)?;
        }

        Ok(())
    }
}

/// A single check issue (error or warning).
#[derive(Clone, Debug, Serialize)]
pub struct CheckIssue {
    /// The severity of the issue.
    pub severity: Severity,

    /// A stable code for the issue type.
    pub code: IssueCode,

    /// A human-readable description of the issue.
    pub message: String,

    /// Context about where the issue occurred.
    pub context: CheckContext,
}

impl CheckIssue {
    /// Creates a new check issue.
    pub fn new(
        severity: Severity,
        code: IssueCode,
        message: impl Into<String>,
        context: CheckContext,
    ) -> Self {
        Self {
            severity,
            code,
            message: message.into(),
            context,
        }
    }

    /// Creates a new error.
    pub fn error(code: IssueCode, message: impl Into<String>, context: CheckContext) -> Self {
        Self::new(Severity::Error, code, message, context)
    }

    /// Creates a new warning.
    pub fn warning(code: IssueCode, message: impl Into<String>, context: CheckContext) -> Self {
        Self::new(Severity::Warning, code, message, context)
    }
}

impl fmt::Display for CheckIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let severity = match self.severity {
            Severity::Error => "ERROR",
            Severity::Warning => "WARN ",
        };
        write!(
            f,
            "[{}] {:?} in {}: {}",
            severity, self.code, self.context, self.message
        )
    }
}

/// The severity of a check issue.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// A warning that may indicate a problem but does not fail the check.
    Warning,
    /// An error that indicates a broken split tree.
    Error,
}

/// A stable code identifying the type of check issue.
///
/// These codes can be used for filtering, ignoring specific issues,
/// or programmatic handling of check results.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueCode {
    /// A `train/`, `val/` or `test/` directory is missing.
    MissingSplitDir,

    /// No files were found in any split.
    EmptyTree,

    /// The same class/file pair appears in more than one split.
    DuplicateAcrossSplits,

    /// A class present in one split has no directory in another.
    ClassMissingFromSplit,

    /// A split directory exists but holds no files.
    EmptySplit,

    /// A file or directory that does not belong in the tree.
    StrayEntry,
}

/// Context about where a check issue occurred.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckContext {
    /// Issue with the tree as a whole.
    Tree,
    /// Issue with a specific split directory.
    Split { name: String },
    /// Issue with a class inside a split.
    Class { split: String, label: String },
    /// Issue with a specific filesystem entry.
    Entry { path: PathBuf },
}

impl fmt::Display for CheckContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckContext::Tree => write!(f, "tree"),
            CheckContext::Split { name } => write!(f, "split {}", name),
            CheckContext::Class { split, label } => write!(f, "class {}/{}", split, label),
            CheckContext::Entry { path } => write!(f, "entry {}", path.display()),
        }
    }
}
