//! Core model for images grouped by class.
//!
//! Everything downstream of the source scan works on these types: a scan
//! produces a [`ClassGrouping`] of matched records plus the list of records
//! it had to skip, and the split planner consumes the grouping.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

/// A resolved class name, such as `"Healthy"` or the synthesized `"class_3"`.
///
/// Labels double as directory names in the output tree, so they are kept as
/// plain strings rather than numeric IDs.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClassLabel(String);

impl ClassLabel {
    /// Creates a new ClassLabel.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the label as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ClassLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ClassLabel({})", self.0)
    }
}

impl fmt::Display for ClassLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ClassLabel {
    fn from(name: &str) -> Self {
        ClassLabel::new(name)
    }
}

impl From<String> for ClassLabel {
    fn from(name: String) -> Self {
        ClassLabel::new(name)
    }
}

/// One image file that matched a class during the source scan.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ImageRecord {
    /// Full path to the image in the source tree.
    pub path: PathBuf,

    /// Bare file name, reused as the destination name when copying.
    pub file_name: String,
}

impl ImageRecord {
    /// Creates a new image record.
    pub fn new(path: impl Into<PathBuf>, file_name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            file_name: file_name.into(),
        }
    }
}

/// Matched image records keyed by their resolved class label.
///
/// A `BTreeMap` keeps class iteration order stable, so reports and the
/// planner walk classes in the same order on every run.
#[derive(Clone, Debug, Default)]
pub struct ClassGrouping {
    /// Records per class, in label order.
    pub groups: BTreeMap<ClassLabel, Vec<ImageRecord>>,
}

impl ClassGrouping {
    /// Creates an empty grouping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a record under the given class.
    pub fn insert(&mut self, label: ClassLabel, record: ImageRecord) {
        self.groups.entry(label).or_default().push(record);
    }

    /// Number of distinct classes.
    pub fn class_count(&self) -> usize {
        self.groups.len()
    }

    /// Total number of records across all classes.
    pub fn record_count(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    /// Returns true when no records matched at all.
    pub fn is_empty(&self) -> bool {
        self.groups.values().all(Vec::is_empty)
    }
}

/// Why a discovered image was left out of the grouping.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// No annotation file shares the image's stem.
    MissingAnnotation,

    /// The annotation file's first line holds no class token.
    EmptyAnnotation,

    /// The annotation file could not be read.
    UnreadableAnnotation,

    /// Another image with the same stem was already kept.
    DuplicateStem,
}

impl SkipReason {
    /// Short human-readable description used in reports.
    pub fn describe(&self) -> &'static str {
        match self {
            SkipReason::MissingAnnotation => "no matching annotation file",
            SkipReason::EmptyAnnotation => "annotation has no class token",
            SkipReason::UnreadableAnnotation => "annotation could not be read",
            SkipReason::DuplicateStem => "another image shares this stem",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.describe())
    }
}

/// An image the scan discovered but excluded, with the reason.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SkippedRecord {
    /// Path of the excluded image.
    pub path: PathBuf,

    /// Why it was excluded.
    pub reason: SkipReason,
}

impl SkippedRecord {
    /// Creates a new skipped-record entry.
    pub fn new(path: impl Into<PathBuf>, reason: SkipReason) -> Self {
        Self {
            path: path.into(),
            reason,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grouping_counts() {
        let mut grouping = ClassGrouping::new();
        grouping.insert(
            ClassLabel::new("healthy"),
            ImageRecord::new("/data/a.jpg", "a.jpg"),
        );
        grouping.insert(
            ClassLabel::new("healthy"),
            ImageRecord::new("/data/b.jpg", "b.jpg"),
        );
        grouping.insert(
            ClassLabel::new("rust"),
            ImageRecord::new("/data/c.jpg", "c.jpg"),
        );

        assert_eq!(grouping.class_count(), 2);
        assert_eq!(grouping.record_count(), 3);
        assert!(!grouping.is_empty());
    }

    #[test]
    fn test_grouping_iterates_in_label_order() {
        let mut grouping = ClassGrouping::new();
        for label in ["zeta", "alpha", "mid"] {
            grouping.insert(
                ClassLabel::new(label),
                ImageRecord::new(format!("/data/{label}.jpg"), format!("{label}.jpg")),
            );
        }

        let order: Vec<&str> = grouping.groups.keys().map(ClassLabel::as_str).collect();
        assert_eq!(order, vec!["alpha", "mid", "zeta"]);
    }

    #[test]
    fn test_empty_grouping() {
        let grouping = ClassGrouping::new();
        assert!(grouping.is_empty());
        assert_eq!(grouping.record_count(), 0);
    }

    #[test]
    fn test_label_ordering_and_display() {
        assert!(ClassLabel::new("apple") < ClassLabel::new("pear"));
        assert_eq!(ClassLabel::new("class_3").to_string(), "class_3");
    }

    #[test]
    fn test_skip_reason_describe() {
        assert_eq!(
            SkipReason::MissingAnnotation.describe(),
            "no matching annotation file"
        );
        assert_eq!(
            SkippedRecord::new("/data/x.jpg", SkipReason::EmptyAnnotation)
                .reason
                .to_string(),
            "annotation has no class token"
        );
    }
}
