//! Source inspection and statistics.
//!
//! Inspection runs the same scan a split would, then reports what it found
//! without copying anything: class distribution, skip diagnostics, and
//! optionally the pixel dimensions of the matched images.

mod report;

pub use report::{
    ClassCount, ClassesSection, DimensionStats, InspectReport, SkipCount, SummarySection,
};

use std::path::Path;

use crate::dataset::{scan_source, ClassGrouping, LabelMap, SkippedRecord, SourceLayout};
use crate::error::TrifoldError;

/// Options for source inspection.
#[derive(Clone, Debug)]
pub struct InspectOptions {
    /// Number of top classes to show in the histogram.
    pub top_labels: usize,
    /// Width of histogram bars (in characters).
    pub bar_width: usize,
    /// Probe matched images for pixel dimensions.
    pub probe_dimensions: bool,
}

impl Default for InspectOptions {
    fn default() -> Self {
        Self {
            top_labels: 10,
            bar_width: 20,
            probe_dimensions: false,
        }
    }
}

/// Inspect a source directory and produce a detailed report.
///
/// Uses the same layout handling and pairing rules as a split run, so the
/// numbers here are exactly what a split of the same source would see.
pub fn inspect_source(
    root: &Path,
    layout: SourceLayout,
    label_map: &LabelMap,
    opts: &InspectOptions,
) -> Result<InspectReport, TrifoldError> {
    let outcome = scan_source(root, layout, label_map)?;

    let summary = SummarySection {
        records: outcome.grouping.record_count(),
        classes: outcome.grouping.class_count(),
        named_classes: label_map.len(),
        skipped: outcome.skipped.len(),
    };

    let classes = compute_classes(&outcome.grouping, opts.top_labels);
    let skip_counts = compute_skip_counts(&outcome.skipped);

    let dimensions = if opts.probe_dimensions {
        Some(probe_dimensions(&outcome.grouping))
    } else {
        None
    };

    Ok(InspectReport {
        source: root.to_path_buf(),
        layout: layout.name().to_string(),
        label_source: label_map.source().to_string(),
        summary,
        classes,
        skip_counts,
        dimensions,
        bar_width: opts.bar_width,
    })
}

/// Compute the class distribution histogram.
fn compute_classes(grouping: &ClassGrouping, top_n: usize) -> ClassesSection {
    let mut counts: Vec<ClassCount> = grouping
        .groups
        .iter()
        .map(|(label, records)| ClassCount {
            label: label.as_str().to_string(),
            count: records.len(),
        })
        .collect();

    // Sort by count descending, then by name ascending for deterministic output
    counts.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.label.cmp(&b.label)));

    let total_distinct = counts.len();
    let total_records = grouping.record_count();
    let other_count = counts.iter().skip(top_n).map(|c| c.count).sum();
    counts.truncate(top_n);

    ClassesSection {
        top_n,
        total_distinct,
        total_records,
        entries: counts,
        other_count,
    }
}

fn compute_skip_counts(skipped: &[SkippedRecord]) -> Vec<SkipCount> {
    let mut counts: Vec<SkipCount> = Vec::new();

    for skip in skipped {
        match counts.iter_mut().find(|entry| entry.reason == skip.reason) {
            Some(entry) => entry.count += 1,
            None => counts.push(SkipCount {
                reason: skip.reason,
                count: 1,
            }),
        }
    }

    counts.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.reason.cmp(&b.reason)));
    counts
}

fn probe_dimensions(grouping: &ClassGrouping) -> DimensionStats {
    let mut stats = DimensionStats::default();

    for records in grouping.groups.values() {
        for record in records {
            match imagesize::size(&record.path) {
                Ok(size) => stats.observe(size.width, size.height),
                Err(_) => stats.failed += 1,
            }
        }
    }

    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{ClassLabel, ImageRecord, SkipReason};
    use std::fs;
    use tempfile::tempdir;

    fn grouping_with(counts: &[(&str, usize)]) -> ClassGrouping {
        let mut grouping = ClassGrouping::new();
        for (label, count) in counts {
            for i in 0..*count {
                grouping.insert(
                    ClassLabel::new(*label),
                    ImageRecord::new(format!("/data/{label}/img{i}.jpg"), format!("img{i}.jpg")),
                );
            }
        }
        grouping
    }

    #[test]
    fn test_classes_sorted_by_count_then_name() {
        let section = compute_classes(&grouping_with(&[("b", 5), ("a", 5), ("c", 9)]), 10);

        let order: Vec<&str> = section
            .entries
            .iter()
            .map(|entry| entry.label.as_str())
            .collect();
        assert_eq!(order, vec!["c", "a", "b"]);
        assert_eq!(section.total_records, 19);
        assert_eq!(section.other_count, 0);
    }

    #[test]
    fn test_classes_beyond_top_n_fold_into_other() {
        let section = compute_classes(&grouping_with(&[("a", 9), ("b", 5), ("c", 3)]), 2);

        assert_eq!(section.entries.len(), 2);
        assert_eq!(section.total_distinct, 3);
        assert_eq!(section.other_count, 3);
    }

    #[test]
    fn test_skip_counts_aggregate_by_reason() {
        let skipped = vec![
            SkippedRecord::new("/a.jpg", SkipReason::MissingAnnotation),
            SkippedRecord::new("/b.jpg", SkipReason::EmptyAnnotation),
            SkippedRecord::new("/c.jpg", SkipReason::MissingAnnotation),
        ];

        let counts = compute_skip_counts(&skipped);
        assert_eq!(counts.len(), 2);
        assert_eq!(counts[0].reason, SkipReason::MissingAnnotation);
        assert_eq!(counts[0].count, 2);
        assert_eq!(counts[1].count, 1);
    }

    #[test]
    fn test_inspect_source_end_to_end() {
        let dir = tempdir().expect("tempdir");
        for i in 0..3 {
            fs::write(dir.path().join(format!("img{i}.jpg")), b"x").expect("write");
            fs::write(dir.path().join(format!("img{i}.txt")), "0 0.5 0.5 0.1 0.1\n")
                .expect("write");
        }
        fs::write(dir.path().join("stray.jpg"), b"x").expect("write");

        let report = inspect_source(
            dir.path(),
            SourceLayout::Flat,
            &LabelMap::empty(),
            &InspectOptions::default(),
        )
        .expect("inspect");

        assert_eq!(report.summary.records, 3);
        assert_eq!(report.summary.classes, 1);
        assert_eq!(report.summary.skipped, 1);
        assert_eq!(report.classes.entries[0].label, "class_0");
        assert!(report.dimensions.is_none());
    }

    #[test]
    fn test_dimension_probe_counts_unreadable_files() {
        let dir = tempdir().expect("tempdir");
        fs::write(dir.path().join("img0.jpg"), b"not really an image").expect("write");
        fs::write(dir.path().join("img0.txt"), "0 0.5 0.5 0.1 0.1\n").expect("write");

        let opts = InspectOptions {
            probe_dimensions: true,
            ..InspectOptions::default()
        };
        let report =
            inspect_source(dir.path(), SourceLayout::Flat, &LabelMap::empty(), &opts)
                .expect("inspect");

        let dims = report.dimensions.expect("probed");
        assert_eq!(dims.probed, 0);
        assert_eq!(dims.failed, 1);
    }
}
