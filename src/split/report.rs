//! Split report types and terminal formatting.

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

use super::{Split, SplitPlan, SplitRatios};
use crate::dataset::SkippedRecord;

/// The result of planning (and optionally executing) a split.
#[derive(Clone, Debug, Serialize)]
pub struct SplitReport {
    /// Source directory that was scanned.
    pub source: PathBuf,

    /// Destination root for the split tree.
    pub dest: PathBuf,

    /// Detected or forced source layout name.
    pub layout: String,

    /// Where class names came from.
    pub label_source: String,

    /// Fractions the plan was built with.
    pub ratios: SplitRatios,

    /// Seed used for the shuffle, when one was given.
    pub seed: Option<u64>,

    /// True when no files were copied.
    pub dry_run: bool,

    /// Per-class assignment counts, in label order.
    pub classes: Vec<ClassCounts>,

    /// Counts summed over all classes.
    pub totals: SplitCounts,

    /// Records the scan excluded, with reasons.
    pub skipped: Vec<SkippedRecord>,

    /// Files actually copied; `None` for a dry run.
    pub files_copied: Option<usize>,
}

/// Assignment counts for one class.
#[derive(Clone, Debug, Serialize)]
pub struct ClassCounts {
    /// The class label.
    pub label: String,
    pub train: usize,
    pub val: usize,
    pub test: usize,
    pub total: usize,
}

impl ClassCounts {
    /// Per-class counts for every class in the plan, in label order.
    pub fn from_plan(plan: &SplitPlan) -> Vec<Self> {
        plan.classes
            .iter()
            .map(|(label, assignment)| Self {
                label: label.as_str().to_string(),
                train: assignment.train.len(),
                val: assignment.val.len(),
                test: assignment.test.len(),
                total: assignment.total(),
            })
            .collect()
    }
}

/// Counts summed over all classes.
#[derive(Clone, Copy, Debug, Default, Serialize)]
pub struct SplitCounts {
    pub train: usize,
    pub val: usize,
    pub test: usize,
    pub total: usize,
}

impl SplitCounts {
    /// Totals for the whole plan.
    pub fn from_plan(plan: &SplitPlan) -> Self {
        Self {
            train: plan.split_count(Split::Train),
            val: plan.split_count(Split::Val),
            test: plan.split_count(Split::Test),
            total: plan.record_count(),
        }
    }
}

impl fmt::Display for SplitReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Split summary for {} -> {}",
            self.source.display(),
            self.dest.display()
        )?;
        writeln!(
            f,
            "  layout: {}    classes: {}",
            self.layout, self.label_source
        )?;

        let seed_display = match self.seed {
            Some(seed) => seed.to_string(),
            None => "none".to_string(),
        };
        writeln!(
            f,
            "  ratios: train {:.2} / val {:.2} / test {:.2}    seed: {}",
            self.ratios.train,
            self.ratios.val,
            self.ratios.test(),
            seed_display
        )?;
        writeln!(f)?;

        writeln!(
            f,
            "  {:<32} {:>7} {:>8} {:>8} {:>8}",
            "class", "total", "train", "val", "test"
        )?;
        writeln!(f, "  {}", "─".repeat(67))?;

        for class in &self.classes {
            writeln!(
                f,
                "  {:<32} {:>7} {:>8} {:>8} {:>8}",
                truncate_label(&class.label, 32),
                format_number(class.total),
                format_number(class.train),
                format_number(class.val),
                format_number(class.test)
            )?;
        }

        writeln!(
            f,
            "  {:<32} {:>7} {:>8} {:>8} {:>8}",
            "(total)",
            format_number(self.totals.total),
            format_number(self.totals.train),
            format_number(self.totals.val),
            format_number(self.totals.test)
        )?;

        if !self.skipped.is_empty() {
            writeln!(f)?;
            writeln!(f, "  skipped {} record(s):", self.skipped.len())?;
            for skip in &self.skipped {
                writeln!(f, "    - {}: {}", skip.path.display(), skip.reason)?;
            }
        }

        writeln!(f)?;
        match self.files_copied {
            Some(count) => writeln!(
                f,
                "  copied {} file(s) into {}",
                format_number(count),
                self.dest.display()
            )?,
            None => writeln!(f, "  dry run: nothing copied")?,
        }

        Ok(())
    }
}

/// Format a number with thousands separators.
fn format_number(n: usize) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result.chars().rev().collect()
}

/// Truncate a label to fit in the display column.
fn truncate_label(label: &str, max_len: usize) -> String {
    if label.chars().count() <= max_len {
        label.to_string()
    } else {
        let kept: String = label.chars().take(max_len - 1).collect();
        format!("{kept}…")
    }
}
