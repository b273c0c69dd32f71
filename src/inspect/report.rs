//! Inspect report types and terminal formatting.
//!
//! This module provides rich, structured inspection results that are
//! displayed beautifully in the terminal.

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

use crate::dataset::SkipReason;

/// The result of inspecting a source directory.
#[derive(Clone, Debug, Serialize)]
pub struct InspectReport {
    /// The directory that was scanned.
    pub source: PathBuf,

    /// Detected or forced source layout name.
    pub layout: String,

    /// Where class names came from.
    pub label_source: String,

    /// Summary counts for the scan.
    pub summary: SummarySection,

    /// Class distribution histogram.
    pub classes: ClassesSection,

    /// Skip counts by reason, descending.
    pub skip_counts: Vec<SkipCount>,

    /// Pixel dimension statistics, when probing was requested.
    pub dimensions: Option<DimensionStats>,

    /// Display options for formatting.
    #[serde(skip)]
    pub(crate) bar_width: usize,
}

/// Summary counts for the scan.
#[derive(Clone, Debug, Default, Serialize)]
pub struct SummarySection {
    /// Image records that matched a class.
    pub records: usize,

    /// Distinct classes among the matched records.
    pub classes: usize,

    /// Classes with an explicit name in the label map.
    pub named_classes: usize,

    /// Images discovered but excluded.
    pub skipped: usize,
}

/// Class distribution section.
#[derive(Clone, Debug, Serialize)]
pub struct ClassesSection {
    /// How many top classes to show.
    pub top_n: usize,

    /// Total distinct classes seen.
    pub total_distinct: usize,

    /// Total matched records counted.
    pub total_records: usize,

    /// Top class entries (sorted by count descending).
    pub entries: Vec<ClassCount>,

    /// Sum of counts for classes not in the top N.
    pub other_count: usize,
}

/// A single class with its record count.
#[derive(Clone, Debug, Serialize)]
pub struct ClassCount {
    /// The class label.
    pub label: String,

    /// Number of matched records with this label.
    pub count: usize,
}

/// Skip count for one reason.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct SkipCount {
    /// Why records were excluded.
    pub reason: SkipReason,

    /// How many records this reason excluded.
    pub count: usize,
}

/// Pixel dimension statistics over the matched images.
#[derive(Clone, Copy, Debug, Default, Serialize)]
pub struct DimensionStats {
    /// Images whose dimensions could be read.
    pub probed: usize,

    /// Images whose dimensions could not be read.
    pub failed: usize,

    /// Minimum width in pixels, if any image was probed.
    pub min_width: Option<usize>,

    /// Maximum width in pixels.
    pub max_width: Option<usize>,

    /// Minimum height in pixels.
    pub min_height: Option<usize>,

    /// Maximum height in pixels.
    pub max_height: Option<usize>,
}

impl DimensionStats {
    /// Folds one successfully probed image into the stats.
    pub fn observe(&mut self, width: usize, height: usize) {
        self.probed += 1;
        self.min_width = Some(self.min_width.map_or(width, |m| m.min(width)));
        self.max_width = Some(self.max_width.map_or(width, |m| m.max(width)));
        self.min_height = Some(self.min_height.map_or(height, |m| m.min(height)));
        self.max_height = Some(self.max_height.map_or(height, |m| m.max(height)));
    }
}

impl fmt::Display for InspectReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Header
        writeln!(f)?;
        writeln!(f, "╭{}╮", "─".repeat(59))?;
        writeln!(f, "│{:^59}│", "📊  Source Inspection Report")?;
        writeln!(f, "╰{}╯", "─".repeat(59))?;
        writeln!(f)?;

        self.fmt_summary(f)?;
        writeln!(f)?;

        self.fmt_classes(f)?;

        if !self.skip_counts.is_empty() {
            writeln!(f)?;
            self.fmt_skips(f)?;
        }

        if let Some(dims) = &self.dimensions {
            writeln!(f)?;
            fmt_dimensions(f, dims)?;
        }

        Ok(())
    }
}

impl InspectReport {
    fn fmt_summary(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = &self.summary;

        box_top(f, "Summary")?;
        box_row(f, "")?;
        box_row(
            f,
            &format!("Source:       {}", truncate_label(&self.source.display().to_string(), 42)),
        )?;
        box_row(f, &format!("Layout:       {}", self.layout))?;
        box_row(
            f,
            &format!("Class names:  {}", truncate_label(&self.label_source, 42)),
        )?;
        box_row(f, "")?;
        box_row(f, &format!("Records:      {:>8}", format_number(s.records)))?;
        box_row(f, &format!("Classes:      {:>8}", format_number(s.classes)))?;
        if s.named_classes > 0 {
            box_row(
                f,
                &format!("Named:        {:>8}", format_number(s.named_classes)),
            )?;
        }
        box_row(f, &format!("Skipped:      {:>8}", format_number(s.skipped)))?;
        box_row(f, "")?;
        box_bottom(f)
    }

    fn fmt_classes(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = &self.classes;

        let header = if c.total_distinct > c.top_n {
            format!("Classes (top {} of {})", c.top_n, c.total_distinct)
        } else {
            format!("Classes ({})", c.total_distinct)
        };

        box_top(f, &header)?;
        box_row(f, "")?;

        if c.entries.is_empty() {
            box_row(f, "No matched records.")?;
        } else {
            let max_count = c.entries.iter().map(|e| e.count).max().unwrap_or(1);

            for entry in &c.entries {
                self.fmt_histogram_row(f, &entry.label, entry.count, max_count)?;
            }

            if c.other_count > 0 {
                self.fmt_histogram_row(f, "(other)", c.other_count, max_count)?;
            }
        }

        box_row(f, "")?;
        box_bottom(f)
    }

    fn fmt_histogram_row(
        &self,
        f: &mut fmt::Formatter<'_>,
        label: &str,
        count: usize,
        max_count: usize,
    ) -> fmt::Result {
        let pct = if self.classes.total_records > 0 {
            (count as f64 / self.classes.total_records as f64) * 100.0
        } else {
            0.0
        };

        let bar = render_bar(count, max_count, self.bar_width);
        box_row(
            f,
            &format!(
                "{:<16} {:>7} {:>5.1}%  {}",
                truncate_label(label, 16),
                format_number(count),
                pct,
                bar
            ),
        )
    }

    fn fmt_skips(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        box_top(f, "Skipped")?;
        box_row(f, "")?;

        for skip in &self.skip_counts {
            box_row(
                f,
                &format!(
                    "{:<32} {:>7}",
                    skip.reason.describe(),
                    format_number(skip.count)
                ),
            )?;
        }

        box_row(f, "")?;
        box_bottom(f)
    }
}

fn fmt_dimensions(f: &mut fmt::Formatter<'_>, dims: &DimensionStats) -> fmt::Result {
    box_top(f, "Dimensions")?;
    box_row(f, "")?;

    if dims.probed == 0 && dims.failed == 0 {
        box_row(f, "No images probed.")?;
    } else {
        box_row(f, &format!("Probed:       {:>8}", format_number(dims.probed)))?;
        if dims.failed > 0 {
            box_row(
                f,
                &format!("Unreadable:   {:>8}", format_number(dims.failed)),
            )?;
        }

        if let (Some(min_w), Some(max_w), Some(min_h), Some(max_h)) = (
            dims.min_width,
            dims.max_width,
            dims.min_height,
            dims.max_height,
        ) {
            box_row(f, "")?;
            box_row(
                f,
                &format!("Width  (px):   min {:>6}    max {:>6}", min_w, max_w),
            )?;
            box_row(
                f,
                &format!("Height (px):   min {:>6}    max {:>6}", min_h, max_h),
            )?;
        }
    }

    box_row(f, "")?;
    box_bottom(f)
}

fn box_top(f: &mut fmt::Formatter<'_>, title: &str) -> fmt::Result {
    writeln!(
        f,
        "┌─ {} {}┐",
        title,
        "─".repeat(56usize.saturating_sub(title.len()))
    )
}

fn box_row(f: &mut fmt::Formatter<'_>, content: &str) -> fmt::Result {
    writeln!(f, "│   {:<56}│", content)
}

fn box_bottom(f: &mut fmt::Formatter<'_>) -> fmt::Result {
    writeln!(f, "└{}┘", "─".repeat(59))
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

/// Render a horizontal bar using Unicode block characters.
fn render_bar(count: usize, max_count: usize, width: usize) -> String {
    if max_count == 0 || width == 0 {
        return String::new();
    }

    let filled = (count * width) / max_count;
    let filled = filled.min(width); // Clamp to width

    "█".repeat(filled) + &"░".repeat(width - filled)
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
