//! Source-tree discovery: layout detection, image/annotation pairing, and
//! class grouping.
//!
//! Two source layouts are supported. A *flat* layout keeps images and their
//! YOLO-style `.txt` annotations side by side in one directory, paired by
//! file stem. A *class-dirs* layout has one subdirectory per class with the
//! images inside; no annotation files are involved. Both scans look only at
//! the top level of the directory they are given.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use super::annotation::primary_class_token;
use super::label_map::LabelMap;
use super::model::{ClassGrouping, ClassLabel, ImageRecord, SkipReason, SkippedRecord};
use crate::error::TrifoldError;

/// Recognized image extensions, in preference order for duplicate-stem
/// resolution.
pub const IMAGE_EXTENSIONS: [&str; 5] = ["jpg", "png", "jpeg", "bmp", "webp"];

const ANNOTATION_EXTENSION: &str = "txt";

/// How a source directory arranges its images.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SourceLayout {
    /// Images and annotation `.txt` files side by side in one directory.
    Flat,

    /// One subdirectory per class, images inside.
    ClassFolders,
}

impl SourceLayout {
    /// The name used on the command line and in reports.
    pub fn name(&self) -> &'static str {
        match self {
            SourceLayout::Flat => "flat",
            SourceLayout::ClassFolders => "class-dirs",
        }
    }
}

impl fmt::Display for SourceLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// What a source scan produced: matched records grouped by class, plus
/// everything the scan had to leave out.
#[derive(Clone, Debug, Default)]
pub struct ScanOutcome {
    /// Records that matched, grouped by resolved class label.
    pub grouping: ClassGrouping,

    /// Images that were discovered but excluded, with reasons.
    pub skipped: Vec<SkippedRecord>,
}

/// Guesses the layout of `root`.
///
/// Top-level image files mean a flat layout; otherwise any subdirectory
/// means class folders. An empty or unrecognizable directory is reported as
/// flat and left for the scan to reject.
pub fn detect_layout(root: &Path) -> Result<SourceLayout, TrifoldError> {
    if !root.is_dir() {
        return Err(TrifoldError::SourceNotADirectory {
            path: root.to_path_buf(),
        });
    }

    let top_level_images = collect_files_with_extensions(root, &IMAGE_EXTENSIONS)?;
    if !top_level_images.is_empty() {
        return Ok(SourceLayout::Flat);
    }

    let subdirectories = collect_subdirectories(root)?;
    if !subdirectories.is_empty() {
        return Ok(SourceLayout::ClassFolders);
    }

    Ok(SourceLayout::Flat)
}

/// Scans `root` with the given layout and groups every matched image by its
/// resolved class.
///
/// Per-record problems (missing, empty, or unreadable annotations) never
/// fail the scan; they are logged and collected in the outcome. A scan that
/// matches nothing at all is an error.
pub fn scan_source(
    root: &Path,
    layout: SourceLayout,
    label_map: &LabelMap,
) -> Result<ScanOutcome, TrifoldError> {
    if !root.is_dir() {
        return Err(TrifoldError::SourceNotADirectory {
            path: root.to_path_buf(),
        });
    }

    let outcome = match layout {
        SourceLayout::Flat => scan_flat(root, label_map)?,
        SourceLayout::ClassFolders => scan_class_folders(root)?,
    };

    if outcome.grouping.is_empty() {
        return Err(TrifoldError::EmptyDataset {
            path: root.to_path_buf(),
        });
    }

    Ok(outcome)
}

fn scan_flat(root: &Path, label_map: &LabelMap) -> Result<ScanOutcome, TrifoldError> {
    let image_files = collect_files_with_extensions(root, &IMAGE_EXTENSIONS)?;
    let annotation_files = collect_files_with_extensions(root, &[ANNOTATION_EXTENSION])?;

    let mut skipped = Vec::new();

    let mut image_by_stem: BTreeMap<String, PathBuf> = BTreeMap::new();
    for path in image_files {
        let Some(stem) = file_stem_string(&path) else {
            continue;
        };

        match image_by_stem.entry(stem) {
            Entry::Vacant(slot) => {
                slot.insert(path);
            }
            Entry::Occupied(mut slot) => {
                // Two images share a stem; keep the one whose extension
                // ranks earlier in IMAGE_EXTENSIONS.
                let loser = if extension_rank(&path) < extension_rank(slot.get()) {
                    slot.insert(path)
                } else {
                    path
                };
                warn!(
                    "skipping {}: {}",
                    loser.display(),
                    SkipReason::DuplicateStem
                );
                skipped.push(SkippedRecord::new(loser, SkipReason::DuplicateStem));
            }
        }
    }

    let mut annotation_by_stem: BTreeMap<String, PathBuf> = BTreeMap::new();
    for path in annotation_files {
        // classes.txt names classes; it is never an annotation sidecar.
        if path.file_name().is_some_and(|name| name == "classes.txt") {
            continue;
        }
        if let Some(stem) = file_stem_string(&path) {
            annotation_by_stem.insert(stem, path);
        }
    }

    let mut grouping = ClassGrouping::new();
    for (stem, image_path) in image_by_stem {
        let Some(annotation_path) = annotation_by_stem.get(&stem) else {
            debug!(
                "skipping {}: no annotation file with stem '{}'",
                image_path.display(),
                stem
            );
            skipped.push(SkippedRecord::new(image_path, SkipReason::MissingAnnotation));
            continue;
        };

        match fs::read_to_string(annotation_path) {
            Ok(content) => match primary_class_token(&content) {
                Some(token) => {
                    let label = label_map.resolve(token);
                    let file_name = file_name_string(&image_path);
                    grouping.insert(label, ImageRecord::new(image_path, file_name));
                }
                None => {
                    warn!(
                        "skipping {}: annotation {} has no class token",
                        image_path.display(),
                        annotation_path.display()
                    );
                    skipped.push(SkippedRecord::new(image_path, SkipReason::EmptyAnnotation));
                }
            },
            Err(err) => {
                warn!(
                    "skipping {}: failed to read {}: {}",
                    image_path.display(),
                    annotation_path.display(),
                    err
                );
                skipped.push(SkippedRecord::new(
                    image_path,
                    SkipReason::UnreadableAnnotation,
                ));
            }
        }
    }

    Ok(ScanOutcome { grouping, skipped })
}

fn scan_class_folders(root: &Path) -> Result<ScanOutcome, TrifoldError> {
    let mut grouping = ClassGrouping::new();

    for class_dir in collect_subdirectories(root)? {
        let label = ClassLabel::new(file_name_string(&class_dir));

        // A class folder with no images still counts as a class; its output
        // directories will simply be empty.
        let records = grouping.groups.entry(label).or_default();
        for image_path in collect_files_with_extensions(&class_dir, &IMAGE_EXTENSIONS)? {
            let file_name = file_name_string(&image_path);
            records.push(ImageRecord::new(image_path, file_name));
        }
    }

    Ok(ScanOutcome {
        grouping,
        skipped: Vec::new(),
    })
}

fn collect_files_with_extensions(
    dir: &Path,
    extensions: &[&str],
) -> Result<Vec<PathBuf>, TrifoldError> {
    let mut files = Vec::new();

    for entry in WalkDir::new(dir).max_depth(1).follow_links(true) {
        let entry = entry.map_err(|source| TrifoldError::Scan {
            path: dir.to_path_buf(),
            message: format!("failed while traversing directory: {source}"),
        })?;

        if entry.file_type().is_file() && has_extension(entry.path(), extensions) {
            files.push(entry.path().to_path_buf());
        }
    }

    files.sort();
    Ok(files)
}

fn collect_subdirectories(dir: &Path) -> Result<Vec<PathBuf>, TrifoldError> {
    let mut dirs = Vec::new();

    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).follow_links(true) {
        let entry = entry.map_err(|source| TrifoldError::Scan {
            path: dir.to_path_buf(),
            message: format!("failed while traversing directory: {source}"),
        })?;

        if entry.file_type().is_dir() {
            dirs.push(entry.path().to_path_buf());
        }
    }

    dirs.sort();
    Ok(dirs)
}

fn has_extension(path: &Path, allowed: &[&str]) -> bool {
    let Some(ext) = path.extension().and_then(|ext| ext.to_str()) else {
        return false;
    };

    allowed
        .iter()
        .any(|allowed_ext| ext.eq_ignore_ascii_case(allowed_ext))
}

fn extension_rank(path: &Path) -> usize {
    let Some(ext) = path.extension().and_then(|ext| ext.to_str()) else {
        return IMAGE_EXTENSIONS.len();
    };

    IMAGE_EXTENSIONS
        .iter()
        .position(|known| ext.eq_ignore_ascii_case(known))
        .unwrap_or(IMAGE_EXTENSIONS.len())
}

fn file_stem_string(path: &Path) -> Option<String> {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
}

fn file_name_string(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}
