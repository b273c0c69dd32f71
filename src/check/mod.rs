//! Split-tree verification.
//!
//! This module walks an existing `train/ val/ test/` tree and reports
//! structural problems without modifying anything: missing split
//! directories, classes absent from a split, the same record appearing in
//! two splits, and entries that do not belong in the tree.

mod report;

pub use report::{CheckContext, CheckIssue, CheckReport, IssueCode, Severity};

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::dataset::IMAGE_EXTENSIONS;
use crate::error::TrifoldError;
use crate::split::{Split, SplitCounts};

/// Checks the split tree under `root` and returns a report of all issues.
///
/// Issues never abort the walk; only filesystem failures do. The exit
/// decision (errors only, or warnings too under `--strict`) is left to the
/// caller.
pub fn check_split_tree(root: &Path) -> Result<CheckReport, TrifoldError> {
    if !root.is_dir() {
        return Err(TrifoldError::SourceNotADirectory {
            path: root.to_path_buf(),
        });
    }

    let mut report = CheckReport::new();

    // (class, file) -> splits that contain it
    let mut placements: BTreeMap<(String, String), Vec<Split>> = BTreeMap::new();
    let mut classes_by_split: BTreeMap<Split, BTreeSet<String>> = BTreeMap::new();
    let mut files_per_split: BTreeMap<Split, usize> = BTreeMap::new();
    let mut existing_splits: BTreeSet<Split> = BTreeSet::new();

    for split in Split::ALL {
        let split_dir = root.join(split.dir_name());
        if !split_dir.is_dir() {
            report.add(CheckIssue::error(
                IssueCode::MissingSplitDir,
                format!("expected directory '{}/' was not found", split.dir_name()),
                CheckContext::Tree,
            ));
            continue;
        }

        existing_splits.insert(split);
        let seen_classes = classes_by_split.entry(split).or_default();
        let file_count = files_per_split.entry(split).or_default();

        let (class_dirs, stray_files) = sorted_children(&split_dir)?;
        for path in stray_files {
            report.add(CheckIssue::warning(
                IssueCode::StrayEntry,
                "file does not belong at split level",
                CheckContext::Entry { path },
            ));
        }

        for class_dir in class_dirs {
            let label = name_of(&class_dir);
            seen_classes.insert(label.clone());

            let (nested_dirs, files) = sorted_children(&class_dir)?;
            for path in nested_dirs {
                report.add(CheckIssue::warning(
                    IssueCode::StrayEntry,
                    "unexpected directory inside a class",
                    CheckContext::Entry { path },
                ));
            }

            for path in files {
                if !is_image(&path) {
                    report.add(CheckIssue::warning(
                        IssueCode::StrayEntry,
                        "unexpected non-image file",
                        CheckContext::Entry { path },
                    ));
                    continue;
                }

                *file_count += 1;
                placements
                    .entry((label.clone(), name_of(&path)))
                    .or_default()
                    .push(split);
            }
        }
    }

    for ((label, file), splits) in &placements {
        if splits.len() > 1 {
            let list: Vec<&str> = splits.iter().map(|s| s.dir_name()).collect();
            report.add(CheckIssue::error(
                IssueCode::DuplicateAcrossSplits,
                format!(
                    "'{}/{}' appears in more than one split ({})",
                    label,
                    file,
                    list.join(", ")
                ),
                CheckContext::Tree,
            ));
        }
    }

    let all_classes: BTreeSet<String> = classes_by_split
        .values()
        .flat_map(|set| set.iter().cloned())
        .collect();

    for split in &existing_splits {
        let seen = &classes_by_split[split];
        for label in &all_classes {
            if !seen.contains(label) {
                report.add(CheckIssue::warning(
                    IssueCode::ClassMissingFromSplit,
                    format!("class has no directory under '{}/'", split.dir_name()),
                    CheckContext::Class {
                        split: split.dir_name().to_string(),
                        label: label.clone(),
                    },
                ));
            }
        }
    }

    let total: usize = files_per_split.values().sum();
    if !existing_splits.is_empty() {
        if total == 0 {
            report.add(CheckIssue::error(
                IssueCode::EmptyTree,
                "no files found in any split",
                CheckContext::Tree,
            ));
        } else {
            for split in &existing_splits {
                if files_per_split.get(split).copied().unwrap_or(0) == 0 {
                    report.add(CheckIssue::warning(
                        IssueCode::EmptySplit,
                        "split contains no files",
                        CheckContext::Split {
                            name: split.dir_name().to_string(),
                        },
                    ));
                }
            }
        }
    }

    report.counts = SplitCounts {
        train: files_per_split.get(&Split::Train).copied().unwrap_or(0),
        val: files_per_split.get(&Split::Val).copied().unwrap_or(0),
        test: files_per_split.get(&Split::Test).copied().unwrap_or(0),
        total,
    };
    report.classes = all_classes.len();

    Ok(report)
}

/// Lists the direct children of `dir`, split into directories and files,
/// each sorted by path.
fn sorted_children(dir: &Path) -> Result<(Vec<PathBuf>, Vec<PathBuf>), TrifoldError> {
    let mut dirs = Vec::new();
    let mut files = Vec::new();

    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).follow_links(true) {
        let entry = entry.map_err(|source| TrifoldError::Scan {
            path: dir.to_path_buf(),
            message: format!("failed while traversing directory: {source}"),
        })?;

        if entry.file_type().is_dir() {
            dirs.push(entry.path().to_path_buf());
        } else {
            files.push(entry.path().to_path_buf());
        }
    }

    dirs.sort();
    files.sort();
    Ok((dirs, files))
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            IMAGE_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
}

fn name_of(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn write_tree(root: &Path, entries: &[(&str, &str, &[&str])]) {
        for (split, class, files) in entries {
            let dir = root.join(split).join(class);
            fs::create_dir_all(&dir).expect("mkdir");
            for file in *files {
                fs::write(dir.join(file), b"x").expect("write");
            }
        }
    }

    #[test]
    fn test_clean_tree_passes() {
        let dir = tempdir().expect("tempdir");
        write_tree(
            dir.path(),
            &[
                ("train", "healthy", &["a.jpg", "b.jpg"]),
                ("val", "healthy", &["c.jpg"]),
                ("test", "healthy", &["d.jpg"]),
            ],
        );

        let report = check_split_tree(dir.path()).expect("check");
        assert!(report.is_clean(), "unexpected issues: {report}");
        assert_eq!(report.counts.train, 2);
        assert_eq!(report.counts.total, 4);
        assert_eq!(report.classes, 1);
    }

    #[test]
    fn test_missing_split_dir_is_an_error() {
        let dir = tempdir().expect("tempdir");
        write_tree(
            dir.path(),
            &[
                ("train", "healthy", &["a.jpg"]),
                ("test", "healthy", &["b.jpg"]),
            ],
        );

        let report = check_split_tree(dir.path()).expect("check");
        assert_eq!(report.error_count(), 1);
        assert!(report
            .issues
            .iter()
            .any(|issue| issue.code == IssueCode::MissingSplitDir));
    }

    #[test]
    fn test_duplicate_across_splits_is_an_error() {
        let dir = tempdir().expect("tempdir");
        write_tree(
            dir.path(),
            &[
                ("train", "healthy", &["same.jpg"]),
                ("val", "healthy", &["same.jpg"]),
                ("test", "healthy", &["other.jpg"]),
            ],
        );

        let report = check_split_tree(dir.path()).expect("check");
        assert!(!report.is_ok());
        assert!(report
            .issues
            .iter()
            .any(|issue| issue.code == IssueCode::DuplicateAcrossSplits));
    }

    #[test]
    fn test_same_file_name_in_different_classes_is_fine() {
        let dir = tempdir().expect("tempdir");
        write_tree(
            dir.path(),
            &[
                ("train", "healthy", &["img.jpg"]),
                ("val", "blight", &["img.jpg"]),
                ("test", "healthy", &["img2.jpg"]),
            ],
        );

        let report = check_split_tree(dir.path()).expect("check");
        assert!(!report
            .issues
            .iter()
            .any(|issue| issue.code == IssueCode::DuplicateAcrossSplits));
    }

    #[test]
    fn test_class_missing_from_split_is_a_warning() {
        let dir = tempdir().expect("tempdir");
        write_tree(
            dir.path(),
            &[
                ("train", "healthy", &["a.jpg"]),
                ("train", "blight", &["b.jpg"]),
                ("val", "healthy", &["c.jpg"]),
                ("val", "blight", &["d.jpg"]),
                ("test", "healthy", &["e.jpg"]),
            ],
        );

        let report = check_split_tree(dir.path()).expect("check");
        assert!(report.is_ok());
        assert_eq!(report.warning_count(), 1);
        assert!(report
            .issues
            .iter()
            .any(|issue| issue.code == IssueCode::ClassMissingFromSplit));
    }

    #[test]
    fn test_stray_entries_are_warnings() {
        let dir = tempdir().expect("tempdir");
        write_tree(dir.path(), &[("train", "healthy", &["a.jpg"])]);
        write_tree(dir.path(), &[("val", "healthy", &["b.jpg"])]);
        write_tree(dir.path(), &[("test", "healthy", &["c.jpg"])]);
        fs::write(dir.path().join("train").join("notes.txt"), b"x").expect("write");
        fs::write(
            dir.path().join("train").join("healthy").join("extra.csv"),
            b"x",
        )
        .expect("write");

        let report = check_split_tree(dir.path()).expect("check");
        assert!(report.is_ok());
        let strays = report
            .issues
            .iter()
            .filter(|issue| issue.code == IssueCode::StrayEntry)
            .count();
        assert_eq!(strays, 2);
    }

    #[test]
    fn test_empty_tree_is_an_error() {
        let dir = tempdir().expect("tempdir");
        for split in ["train", "val", "test"] {
            fs::create_dir_all(dir.path().join(split)).expect("mkdir");
        }

        let report = check_split_tree(dir.path()).expect("check");
        assert!(report
            .issues
            .iter()
            .any(|issue| issue.code == IssueCode::EmptyTree));
    }

    #[test]
    fn test_empty_split_is_a_warning() {
        let dir = tempdir().expect("tempdir");
        write_tree(
            dir.path(),
            &[
                ("train", "healthy", &["a.jpg"]),
                ("test", "healthy", &["b.jpg"]),
            ],
        );
        fs::create_dir_all(dir.path().join("val").join("healthy")).expect("mkdir");

        let report = check_split_tree(dir.path()).expect("check");
        assert!(report
            .issues
            .iter()
            .any(|issue| issue.code == IssueCode::EmptySplit));
    }

    #[test]
    fn test_root_must_be_a_directory() {
        let dir = tempdir().expect("tempdir");
        let file = dir.path().join("file");
        fs::write(&file, b"x").expect("write");

        let err = check_split_tree(&file).expect_err("should fail");
        assert!(matches!(err, TrifoldError::SourceNotADirectory { .. }));
    }
}
