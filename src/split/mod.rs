//! Stratified split planning and execution.
//!
//! Planning shuffles each class independently and carves the shuffled list
//! into train/val/test by index thresholds, so every class contributes to
//! every subset in the requested proportions. Execution copies the planned
//! records into a `<split>/<class>/` tree without touching the source.

mod report;

pub use report::{ClassCounts, SplitCounts, SplitReport};

use rand::seq::SliceRandom;
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;

use serde::Serialize;
use tracing::info;

use crate::dataset::{ClassGrouping, ClassLabel, ImageRecord};
use crate::error::TrifoldError;

/// Default fraction of each class assigned to train.
pub const DEFAULT_TRAIN_FRACTION: f64 = 0.8;

/// Default fraction of each class assigned to val.
pub const DEFAULT_VAL_FRACTION: f64 = 0.1;

/// One of the three output subsets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Split {
    Train,
    Val,
    Test,
}

impl Split {
    /// All splits in output order.
    pub const ALL: [Split; 3] = [Split::Train, Split::Val, Split::Test];

    /// Directory name for this split in the output tree.
    pub fn dir_name(&self) -> &'static str {
        match self {
            Split::Train => "train",
            Split::Val => "val",
            Split::Test => "test",
        }
    }
}

impl fmt::Display for Split {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.dir_name())
    }
}

/// Per-class fractions for train and val; test takes the remainder.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct SplitRatios {
    pub train: f64,
    pub val: f64,
}

impl Default for SplitRatios {
    fn default() -> Self {
        Self {
            train: DEFAULT_TRAIN_FRACTION,
            val: DEFAULT_VAL_FRACTION,
        }
    }
}

impl SplitRatios {
    /// The implied test fraction.
    pub fn test(&self) -> f64 {
        (1.0 - self.train - self.val).max(0.0)
    }
}

/// Split planning options.
#[derive(Clone, Debug, Default)]
pub struct SplitOptions {
    pub ratios: SplitRatios,
    pub seed: Option<u64>,
}

/// Validate split options before planning.
pub fn validate_split_options(opts: &SplitOptions) -> Result<(), TrifoldError> {
    for (name, fraction) in [("--train", opts.ratios.train), ("--val", opts.ratios.val)] {
        if !fraction.is_finite() || !(0.0..=1.0).contains(&fraction) {
            return Err(TrifoldError::InvalidSplitFractions {
                message: format!("{name} must be in the interval [0.0, 1.0]"),
            });
        }
    }

    if opts.ratios.train + opts.ratios.val > 1.0 {
        return Err(TrifoldError::InvalidSplitFractions {
            message: "--train and --val must not sum to more than 1.0".to_string(),
        });
    }

    Ok(())
}

/// Records of one class assigned to their splits.
#[derive(Clone, Debug, Default)]
pub struct ClassAssignment {
    pub train: Vec<ImageRecord>,
    pub val: Vec<ImageRecord>,
    pub test: Vec<ImageRecord>,
}

impl ClassAssignment {
    /// Records assigned to the given split.
    pub fn records(&self, split: Split) -> &[ImageRecord] {
        match split {
            Split::Train => &self.train,
            Split::Val => &self.val,
            Split::Test => &self.test,
        }
    }

    /// Total records across all three splits.
    pub fn total(&self) -> usize {
        self.train.len() + self.val.len() + self.test.len()
    }
}

/// A complete split assignment, per class.
#[derive(Clone, Debug, Default)]
pub struct SplitPlan {
    /// Assignments per class, in label order.
    pub classes: BTreeMap<ClassLabel, ClassAssignment>,
}

impl SplitPlan {
    /// Total records across all classes and splits.
    pub fn record_count(&self) -> usize {
        self.classes.values().map(ClassAssignment::total).sum()
    }

    /// Total records assigned to the given split.
    pub fn split_count(&self, split: Split) -> usize {
        self.classes
            .values()
            .map(|assignment| assignment.records(split).len())
            .sum()
    }
}

/// Plan a stratified split of the grouping.
///
/// Each class is shuffled independently. With `n` records in a class,
/// `floor(train * n)` go to train and `floor(val * n)` to val; whatever
/// remains goes to test. The truncation means test absorbs the rounding
/// remainder, so a five-record class at the default ratios lands as
/// 4 train / 0 val / 1 test.
///
/// Without a seed every run shuffles differently; pass a seed to make the
/// assignment reproducible.
pub fn plan_split(grouping: ClassGrouping, opts: &SplitOptions) -> Result<SplitPlan, TrifoldError> {
    validate_split_options(opts)?;

    let mut plan = SplitPlan::default();

    if let Some(seed) = opts.seed {
        let mut rng = StdRng::seed_from_u64(seed);
        fill_plan(&mut plan, grouping, opts.ratios, &mut rng);
    } else {
        let mut rng = rand::rng();
        fill_plan(&mut plan, grouping, opts.ratios, &mut rng);
    }

    Ok(plan)
}

fn fill_plan<R: Rng + ?Sized>(
    plan: &mut SplitPlan,
    grouping: ClassGrouping,
    ratios: SplitRatios,
    rng: &mut R,
) {
    for (label, mut records) in grouping.groups {
        records.shuffle(rng);

        let n = records.len();
        let n_train = (ratios.train * n as f64).floor() as usize;
        let n_val = (ratios.val * n as f64).floor() as usize;

        let mut assignment = ClassAssignment::default();
        for (index, record) in records.into_iter().enumerate() {
            if index < n_train {
                assignment.train.push(record);
            } else if index < n_train + n_val {
                assignment.val.push(record);
            } else {
                assignment.test.push(record);
            }
        }

        plan.classes.insert(label, assignment);
    }
}

/// How many files `write_split_tree` copied.
#[derive(Clone, Copy, Debug, Default, Serialize)]
pub struct CopySummary {
    pub files_copied: usize,
}

/// Copy a planned split into `dest_root` as `<split>/<class>/<file>`.
///
/// All split and class directories are created up front, then records are
/// copied one by one. Sources are never modified or removed. The first copy
/// failure aborts with an error; files already copied stay where they are.
pub fn write_split_tree(plan: &SplitPlan, dest_root: &Path) -> Result<CopySummary, TrifoldError> {
    for split in Split::ALL {
        for label in plan.classes.keys() {
            let dir = dest_root.join(split.dir_name()).join(label.as_str());
            fs::create_dir_all(&dir).map_err(TrifoldError::Io)?;
        }
    }

    let mut files_copied = 0;
    for (label, assignment) in &plan.classes {
        for split in Split::ALL {
            for record in assignment.records(split) {
                let dest = dest_root
                    .join(split.dir_name())
                    .join(label.as_str())
                    .join(&record.file_name);

                fs::copy(&record.path, &dest).map_err(|source| TrifoldError::CopyFailed {
                    src: record.path.clone(),
                    dest: dest.clone(),
                    source,
                })?;
                files_copied += 1;
            }
        }
    }

    info!(
        "copied {} file(s) into {}",
        files_copied,
        dest_root.display()
    );

    Ok(CopySummary { files_copied })
}
