#![allow(dead_code)]

use proptest::prelude::*;
use proptest::test_runner::{Config as ProptestConfig, FileFailurePersistence};

use trifold::dataset::{ClassGrouping, ClassLabel, ImageRecord};

pub fn proptest_config() -> ProptestConfig {
    let cases = std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(64);

    let mut config = ProptestConfig::with_failure_persistence(FileFailurePersistence::WithSource(
        "proptest-regressions",
    ));
    config.cases = cases;
    config.max_shrink_iters = 1024;
    config
}

/// A grouping with up to `max_classes` distinct labels and up to
/// `max_per_class` records each (possibly zero). Records carry synthetic
/// paths; nothing here touches the disk.
pub fn arb_grouping(
    max_classes: usize,
    max_per_class: usize,
) -> impl Strategy<Value = ClassGrouping> {
    prop::collection::btree_map("[a-z]{1,8}", 0..=max_per_class, 1..=max_classes).prop_map(
        |counts| {
            let mut grouping = ClassGrouping::new();
            for (label, count) in counts {
                let class = ClassLabel::new(label.as_str());
                grouping.groups.entry(class.clone()).or_default();
                for i in 0..count {
                    let file_name = format!("{label}_{i:04}.jpg");
                    let record = ImageRecord::new(format!("/data/{file_name}"), file_name);
                    grouping.insert(class.clone(), record);
                }
            }
            grouping
        },
    )
}

/// Ratio pairs whose sum never exceeds 1.0.
pub fn arb_ratios() -> impl Strategy<Value = (f64, f64)> {
    (0.0..=1.0f64).prop_flat_map(|train| (Just(train), 0.0..=(1.0 - train)))
}
