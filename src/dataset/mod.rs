//! Dataset discovery and the model it produces.
//!
//! This module owns everything that happens before a split is planned:
//! resolving class indices to names, pairing images with their annotation
//! files, and grouping the matched records by class.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use trifold::dataset::{detect_layout, scan_source, LabelMap};
//!
//! # fn main() -> Result<(), trifold::TrifoldError> {
//! let root = Path::new("raw_dataset");
//! let layout = detect_layout(root)?;
//! let label_map = LabelMap::discover(root)?;
//! let outcome = scan_source(root, layout, &label_map)?;
//! println!(
//!     "{} record(s) across {} class(es)",
//!     outcome.grouping.record_count(),
//!     outcome.grouping.class_count()
//! );
//! # Ok(())
//! # }
//! ```

pub mod annotation;
mod discover;
mod label_map;
mod model;

// Re-export core types for convenient access
pub use discover::{detect_layout, scan_source, ScanOutcome, SourceLayout, IMAGE_EXTENSIONS};
pub use label_map::{LabelMap, LabelMapSource};
pub use model::{ClassGrouping, ClassLabel, ImageRecord, SkipReason, SkippedRecord};

#[cfg(feature = "fuzzing")]
pub use label_map::{fuzz_parse_classes_txt, fuzz_parse_data_yaml_names};
