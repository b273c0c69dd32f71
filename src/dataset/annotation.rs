//! Annotation-file parsing.
//!
//! Annotations are YOLO-style `.txt` sidecars. Only the first token of the
//! first line matters here: it is the raw class index that decides which
//! class the paired image belongs to. Box coordinates on the rest of the
//! line are ignored.

/// Extracts the raw class token from an annotation file's content.
///
/// Returns `None` for an empty file or a first line with no tokens; callers
/// treat that as a skippable record, never an error.
pub fn primary_class_token(content: &str) -> Option<&str> {
    let first_line = content.lines().next()?;
    first_line.split_whitespace().next()
}

/// Fuzzing entry point for `primary_class_token`.
#[cfg(feature = "fuzzing")]
pub fn fuzz_primary_class_token(content: &str) {
    let _ = primary_class_token(content);
}
