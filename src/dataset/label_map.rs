//! Class-index to class-name resolution.
//!
//! A [`LabelMap`] turns the raw index token found in an annotation file into
//! a [`ClassLabel`]. Names come from an Ultralytics-style `data.yaml` or a
//! plain `classes.txt`; when neither exists, or an index has no entry,
//! resolution falls back to a synthesized `class_<index>` name instead of
//! failing.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use super::model::ClassLabel;
use crate::error::TrifoldError;

/// Where a label map's names came from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LabelMapSource {
    /// Parsed from an Ultralytics `data.yaml` `names:` section.
    DataYaml(PathBuf),

    /// Parsed from a `classes.txt` with one name per line.
    ClassesTxt(PathBuf),

    /// No mapping file found; every index resolves to `class_<index>`.
    Synthesized,
}

impl fmt::Display for LabelMapSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LabelMapSource::DataYaml(path) | LabelMapSource::ClassesTxt(path) => {
                write!(f, "{}", path.display())
            }
            LabelMapSource::Synthesized => write!(f, "none (class_<index> fallback)"),
        }
    }
}

/// Maps raw index tokens to class names.
///
/// Tokens are looked up verbatim: `"0"` and `"00"` are different keys, the
/// same way a text-keyed dictionary would treat them. Lookup never fails;
/// unknown tokens resolve to `class_<token>`.
#[derive(Clone, Debug)]
pub struct LabelMap {
    names: BTreeMap<String, String>,
    source: LabelMapSource,
}

impl LabelMap {
    /// Creates an empty map; every token resolves to its fallback name.
    pub fn empty() -> Self {
        Self {
            names: BTreeMap::new(),
            source: LabelMapSource::Synthesized,
        }
    }

    /// Probes `root` for a mapping file, preferring `data.yaml` over
    /// `classes.txt`. Missing files are fine; an unreadable or unparsable
    /// existing file is an error.
    pub fn discover(root: &Path) -> Result<Self, TrifoldError> {
        let data_yaml = root.join("data.yaml");
        if data_yaml.is_file() {
            return Self::from_data_yaml(&data_yaml);
        }

        let classes_txt = root.join("classes.txt");
        if classes_txt.is_file() {
            return Self::from_classes_txt(&classes_txt);
        }

        Ok(Self::empty())
    }

    /// Reads a `classes.txt` where line `i` names class index `i`.
    ///
    /// Blank lines keep their index but get no entry, so annotations that
    /// point at one resolve to the `class_<index>` fallback.
    pub fn from_classes_txt(path: &Path) -> Result<Self, TrifoldError> {
        let data = fs::read_to_string(path).map_err(|source| TrifoldError::LabelFileRead {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(Self {
            names: parse_classes_txt(&data),
            source: LabelMapSource::ClassesTxt(path.to_path_buf()),
        })
    }

    /// Reads the `names:` section of an Ultralytics `data.yaml`, which is
    /// either a sequence or an index-to-name mapping.
    pub fn from_data_yaml(path: &Path) -> Result<Self, TrifoldError> {
        let data = fs::read_to_string(path).map_err(|source| TrifoldError::LabelFileRead {
            path: path.to_path_buf(),
            source,
        })?;

        let parsed: DataYaml =
            serde_yaml::from_str(&data).map_err(|source| TrifoldError::LabelFileParse {
                path: path.to_path_buf(),
                source,
            })?;

        let mut names = BTreeMap::new();
        match parsed.names {
            DataYamlNames::Sequence(list) => {
                for (index, name) in list.into_iter().enumerate() {
                    if !name.trim().is_empty() {
                        names.insert(index.to_string(), name);
                    }
                }
            }
            DataYamlNames::Mapping(mapping) => {
                for (index, name) in mapping {
                    if !name.trim().is_empty() {
                        names.insert(index.to_string(), name);
                    }
                }
            }
        }

        Ok(Self {
            names,
            source: LabelMapSource::DataYaml(path.to_path_buf()),
        })
    }

    /// Resolves a raw index token to a label, synthesizing `class_<token>`
    /// when the token has no entry.
    pub fn resolve(&self, token: &str) -> ClassLabel {
        match self.names.get(token) {
            Some(name) => ClassLabel::new(name.clone()),
            None => ClassLabel::new(format!("class_{token}")),
        }
    }

    /// Where the names came from.
    pub fn source(&self) -> &LabelMapSource {
        &self.source
    }

    /// Number of named classes.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns true when no names are mapped.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

fn parse_classes_txt(data: &str) -> BTreeMap<String, String> {
    let mut names = BTreeMap::new();

    for (index, line) in data.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            debug!("classes file line {} is blank; index left unmapped", index + 1);
            continue;
        }
        names.insert(index.to_string(), trimmed.to_string());
    }

    names
}

#[derive(Debug, Deserialize)]
struct DataYaml {
    names: DataYamlNames,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DataYamlNames {
    Sequence(Vec<String>),
    Mapping(BTreeMap<usize, String>),
}

/// Fuzzing entry point for `parse_classes_txt`.
#[cfg(feature = "fuzzing")]
pub fn fuzz_parse_classes_txt(data: &str) {
    let _ = parse_classes_txt(data);
}

/// Fuzzing entry point for the `data.yaml` names parser.
#[cfg(feature = "fuzzing")]
pub fn fuzz_parse_data_yaml_names(data: &str) {
    let _ = serde_yaml::from_str::<DataYaml>(data);
}
