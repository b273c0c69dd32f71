#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

/// Write a stand-in image file. The splitter never reads pixel data, so
/// arbitrary bytes are enough for pairing and copying tests.
pub fn write_image(path: &Path) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dir");
    }
    fs::write(path, b"not a real image").expect("write image file");
}

/// Write a YOLO-style annotation file whose first token is `class_index`.
pub fn write_annotation(path: &Path, class_index: usize) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dir");
    }
    let line = format!("{class_index} 0.5 0.5 0.25 0.25\n");
    fs::write(path, line).expect("write annotation file");
}

/// Write a classes.txt file with one name per line.
pub fn write_classes_txt(dir: &Path, names: &[&str]) {
    fs::create_dir_all(dir).expect("create source dir");
    fs::write(dir.join("classes.txt"), names.join("\n")).expect("write classes.txt");
}

/// Write a data.yaml file with a names sequence.
pub fn write_data_yaml(dir: &Path, names: &[&str]) {
    fs::create_dir_all(dir).expect("create source dir");
    let mut body = String::from("names:\n");
    for name in names {
        body.push_str(&format!("  - {name}\n"));
    }
    fs::write(dir.join("data.yaml"), body).expect("write data.yaml");
}

/// Build a flat source: `count` image/annotation pairs per class index.
///
/// Stems are `img_<class>_<i>` so the files sort deterministically.
pub fn flat_dataset(dir: &Path, counts: &[(usize, usize)]) {
    fs::create_dir_all(dir).expect("create source dir");
    for &(class_index, count) in counts {
        for i in 0..count {
            let stem = format!("img_{class_index}_{i:03}");
            write_image(&dir.join(format!("{stem}.jpg")));
            write_annotation(&dir.join(format!("{stem}.txt")), class_index);
        }
    }
}

/// Build a class-dirs source: one subdirectory per label with `count` images.
pub fn class_dirs_dataset(dir: &Path, counts: &[(&str, usize)]) {
    fs::create_dir_all(dir).expect("create source dir");
    for &(label, count) in counts {
        let class_dir = dir.join(label);
        fs::create_dir_all(&class_dir).expect("create class dir");
        for i in 0..count {
            write_image(&class_dir.join(format!("{label}_{i:03}.jpg")));
        }
    }
}

/// Count regular files under `split/class` in a split tree.
pub fn count_files(root: &Path, split: &str, class: &str) -> usize {
    let dir = root.join(split).join(class);
    match fs::read_dir(&dir) {
        Ok(entries) => entries
            .filter_map(Result::ok)
            .filter(|e| e.path().is_file())
            .count(),
        Err(_) => 0,
    }
}

/// Collect the file names under `split/class`, sorted.
pub fn file_names(root: &Path, split: &str, class: &str) -> Vec<String> {
    let dir = root.join(split).join(class);
    let mut names: Vec<String> = match fs::read_dir(&dir) {
        Ok(entries) => entries
            .filter_map(Result::ok)
            .filter(|e| e.path().is_file())
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .collect(),
        Err(_) => Vec::new(),
    };
    names.sort();
    names
}

/// List the class directories under one split, sorted.
pub fn class_dirs(root: &Path, split: &str) -> Vec<String> {
    let dir = root.join(split);
    let mut names: Vec<String> = match fs::read_dir(&dir) {
        Ok(entries) => entries
            .filter_map(Result::ok)
            .filter(|e| e.path().is_dir())
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .collect(),
        Err(_) => Vec::new(),
    };
    names.sort();
    names
}

pub fn bmp_bytes(width: u32, height: u32) -> Vec<u8> {
    let row_stride = (width * 3).div_ceil(4) * 4;
    let pixel_array_size = row_stride * height;
    let file_size = 54 + pixel_array_size;

    let mut bytes = Vec::with_capacity(file_size as usize);
    bytes.extend_from_slice(b"BM");
    bytes.extend_from_slice(&file_size.to_le_bytes());
    bytes.extend_from_slice(&[0, 0, 0, 0]);
    bytes.extend_from_slice(&54u32.to_le_bytes());

    bytes.extend_from_slice(&40u32.to_le_bytes());
    bytes.extend_from_slice(&(width as i32).to_le_bytes());
    bytes.extend_from_slice(&(height as i32).to_le_bytes());
    bytes.extend_from_slice(&1u16.to_le_bytes());
    bytes.extend_from_slice(&24u16.to_le_bytes());
    bytes.extend_from_slice(&0u32.to_le_bytes());
    bytes.extend_from_slice(&pixel_array_size.to_le_bytes());
    bytes.extend_from_slice(&2835u32.to_le_bytes());
    bytes.extend_from_slice(&2835u32.to_le_bytes());
    bytes.extend_from_slice(&0u32.to_le_bytes());
    bytes.extend_from_slice(&0u32.to_le_bytes());

    bytes.resize(file_size as usize, 0);
    bytes
}

pub fn write_bmp(path: &Path, width: u32, height: u32) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dir");
    }
    fs::write(path, bmp_bytes(width, height)).expect("write bmp file");
}

/// A flat source plus a destination root inside one tempdir.
pub struct SplitFixture {
    pub tmp: tempfile::TempDir,
    pub source: PathBuf,
    pub dest: PathBuf,
}

impl SplitFixture {
    pub fn new() -> Self {
        let tmp = tempfile::tempdir().expect("create tempdir");
        let source = tmp.path().join("source");
        let dest = tmp.path().join("dataset");
        fs::create_dir_all(&source).expect("create source dir");
        SplitFixture { tmp, source, dest }
    }
}
