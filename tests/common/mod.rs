#![allow(dead_code)]

use std::{
    fs::{self, File},
    io::{Cursor, Write},
    path::{Path, PathBuf},
    time::Duration,
};

use image::{DynamicImage, ImageOutputFormat, RgbImage};
use tempfile::TempDir;
use zip::{write::FileOptions, CompressionMethod, ZipWriter};

pub const TIMEOUT: Duration = Duration::from_secs(10);

/// Encode a black image of the provided size as PNG
pub fn png(width: u32, height: u32) -> Vec<u8> {
    let mut out = vec![];
    DynamicImage::ImageRgb8(RgbImage::new(width, height))
        .write_to(&mut Cursor::new(&mut out), ImageOutputFormat::Png)
        .unwrap();
    out
}

/// Write a CBZ in a fresh temporary directory
///
/// Names ending with `/` become directory entries.
pub fn cbz(files: &[(&str, Vec<u8>)]) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("book.cbz");
    write_zip(&path, files);
    (dir, path)
}

pub fn write_zip(path: &Path, files: &[(&str, Vec<u8>)]) {
    let file = File::create(path).unwrap();
    let mut zip = ZipWriter::new(file);
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

    for (name, content) in files {
        if name.ends_with('/') {
            zip.add_directory(name.trim_end_matches('/'), options).unwrap();
        } else {
            zip.start_file(*name, options).unwrap();
            zip.write_all(content).unwrap();
        }
    }

    zip.finish().unwrap();
}

/// Write a CB7 in a fresh temporary directory
pub fn cb7(files: &[(&str, Vec<u8>)]) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let content = dir.path().join("content");
    fs::create_dir(&content).unwrap();

    for (name, bytes) in files {
        fs::write(content.join(name), bytes).unwrap();
    }

    let path = dir.path().join("book.cb7");
    sevenz_rust::compress_to_path(&content, &path).unwrap();
    (dir, path)
}
