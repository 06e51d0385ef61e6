//! Shared test utilities.

use image::codecs::jpeg::JpegEncoder;
use std::path::{Path, PathBuf};

/// Encode a synthetic gradient image as a JPEG, in memory.
///
/// The gradient makes each (width, height) pair produce distinct bytes, so
/// tests can tell photos apart by content.
pub fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 64])
    });
    let mut out = Vec::new();
    img.write_with_encoder(JpegEncoder::new(&mut out)).unwrap();
    out
}

/// Write a synthetic JPEG into `dir` and return its path.
pub fn write_jpeg(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, jpeg_bytes(width, height)).unwrap();
    path
}
