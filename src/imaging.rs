//! Image decoding, thumbnail generation, and EXIF date extraction.
//!
//! The [`ImageBackend`] trait is the seam between the worker pool and the
//! actual pixel work, so pipeline tests can run against a mock that never
//! decodes anything (see [`tests::MockBackend`]).
//!
//! The production implementation is [`RustBackend`] — pure Rust, statically
//! linked, no system dependencies:
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode / encode JPEG | `image` crate |
//! | Resize | `image::DynamicImage::resize` with `Lanczos3` |
//! | Shooting date | `kamadak-exif` (`DateTimeOriginal`) + `chrono` |
//!
//! Lanczos3 is fixed deliberately: the same source bytes must produce the
//! same thumbnail bytes on every run, or the idempotence guarantee of the
//! build breaks. Thumbnails never upscale — a source already within bounds
//! is re-encoded at its original size.

use chrono::NaiveDateTime;
use exif::{In, Tag, Value};
use image::ImageFormat;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use std::io::Cursor;
use thiserror::Error;

/// JPEG quality for generated thumbnails.
const THUMBNAIL_QUALITY: u8 = 85;

#[derive(Error, Debug)]
pub enum ImagingError {
    #[error("failed to decode image: {0}")]
    Decode(String),
    #[error("failed to encode thumbnail: {0}")]
    Encode(String),
}

/// Result of processing one photo.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedImage {
    /// JPEG-encoded thumbnail bytes.
    pub thumbnail: Vec<u8>,
    /// EXIF `DateTimeOriginal`, when present and parseable.
    pub shooting_date: Option<NaiveDateTime>,
}

/// Trait for image processing backends.
///
/// `Sync` because the worker pool shares one backend across rayon workers.
pub trait ImageBackend: Sync {
    /// Decode `bytes`, produce a thumbnail whose longest edge does not
    /// exceed `max_size`, and extract the shooting date.
    fn process(&self, bytes: &[u8], max_size: u32) -> Result<ProcessedImage, ImagingError>;
}

/// Production backend using the `image` crate ecosystem.
#[derive(Debug, Default)]
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl ImageBackend for RustBackend {
    fn process(&self, bytes: &[u8], max_size: u32) -> Result<ProcessedImage, ImagingError> {
        let img = image::load_from_memory_with_format(bytes, ImageFormat::Jpeg)
            .map_err(|e| ImagingError::Decode(e.to_string()))?;

        // Downscale-only: neither dimension may exceed max_size, aspect
        // ratio preserved.
        let scaled = if img.width() <= max_size && img.height() <= max_size {
            img
        } else {
            img.resize(max_size, max_size, FilterType::Lanczos3)
        };

        let mut thumbnail = Vec::new();
        let encoder = JpegEncoder::new_with_quality(&mut thumbnail, THUMBNAIL_QUALITY);
        scaled
            .to_rgb8()
            .write_with_encoder(encoder)
            .map_err(|e| ImagingError::Encode(e.to_string()))?;

        Ok(ProcessedImage {
            thumbnail,
            shooting_date: shooting_date(bytes),
        })
    }
}

/// Read the EXIF `DateTimeOriginal` tag from raw image bytes.
///
/// Any failure — no EXIF segment, missing tag, non-ASCII value, unparseable
/// timestamp — yields `None`. Many photos legitimately carry no metadata, so
/// this path must never produce an error.
pub fn shooting_date(bytes: &[u8]) -> Option<NaiveDateTime> {
    let exif = exif::Reader::new()
        .read_from_container(&mut Cursor::new(bytes))
        .ok()?;
    let field = exif.get_field(Tag::DateTimeOriginal, In::PRIMARY)?;
    let raw = match &field.value {
        Value::Ascii(values) => values.first()?,
        _ => return None,
    };
    parse_exif_datetime(std::str::from_utf8(raw).ok()?.trim())
}

/// Parse the EXIF timestamp form `YYYY:MM:DD HH:MM:SS`.
pub fn parse_exif_datetime(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, "%Y:%m:%d %H:%M:%S").ok()
}
