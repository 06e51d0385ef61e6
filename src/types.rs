//! Shared types used across the pipeline stages.
//!
//! `Photo` is serialized into the per-album `index.json` (see [`crate::cache`])
//! and must stay stable across versions — renaming a field invalidates every
//! previously persisted index.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One processed image and its derived artifacts.
///
/// Paths are stored relative to the album's output directory so the index
/// stays valid when the output tree is moved or synced elsewhere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Photo {
    /// Source file name. Unique within an album and the key the index and
    /// reconciler match on.
    pub title: String,
    /// Full-size copy, relative to the album output directory.
    pub photo_path: String,
    /// Thumbnail, relative to the album output directory.
    pub thumbnail_path: String,
    /// EXIF `DateTimeOriginal`, when the source carries one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shooting_date: Option<NaiveDateTime>,
    /// Hex SHA-256 of the raw source bytes.
    pub checksum: String,
}

/// One album: a directory of photos processed and rendered together.
///
/// Rebuilt from the current filesystem state on every run — only its photos'
/// fingerprints persist, via the album index.
#[derive(Debug, Clone)]
pub struct Album {
    /// Display name (directory name, or the site title in single-album mode).
    pub name: String,
    /// Output subdirectory identifier (source directory base name).
    pub folder: String,
    /// Photos in their final sorted order.
    pub photos: Vec<Photo>,
    /// The photo named `cover.jpg`, if the album has one.
    pub cover: Option<Photo>,
}
