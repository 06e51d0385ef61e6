//! Per-album fingerprint index for incremental builds.
//!
//! Thumbnail generation is the expensive step of the pipeline, so each album
//! keeps an `index.json` in its output directory recording every photo it has
//! already produced: identifier, derived paths, shooting date, and a SHA-256
//! fingerprint of the raw source bytes. On the next run the change detector
//! compares fingerprints and skips photos whose content is unchanged.
//!
//! # Invalidation policy
//!
//! The index is keyed by source file name. A photo is reused only when an
//! entry with the same name exists *and* its stored fingerprint matches the
//! current bytes — renaming a file or touching its content reprocesses it,
//! and nothing else does. Fingerprints are content-based rather than
//! mtime-based so the cache survives `git checkout` and rsync.
//!
//! # Persistence
//!
//! The index is read once at album-run start and replaced wholesale at the
//! end. A missing file means a first run (empty index); an unparseable file
//! is a hard error — silently discarding history would reprocess everything
//! while the stale artifacts from the old index linger undeleted, so the
//! operator has to decide. Saving goes through a temp file and rename, which
//! keeps the previous valid index intact if the write is interrupted.

use crate::types::Photo;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the index file within an album's output directory.
pub const INDEX_FILENAME: &str = "index.json";

#[derive(Error, Debug)]
pub enum IndexError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("corrupt album index {path}: {source}")]
    Corrupt {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Persisted record of an album's previously processed photos.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AlbumIndex {
    pub photos: Vec<Photo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover: Option<Photo>,
}

impl AlbumIndex {
    /// Load the index from an album output directory.
    ///
    /// A missing file is a first run and yields an empty index. An existing
    /// file that fails to parse is [`IndexError::Corrupt`].
    pub fn load(album_dir: &Path) -> Result<Self, IndexError> {
        let path = album_dir.join(INDEX_FILENAME);
        let content = match fs::read_to_string(&path) {
            Ok(c) => c,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Self::default());
            }
            Err(err) => return Err(err.into()),
        };
        serde_json::from_str(&content).map_err(|source| IndexError::Corrupt { path, source })
    }

    /// Replace the persisted index for an album output directory.
    ///
    /// Writes to a temp file in the same directory and renames over the old
    /// index, so an interrupted run never leaves a half-written file behind
    /// the `index.json` name.
    pub fn save(&self, album_dir: &Path) -> Result<(), IndexError> {
        let json = serde_json::to_string_pretty(self)?;
        let tmp = album_dir.join(format!("{INDEX_FILENAME}.tmp"));
        fs::write(&tmp, json)?;
        fs::rename(&tmp, album_dir.join(INDEX_FILENAME))?;
        Ok(())
    }

    /// Look up a previous photo record by its identifier.
    pub fn find(&self, title: &str) -> Option<&Photo> {
        self.photos.iter().find(|p| p.title == title)
    }
}

/// Outcome of change detection for one candidate photo.
#[derive(Debug, Clone, PartialEq)]
pub enum Decision {
    /// Unchanged since the last run: emit the prior record as-is.
    Reuse(Photo),
    /// New or changed: process it. Carries the fingerprint already computed
    /// for the comparison so the processing path never hashes twice.
    Process { fingerprint: String },
}

/// Decide whether a candidate photo needs (re)processing.
///
/// Reuse requires an index entry for `title` whose stored fingerprint equals
/// the hash of `bytes`. Pure decision — no side effects.
pub fn decide(title: &str, bytes: &[u8], index: &AlbumIndex) -> Decision {
    let fingerprint = fingerprint(bytes);
    match index.find(title) {
        Some(prev) if prev.checksum == fingerprint => Decision::Reuse(prev.clone()),
        _ => Decision::Process { fingerprint },
    }
}

/// SHA-256 of raw content, returned as a hex string.
pub fn fingerprint(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}
