//! Candidate discovery: photo files within an album, album directories
//! within the photos root.
//!
//! Two traversal modes, selected by `enable_albums` and never combined:
//!
//! - **Single album**: the photos directory itself is the album. Only its
//!   direct children are considered; subdirectories are ignored.
//! - **Albums**: every directory under the root (at any depth) is a
//!   candidate album, excluding generated `thumbnails` directories. Each
//!   album still lists only its own direct children.
//!
//! Anything that is not a `.jpg`/`.jpeg` file (case-insensitive) is skipped
//! silently — sidecar files, dotfiles, and foreign formats are expected
//! neighbors, not errors. Results are name-sorted so the pipeline sees a
//! deterministic source order regardless of readdir order.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Directory holding generated thumbnails inside an album's output dir.
pub const THUMBNAILS_DIR: &str = "thumbnails";

const PHOTO_EXTENSIONS: &[&str] = &["jpg", "jpeg"];

/// Whether a path has a recognized photo extension (case-insensitive).
pub fn is_photo_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| {
            PHOTO_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
}

/// List the photo files directly inside an album directory, name-sorted.
///
/// Non-recursive: subdirectories of an album are never photos of that album.
pub fn list_photo_files(album_dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = fs::read_dir(album_dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && is_photo_file(path))
        .collect();
    files.sort();
    Ok(files)
}

/// List the album directories under the photos root, name-sorted.
///
/// Walks the whole tree: any directory except the root itself and
/// `thumbnails` directories is an album candidate. Directories that turn out
/// to contain no photos are skipped later by the caller.
pub fn list_album_dirs(root: &Path) -> io::Result<Vec<PathBuf>> {
    let mut dirs = Vec::new();
    for entry in WalkDir::new(root).min_depth(1) {
        let entry = entry.map_err(io::Error::other)?;
        if entry.file_type().is_dir() && entry.file_name() != THUMBNAILS_DIR {
            dirs.push(entry.into_path());
        }
    }
    dirs.sort();
    Ok(dirs)
}
