//! Per-album pipeline: sort, reconcile, assemble, persist.
//!
//! [`build_album`] drives one album end to end: load the previous index,
//! discover candidates, run the worker pool, order the result, delete
//! artifacts of photos that disappeared from the source, resolve the cover,
//! and atomically replace the index. The reconcile step runs before the
//! index is persisted — if the run dies in between, the next run sees the
//! same stale entries and the deletes are idempotent.

use crate::cache::{AlbumIndex, IndexError};
use crate::config::{GalleryConfig, SortDirection};
use crate::imaging::ImageBackend;
use crate::output::{self, Event};
use crate::process::{self, ProcessError};
use crate::scan::{self, THUMBNAILS_DIR};
use crate::types::{Album, Photo};
use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;
use std::sync::mpsc::Sender;
use thiserror::Error;

/// Reserved file name that designates an album's cover photo.
pub const COVER_FILE_NAME: &str = "cover.jpg";

#[derive(Error, Debug)]
pub enum AlbumError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("index error: {0}")]
    Index(#[from] IndexError),
    #[error("processing error: {0}")]
    Process(#[from] ProcessError),
}

/// Summary of one album run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunStats {
    pub processed: u32,
    pub reused: u32,
    pub deleted: u32,
}

impl fmt::Display for RunStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} processed, {} reused ({} photos)",
            self.processed,
            self.reused,
            self.processed + self.reused
        )?;
        if self.deleted > 0 {
            write!(f, ", {} deleted", self.deleted)?;
        }
        Ok(())
    }
}

/// Build one album from its source directory into its output directory.
pub fn build_album(
    backend: &impl ImageBackend,
    source_dir: &Path,
    output_dir: &Path,
    name: &str,
    config: &GalleryConfig,
    events: Option<&Sender<Event>>,
) -> Result<(Album, RunStats), AlbumError> {
    let previous = AlbumIndex::load(output_dir)?;
    fs::create_dir_all(output_dir.join(THUMBNAILS_DIR))?;

    let files = scan::list_photo_files(source_dir)?;
    let outcome = process::process_album(
        backend,
        &files,
        output_dir,
        &previous,
        config.thumbnail_max_size,
        config.max_workers,
        events,
    )?;

    let mut photos = outcome.photos;
    sort_photos(&mut photos, config.photos_sorting);

    let deleted = reconcile(&previous, &photos, output_dir, events);

    let folder = source_dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let album = assemble(name, &folder, photos);

    AlbumIndex {
        photos: album.photos.clone(),
        cover: album.cover.clone(),
    }
    .save(output_dir)?;

    Ok((
        album,
        RunStats {
            processed: outcome.processed,
            reused: outcome.reused,
            deleted: deleted.len() as u32,
        },
    ))
}

/// Order photos by shooting date, falling back to file name.
///
/// The comparator is pairwise: dates are compared only when both sides have
/// one, otherwise the titles are compared. Dated photos are therefore not
/// grouped ahead of undated ones — an undated photo's position depends on
/// its title against each neighbor. The sort is stable, so a given input
/// order and configuration always reproduce the same output order.
pub fn sort_photos(photos: &mut [Photo], direction: SortDirection) {
    photos.sort_by(|left, right| {
        let ordering = match (left.shooting_date, right.shooting_date) {
            (Some(l), Some(r)) => l.cmp(&r),
            _ => left.title.cmp(&right.title),
        };
        match direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
}

/// Delete derived artifacts of photos that disappeared from the source.
///
/// Best-effort: an artifact that is already gone is fine, and any other
/// deletion failure is reported as a warning event, never an error. Source
/// files are never touched — only paths under the album output directory.
/// Returns the titles whose artifacts were reclaimed.
pub fn reconcile(
    previous: &AlbumIndex,
    photos: &[Photo],
    output_dir: &Path,
    events: Option<&Sender<Event>>,
) -> Vec<String> {
    let current: HashSet<&str> = photos.iter().map(|p| p.title.as_str()).collect();

    let mut deleted = Vec::new();
    for prev in &previous.photos {
        if current.contains(prev.title.as_str()) {
            continue;
        }
        output::emit(
            events,
            Event::Deleting {
                title: prev.title.clone(),
            },
        );
        for rel in [&prev.photo_path, &prev.thumbnail_path] {
            let path = output_dir.join(rel);
            if let Err(err) = fs::remove_file(&path)
                && err.kind() != io::ErrorKind::NotFound
            {
                output::emit(
                    events,
                    Event::DeleteFailed {
                        path,
                        reason: err.to_string(),
                    },
                );
            }
        }
        deleted.push(prev.title.clone());
    }
    deleted
}

/// Turn a processed, sorted photo set into the album data model.
///
/// The cover is the photo whose identifier matches [`COVER_FILE_NAME`]
/// exactly; an album without one exposes no cover and the render layer
/// falls back to the first photo.
pub fn assemble(name: &str, folder: &str, photos: Vec<Photo>) -> Album {
    let cover = photos.iter().find(|p| p.title == COVER_FILE_NAME).cloned();
    Album {
        name: name.to_string(),
        folder: folder.to_string(),
        photos,
        cover,
    }
}
