//! The photo worker pool.
//!
//! Dispatches an album's candidate files across a bounded rayon thread pool.
//! Each unit of work: read the source bytes → change detection → either
//! reuse the prior index record or decode/resize through the
//! [`ImageBackend`](crate::imaging::ImageBackend) and write the derived
//! copy + thumbnail into the album output directory.
//!
//! # Concurrency model
//!
//! A dedicated pool with `max_workers` threads bounds how many photos are in
//! flight; excess files queue inside rayon until a thread frees up. Workers
//! write results into pre-sized slots, one per source file, so the collected
//! set comes back in source (name-sorted) order without any lock around the
//! collection — which also keeps the persisted index byte-stable across runs
//! of an unchanged source tree.
//!
//! # Failure semantics
//!
//! An album run is all-or-nothing. The first hard failure (read, decode, or
//! write) wins the [`OnceLock`] and raises the shared cancellation flag;
//! workers observe the flag between coarse steps and skip remaining work
//! rather than interrupting an in-progress decode. Partial artifacts from
//! already-finished units are harmless: the index is only replaced after a
//! fully successful run, so the next run redoes exactly the unfinished part.

use crate::cache::{self, AlbumIndex, Decision};
use crate::imaging::{ImageBackend, ImagingError};
use crate::output::{self, Event};
use crate::scan::THUMBNAILS_DIR;
use crate::types::Photo;
use rayon::prelude::*;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::mpsc::Sender;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("error while reading photo {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("error while processing photo {path}: {source}")]
    Image {
        path: PathBuf,
        source: ImagingError,
    },
    #[error("error while writing {path}: {source}")]
    Write { path: PathBuf, source: io::Error },
    #[error("failed to build worker pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),
}

/// Collected result of one album's worker pool run.
#[derive(Debug)]
pub struct ProcessOutcome {
    /// Photos in source (name-sorted) order.
    pub photos: Vec<Photo>,
    /// How many were (re)processed this run.
    pub processed: u32,
    /// How many were reused from the index.
    pub reused: u32,
}

/// Run the worker pool over an album's candidate files.
///
/// `files` is the name-sorted list from [`crate::scan::list_photo_files`];
/// `index` is the previous run's record, read-only for the whole run. The
/// album output directory and its `thumbnails/` subdirectory must already
/// exist.
pub fn process_album(
    backend: &impl ImageBackend,
    files: &[PathBuf],
    output_dir: &Path,
    index: &AlbumIndex,
    max_size: u32,
    max_workers: usize,
    events: Option<&Sender<Event>>,
) -> Result<ProcessOutcome, ProcessError> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(max_workers)
        .build()?;

    let mut slots: Vec<Option<Photo>> = vec![None; files.len()];
    let cancelled = AtomicBool::new(false);
    let first_error: OnceLock<ProcessError> = OnceLock::new();
    let processed = AtomicU32::new(0);
    let reused = AtomicU32::new(0);

    pool.install(|| {
        files
            .par_iter()
            .zip(slots.par_iter_mut())
            .for_each(|(path, slot)| {
                if cancelled.load(Ordering::SeqCst) {
                    return;
                }
                match process_photo(backend, path, output_dir, index, max_size, events, &cancelled)
                {
                    Ok(Some((photo, was_reused))) => {
                        if was_reused {
                            reused.fetch_add(1, Ordering::Relaxed);
                        } else {
                            processed.fetch_add(1, Ordering::Relaxed);
                        }
                        *slot = Some(photo);
                    }
                    // Unit observed cancellation and bailed between steps.
                    Ok(None) => {}
                    Err(err) => {
                        let _ = first_error.set(err);
                        cancelled.store(true, Ordering::SeqCst);
                    }
                }
            });
    });

    if let Some(err) = first_error.into_inner() {
        return Err(err);
    }

    Ok(ProcessOutcome {
        photos: slots.into_iter().flatten().collect(),
        processed: processed.into_inner(),
        reused: reused.into_inner(),
    })
}

/// Process one candidate file. Returns `None` when cancellation was observed
/// mid-unit.
fn process_photo(
    backend: &impl ImageBackend,
    path: &Path,
    output_dir: &Path,
    index: &AlbumIndex,
    max_size: u32,
    events: Option<&Sender<Event>>,
    cancelled: &AtomicBool,
) -> Result<Option<(Photo, bool)>, ProcessError> {
    let title = path
        .file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .into_owned();

    let bytes = fs::read(path).map_err(|source| ProcessError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    match cache::decide(&title, &bytes, index) {
        Decision::Reuse(prev) => {
            output::emit(events, Event::Reusing { title });
            Ok(Some((prev, true)))
        }
        Decision::Process { fingerprint } => {
            output::emit(
                events,
                Event::Processing {
                    title: title.clone(),
                },
            );
            if cancelled.load(Ordering::SeqCst) {
                return Ok(None);
            }

            let result = backend
                .process(&bytes, max_size)
                .map_err(|source| ProcessError::Image {
                    path: path.to_path_buf(),
                    source,
                })?;
            if cancelled.load(Ordering::SeqCst) {
                return Ok(None);
            }

            let copy_path = output_dir.join(&title);
            fs::write(&copy_path, &bytes).map_err(|source| ProcessError::Write {
                path: copy_path,
                source,
            })?;

            let thumbnail_rel = format!("{THUMBNAILS_DIR}/{title}");
            let thumbnail_path = output_dir.join(THUMBNAILS_DIR).join(&title);
            fs::write(&thumbnail_path, &result.thumbnail).map_err(|source| {
                ProcessError::Write {
                    path: thumbnail_path,
                    source,
                }
            })?;

            Ok(Some((
                Photo {
                    photo_path: title.clone(),
                    thumbnail_path: thumbnail_rel,
                    shooting_date: result.shooting_date,
                    checksum: fingerprint,
                    title,
                },
                false,
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::fingerprint;
    use crate::imaging::tests::MockBackend;
    use std::sync::atomic::Ordering;
    use std::sync::mpsc;
    use std::time::Duration;
    use tempfile::TempDir;

    /// Source dir with the given (name, content) files, plus a ready output
    /// dir with its thumbnails subdirectory.
    fn setup(files: &[(&str, &[u8])]) -> (TempDir, TempDir, Vec<PathBuf>) {
        let source = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        fs::create_dir(output.path().join(THUMBNAILS_DIR)).unwrap();
        for (name, content) in files {
            fs::write(source.path().join(name), content).unwrap();
        }
        let paths = crate::scan::list_photo_files(source.path()).unwrap();
        (source, output, paths)
    }

    fn prior(title: &str, content: &[u8]) -> Photo {
        Photo {
            title: title.to_string(),
            photo_path: title.to_string(),
            thumbnail_path: format!("{THUMBNAILS_DIR}/{title}"),
            shooting_date: None,
            checksum: fingerprint(content),
        }
    }

    // =========================================================================
    // Processing fresh photos
    // =========================================================================

    #[test]
    fn processes_new_photos_and_writes_artifacts() {
        let (_source, output, files) = setup(&[("a.jpg", b"aaa"), ("b.jpg", b"bbb")]);
        let backend = MockBackend::new();

        let outcome = process_album(
            &backend,
            &files,
            output.path(),
            &AlbumIndex::default(),
            480,
            4,
            None,
        )
        .unwrap();

        assert_eq!(outcome.processed, 2);
        assert_eq!(outcome.reused, 0);
        assert_eq!(outcome.photos.len(), 2);
        assert_eq!(outcome.photos[0].checksum, fingerprint(b"aaa"));

        assert_eq!(fs::read(output.path().join("a.jpg")).unwrap(), b"aaa");
        assert_eq!(
            fs::read(output.path().join(THUMBNAILS_DIR).join("a.jpg")).unwrap(),
            b"thumb:aaa"
        );
    }

    #[test]
    fn photos_come_back_in_source_name_order() {
        let (_source, output, files) =
            setup(&[("c.jpg", b"c"), ("a.jpg", b"a"), ("b.jpg", b"b")]);
        let backend = MockBackend::new();

        let outcome = process_album(
            &backend,
            &files,
            output.path(),
            &AlbumIndex::default(),
            480,
            4,
            None,
        )
        .unwrap();

        let titles: Vec<&str> = outcome.photos.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["a.jpg", "b.jpg", "c.jpg"]);
    }

    // =========================================================================
    // Change detection integration
    // =========================================================================

    #[test]
    fn unchanged_photos_are_reused_without_touching_the_backend() {
        let (_source, output, files) = setup(&[("a.jpg", b"aaa"), ("b.jpg", b"bbb")]);
        let index = AlbumIndex {
            photos: vec![prior("a.jpg", b"aaa"), prior("b.jpg", b"bbb")],
            cover: None,
        };
        let backend = MockBackend::new();
        let (tx, rx) = mpsc::channel();

        let outcome =
            process_album(&backend, &files, output.path(), &index, 480, 4, Some(&tx)).unwrap();
        drop(tx);

        assert_eq!(outcome.reused, 2);
        assert_eq!(outcome.processed, 0);
        assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
        assert_eq!(outcome.photos, index.photos);

        let events: Vec<Event> = rx.iter().collect();
        assert!(
            events
                .iter()
                .all(|e| matches!(e, Event::Reusing { .. }))
        );
    }

    #[test]
    fn changing_one_file_reprocesses_exactly_that_file() {
        let (_source, output, files) = setup(&[("a.jpg", b"aaa"), ("b.jpg", b"CHANGED")]);
        let index = AlbumIndex {
            photos: vec![prior("a.jpg", b"aaa"), prior("b.jpg", b"bbb")],
            cover: None,
        };
        let backend = MockBackend::new();

        let outcome =
            process_album(&backend, &files, output.path(), &index, 480, 4, None).unwrap();

        assert_eq!(outcome.reused, 1);
        assert_eq!(outcome.processed, 1);
        assert_eq!(backend.calls.load(Ordering::SeqCst), 1);
        assert_eq!(outcome.photos[1].checksum, fingerprint(b"CHANGED"));
    }

    // =========================================================================
    // Failure semantics
    // =========================================================================

    #[test]
    fn first_failure_aborts_the_run_and_names_the_file() {
        let (source, output, files) =
            setup(&[("a.jpg", b"bad"), ("b.jpg", b"ok"), ("c.jpg", b"ok2")]);
        let backend = MockBackend::failing_on(b"bad");

        // One worker makes the run sequential: a.jpg fails first and the
        // remaining units must observe cancellation before starting.
        let err = process_album(
            &backend,
            &files,
            output.path(),
            &AlbumIndex::default(),
            480,
            1,
            None,
        )
        .unwrap_err();

        match err {
            ProcessError::Image { path, .. } => {
                assert_eq!(path, source.path().join("a.jpg"));
            }
            other => panic!("expected decode failure, got {other:?}"),
        }
        assert_eq!(backend.calls.load(Ordering::SeqCst), 1);
        assert!(!output.path().join("b.jpg").exists());
    }

    #[test]
    fn missing_source_file_fails_with_read_error() {
        let (source, output, mut files) = setup(&[("a.jpg", b"aaa")]);
        files.push(source.path().join("ghost.jpg"));
        let backend = MockBackend::new();

        let err = process_album(
            &backend,
            &files,
            output.path(),
            &AlbumIndex::default(),
            480,
            1,
            None,
        )
        .unwrap_err();

        assert!(matches!(err, ProcessError::Read { path, .. } if path.ends_with("ghost.jpg")));
    }

    // =========================================================================
    // Concurrency bound
    // =========================================================================

    #[test]
    fn in_flight_work_never_exceeds_max_workers() {
        let contents: Vec<(String, Vec<u8>)> = (0..10)
            .map(|i| (format!("{i:02}.jpg"), format!("photo {i}").into_bytes()))
            .collect();
        let named: Vec<(&str, &[u8])> = contents
            .iter()
            .map(|(n, c)| (n.as_str(), c.as_slice()))
            .collect();
        let (_source, output, files) = setup(&named);
        let backend = MockBackend::with_delay(Duration::from_millis(20));

        process_album(
            &backend,
            &files,
            output.path(),
            &AlbumIndex::default(),
            480,
            2,
            None,
        )
        .unwrap();

        assert_eq!(backend.calls.load(Ordering::SeqCst), 10);
        let peak = backend.max_in_flight.load(Ordering::SeqCst);
        assert!(peak <= 2, "observed {peak} concurrent decodes");
        assert!(peak >= 1);
    }
}
