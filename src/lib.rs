//! # Stillframe
//!
//! An incremental static gallery generator for photo collections. Point it
//! at a directory of JPEGs and it produces a browsable gallery — full-size
//! copies, thumbnails, and plain HTML/CSS pages — while skipping every photo
//! it has already processed in a previous run.
//!
//! # Architecture
//!
//! Each album runs through a fixed pipeline:
//!
//! ```text
//! scan        source dir        → candidate files (name-sorted)
//! process     candidates        → photos           (bounded worker pool)
//! sort        photos            → ordered photos   (shooting date, stable)
//! reconcile   old index vs now  → stale artifacts deleted
//! assemble    ordered photos    → Album (+ cover)  → index.json persisted
//! generate    Album             → index.html / index.css
//! ```
//!
//! Incrementality is content-addressed: each album's output directory holds
//! an `index.json` mapping every photo to a SHA-256 fingerprint of its
//! source bytes. A photo is re-decoded only when its bytes changed; renames
//! and deletions are reconciled by deleting the orphaned derived files. Two
//! runs over an unchanged source tree produce byte-identical output.
//!
//! Concurrency is per album: a dedicated rayon pool bounds how many photos
//! decode in parallel, the first hard failure cancels the rest of the album,
//! and ordering is imposed only after all workers finish. Concurrent
//! processes writing the same output directory are not supported.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`scan`] | Candidate discovery: photo files, album directories |
//! | [`cache`] | Persisted fingerprint index and change detection |
//! | [`imaging`] | JPEG decode, Lanczos3 thumbnails, EXIF shooting date |
//! | [`process`] | Bounded worker pool with cooperative cancellation |
//! | [`album`] | Sorting, reconciliation, assembly, index persistence |
//! | [`generate`] | Maud HTML/CSS rendering of the output model |
//! | [`config`] | `config.toml` loading and validation |
//! | [`output`] | Run events and CLI formatting |
//! | [`types`] | `Photo` and `Album` shared across stages |

pub mod album;
pub mod cache;
pub mod config;
pub mod generate;
pub mod imaging;
pub mod output;
pub mod process;
pub mod scan;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
