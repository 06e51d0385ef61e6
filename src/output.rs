//! Run reporting: per-photo lifecycle events and their CLI formatting.
//!
//! Workers and the reconciler send [`Event`]s over an `mpsc` channel; the
//! binary drains the channel on a printer thread so parallel workers never
//! interleave partial lines. Format functions are pure (return `String`, no
//! I/O) so tests can assert on exact output.

use std::path::PathBuf;
use std::sync::mpsc::Sender;

/// One photo-level lifecycle event during an album run.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// The photo is new or changed and is being processed.
    Processing { title: String },
    /// The photo is unchanged; the prior record is reused.
    Reusing { title: String },
    /// The photo disappeared from the source; its artifacts are deleted.
    Deleting { title: String },
    /// A best-effort artifact deletion failed (not fatal).
    DeleteFailed { path: PathBuf, reason: String },
}

/// Send an event if a channel is attached. A disconnected receiver is not an
/// error — reporting must never fail a build.
pub fn emit(events: Option<&Sender<Event>>, event: Event) {
    if let Some(tx) = events {
        let _ = tx.send(event);
    }
}

/// Format an event as a single CLI line.
pub fn format_event(event: &Event) -> String {
    match event {
        Event::Processing { title } => format!("[processing] {title}"),
        Event::Reusing { title } => format!("[reusing]    {title}"),
        Event::Deleting { title } => format!("[deleting]   {title}"),
        Event::DeleteFailed { path, reason } => {
            format!("[warning]    could not delete {}: {reason}", path.display())
        }
    }
}

/// Print an event to stdout.
pub fn print_event(event: &Event) {
    println!("{}", format_event(event));
}
