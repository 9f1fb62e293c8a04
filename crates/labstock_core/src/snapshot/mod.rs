//! Inventory snapshot persistence boundary.
//!
//! # Responsibility
//! - Save and load the versioned inventory document as JSON.
//! - Guard against snapshots written by a newer format version.
//!
//! # Invariants
//! - The history tree is never part of a snapshot; loading always
//!   yields a document with fresh, empty history.
//! - Loaded documents are validated structurally (counter parse,
//!   duplicate/overshooting IDs, sort order) before use.

use std::error::Error;
use std::fmt::{Display, Formatter};

mod store;

pub use store::{JsonFileStore, SnapshotStore};

pub type SnapshotResult<T> = Result<T, SnapshotError>;

/// Errors from snapshot save/load operations.
#[derive(Debug)]
pub enum SnapshotError {
    /// Filesystem failure.
    Io(std::io::Error),
    /// Malformed JSON or a document violating model invariants
    /// (structural validation runs during deserialization).
    Json(serde_json::Error),
    /// Document was written by a newer major format version.
    UnsupportedVersion { found: u32, supported: u32 },
}

impl Display for SnapshotError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "{err}"),
            Self::Json(err) => write!(f, "{err}"),
            Self::UnsupportedVersion { found, supported } => write!(
                f,
                "snapshot major version {found} is newer than supported {supported}"
            ),
        }
    }
}

impl Error for SnapshotError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Json(err) => Some(err),
            Self::UnsupportedVersion { .. } => None,
        }
    }
}

impl From<std::io::Error> for SnapshotError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for SnapshotError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}
