use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, error, info, warn};

use crate::entity::{self, Snapshot};
use crate::error::{NoteStashError, Result};

/// Authoritative store: the last payload exactly as received.
pub const COMPACT_STORE: &str = "data.txt";
/// Pretty-printed mirror of the last payload that parsed.
pub const READABLE_STORE: &str = "data_readable.txt";

/// Locations of the two store files inside a data directory.
#[derive(Debug, Clone)]
pub struct StorePaths {
    data_dir: PathBuf,
    compact: PathBuf,
    readable: PathBuf,
}

impl StorePaths {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        let data_dir = data_dir.into();
        Self {
            compact: data_dir.join(COMPACT_STORE),
            readable: data_dir.join(READABLE_STORE),
            data_dir,
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn compact(&self) -> &Path {
        &self.compact
    }

    pub fn readable(&self) -> &Path {
        &self.readable
    }
}

/// What `bootstrap` did on startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapOutcome {
    /// Both stores were written with an empty collection
    Created,
    /// The compact store already existed and was left alone
    AlreadyPresent,
    /// At least one store could not be written (already logged)
    Failed,
}

/// Result of a successful save.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Payload parsed; the readable store now mirrors it
    Mirrored { notes: usize },
    /// Compact store written, readable store left as it was
    CompactOnly,
}

/// File-backed snapshot storage.
///
/// Holds no state besides the paths; every call goes to disk. Callers are
/// responsible for serializing `save` calls.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    paths: StorePaths,
}

impl SnapshotStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            paths: StorePaths::new(data_dir),
        }
    }

    pub fn paths(&self) -> &StorePaths {
        &self.paths
    }

    /// Create both stores holding an empty collection if the compact store is
    /// missing. Failures are logged, never returned.
    pub fn bootstrap(&self) -> BootstrapOutcome {
        if self.paths.compact.exists() {
            debug!(
                path = %self.paths.compact.display(),
                "compact store already exists, skipping bootstrap"
            );
            return BootstrapOutcome::AlreadyPresent;
        }

        if let Err(e) = fs::create_dir_all(&self.paths.data_dir) {
            error!(
                path = %self.paths.data_dir.display(),
                error = %e,
                "failed to create data directory"
            );
            return BootstrapOutcome::Failed;
        }

        let empty = Snapshot::new();
        let mut ok = true;

        match serde_json::to_vec(&empty)
            .map_err(NoteStashError::from)
            .and_then(|bytes| replace_file(&self.paths.compact, &bytes).map_err(Into::into))
        {
            Ok(()) => info!(path = %self.paths.compact.display(), "created default compact store"),
            Err(e) => {
                error!(path = %self.paths.compact.display(), error = %e, "failed to create compact store");
                ok = false;
            }
        }

        match entity::render_readable(&empty)
            .and_then(|bytes| replace_file(&self.paths.readable, &bytes).map_err(Into::into))
        {
            Ok(()) => info!(path = %self.paths.readable.display(), "created default readable store"),
            Err(e) => {
                error!(path = %self.paths.readable.display(), error = %e, "failed to create readable store");
                ok = false;
            }
        }

        if ok {
            BootstrapOutcome::Created
        } else {
            BootstrapOutcome::Failed
        }
    }

    /// Persist a payload.
    ///
    /// The compact store always receives the raw bytes; an error there fails
    /// the whole save. The readable store is only rewritten when the payload
    /// parses as a note collection, and a failure on that side is logged.
    pub fn save(&self, payload: &[u8]) -> Result<SaveOutcome> {
        replace_file(&self.paths.compact, payload).map_err(|e| {
            error!(path = %self.paths.compact.display(), error = %e, "failed to write compact store");
            NoteStashError::from(e)
        })?;

        let snapshot = match entity::parse_snapshot(payload) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(error = %e, bytes = payload.len(), "payload is not a note collection, readable store left unchanged");
                return Ok(SaveOutcome::CompactOnly);
            }
        };

        let written = entity::render_readable(&snapshot)
            .and_then(|bytes| replace_file(&self.paths.readable, &bytes).map_err(Into::into));
        match written {
            Ok(()) => {
                info!(notes = snapshot.len(), bytes = payload.len(), "snapshot saved");
                Ok(SaveOutcome::Mirrored {
                    notes: snapshot.len(),
                })
            }
            Err(e) => {
                warn!(path = %self.paths.readable.display(), error = %e, "failed to write readable store");
                Ok(SaveOutcome::CompactOnly)
            }
        }
    }

    /// Read the compact store verbatim.
    pub fn load(&self) -> Result<Vec<u8>> {
        match fs::read(&self.paths.compact) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Err(NoteStashError::StoreMissing),
            Err(e) => {
                error!(path = %self.paths.compact.display(), error = %e, "failed to read compact store");
                Err(e.into())
            }
        }
    }
}

/// Replace `path` with `bytes` via a synced temp file in the same directory
/// and a rename, so readers see either the old or the new content. Each call
/// gets its own temp file.
fn replace_file(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut prefix = std::ffi::OsString::from(".");
    if let Some(name) = path.file_name() {
        prefix.push(name);
    }
    prefix.push(".");

    let mut tmp = tempfile::Builder::new()
        .prefix(&prefix)
        .suffix(".tmp")
        .tempfile_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
