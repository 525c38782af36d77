//! Snapshot store
//!
//! Owns the on-disk representation of the last observed [`Snapshot`]:
//! a pretty-printed UTF-8 JSON document at a single configured path.
//!
//! - Missing file: first run, `load` yields `None`
//! - Unparsable or invariant-violating file: `CorruptState`, never `None`
//! - Writes go to a sibling temp file, are fsynced, then renamed over the target

use crate::models::Snapshot;
use crate::{Error, Result};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Durable single-file snapshot storage
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the persisted snapshot, `None` when no state exists yet.
    pub fn load(&self) -> Result<Option<Snapshot>> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                info!("No previous state file found at {}", self.path.display());
                return Ok(None);
            }
            Err(e) => return Err(Error::Io(e)),
        };

        let snapshot: Snapshot =
            serde_json::from_slice(&bytes).map_err(|e| self.corrupt(e.to_string()))?;
        snapshot.validate().map_err(|reason| self.corrupt(reason))?;

        info!(
            "Loaded previous state with {} entries from {}",
            snapshot.len(),
            self.path.display()
        );
        Ok(Some(snapshot))
    }

    /// Atomically replace the persisted snapshot.
    pub fn save(&self, snapshot: &Snapshot) -> Result<()> {
        let tmp_path = self.temp_path();

        let result = self.write_via(&tmp_path, snapshot);
        if result.is_err() {
            // Best-effort cleanup; the target is untouched
            let _ = fs::remove_file(&tmp_path);
        }
        result.map_err(|source| Error::Write {
            path: self.path.clone(),
            source,
        })?;

        info!(
            "Saved current state ({} entries) to {}",
            snapshot.len(),
            self.path.display()
        );
        Ok(())
    }

    fn write_via(&self, tmp_path: &Path, snapshot: &Snapshot) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let json = serde_json::to_string_pretty(snapshot)?;

        let mut file = fs::File::create(tmp_path)?;
        file.write_all(json.as_bytes())?;
        file.write_all(b"\n")?;
        file.sync_all()?;
        drop(file);

        debug!(
            "Renaming {} -> {}",
            tmp_path.display(),
            self.path.display()
        );
        fs::rename(tmp_path, &self.path)?;
        self.sync_parent_dir()
    }

    /// Persist the rename itself
    #[cfg(unix)]
    fn sync_parent_dir(&self) -> io::Result<()> {
        let parent = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        fs::File::open(parent)?.sync_all()
    }

    #[cfg(not(unix))]
    fn sync_parent_dir(&self) -> io::Result<()> {
        Ok(())
    }

    /// Sibling temp path, same directory so the rename stays on one filesystem
    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "state.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn corrupt(&self, reason: String) -> Error {
        Error::CorruptState {
            path: self.path.clone(),
            reason,
        }
    }
}
