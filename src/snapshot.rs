use crate::api::models::MatchRecord;
use crate::error::SnapshotError;
use log::info;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Durable per-tournament match snapshots, one JSON array file each.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    root: PathBuf,
}

/// Filesystem-safe key for a tournament display name.
pub fn snapshot_key(tournament_name: &str) -> String {
    tournament_name
        .chars()
        .map(|c| if c.is_whitespace() || c == '/' || c == '\\' { '_' } else { c })
        .collect()
}

impl SnapshotStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        SnapshotStore { root: root.into() }
    }

    pub fn snapshot_path(&self, tournament_name: &str) -> PathBuf {
        self.root.join(format!("{}.json", snapshot_key(tournament_name)))
    }

    /// `Ok(None)` when no snapshot exists yet; that is the normal first-use
    /// case, not an error.
    pub fn read(&self, tournament_name: &str) -> Result<Option<Vec<MatchRecord>>, SnapshotError> {
        let path = self.snapshot_path(tournament_name);

        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(SnapshotError::Read {
                    path,
                    reason: e.to_string(),
                })
            }
        };

        serde_json::from_str(&content)
            .map(Some)
            .map_err(|e| SnapshotError::Corrupt {
                path,
                reason: e.to_string(),
            })
    }

    /// Creates the snapshot. An existing snapshot is never replaced here.
    ///
    /// The content goes to a temp file in the same directory first and is
    /// linked into place only once complete, so a failed write leaves no
    /// snapshot behind.
    pub fn write(&self, tournament_name: &str, records: &[MatchRecord]) -> Result<PathBuf, SnapshotError> {
        let path = self.snapshot_path(tournament_name);
        let staged = self.stage(&path, records)?;

        staged.persist_noclobber(&path).map_err(|e| match e.error.kind() {
            ErrorKind::AlreadyExists => SnapshotError::AlreadyExists(path.clone()),
            _ => write_error(&path, e.error),
        })?;

        info!("Saved {} matches to {}", records.len(), path.display());
        Ok(path)
    }

    /// Overwrites the snapshot. Only explicit refreshes go through here.
    pub fn replace(&self, tournament_name: &str, records: &[MatchRecord]) -> Result<PathBuf, SnapshotError> {
        let path = self.snapshot_path(tournament_name);
        let staged = self.stage(&path, records)?;

        staged.persist(&path).map_err(|e| write_error(&path, e.error))?;

        info!("Replaced snapshot {} ({} matches)", path.display(), records.len());
        Ok(path)
    }

    fn stage(&self, path: &Path, records: &[MatchRecord]) -> Result<NamedTempFile, SnapshotError> {
        let json = serde_json::to_string_pretty(records).map_err(|e| SnapshotError::Write {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        fs::create_dir_all(&self.root).map_err(|e| write_error(path, e))?;
        let mut staged = NamedTempFile::new_in(&self.root).map_err(|e| write_error(path, e))?;
        staged
            .write_all(json.as_bytes())
            .and_then(|_| staged.flush())
            .map_err(|e| write_error(path, e))?;
        Ok(staged)
    }
}

fn write_error(path: &Path, e: std::io::Error) -> SnapshotError {
    SnapshotError::Write {
        path: path.to_path_buf(),
        reason: e.to_string(),
    }
}
