use std::path::PathBuf;
use thiserror::Error;

/// Failure talking to the remote match API.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FetchError {
    #[error("Tournament path must not be empty")]
    InvalidPath,

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("API returned status {code}: {message}")]
    Status { code: u16, message: String },

    #[error("JSON parsing error: {0}")]
    Json(String),
}

#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("Failed to read snapshot {}: {reason}", path.display())]
    Read { path: PathBuf, reason: String },

    #[error("Snapshot {} is corrupt: {reason}", path.display())]
    Corrupt { path: PathBuf, reason: String },

    #[error("Failed to write snapshot {}: {reason}", path.display())]
    Write { path: PathBuf, reason: String },

    #[error("Snapshot {} already exists", .0.display())]
    AlreadyExists(PathBuf),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Unknown tournament: {0}")]
    UnknownTournament(String),

    #[error("No tournaments selected. Use --tournament <NAME> or --all")]
    NoTournamentsSelected,

    #[error("{0} is a live tournament and has no snapshot to refresh")]
    NotArchived(String),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
}
