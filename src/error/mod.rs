//! # Error Module
//!
//! Error types for the duplicate sweeper.
//!
//! ## Design Principles
//! - **Never panic** on user data - return errors instead
//! - **Per-file failures are not fatal** - a single unreadable or corrupt
//!   file is recorded and the run continues
//! - **Include context** - paths, file names, what went wrong

use std::path::PathBuf;
use thiserror::Error;

/// Top-level application error
#[derive(Error, Debug)]
pub enum DupSweepError {
    #[error("Scanning error: {0}")]
    Scan(#[from] ScanError),

    #[error("Indexing error: {0}")]
    Index(#[from] IndexError),

    #[error("Move error: {0}")]
    Move(#[from] MoveError),

    #[error("Log error: {0}")]
    Report(#[from] ReportError),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Errors that occur while discovering image files
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    #[error("Permission denied accessing: {path}")]
    PermissionDenied { path: PathBuf },

    #[error("Failed to read directory entry {path}: {source}")]
    ReadEntry {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors that occur while building the fingerprint index.
///
/// Both variants are recovered locally: the affected signal is recorded as
/// absent and the file keeps participating in the groupings that don't need
/// it (independent failure domains).
#[derive(Error, Debug)]
pub enum IndexError {
    #[error("Failed to read {path} for content digest: {source}")]
    UnreadableFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to decode image {path}: {reason}")]
    UndecodableImage { path: PathBuf, reason: String },
}

/// Errors that occur while relocating duplicates into the backup directory
#[derive(Error, Debug)]
pub enum MoveError {
    #[error("Failed to create backup directory {path}: {source}")]
    CreateBackupDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to move {path} to {dest}: {source}")]
    MoveFailed {
        path: PathBuf,
        dest: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors that occur while writing the CSV audit log
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Failed to write log to {path}: {source}")]
    WriteLog {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience Result type alias
pub type Result<T> = std::result::Result<T, DupSweepError>;
