//! # Scanner Module
//!
//! Discovers image files in a directory tree.
//!
//! The extension set is fixed: JPEG (.jpg, .jpeg), PNG (.png) and WebP
//! (.webp), matched case-insensitively. Hidden files and the backup
//! directory itself are skipped, so a re-run after a sweep never
//! re-classifies relocated copies.

mod filter;
mod walker;

pub use filter::ImageFilter;
pub use walker::{ScanConfig, Scanner};

use crate::error::ScanError;
use std::path::PathBuf;

/// Name of the directory duplicates are swept into, excluded from scans
pub const BACKUP_DIR_NAME: &str = "backup_files";

/// Result of a scan operation
#[derive(Debug)]
pub struct ScanResult {
    /// Discovered image paths, in traversal order
    pub files: Vec<PathBuf>,
    /// Errors that occurred during scanning (non-fatal)
    pub errors: Vec<ScanError>,
}
