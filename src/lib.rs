//! # dupsweep
//!
//! Finds duplicate images in a directory tree and sweeps the redundant
//! copies into a backup folder, keeping one canonical file per group.
//!
//! ## Classification Signals
//! Three independent signals feed the sweep, and they deliberately
//! overlap:
//! - **Name** - identical basenames (reported, never moved by default)
//! - **Content** - identical SHA-256 digests, byte-for-byte copies
//! - **Visual** - perceptual fingerprints within a Hamming threshold
//!
//! ## Architecture
//! The library is split into an engine and presentation layers:
//! - `core` - scanning, indexing, grouping, clustering, reconciliation
//! - `events` - channel-based progress reporting
//! - `error` - error taxonomy
//!
//! The engine never deletes anything; planned removals are moved, and
//! only when the caller asks for it.

pub mod core;
pub mod error;
pub mod events;

// Re-export commonly used types at the crate root
pub use error::{DupSweepError, Result};

/// Initialize tracing for the library.
///
/// This should be called by the application entry point.
pub fn init_tracing() {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set global default tracing subscriber");
}
