//! # Index Module
//!
//! The fingerprint index: one entry per scanned file, carrying the three
//! classification signals.
//!
//! ## Signals
//! - **name** - the file's basename, always present
//! - **digest** - SHA-256 of the content; absent if the file could not be read
//! - **fingerprint** - perceptual hash; absent if the image could not be decoded
//!
//! The two hash signals fail independently: a file the image decoder
//! rejects still groups by name and content, and an unreadable file can in
//! principle still be matched by name.
//!
//! Entries are computed in parallel but the index preserves scan order, so
//! every downstream stage sees the same deterministic sequence regardless
//! of thread count.

mod digest;
mod visual;

pub use digest::{digest_file, ContentDigest};
pub use visual::{Fingerprinter, VisualFingerprint};

use crate::error::IndexError;
use crate::events::{Event, EventSender, IndexEvent};
use rayon::prelude::*;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

/// One scanned file and its classification signals
#[derive(Debug, Clone)]
pub struct IndexEntry {
    /// Path to the file
    pub path: PathBuf,
    /// Basename, the key for name matching
    pub name: String,
    /// Content digest, absent on read failure
    pub digest: Option<ContentDigest>,
    /// Visual fingerprint, absent on decode failure
    pub fingerprint: Option<VisualFingerprint>,
}

/// The fingerprint index for a single run
#[derive(Debug)]
pub struct FingerprintIndex {
    entries: Vec<IndexEntry>,
    errors: Vec<IndexError>,
}

impl FingerprintIndex {
    /// Build the index for `paths`, in parallel, preserving input order.
    ///
    /// Per-file failures are collected, never fatal.
    pub fn build(paths: &[PathBuf], events: &EventSender) -> Self {
        events.send(Event::Index(IndexEvent::Started {
            total_files: paths.len(),
        }));

        let fingerprinter = Fingerprinter::new();
        let completed = AtomicUsize::new(0);

        let indexed: Vec<(IndexEntry, Vec<IndexError>)> = paths
            .par_iter()
            .map(|path| {
                let mut errors = Vec::new();

                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();

                let digest = match digest_file(path) {
                    Ok(digest) => Some(digest),
                    Err(e) => {
                        tracing::warn!(path = %path.display(), error = %e, "skipping content digest");
                        events.send(Event::Index(IndexEvent::Error {
                            path: path.clone(),
                            message: e.to_string(),
                        }));
                        errors.push(e);
                        None
                    }
                };

                let fingerprint = match fingerprinter.fingerprint_file(path) {
                    Ok(fingerprint) => Some(fingerprint),
                    Err(e) => {
                        tracing::debug!(path = %path.display(), error = %e, "skipping visual fingerprint");
                        events.send(Event::Index(IndexEvent::Error {
                            path: path.clone(),
                            message: e.to_string(),
                        }));
                        errors.push(e);
                        None
                    }
                };

                events.send(Event::Index(IndexEvent::FileIndexed {
                    path: path.clone(),
                    completed: completed.fetch_add(1, Ordering::SeqCst) + 1,
                }));

                (
                    IndexEntry {
                        path: path.clone(),
                        name,
                        digest,
                        fingerprint,
                    },
                    errors,
                )
            })
            .collect();

        let mut entries = Vec::with_capacity(indexed.len());
        let mut errors = Vec::new();
        for (entry, entry_errors) in indexed {
            entries.push(entry);
            errors.extend(entry_errors);
        }

        events.send(Event::Index(IndexEvent::Completed {
            total_indexed: entries.len(),
            fingerprint_failures: entries.iter().filter(|e| e.fingerprint.is_none()).count(),
        }));

        Self { entries, errors }
    }

    /// Entries in scan order
    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    /// Per-file failures collected during the build
    pub fn errors(&self) -> &[IndexError] {
        &self.errors
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The (fingerprint, path) pairs that can participate in visual
    /// clustering, in scan order
    pub fn fingerprinted(&self) -> Vec<(VisualFingerprint, PathBuf)> {
        self.entries
            .iter()
            .filter_map(|e| {
                e.fingerprint
                    .as_ref()
                    .map(|fp| (fp.clone(), e.path.clone()))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::null_sender;
    use image::{ImageBuffer, Rgb};
    use std::fs;
    use tempfile::TempDir;

    fn write_png(dir: &TempDir, name: &str, shade: u8) -> PathBuf {
        let path = dir.path().join(name);
        let img = ImageBuffer::from_fn(32, 32, |_, _| Rgb([shade, shade, shade]));
        img.save(&path).unwrap();
        path
    }

    #[test]
    fn build_preserves_scan_order() {
        let tmp = TempDir::new().unwrap();
        let a = write_png(&tmp, "a.png", 10);
        let b = write_png(&tmp, "b.png", 200);
        let c = write_png(&tmp, "c.png", 90);

        let index = FingerprintIndex::build(&[a.clone(), b.clone(), c.clone()], &null_sender());

        let paths: Vec<_> = index.entries().iter().map(|e| e.path.clone()).collect();
        assert_eq!(paths, vec![a, b, c]);
    }

    #[test]
    fn build_extracts_basenames() {
        let tmp = TempDir::new().unwrap();
        let nested = tmp.path().join("sub");
        fs::create_dir(&nested).unwrap();
        let path = nested.join("photo.png");
        let img = ImageBuffer::from_fn(16, 16, |_, _| Rgb([1u8, 2, 3]));
        img.save(&path).unwrap();

        let index = FingerprintIndex::build(&[path], &null_sender());

        assert_eq!(index.entries()[0].name, "photo.png");
    }

    #[test]
    fn corrupt_image_still_gets_digest() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("corrupt.jpg");
        fs::write(&path, b"not an image at all").unwrap();

        let index = FingerprintIndex::build(&[path], &null_sender());

        let entry = &index.entries()[0];
        assert!(entry.digest.is_some());
        assert!(entry.fingerprint.is_none());
        assert_eq!(index.errors().len(), 1);
    }

    #[test]
    fn missing_file_keeps_name_only() {
        let index = FingerprintIndex::build(
            &[PathBuf::from("/nonexistent/ghost.jpg")],
            &null_sender(),
        );

        let entry = &index.entries()[0];
        assert_eq!(entry.name, "ghost.jpg");
        assert!(entry.digest.is_none());
        assert!(entry.fingerprint.is_none());
        assert_eq!(index.errors().len(), 2);
    }

    #[test]
    fn fingerprinted_excludes_absent_fingerprints() {
        let tmp = TempDir::new().unwrap();
        let good = write_png(&tmp, "good.png", 50);
        let bad = tmp.path().join("bad.jpg");
        fs::write(&bad, b"garbage").unwrap();

        let index = FingerprintIndex::build(&[good.clone(), bad], &null_sender());

        let pairs = index.fingerprinted();
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].1, good);
    }
}
