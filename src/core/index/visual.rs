//! Visual fingerprints for similarity-based duplicate detection.
//!
//! A fingerprint is a perceptual hash of the image at low resolution:
//! visually similar images produce fingerprints at a small Hamming
//! distance even when their bytes differ (recompression, resizing,
//! minor edits).

use crate::error::IndexError;
use image_hasher::{HashAlg, Hasher, HasherConfig};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A computed visual fingerprint
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VisualFingerprint {
    bytes: Vec<u8>,
}

impl VisualFingerprint {
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    /// Hamming distance: the number of bits that differ.
    ///
    /// Lower distance = more visually similar.
    pub fn distance(&self, other: &Self) -> u32 {
        self.bytes
            .iter()
            .zip(other.bytes.iter())
            .map(|(a, b)| (a ^ b).count_ones())
            .sum()
    }

    /// Total number of bits in this fingerprint
    pub fn bit_count(&self) -> u32 {
        (self.bytes.len() * 8) as u32
    }

    /// Render as lowercase hex, the canonical string form
    pub fn to_hex(&self) -> String {
        self.bytes.iter().map(|b| format!("{:02x}", b)).collect()
    }
}

impl std::fmt::Display for VisualFingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

/// Computes visual fingerprints from image files.
///
/// Uses a DCT-based gradient hash at 8x8, the configuration that held up
/// best against recompressed copies.
pub struct Fingerprinter {
    hasher: Hasher,
}

impl Fingerprinter {
    pub fn new() -> Self {
        let hasher = HasherConfig::new()
            .hash_size(8, 8)
            .hash_alg(HashAlg::DoubleGradient)
            .to_hasher();
        Self { hasher }
    }

    /// Fingerprint an image file.
    ///
    /// Returns `UndecodableImage` when the file cannot be decoded; the
    /// caller records the fingerprint as absent and moves on.
    pub fn fingerprint_file(&self, path: &Path) -> Result<VisualFingerprint, IndexError> {
        let image = image::open(path).map_err(|e| IndexError::UndecodableImage {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let hash = self.hasher.hash_image(&image);
        Ok(VisualFingerprint::from_bytes(hash.as_bytes().to_vec()))
    }
}

impl Default for Fingerprinter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgb};
    use std::path::PathBuf;

    fn fingerprint(bytes: &[u8]) -> VisualFingerprint {
        VisualFingerprint::from_bytes(bytes.to_vec())
    }

    #[test]
    fn distance_to_self_is_zero() {
        let fp = fingerprint(&[0xFF, 0x00, 0xAA, 0x55]);
        assert_eq!(fp.distance(&fp), 0);
    }

    #[test]
    fn distance_is_symmetric() {
        let a = fingerprint(&[0xFF, 0x00]);
        let b = fingerprint(&[0x00, 0xFF]);
        assert_eq!(a.distance(&b), b.distance(&a));
    }

    #[test]
    fn distance_counts_differing_bits() {
        let a = fingerprint(&[0b11111111]);
        let b = fingerprint(&[0b00000000]);
        assert_eq!(a.distance(&b), 8);
    }

    #[test]
    fn to_hex_produces_canonical_form() {
        let fp = fingerprint(&[0xDE, 0xAD, 0xBE, 0xEF]);
        assert_eq!(fp.to_hex(), "deadbeef");
    }

    #[test]
    fn identical_images_produce_identical_fingerprints() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("gray.png");
        let img = ImageBuffer::from_fn(64, 64, |_, _| Rgb([128u8, 128, 128]));
        img.save(&path).unwrap();

        let fingerprinter = Fingerprinter::new();
        let a = fingerprinter.fingerprint_file(&path).unwrap();
        let b = fingerprinter.fingerprint_file(&path).unwrap();

        assert_eq!(a.distance(&b), 0);
    }

    #[test]
    fn similar_images_are_close() {
        let tmp = tempfile::tempdir().unwrap();
        let path_a = tmp.path().join("a.png");
        let path_b = tmp.path().join("b.png");

        let gradient = ImageBuffer::from_fn(64, 64, |x, _| Rgb([(x * 4) as u8, 0, 0]));
        gradient.save(&path_a).unwrap();
        // Same gradient, slightly brightened
        let brighter =
            ImageBuffer::from_fn(64, 64, |x, _| Rgb([((x * 4) as u8).saturating_add(5), 5, 5]));
        brighter.save(&path_b).unwrap();

        let fingerprinter = Fingerprinter::new();
        let a = fingerprinter.fingerprint_file(&path_a).unwrap();
        let b = fingerprinter.fingerprint_file(&path_b).unwrap();

        assert!(a.distance(&b) <= 5);
    }

    #[test]
    fn undecodable_file_reports_reason() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("corrupt.jpg");
        std::fs::write(&path, b"this is not a valid image file").unwrap();

        let fingerprinter = Fingerprinter::new();
        let result = fingerprinter.fingerprint_file(&path);

        assert!(matches!(
            result,
            Err(IndexError::UndecodableImage { .. })
        ));
    }

    #[test]
    fn missing_file_is_undecodable() {
        let fingerprinter = Fingerprinter::new();
        let result = fingerprinter.fingerprint_file(&PathBuf::from("/nonexistent.png"));
        assert!(result.is_err());
    }
}
