//! Content digests for byte-identical duplicate detection.

use crate::error::IndexError;
use sha2::{Digest, Sha256};
use std::io::Read;
use std::path::Path;

/// SHA-256 digest of a file's full content.
///
/// Two files with equal digests are byte-identical.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentDigest([u8; 32]);

impl ContentDigest {
    /// Construct from raw digest bytes
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Render as lowercase hex, the canonical string form
    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{:02x}", b)).collect()
    }
}

impl std::fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

/// Compute the content digest of a file using streaming I/O.
///
/// Reads in 64KB chunks to avoid loading large files entirely into memory.
pub fn digest_file(path: &Path) -> Result<ContentDigest, IndexError> {
    let open = |p: &Path| -> std::io::Result<ContentDigest> {
        let file = std::fs::File::open(p)?;
        let mut reader = std::io::BufReader::with_capacity(64 * 1024, file);
        let mut hasher = Sha256::new();
        let mut buf = [0u8; 64 * 1024];

        loop {
            let n = reader.read(&mut buf)?;
            if n == 0 {
                break;
            }
            hasher.update(&buf[..n]);
        }

        Ok(ContentDigest(hasher.finalize().into()))
    };

    open(path).map_err(|source| IndexError::UnreadableFile {
        path: path.to_path_buf(),
        source,
    })
}
