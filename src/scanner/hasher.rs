//! Content fingerprinting with streaming reads.
//!
//! # Overview
//!
//! A [`Fingerprint`] is the grouping key for duplicate detection: the number
//! of bytes read plus two independent digests (MD5 and SHA-256) computed over
//! the same bytes. Both digests are kept as separate fields so either one can
//! be replaced without touching the other.
//!
//! Files are read in [`READ_CHUNK_SIZE`] chunks and each chunk is fed to both
//! digests, which yields exactly the digests of hashing the whole buffer at
//! once.
//!
//! # Example
//!
//! ```no_run
//! use dupsweep::scanner::Hasher;
//! use std::path::Path;
//!
//! let hasher = Hasher::new();
//! let fp = hasher.fingerprint(Path::new("photo.jpg")).unwrap();
//! println!("{} bytes, md5 {}, sha256 {}", fp.size, fp.md5, fp.sha256);
//! ```

use std::fmt;
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::Serialize;
use sha2::{Digest, Sha256};

use super::HashError;

/// Size of each read from disk.
pub const READ_CHUNK_SIZE: usize = 64 * 1024;

/// Content fingerprint used as the duplicate grouping key.
///
/// Two files with equal fingerprints are treated as content-identical.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Fingerprint {
    /// Number of bytes read from the file
    pub size: u64,
    /// MD5 digest, 32 lowercase hex characters
    pub md5: String,
    /// SHA-256 digest, 64 lowercase hex characters
    pub sha256: String,
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.size, self.md5, self.sha256)
    }
}

/// Incremental state for both digests.
struct DigestPair {
    size: u64,
    md5: md5::Context,
    sha256: Sha256,
}

impl DigestPair {
    fn new() -> Self {
        Self {
            size: 0,
            md5: md5::Context::new(),
            sha256: Sha256::new(),
        }
    }

    fn update(&mut self, chunk: &[u8]) {
        self.size += chunk.len() as u64;
        self.md5.consume(chunk);
        self.sha256.update(chunk);
    }

    fn finish(self) -> Fingerprint {
        Fingerprint {
            size: self.size,
            md5: format!("{:x}", self.md5.compute()),
            sha256: hex::encode(self.sha256.finalize()),
        }
    }
}

/// Computes [`Fingerprint`]s for files on disk.
#[derive(Debug, Clone, Default)]
pub struct Hasher {
    shutdown_flag: Option<Arc<AtomicBool>>,
}

impl Hasher {
    /// Create a new hasher.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the shutdown flag checked between chunks.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }

    /// Fingerprint the file at `path`.
    ///
    /// The size is taken from the bytes actually read, not from metadata.
    ///
    /// # Errors
    ///
    /// Returns [`HashError`] if the file cannot be opened or read, or
    /// [`HashError::Interrupted`] if shutdown is requested mid-read.
    pub fn fingerprint(&self, path: &Path) -> Result<Fingerprint, HashError> {
        let mut file = File::open(path).map_err(|e| HashError::from_io(path, e))?;
        let mut digests = DigestPair::new();
        let mut buffer = vec![0u8; READ_CHUNK_SIZE];

        loop {
            if self.is_shutdown_requested() {
                return Err(HashError::Interrupted(path.to_path_buf()));
            }
            let n = match file.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(HashError::from_io(path, e)),
            };
            digests.update(&buffer[..n]);
        }

        let fingerprint = digests.finish();
        log::trace!("Fingerprinted {}: {}", path.display(), fingerprint);
        Ok(fingerprint)
    }
}

/// Fingerprint an in-memory buffer.
#[must_use]
pub fn fingerprint_bytes(data: &[u8]) -> Fingerprint {
    let mut digests = DigestPair::new();
    digests.update(data);
    digests.finish()
}
