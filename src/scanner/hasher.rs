//! Streaming file hasher.
//!
//! # Overview
//!
//! [`Hasher`] reads a file through a fixed-size buffer and feeds it to the
//! incremental state of the selected [`Algorithm`]. File contents are never
//! held in memory as a whole. The digest is returned as lowercase hex:
//!
//! | Algorithm | Width | Notes |
//! |-----------|-------|-------|
//! | `md5`     | 32    | default |
//! | `sha256`  | 64    | |
//! | `xxhash`  | ≤ 16  | XXH64, seed 0, no zero padding |
//!
//! # Example
//!
//! ```no_run
//! use dups::scanner::hasher::{digest, Algorithm, Hasher};
//! use std::path::Path;
//!
//! let hasher = Hasher::new(Algorithm::Sha256);
//! let hex = hasher.digest(Path::new("photo.jpg")).unwrap();
//! assert_eq!(hex.len(), 64);
//!
//! // Name-based dispatch falls back to MD5 for unknown names
//! let md5 = digest(Path::new("photo.jpg"), "whatever").unwrap();
//! assert_eq!(md5.len(), 32);
//! ```

use std::convert::Infallible;
use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use std::str::FromStr;

use md5::{Digest as Md5Digest, Md5};
use serde::{Deserialize, Serialize};
use sha2::{Digest as Sha2Digest, Sha256};
use xxhash_rust::xxh64::Xxh64;

use super::HashError;

/// Read buffer size for streaming (64 KiB).
pub const BUFFER_SIZE: usize = 64 * 1024;

/// Content hash family used as the duplicate key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    /// 128-bit MD5
    #[default]
    Md5,
    /// 256-bit SHA-256
    Sha256,
    /// 64-bit XXH64 (non-cryptographic)
    #[serde(rename = "xxhash")]
    XxHash,
}

impl Algorithm {
    /// All supported algorithms.
    pub const ALL: [Algorithm; 3] = [Algorithm::Md5, Algorithm::Sha256, Algorithm::XxHash];

    /// Resolve an algorithm by name.
    ///
    /// Matching is case-insensitive and ignores surrounding whitespace.
    /// Unknown or empty names resolve to [`Algorithm::Md5`].
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "sha256" => Self::Sha256,
            "xxhash" => Self::XxHash,
            "md5" => Self::Md5,
            other => {
                if !other.is_empty() {
                    log::debug!("Unknown algorithm '{}', using md5", other);
                }
                Self::Md5
            }
        }
    }

    /// Canonical lowercase name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Md5 => "md5",
            Self::Sha256 => "sha256",
            Self::XxHash => "xxhash",
        }
    }

    /// Maximum digest width in hex characters.
    #[must_use]
    pub fn hex_width(self) -> usize {
        match self {
            Self::Md5 => 32,
            Self::Sha256 => 64,
            Self::XxHash => 16,
        }
    }

    fn new_state(self) -> Box<dyn ContentHasher> {
        match self {
            Self::Md5 => Box::new(Md5State(Md5::new())),
            Self::Sha256 => Box::new(Sha256State(Sha256::new())),
            Self::XxHash => Box::new(Xxh64State(Xxh64::new(0))),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_name(s))
    }
}

/// Incremental hash state.
trait ContentHasher {
    fn update(&mut self, data: &[u8]);

    /// Consume the state and return the lowercase hex digest.
    fn finish_hex(self: Box<Self>) -> String;
}

struct Md5State(Md5);

impl ContentHasher for Md5State {
    fn update(&mut self, data: &[u8]) {
        Md5Digest::update(&mut self.0, data);
    }

    fn finish_hex(self: Box<Self>) -> String {
        format!("{:x}", Md5Digest::finalize(self.0))
    }
}

struct Sha256State(Sha256);

impl ContentHasher for Sha256State {
    fn update(&mut self, data: &[u8]) {
        Sha2Digest::update(&mut self.0, data);
    }

    fn finish_hex(self: Box<Self>) -> String {
        format!("{:x}", Sha2Digest::finalize(self.0))
    }
}

struct Xxh64State(Xxh64);

impl ContentHasher for Xxh64State {
    fn update(&mut self, data: &[u8]) {
        self.0.update(data);
    }

    fn finish_hex(self: Box<Self>) -> String {
        // Natural width: leading zero nibbles are not padded.
        format!("{:x}", self.0.digest())
    }
}

/// Streaming file hasher bound to one algorithm.
#[derive(Debug, Clone, Copy)]
pub struct Hasher {
    algorithm: Algorithm,
    buffer_size: usize,
}

impl Default for Hasher {
    fn default() -> Self {
        Self::new(Algorithm::default())
    }
}

impl Hasher {
    /// Create a hasher for the given algorithm.
    #[must_use]
    pub fn new(algorithm: Algorithm) -> Self {
        Self {
            algorithm,
            buffer_size: BUFFER_SIZE,
        }
    }

    /// Override the read buffer size (minimum 1 byte).
    #[must_use]
    pub fn with_buffer_size(mut self, size: usize) -> Self {
        self.buffer_size = size.max(1);
        self
    }

    /// Hash the full contents of a file.
    ///
    /// The file handle is dropped on every return path.
    ///
    /// # Errors
    ///
    /// Returns [`HashError::Io`] if the file cannot be opened or read.
    pub fn digest(&self, path: &Path) -> Result<String, HashError> {
        let to_error = |source| HashError::Io {
            path: path.to_path_buf(),
            source,
        };

        let file = File::open(path).map_err(to_error)?;
        let hex = self.digest_reader(file).map_err(to_error)?;
        log::trace!("{} {} {}", self.algorithm, hex, path.display());
        Ok(hex)
    }

    /// Hash everything readable from `reader`.
    ///
    /// # Errors
    ///
    /// Propagates read errors other than [`io::ErrorKind::Interrupted`].
    pub fn digest_reader<R: Read>(&self, mut reader: R) -> io::Result<String> {
        let mut state = self.algorithm.new_state();
        let mut buffer = vec![0u8; self.buffer_size];

        loop {
            match reader.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => state.update(&buffer[..n]),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }

        Ok(state.finish_hex())
    }

    /// Hash an in-memory byte slice.
    #[must_use]
    pub fn digest_bytes(&self, data: &[u8]) -> String {
        let mut state = self.algorithm.new_state();
        state.update(data);
        state.finish_hex()
    }
}

/// Hash a file with the algorithm named `algorithm`.
///
/// Unknown or empty names hash with MD5.
///
/// # Errors
///
/// Returns [`HashError::Io`] if the file cannot be opened or read.
pub fn digest(path: &Path, algorithm: &str) -> Result<String, HashError> {
    Hasher::new(Algorithm::from_name(algorithm)).digest(path)
}
