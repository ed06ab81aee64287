//! Scanner module for directory enumeration and file hashing.
//!
//! This module provides functionality for:
//! - Recursive or flat directory listing using walkdir
//! - Streaming content hashing (MD5, SHA-256, xxHash64)
//! - Separator normalization of the root argument
//!
//! # Architecture
//!
//! The scanner is divided into submodules:
//! - [`walker`]: Directory traversal and file discovery
//! - [`hasher`]: Streaming file digests encoded as lowercase hex
//! - [`path_utils`]: Root path normalization
//!
//! # Example
//!
//! ```no_run
//! use dups::scanner::{Walker, WalkerConfig};
//! use std::path::Path;
//!
//! let walker = Walker::new(Path::new("."), WalkerConfig::default());
//! for file in walker.walk().unwrap() {
//!     println!("{}: {} bytes", file.path.display(), file.size);
//! }
//! ```

pub mod hasher;
pub mod path_utils;
pub mod walker;

use std::path::PathBuf;

// Re-export main types
pub use hasher::{digest, Algorithm, Hasher};
pub use path_utils::normalize;
pub use walker::{enumerate, Walker};

/// A file discovered during enumeration.
///
/// Immutable once created; the size is taken from the directory entry's
/// metadata at walk time.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileEntry {
    /// Path to the file, rooted at the scanned directory
    pub path: PathBuf,
    /// File size in bytes
    pub size: u64,
}

impl FileEntry {
    /// Create a new FileEntry.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the file
    /// * `size` - File size in bytes
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, size: u64) -> Self {
        Self {
            path: path.into(),
            size,
        }
    }
}

/// Configuration for directory walking.
#[derive(Debug, Clone)]
pub struct WalkerConfig {
    /// Descend into subdirectories. When false only the immediate
    /// children of the root are listed.
    pub recursive: bool,
}

impl Default for WalkerConfig {
    fn default() -> Self {
        Self { recursive: true }
    }
}

impl WalkerConfig {
    /// Create a new configuration.
    #[must_use]
    pub fn new(recursive: bool) -> Self {
        Self { recursive }
    }

    /// Enable or disable recursion.
    #[must_use]
    pub fn with_recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }
}

/// Errors that can occur during directory scanning.
#[derive(thiserror::Error, Debug)]
pub enum ScanError {
    /// The root directory could not be opened or listed.
    #[error("error while listing files in {path}: {source}")]
    EnumerationFailed {
        /// Root that failed to open
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The walk was stopped by a shutdown request.
    #[error("enumeration interrupted")]
    Interrupted,
}

/// Errors that can occur during file hashing.
#[derive(thiserror::Error, Debug)]
pub enum HashError {
    /// The file could not be opened or read.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl HashError {
    /// Path of the file that failed to hash.
    #[must_use]
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::Io { path, .. } => path,
        }
    }
}
