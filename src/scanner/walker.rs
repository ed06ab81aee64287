//! Directory walker implementation using walkdir.
//!
//! # Overview
//!
//! This module provides the [`Walker`] struct for enumerating the files
//! under a root directory for duplicate detection.
//!
//! # Features
//!
//! - Recursive traversal or a flat listing of the root's children
//! - Sorted by file name for deterministic output
//! - Symbolic links are neither followed nor listed
//! - Unreadable entries below the root are skipped, not fatal
//! - Graceful shutdown via atomic flag
//!
//! # Example
//!
//! ```no_run
//! use dups::scanner::{Walker, WalkerConfig};
//! use std::path::Path;
//!
//! let walker = Walker::new(Path::new("/home/user/Downloads"), WalkerConfig::new(false));
//! match walker.walk() {
//!     Ok(files) => println!("{} files in the top level", files.len()),
//!     Err(e) => eprintln!("{}", e),
//! }
//! ```

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use walkdir::WalkDir;

use super::{FileEntry, ScanError, WalkerConfig};
use crate::progress::ProgressCallback;

/// Directory walker for file discovery.
pub struct Walker {
    /// Root path to walk
    root: PathBuf,
    /// Walker configuration
    config: WalkerConfig,
    /// Optional shutdown flag for graceful termination
    shutdown_flag: Option<Arc<AtomicBool>>,
    /// Optional progress callback, ticked once per emitted file
    progress_callback: Option<Arc<dyn ProgressCallback>>,
}

impl std::fmt::Debug for Walker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Walker")
            .field("root", &self.root)
            .field("config", &self.config)
            .field("shutdown_flag", &self.shutdown_flag)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<callback>"),
            )
            .finish()
    }
}

impl Walker {
    /// Create a new walker for the given path.
    ///
    /// # Arguments
    ///
    /// * `path` - Root directory to scan
    /// * `config` - Walker configuration options
    #[must_use]
    pub fn new(path: &Path, config: WalkerConfig) -> Self {
        Self {
            root: path.to_path_buf(),
            config,
            shutdown_flag: None,
            progress_callback: None,
        }
    }

    /// Set the shutdown flag for graceful termination.
    ///
    /// When the flag is set to `true`, the walk stops at the next entry
    /// and returns [`ScanError::Interrupted`].
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    /// Set the progress callback.
    #[must_use]
    pub fn with_progress_callback(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    /// Check if shutdown has been requested.
    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }

    /// Walk the directory, returning every non-directory entry.
    ///
    /// # Errors
    ///
    /// - [`ScanError::EnumerationFailed`] if the root cannot be listed
    /// - [`ScanError::Interrupted`] if shutdown was requested mid-walk
    ///
    /// Errors on individual entries below the root are logged and the
    /// entry is dropped.
    pub fn walk(&self) -> Result<Vec<FileEntry>, ScanError> {
        // walkdir reports an unreadable root as an ordinary entry error,
        // so check it up front to keep that case fatal.
        std::fs::read_dir(&self.root).map_err(|source| {
            log::debug!("Cannot list {}: {}", self.root.display(), source);
            ScanError::EnumerationFailed {
                path: self.root.clone(),
                source,
            }
        })?;

        let max_depth = if self.config.recursive { usize::MAX } else { 1 };
        let walk_dir = WalkDir::new(&self.root)
            .min_depth(1)
            .max_depth(max_depth)
            .follow_links(false)
            .sort_by_file_name();

        let mut files = Vec::new();
        for entry_result in walk_dir {
            if self.is_shutdown_requested() {
                log::debug!("Walker: Shutdown requested, stopping iteration");
                return Err(ScanError::Interrupted);
            }

            let entry = match entry_result {
                Ok(entry) => entry,
                Err(e) => {
                    log::debug!(
                        "Skipping unreadable entry {}: {}",
                        e.path().map_or_else(|| self.root.clone(), Path::to_path_buf).display(),
                        e
                    );
                    continue;
                }
            };

            if entry.file_type().is_dir() {
                continue;
            }

            // The link's own size never matches the target bytes the hasher reads.
            if entry.path_is_symlink() {
                log::debug!("Skipping symlink {}", entry.path().display());
                continue;
            }

            let size = match entry.metadata() {
                Ok(metadata) => metadata.len(),
                Err(e) => {
                    log::debug!("Skipping {}: {}", entry.path().display(), e);
                    continue;
                }
            };

            log::trace!("Found {} ({} bytes)", entry.path().display(), size);
            files.push(FileEntry::new(entry.into_path(), size));

            if let Some(ref callback) = self.progress_callback {
                callback.on_tick();
            }
        }

        log::debug!(
            "Walker: {} files under {} (recursive: {})",
            files.len(),
            self.root.display(),
            self.config.recursive
        );

        Ok(files)
    }
}

/// Enumerate the files under `root`.
///
/// Shorthand for `Walker::new(root, WalkerConfig::new(recursive)).walk()`.
///
/// # Errors
///
/// Returns [`ScanError::EnumerationFailed`] if `root` cannot be listed.
pub fn enumerate(root: &Path, recursive: bool) -> Result<Vec<FileEntry>, ScanError> {
    Walker::new(root, WalkerConfig::new(recursive)).walk()
}
