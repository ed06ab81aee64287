//! Duplicate finder pipeline.
//!
//! # Overview
//!
//! This module orchestrates the duplicate detection pipeline:
//! 1. **Listing**: Enumerate files under the root (see [`crate::scanner::walker`])
//! 2. **Size grouping**: Drop small files and bucket the rest by size
//!    (see [`crate::duplicates::groups`])
//! 3. **Hashing**: Digest every file sharing its size with another
//!    (see [`crate::duplicates::collector`])
//! 4. **Extraction**: Keep digests shared by two or more files
//!
//! The stages are exposed individually on [`DuplicateFinder`] so that a
//! caller can report between them, and composed by
//! [`DuplicateFinder::find_duplicates`].
//!
//! # Example
//!
//! ```no_run
//! use dups::duplicates::{DuplicateFinder, FinderConfig};
//! use std::path::Path;
//!
//! let finder = DuplicateFinder::new(FinderConfig::default().with_min_size(1024));
//! let files = finder.list_files(Path::new(".")).unwrap();
//! let (entries, _) = finder.hash_files(files).unwrap();
//! let (groups, stats) = dups::duplicates::extract_duplicates(entries);
//! println!("{} classes, {} redundant files", stats.duplicate_groups, stats.duplicate_files);
//! # let _ = groups;
//! ```

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use bytesize::ByteSize;

use super::collector::{collect_hashes, default_io_threads, CollectConfig, CollectStats};
use super::groups::{group_by_size, DuplicateGroup, DuplicateStats};
use super::HashEntries;
use crate::progress::{ProgressCallback, PHASE_WALKING};
use crate::scanner::{Algorithm, FileEntry, HashError, ScanError, Walker, WalkerConfig};

/// Default exclusive lower bound on file size, in bytes.
pub const DEFAULT_MIN_SIZE: u64 = 10;

/// Build the duplicate classes from a digest map.
///
/// Every digest shared by two or more files becomes one
/// [`DuplicateGroup`]. Members are sorted by path and groups by their
/// retained path, so the file that is kept does not depend on hashing order.
/// Pure; performs no I/O.
///
/// # Example
///
/// ```
/// use dups::duplicates::{extract_duplicates, HashEntries};
/// use dups::scanner::FileEntry;
///
/// let mut entries = HashEntries::new();
/// entries.insert("aa".into(), vec![FileEntry::new("/b", 20), FileEntry::new("/a", 20)]);
/// entries.insert("bb".into(), vec![FileEntry::new("/c", 30)]);
///
/// let (groups, stats) = extract_duplicates(entries);
/// assert_eq!(groups.len(), 1);
/// assert_eq!(groups[0].files[0].path.to_str(), Some("/a"));
/// assert_eq!(stats.duplicate_files, 1);
/// assert_eq!(stats.reclaimable_space, 20);
/// ```
#[must_use]
pub fn extract_duplicates(entries: HashEntries) -> (Vec<DuplicateGroup>, DuplicateStats) {
    let mut groups: Vec<DuplicateGroup> = entries
        .into_iter()
        .filter(|(_, files)| files.len() > 1)
        .map(|(digest, mut files)| {
            files.sort_by(|a, b| a.path.cmp(&b.path));
            log::debug!(
                "Duplicate group {}: {} files, {} bytes each",
                digest,
                files.len(),
                files[0].size
            );
            DuplicateGroup::new(digest, files)
        })
        .collect();

    groups.sort_by(|a, b| a.files[0].path.cmp(&b.files[0].path));

    let stats = DuplicateStats::from_groups(&groups);
    (groups, stats)
}

/// Configuration for the duplicate finder.
#[derive(Clone)]
pub struct FinderConfig {
    /// Files of this size or smaller are ignored.
    pub min_size: u64,
    /// Descend into subdirectories.
    pub recursive: bool,
    /// Hash on a worker pool.
    pub parallel: bool,
    /// Digest algorithm.
    pub algorithm: Algorithm,
    /// Maximum concurrent hash tasks.
    pub io_threads: usize,
    /// Fail-fast on the first unreadable file.
    pub strict: bool,
    /// Optional shutdown flag for graceful termination.
    pub shutdown_flag: Option<Arc<AtomicBool>>,
    /// Optional progress callback for reporting.
    pub progress_callback: Option<Arc<dyn ProgressCallback>>,
}

impl std::fmt::Debug for FinderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FinderConfig")
            .field("min_size", &self.min_size)
            .field("recursive", &self.recursive)
            .field("parallel", &self.parallel)
            .field("algorithm", &self.algorithm)
            .field("io_threads", &self.io_threads)
            .field("strict", &self.strict)
            .field("shutdown_flag", &self.shutdown_flag)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<callback>"),
            )
            .finish()
    }
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            min_size: DEFAULT_MIN_SIZE,
            recursive: true,
            parallel: true,
            algorithm: Algorithm::default(),
            io_threads: default_io_threads(),
            strict: false,
            shutdown_flag: None,
            progress_callback: None,
        }
    }
}

impl FinderConfig {
    /// Set the exclusive minimum file size.
    #[must_use]
    pub fn with_min_size(mut self, min_size: u64) -> Self {
        self.min_size = min_size;
        self
    }

    /// Enable or disable recursion.
    #[must_use]
    pub fn with_recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// Enable or disable parallel hashing.
    #[must_use]
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Set the digest algorithm.
    #[must_use]
    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Set the hash worker count (minimum 1).
    #[must_use]
    pub fn with_io_threads(mut self, threads: usize) -> Self {
        self.io_threads = threads.max(1);
        self
    }

    /// Set fail-fast on the first unreadable file.
    #[must_use]
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Set the shutdown flag for graceful termination.
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

    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }

    fn collect_config(&self) -> CollectConfig {
        CollectConfig {
            parallel: self.parallel,
            algorithm: self.algorithm,
            io_threads: self.io_threads,
            strict: self.strict,
            shutdown_flag: self.shutdown_flag.clone(),
            progress_callback: self.progress_callback.clone(),
        }
    }
}

/// Summary statistics from a duplicate scan.
#[derive(Debug, Clone, Default)]
pub struct ScanSummary {
    /// Files found under the root
    pub total_files: usize,
    /// Files above the size threshold
    pub candidate_files: usize,
    /// Files hashed successfully
    pub hashed_files: usize,
    /// Files that could not be read
    pub failed_files: usize,
    /// Number of duplicate classes
    pub duplicate_groups: usize,
    /// Redundant files (all copies minus one per class)
    pub duplicate_files: usize,
    /// Space that can be reclaimed by removing redundant files
    pub reclaimable_space: u64,
    /// Duration of the entire scan
    pub scan_duration: Duration,
}

impl ScanSummary {
    /// Format reclaimable space as human-readable string.
    #[must_use]
    pub fn reclaimable_display(&self) -> String {
        ByteSize::b(self.reclaimable_space).to_string()
    }
}

/// Errors that can occur during duplicate finding.
#[derive(thiserror::Error, Debug)]
pub enum FinderError {
    /// The scan was interrupted by user (Ctrl+C or shutdown signal).
    #[error("scan interrupted by user")]
    Interrupted,

    /// The provided path does not exist.
    #[error("can't find path: {0}")]
    PathNotFound(PathBuf),

    /// The provided path is not a directory.
    #[error("please provide a directory path not a file path: {0}")]
    NotADirectory(PathBuf),

    /// The root could not be listed.
    #[error(transparent)]
    Scan(ScanError),

    /// A file could not be hashed in strict mode.
    #[error("failed to hash file: {source}")]
    HashFailed {
        /// The underlying hash error
        #[source]
        source: HashError,
    },
}

impl From<ScanError> for FinderError {
    fn from(e: ScanError) -> Self {
        match e {
            ScanError::Interrupted => Self::Interrupted,
            other => Self::Scan(other),
        }
    }
}

impl From<HashError> for FinderError {
    fn from(source: HashError) -> Self {
        Self::HashFailed { source }
    }
}

/// Duplicate finder that orchestrates the detection pipeline.
///
/// # Example
///
/// ```no_run
/// use dups::duplicates::{DuplicateFinder, FinderConfig};
/// use std::path::Path;
///
/// let finder = DuplicateFinder::new(FinderConfig::default().with_parallel(false));
/// match finder.find_duplicates(Path::new(".")) {
///     Ok((groups, summary)) => {
///         println!("Found {} duplicate groups", groups.len());
///         println!("Can reclaim {}", summary.reclaimable_display());
///     }
///     Err(e) => eprintln!("Scan failed: {}", e),
/// }
/// ```
#[derive(Debug, Clone)]
pub struct DuplicateFinder {
    config: FinderConfig,
}

impl DuplicateFinder {
    /// Create a new duplicate finder with the given configuration.
    #[must_use]
    pub fn new(config: FinderConfig) -> Self {
        Self { config }
    }

    /// Create a new duplicate finder with default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(FinderConfig::default())
    }

    /// Validate the root and list the files below it.
    ///
    /// # Errors
    ///
    /// - [`FinderError::PathNotFound`] / [`FinderError::NotADirectory`] for a bad root
    /// - [`FinderError::Scan`] if the root cannot be listed
    /// - [`FinderError::Interrupted`] on shutdown
    pub fn list_files(&self, path: &Path) -> Result<Vec<FileEntry>, FinderError> {
        if !path.exists() {
            return Err(FinderError::PathNotFound(path.to_path_buf()));
        }
        if !path.is_dir() {
            return Err(FinderError::NotADirectory(path.to_path_buf()));
        }
        if self.config.is_shutdown_requested() {
            return Err(FinderError::Interrupted);
        }

        log::info!(
            "Listing {} (recursive: {})",
            path.display(),
            self.config.recursive
        );

        if let Some(ref callback) = self.config.progress_callback {
            callback.on_phase_start(PHASE_WALKING, 0);
        }

        let mut walker = Walker::new(path, WalkerConfig::new(self.config.recursive));
        if let Some(ref flag) = self.config.shutdown_flag {
            walker = walker.with_shutdown_flag(flag.clone());
        }
        if let Some(ref callback) = self.config.progress_callback {
            walker = walker.with_progress_callback(callback.clone());
        }

        let result = walker.walk();

        if let Some(ref callback) = self.config.progress_callback {
            callback.on_phase_end(PHASE_WALKING);
        }

        let files = result?;
        log::info!(
            "Found {} files ({})",
            files.len(),
            ByteSize::b(files.iter().map(|f| f.size).sum())
        );
        Ok(files)
    }

    /// Apply the size threshold and hash the same-size candidates.
    ///
    /// Returns the digest map and the hashing statistics.
    ///
    /// # Errors
    ///
    /// - [`FinderError::Interrupted`] on shutdown
    /// - [`FinderError::HashFailed`] in strict mode
    pub fn hash_files(
        &self,
        files: Vec<FileEntry>,
    ) -> Result<(HashEntries, CollectStats), FinderError> {
        let (buckets, total) = group_by_size(files, self.config.min_size);
        log::debug!("{} files above {} bytes", total, self.config.min_size);

        if self.config.is_shutdown_requested() {
            return Err(FinderError::Interrupted);
        }

        collect_hashes(buckets, &self.config.collect_config())
    }

    /// Run the full pipeline on `path`.
    ///
    /// # Errors
    ///
    /// See [`list_files`](Self::list_files) and [`hash_files`](Self::hash_files).
    pub fn find_duplicates(
        &self,
        path: &Path,
    ) -> Result<(Vec<DuplicateGroup>, ScanSummary), FinderError> {
        let start_time = Instant::now();

        let files = self.list_files(path)?;
        let total_files = files.len();

        let (entries, collect_stats) = self.hash_files(files)?;
        let (groups, stats) = extract_duplicates(entries);

        let summary = ScanSummary {
            total_files,
            candidate_files: collect_stats.input_files,
            hashed_files: collect_stats.hashed_files,
            failed_files: collect_stats.failed_files,
            duplicate_groups: stats.duplicate_groups,
            duplicate_files: stats.duplicate_files,
            reclaimable_space: stats.reclaimable_space,
            scan_duration: start_time.elapsed(),
        };

        log::info!(
            "Scan complete: {} duplicate groups, {} duplicate files, {} reclaimable",
            summary.duplicate_groups,
            summary.duplicate_files,
            summary.reclaimable_display()
        );

        Ok((groups, summary))
    }
}
