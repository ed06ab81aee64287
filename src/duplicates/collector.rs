//! Content hashing of same-size candidates.
//!
//! # Overview
//!
//! [`collect_hashes`] takes the size buckets produced by
//! [`group_by_size`](super::group_by_size) and hashes every file that shares
//! its size with at least one other file. The result maps each digest to the
//! files that produced it.
//!
//! In parallel mode each candidate is one task on a dedicated rayon pool whose
//! width is `io_threads`, which also caps the number of open file handles.
//! The aggregation map sits behind a `parking_lot::RwLock`, and every append
//! is done under a single write guard so no insertion can be lost.
//!
//! # Example
//!
//! ```no_run
//! use dups::duplicates::{collect_hashes, group_by_size, CollectConfig};
//! use dups::scanner::{enumerate, Algorithm};
//! use std::path::Path;
//!
//! let files = enumerate(Path::new("."), true).unwrap();
//! let (buckets, _) = group_by_size(files, 10);
//! let config = CollectConfig::default().with_algorithm(Algorithm::Sha256);
//! let (entries, stats) = collect_hashes(buckets, &config).unwrap();
//! println!("{} files hashed into {} digests", stats.hashed_files, entries.len());
//! ```

use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use rayon::prelude::*;

use super::{FinderError, HashEntries, SizeBuckets};
use crate::progress::{ProgressCallback, PHASE_HASHING};
use crate::scanner::{Algorithm, FileEntry, HashError, Hasher};

/// Number of hash workers when none is configured.
#[must_use]
pub fn default_io_threads() -> usize {
    std::thread::available_parallelism().map_or(1, NonZeroUsize::get)
}

/// Configuration for the hashing phase.
#[derive(Clone)]
pub struct CollectConfig {
    /// Hash on a worker pool instead of the calling thread.
    pub parallel: bool,
    /// Digest algorithm.
    pub algorithm: Algorithm,
    /// Maximum concurrent hash tasks. Default is the processor count.
    pub io_threads: usize,
    /// Abort on the first file that cannot be hashed.
    pub strict: bool,
    /// Optional shutdown flag for graceful termination.
    pub shutdown_flag: Option<Arc<AtomicBool>>,
    /// Optional progress callback, ticked once per input file.
    pub progress_callback: Option<Arc<dyn ProgressCallback>>,
}

impl std::fmt::Debug for CollectConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CollectConfig")
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

impl Default for CollectConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            algorithm: Algorithm::default(),
            io_threads: default_io_threads(),
            strict: false,
            shutdown_flag: None,
            progress_callback: None,
        }
    }
}

impl CollectConfig {
    /// Enable or disable the worker pool.
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

    /// Set the worker count (minimum 1).
    #[must_use]
    pub fn with_io_threads(mut self, threads: usize) -> Self {
        self.io_threads = threads.max(1);
        self
    }

    /// Set fail-fast on the first hashing error.
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

    fn tick(&self) {
        if let Some(ref callback) = self.progress_callback {
            callback.on_tick();
        }
    }
}

/// Statistics from the hashing phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollectStats {
    /// Files in all buckets, singletons included
    pub input_files: usize,
    /// Files hashed successfully
    pub hashed_files: usize,
    /// Files that could not be read
    pub failed_files: usize,
    /// Files skipped because no other file shares their size
    pub skipped_singletons: usize,
}

/// Hash every file that shares its size with another file.
///
/// Unreadable files are logged and dropped unless `config.strict` is set.
/// Every input file produces exactly one progress tick, including the
/// skipped singletons, so a bar started with `input_files` completes.
///
/// # Errors
///
/// - [`FinderError::Interrupted`] if the shutdown flag was raised
/// - [`FinderError::HashFailed`] on the first unreadable file in strict mode
pub fn collect_hashes(
    buckets: SizeBuckets,
    config: &CollectConfig,
) -> Result<(HashEntries, CollectStats), FinderError> {
    let mut stats = CollectStats {
        input_files: buckets.values().map(Vec::len).sum(),
        ..Default::default()
    };

    // Deterministic bucket order for the sequential path and the logs.
    let mut sizes: Vec<u64> = buckets.keys().copied().collect();
    sizes.sort_unstable();
    let mut buckets = buckets;

    let mut candidates: Vec<FileEntry> = Vec::new();
    for size in sizes {
        let Some(files) = buckets.remove(&size) else {
            continue;
        };
        if files.len() < 2 {
            stats.skipped_singletons += files.len();
            continue;
        }
        candidates.extend(files);
    }

    if let Some(ref callback) = config.progress_callback {
        callback.on_phase_start(PHASE_HASHING, stats.input_files);
        callback.on_message(&format!("Hashing with {}", config.algorithm));
    }
    for _ in 0..stats.skipped_singletons {
        config.tick();
    }

    log::info!(
        "Hashing {} candidate files with {} ({})",
        candidates.len(),
        config.algorithm,
        if config.parallel {
            format!("{} workers", config.io_threads)
        } else {
            "single thread".to_string()
        }
    );

    let hasher = Hasher::new(config.algorithm);
    let result = if config.parallel {
        hash_parallel(candidates, &hasher, config, &mut stats)
    } else {
        hash_sequential(candidates, &hasher, config, &mut stats)
    };

    if let Some(ref callback) = config.progress_callback {
        callback.on_phase_end(PHASE_HASHING);
    }

    let entries = result?;

    log::info!(
        "Hashing complete: {} hashed, {} failed, {} distinct digests",
        stats.hashed_files,
        stats.failed_files,
        entries.len()
    );

    Ok((entries, stats))
}

fn hash_sequential(
    candidates: Vec<FileEntry>,
    hasher: &Hasher,
    config: &CollectConfig,
    stats: &mut CollectStats,
) -> Result<HashEntries, FinderError> {
    let mut entries = HashEntries::new();

    for file in candidates {
        if config.is_shutdown_requested() {
            log::debug!("Hashing: Shutdown requested, stopping");
            return Err(FinderError::Interrupted);
        }

        match hasher.digest(&file.path) {
            Ok(digest) => {
                stats.hashed_files += 1;
                entries.entry(digest).or_default().push(file);
            }
            Err(e) => {
                stats.failed_files += 1;
                log::warn!("Failed to hash {}: {}", file.path.display(), e);
                if config.strict {
                    return Err(FinderError::from(e));
                }
            }
        }
        config.tick();
    }

    Ok(entries)
}

fn hash_parallel(
    candidates: Vec<FileEntry>,
    hasher: &Hasher,
    config: &CollectConfig,
    stats: &mut CollectStats,
) -> Result<HashEntries, FinderError> {
    let entries: RwLock<HashEntries> = RwLock::new(HashEntries::new());
    let hashed = AtomicUsize::new(0);
    let failed = AtomicUsize::new(0);
    let first_error: Mutex<Option<HashError>> = Mutex::new(None);
    let abort = AtomicBool::new(false);

    let run = || {
        candidates.into_par_iter().for_each(|file| {
            if abort.load(Ordering::Relaxed) || config.is_shutdown_requested() {
                return;
            }

            match hasher.digest(&file.path) {
                Ok(digest) => {
                    hashed.fetch_add(1, Ordering::Relaxed);
                    // Lookup and push under one guard.
                    entries.write().entry(digest).or_default().push(file);
                }
                Err(e) => {
                    failed.fetch_add(1, Ordering::Relaxed);
                    log::warn!("Failed to hash {}: {}", file.path.display(), e);
                    if config.strict {
                        abort.store(true, Ordering::Relaxed);
                        first_error.lock().get_or_insert(e);
                    }
                }
            }
            config.tick();
        });
    };

    match rayon::ThreadPoolBuilder::new()
        .num_threads(config.io_threads)
        .build()
    {
        Ok(pool) => pool.install(run),
        Err(e) => {
            log::warn!(
                "Failed to create hashing pool ({}), using global pool with {} threads",
                e,
                rayon::current_num_threads()
            );
            run();
        }
    }

    stats.hashed_files = hashed.into_inner();
    stats.failed_files = failed.into_inner();

    if config.is_shutdown_requested() {
        log::info!("Hashing interrupted by shutdown signal");
        return Err(FinderError::Interrupted);
    }
    if let Some(e) = first_error.into_inner() {
        return Err(FinderError::from(e));
    }

    Ok(entries.into_inner())
}
