//! Duplicate removal.
//!
//! # Overview
//!
//! [`remove_duplicates`] walks each duplicate class in order, keeps the first
//! member and deletes the rest. Files are unlinked by default; with
//! [`DeleteConfig::use_trash`] they are moved to the platform trash instead.
//!
//! Removal is not transactional. The first failure stops the run and the
//! error carries the totals accumulated up to that point; files already
//! removed stay removed.
//!
//! # Example
//!
//! ```no_run
//! use dups::actions::delete::{remove_duplicates, DeleteConfig};
//! use dups::duplicates::DuplicateFinder;
//! use std::path::Path;
//!
//! let (groups, _) = DuplicateFinder::with_defaults()
//!     .find_duplicates(Path::new("."))
//!     .unwrap();
//! match remove_duplicates(&groups, &DeleteConfig::trash()) {
//!     Ok(summary) => println!("removed {} files", summary.files_deleted),
//!     Err(e) => eprintln!("Failed: {}", e),
//! }
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use bytesize::ByteSize;
use thiserror::Error;

use crate::duplicates::DuplicateGroup;

/// Totals for a removal run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RemovalSummary {
    /// Sum of the scanned sizes of every removed file.
    pub bytes_reclaimed: u64,
    /// Number of removed files.
    pub files_deleted: usize,
}

impl RemovalSummary {
    fn record(&mut self, size: u64) {
        self.bytes_reclaimed += size;
        self.files_deleted += 1;
    }
}

/// Error type for deletion operations.
#[derive(Debug, Error)]
pub enum DeleteError {
    /// A file could not be removed. `partial` holds the totals of the files
    /// removed before the failure.
    #[error("error deleting duplicate files: {path}: {source}")]
    DeletionFailed {
        /// File that could not be removed
        path: PathBuf,
        /// Totals accumulated before the failure
        partial: RemovalSummary,
        /// The underlying error
        #[source]
        source: io::Error,
    },
}

impl DeleteError {
    /// Path of the file that failed.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::DeletionFailed { path, .. } => path,
        }
    }

    /// Totals accumulated before the failure.
    #[must_use]
    pub fn partial(&self) -> RemovalSummary {
        match self {
            Self::DeletionFailed { partial, .. } => *partial,
        }
    }
}

/// Configuration for deletion operations.
#[derive(Debug, Clone, Default)]
pub struct DeleteConfig {
    /// Move files to the platform trash instead of unlinking them.
    pub use_trash: bool,
}

impl DeleteConfig {
    /// Create config for permanent deletion.
    #[must_use]
    pub fn permanent() -> Self {
        Self { use_trash: false }
    }

    /// Create config for trash deletion.
    #[must_use]
    pub fn trash() -> Self {
        Self { use_trash: true }
    }
}

/// Move a single file to the platform trash.
///
/// # Errors
///
/// Returns the trash backend's failure as an [`io::Error`].
pub fn delete_to_trash(path: &Path) -> io::Result<()> {
    trash::delete(path).map_err(|e| {
        log::debug!("Trash operation failed for {}: {}", path.display(), e);
        io::Error::other(e.to_string())
    })?;
    log::debug!("Moved to trash: {}", path.display());
    Ok(())
}

/// Permanently delete a single file.
///
/// **WARNING**: This operation cannot be undone.
///
/// # Errors
///
/// Propagates the error from [`fs::remove_file`].
pub fn permanent_delete(path: &Path) -> io::Result<()> {
    fs::remove_file(path).map_err(|e| {
        log::debug!("Permanent delete failed for {}: {}", path.display(), e);
        e
    })?;
    log::debug!("Permanently deleted: {}", path.display());
    Ok(())
}

/// Delete every redundant member of every class.
///
/// The first member of each class is never touched. Sizes come from the
/// scan, not from a fresh stat.
///
/// # Errors
///
/// Returns [`DeleteError::DeletionFailed`] at the first file that cannot be
/// removed, carrying the totals accumulated so far.
pub fn remove_duplicates(
    groups: &[DuplicateGroup],
    config: &DeleteConfig,
) -> Result<RemovalSummary, DeleteError> {
    let mut summary = RemovalSummary::default();

    for group in groups {
        for file in group.redundant() {
            let result = if config.use_trash {
                delete_to_trash(&file.path)
            } else {
                permanent_delete(&file.path)
            };

            if let Err(source) = result {
                return Err(DeleteError::DeletionFailed {
                    path: file.path.clone(),
                    partial: summary,
                    source,
                });
            }
            summary.record(file.size);
        }
    }

    log::info!(
        "Removed {} files ({} reclaimed)",
        summary.files_deleted,
        ByteSize::b(summary.bytes_reclaimed)
    );

    Ok(summary)
}
