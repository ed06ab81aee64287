//! Size grouping and duplicate class types.
//!
//! # Overview
//!
//! Size grouping is the first filter of duplicate detection. Files with
//! different sizes cannot have equal content, so only files sharing a size
//! with at least one other file are ever hashed. Files at or below the
//! minimum size are dropped here and never opened.
//!
//! # Example
//!
//! ```
//! use dups::scanner::FileEntry;
//! use dups::duplicates::group_by_size;
//!
//! let files = vec![
//!     FileEntry::new("/file1.txt", 1024),
//!     FileEntry::new("/file2.txt", 1024),
//!     FileEntry::new("/file3.txt", 2048),
//!     FileEntry::new("/tiny.txt", 4),
//! ];
//!
//! let (buckets, total) = group_by_size(files, 10);
//!
//! assert_eq!(total, 3);          // tiny.txt is at or below the threshold
//! assert_eq!(buckets.len(), 2);  // singletons are kept in the buckets
//! assert_eq!(buckets[&1024].len(), 2);
//! ```

use std::path::Path;

use super::SizeBuckets;
use crate::scanner::FileEntry;

/// Confirmed duplicate class: files sharing one content digest.
///
/// `files[0]` is the retained member; the remainder are redundant copies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateGroup {
    /// Lowercase hex content digest shared by every member
    pub digest: String,
    /// File size in bytes (shared by all files in the class)
    pub size: u64,
    /// Members, retained file first
    pub files: Vec<FileEntry>,
}

impl DuplicateGroup {
    /// Create a new duplicate group.
    ///
    /// The size is taken from the first member.
    #[must_use]
    pub fn new(digest: impl Into<String>, files: Vec<FileEntry>) -> Self {
        let size = files.first().map_or(0, |f| f.size);
        Self {
            digest: digest.into(),
            size,
            files,
        }
    }

    /// Number of files in this group.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Check if this group is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// The member that is kept.
    #[must_use]
    pub fn retained(&self) -> Option<&FileEntry> {
        self.files.first()
    }

    /// The members that are deletion candidates.
    #[must_use]
    pub fn redundant(&self) -> &[FileEntry] {
        self.files.get(1..).unwrap_or_default()
    }

    /// Number of duplicate copies (total - 1 original).
    #[must_use]
    pub fn duplicate_count(&self) -> usize {
        self.files.len().saturating_sub(1)
    }

    /// Bytes freed by deleting every redundant member.
    #[must_use]
    pub fn wasted_space(&self) -> u64 {
        self.redundant().iter().map(|f| f.size).sum()
    }

    /// Check whether `path` belongs to this group.
    #[must_use]
    pub fn contains(&self, path: &Path) -> bool {
        self.files.iter().any(|f| f.path == path)
    }
}

/// Totals over a set of duplicate classes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DuplicateStats {
    /// Number of classes (distinct originals)
    pub duplicate_groups: usize,
    /// Redundant files across all classes
    pub duplicate_files: usize,
    /// Bytes freed by removing every redundant file
    pub reclaimable_space: u64,
}

impl DuplicateStats {
    /// Compute totals for the given classes.
    #[must_use]
    pub fn from_groups(groups: &[DuplicateGroup]) -> Self {
        groups.iter().fold(Self::default(), |mut acc, group| {
            acc.duplicate_groups += 1;
            acc.duplicate_files += group.duplicate_count();
            acc.reclaimable_space += group.wasted_space();
            acc
        })
    }
}

/// Group files by size, dropping everything at or below `min_size`.
///
/// Returns the buckets and the number of files retained. Singleton buckets
/// are kept; the hash collector skips them.
///
/// # Example
///
/// ```
/// use dups::scanner::FileEntry;
/// use dups::duplicates::group_by_size;
///
/// let files = vec![FileEntry::new("/a", 10), FileEntry::new("/b", 11)];
/// let (buckets, total) = group_by_size(files, 10);
///
/// // The threshold is exclusive: a 10-byte file is dropped
/// assert_eq!(total, 1);
/// assert!(!buckets.contains_key(&10));
/// ```
#[must_use]
pub fn group_by_size(
    files: impl IntoIterator<Item = FileEntry>,
    min_size: u64,
) -> (SizeBuckets, usize) {
    let mut buckets = SizeBuckets::new();
    let mut total = 0usize;
    let mut below_threshold = 0usize;

    for file in files {
        if file.size <= min_size {
            below_threshold += 1;
            log::trace!(
                "Skipping {} ({} bytes, threshold {})",
                file.path.display(),
                file.size,
                min_size
            );
            continue;
        }

        total += 1;
        buckets.entry(file.size).or_default().push(file);
    }

    if below_threshold > 0 {
        log::debug!(
            "{} file(s) at or below {} bytes were skipped",
            below_threshold,
            min_size
        );
    }

    log::debug!(
        "Size grouping: {} files in {} size buckets ({} candidates)",
        total,
        buckets.len(),
        buckets.values().filter(|files| files.len() > 1).map(Vec::len).sum::<usize>()
    );

    (buckets, total)
}
