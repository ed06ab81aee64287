//! Duplicate detection module.
//!
//! This module provides functionality for:
//! - Size-based file grouping with an exclusive minimum size
//! - Content hashing of same-size candidates, sequential or on a worker pool
//! - Duplicate class extraction and totals

pub mod collector;
pub mod finder;
pub mod groups;

use std::collections::HashMap;

use crate::scanner::FileEntry;

pub use collector::{collect_hashes, default_io_threads, CollectConfig, CollectStats};
pub use finder::{
    extract_duplicates, DuplicateFinder, FinderConfig, FinderError, ScanSummary, DEFAULT_MIN_SIZE,
};
pub use groups::{group_by_size, DuplicateGroup, DuplicateStats};

/// Files bucketed by exact byte size.
pub type SizeBuckets = HashMap<u64, Vec<FileEntry>>;

/// Files keyed by lowercase hex content digest.
pub type HashEntries = HashMap<String, Vec<FileEntry>>;
