//! Output formatters for duplicate scan results.
//!
//! Results are rendered as plain text to any [`std::io::Write`], either as a
//! full report or as a flat list of redundant paths.
//!
//! # Example
//!
//! ```no_run
//! use dups::duplicates::{DuplicateFinder, DuplicateStats};
//! use dups::output::write_report;
//! use std::path::Path;
//!
//! let finder = DuplicateFinder::with_defaults();
//! let (groups, _) = finder.find_duplicates(Path::new(".")).unwrap();
//! let stats = DuplicateStats::from_groups(&groups);
//!
//! write_report(std::io::stdout(), &groups, &stats, false).unwrap();
//! ```

pub mod text;

// Re-export main types
pub use text::{write_removal, write_report, TextOutput};
