//! Plain text output for duplicate scan results.
//!
//! The default report lists each class as its retained path and size,
//! followed by the redundant paths and a separator line:
//!
//! ```text
//! found 1 files with total of 2 duplicates
//! Path: photos/a.jpg
//! Size: 52133
//! photos/copy/a.jpg
//! backup/a.jpg
//! ============================================================================
//! ```
//!
//! Flat mode prints only the redundant paths, one per line, so the output can
//! be piped into other tools.
//!
//! # Example
//!
//! ```no_run
//! use dups::duplicates::DuplicateFinder;
//! use dups::output::text::TextOutput;
//! use std::path::Path;
//!
//! let finder = DuplicateFinder::with_defaults();
//! let (groups, _) = finder.find_duplicates(Path::new(".")).unwrap();
//! let stats = dups::duplicates::DuplicateStats::from_groups(&groups);
//!
//! TextOutput::new(&groups, stats).write_to(std::io::stdout()).unwrap();
//! ```

use std::io::{self, Write};

use crate::actions::RemovalSummary;
use crate::duplicates::{DuplicateGroup, DuplicateStats};
use crate::scanner::Algorithm;

/// Line printed after each class.
pub const SEPARATOR: &str =
    "============================================================================";

/// Printed before the directory is listed.
pub const SCANNING_PATH: &str = "scanning path ...";
/// Printed before duplicate classes are extracted.
pub const SCANNING_DUPLICATES: &str = "scanning for duplicates ...";
/// Printed by `clean` when nothing was found.
pub const NO_DUPLICATES: &str = "no duplicate files found.";
/// Printed by `scan` before the removal prompt.
pub const LISTING_COMPLETED: &str = "Listing completed.";
/// The removal prompt.
pub const DELETE_PROMPT: &str = "Would you like to delete duplicates? (y/n)";

/// Status line after listing.
#[must_use]
pub fn files_found_line(count: usize, algorithm: Algorithm, multicore: bool) -> String {
    format!(
        "found {} files. calculating hashes using {} algorithm with multicore: {}",
        count, algorithm, multicore
    )
}

/// Report header line.
#[must_use]
pub fn duplicates_found_line(stats: &DuplicateStats) -> String {
    format!(
        "found {} files with total of {} duplicates",
        stats.duplicate_groups, stats.duplicate_files
    )
}

/// Text formatter for duplicate classes.
pub struct TextOutput<'a> {
    groups: &'a [DuplicateGroup],
    stats: DuplicateStats,
    flat: bool,
}

impl<'a> TextOutput<'a> {
    /// Create a new formatter in report mode.
    #[must_use]
    pub fn new(groups: &'a [DuplicateGroup], stats: DuplicateStats) -> Self {
        Self {
            groups,
            stats,
            flat: false,
        }
    }

    /// Switch to flat mode (redundant paths only).
    #[must_use]
    pub fn with_flat(mut self, flat: bool) -> Self {
        self.flat = flat;
        self
    }

    /// Write the output to the given writer.
    ///
    /// # Errors
    ///
    /// Propagates write errors.
    pub fn write_to<W: Write>(&self, mut writer: W) -> io::Result<()> {
        if self.flat {
            for group in self.groups {
                for file in group.redundant() {
                    writeln!(writer, "{}", file.path.display())?;
                }
            }
            return writer.flush();
        }

        writeln!(writer, "{}", duplicates_found_line(&self.stats))?;
        for group in self.groups {
            let Some(retained) = group.retained() else {
                continue;
            };
            writeln!(writer, "Path: {}", retained.path.display())?;
            writeln!(writer, "Size: {}", retained.size)?;
            for file in group.redundant() {
                writeln!(writer, "{}", file.path.display())?;
            }
            writeln!(writer, "{}", SEPARATOR)?;
        }
        writer.flush()
    }
}

/// Write the duplicate report.
///
/// # Errors
///
/// Propagates write errors.
pub fn write_report<W: Write>(
    writer: W,
    groups: &[DuplicateGroup],
    stats: &DuplicateStats,
    flat: bool,
) -> io::Result<()> {
    TextOutput::new(groups, *stats).with_flat(flat).write_to(writer)
}

/// Write the removal summary line.
///
/// # Errors
///
/// Propagates write errors.
pub fn write_removal<W: Write>(mut writer: W, summary: &RemovalSummary) -> io::Result<()> {
    writeln!(
        writer,
        "removed {} files with the total size of {} bytes.",
        summary.files_deleted, summary.bytes_reclaimed
    )
}
