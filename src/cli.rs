//! Command-line interface definitions for dups.
//!
//! This module defines all CLI arguments and subcommands using the clap derive
//! API. Global options (verbosity, JSON errors, config file) apply to both
//! subcommands; `scan` and `clean` share one set of scan options.
//!
//! # Example
//!
//! ```bash
//! # Report duplicates, then ask before deleting
//! dups scan ~/Downloads
//!
//! # Only the top level, sha256, files above 1 MiB
//! dups scan ~/Downloads --full=false --algorithm sha256 --min-size 1MiB
//!
//! # Redundant paths only, for piping
//! dups scan ~/Downloads --flat > duplicates.txt
//!
//! # Delete without asking
//! dups clean ~/Downloads
//! ```

use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

/// Find and remove duplicate files by content hash.
///
/// Files are grouped by size first, then hashed; files sharing a digest are
/// duplicates. The first file of each set is kept.
#[derive(Debug, Parser)]
#[command(name = "dups")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Print fatal errors as JSON objects on stderr
    #[arg(long, global = true)]
    pub json_errors: bool,

    /// Read settings from this TOML file instead of the default location
    #[arg(long, value_name = "FILE", global = true, env = "DUPS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List duplicate files, then offer to delete them
    Scan(ScanArgs),
    /// Find duplicate files and delete them without asking
    Clean(ScanArgs),
}

impl Commands {
    /// The shared scan options.
    #[must_use]
    pub fn args(&self) -> &ScanArgs {
        match self {
            Self::Scan(args) | Self::Clean(args) => args,
        }
    }
}

/// Options shared by `scan` and `clean`.
///
/// Options with a default are optional here so that values from the config
/// file are only overridden when the flag is given.
#[derive(Debug, Clone, Args)]
pub struct ScanArgs {
    /// Directory to search; `\` separators are accepted
    #[arg(value_name = "PATH")]
    pub path: String,

    /// Flat output: only redundant paths, no progress, headers or prompt
    #[arg(short, long)]
    pub flat: bool,

    /// Search subdirectories too [default: true]
    #[arg(
        short = 'r',
        long,
        value_name = "BOOL",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true",
        action = ArgAction::Set
    )]
    pub full: Option<bool>,

    /// Hash on the calling thread only
    #[arg(short, long)]
    pub single_core: bool,

    /// Ignore files of this size or smaller (e.g., 10, 4KiB, 1MB) [default: 10]
    #[arg(long, value_name = "SIZE", value_parser = parse_size)]
    pub min_size: Option<u64>,

    /// Hash algorithm: md5, sha256 or xxhash; anything else uses md5 [default: md5]
    #[arg(long, value_name = "NAME")]
    pub algorithm: Option<String>,

    /// Maximum concurrent hash tasks [default: number of CPUs]
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u64).range(1..))]
    pub io_threads: Option<u64>,

    /// Abort on the first file that cannot be read
    #[arg(long)]
    pub strict: bool,

    /// Move duplicates to the system trash instead of deleting them
    #[arg(long)]
    pub trash: bool,
}

/// Parse a human-readable size string into bytes.
///
/// Supports decimal (KB, MB, GB, TB) and binary (KiB, MiB, GiB, TiB) suffixes,
/// case-insensitively. A bare number is bytes. Whole numbers are exact;
/// fractions go through `f64`. Negative sizes are rejected.
///
/// # Examples
///
/// ```
/// use dups::cli::parse_size;
///
/// assert_eq!(parse_size("10").unwrap(), 10);
/// assert_eq!(parse_size("1KB").unwrap(), 1_000);
/// assert_eq!(parse_size("1KiB").unwrap(), 1_024);
/// assert_eq!(parse_size("1.5MB").unwrap(), 1_500_000);
/// ```
///
/// # Errors
///
/// Returns an error message for empty input, a malformed number or an
/// unknown suffix.
pub fn parse_size(s: &str) -> Result<u64, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("Size cannot be empty".to_string());
    }

    let (num_str, suffix) = match s.find(|c: char| !c.is_ascii_digit() && c != '.') {
        Some(idx) => (&s[..idx], s[idx..].trim().to_uppercase()),
        None => (s, String::new()),
    };

    let multiplier: u64 = match suffix.as_str() {
        "" | "B" => 1,
        "KB" | "K" => 1_000,
        "KIB" => 1_024,
        "MB" | "M" => 1_000_000,
        "MIB" => 1_048_576,
        "GB" | "G" => 1_000_000_000,
        "GIB" => 1_073_741_824,
        "TB" | "T" => 1_000_000_000_000,
        "TIB" => 1_099_511_627_776,
        _ => return Err(format!("Unknown size suffix: '{suffix}'")),
    };

    if !num_str.contains('.') {
        let num: u64 = num_str
            .parse()
            .map_err(|_| format!("Invalid number: '{num_str}'"))?;
        return num
            .checked_mul(multiplier)
            .ok_or_else(|| format!("Size too large: '{s}'"));
    }

    let num: f64 = num_str
        .parse()
        .map_err(|_| format!("Invalid number: '{num_str}'"))?;
    Ok((num * multiplier as f64) as u64)
}
