//! dups - duplicate file finder
//!
//! Finds files with identical content under a directory by grouping them by
//! size and hashing the candidates (MD5, SHA-256 or xxHash64), then reports
//! or removes every copy but the first.

pub mod actions;
pub mod cli;
pub mod config;
pub mod duplicates;
pub mod error;
pub mod logging;
pub mod output;
pub mod progress;
pub mod scanner;
pub mod signal;

use std::io::{self, BufRead, Write};
use std::path::Path;
use std::sync::Arc;

use anyhow::Result;

use crate::actions::{remove_duplicates, DeleteConfig};
use crate::cli::{Cli, Commands};
use crate::config::Config;
use crate::duplicates::{extract_duplicates, DuplicateFinder};
use crate::error::ExitCode;
use crate::output::text::{
    files_found_line, DELETE_PROMPT, LISTING_COMPLETED, NO_DUPLICATES, SCANNING_DUPLICATES,
    SCANNING_PATH,
};
use crate::output::{write_removal, write_report};
use crate::progress::Progress;
use crate::scanner::normalize;

/// Run the application with the process's stdin and stdout.
///
/// # Errors
///
/// Returns the first fatal error; see [`run_with_io`].
pub fn run_app(cli: Cli) -> Result<ExitCode> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    run_with_io(cli, stdin.lock(), stdout.lock())
}

/// Run the application reading the prompt answer from `input` and writing
/// the report to `output`.
///
/// # Errors
///
/// - Bad root path, listing failure, or strict-mode hash failure
/// - Interruption by Ctrl+C
/// - The first deletion failure (after the partial totals are written)
/// - Write errors on `output`
pub fn run_with_io<R: BufRead, W: Write>(cli: Cli, input: R, mut output: W) -> Result<ExitCode> {
    let args = cli.command.args().clone();
    let flat = args.flat;

    logging::init_logging(cli.verbose, cli.quiet || flat);

    let config = match cli.config {
        Some(ref path) => Config::load_or_default(Some(path.as_path())),
        None => Config::load(),
    }
    .merge_scan_args(&args);
    log::debug!("Effective configuration: {:?}", config);

    let handler = signal::install_handler()?;
    let progress = Arc::new(Progress::new(flat || cli.quiet));
    let finder = DuplicateFinder::new(
        config
            .finder_config()
            .with_shutdown_flag(handler.get_flag())
            .with_progress_callback(progress),
    );

    let root = normalize(&args.path);
    let root = Path::new(&root);

    if !flat {
        writeln!(output, "{}", SCANNING_PATH)?;
    }
    let files = finder.list_files(root)?;

    if !flat {
        writeln!(
            output,
            "{}",
            files_found_line(files.len(), config.algorithm(), !config.single_core)
        )?;
    }
    let (entries, _) = finder.hash_files(files)?;

    if !flat {
        writeln!(output, "{}", SCANNING_DUPLICATES)?;
    }
    let (groups, stats) = extract_duplicates(entries);
    write_report(&mut output, &groups, &stats, flat)?;

    let delete_config = DeleteConfig {
        use_trash: args.trash,
    };

    let remove = match cli.command {
        Commands::Clean(_) => {
            if groups.is_empty() && !flat {
                writeln!(output, "{}", NO_DUPLICATES)?;
            }
            !groups.is_empty()
        }
        Commands::Scan(_) => {
            if flat || groups.is_empty() {
                false
            } else {
                writeln!(output, "{}", LISTING_COMPLETED)?;
                writeln!(output, "{}", DELETE_PROMPT)?;
                output.flush()?;
                confirm(input)?
            }
        }
    };

    if remove {
        match remove_duplicates(&groups, &delete_config) {
            Ok(summary) => {
                if !flat {
                    write_removal(&mut output, &summary)?;
                }
            }
            Err(e) => {
                if !flat {
                    write_removal(&mut output, &e.partial())?;
                }
                output.flush()?;
                return Err(e.into());
            }
        }
    }

    output.flush()?;
    Ok(ExitCode::Success)
}

/// Read one line and accept `y` or `yes`, case-insensitively.
///
/// End of input counts as no.
///
/// # Errors
///
/// Propagates read errors.
pub fn confirm<R: BufRead>(mut input: R) -> io::Result<bool> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(false);
    }
    let answer = line.trim().to_lowercase();
    Ok(answer == "y" || answer == "yes")
}
