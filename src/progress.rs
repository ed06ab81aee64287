//! Progress reporting utilities using indicatif.
//!
//! This module provides the [`Progress`] struct which implements [`ProgressCallback`]
//! to display a spinner while the directory is listed and a counted bar while
//! files are hashed. Flat output mode uses a quiet reporter so that stdout only
//! carries paths.

use std::time::Duration;

use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use parking_lot::Mutex;

/// Phase name reported while the directory tree is enumerated.
pub const PHASE_WALKING: &str = "walking";
/// Phase name reported while candidate files are hashed.
pub const PHASE_HASHING: &str = "hashing";

/// Progress callback for the duplicate finding phases.
///
/// Implement this trait to receive progress updates during
/// the duplicate detection pipeline. Implementations must be callable from
/// worker threads.
pub trait ProgressCallback: Send + Sync {
    /// Called when a phase starts.
    ///
    /// # Arguments
    ///
    /// * `phase` - Name of the phase ([`PHASE_WALKING`] or [`PHASE_HASHING`])
    /// * `total` - Total number of ticks expected, 0 when unknown
    fn on_phase_start(&self, phase: &str, total: usize);

    /// Called once per processed item.
    fn on_tick(&self);

    /// Called when a phase completes.
    fn on_phase_end(&self, phase: &str);

    /// Called to update the message of the active bar.
    fn on_message(&self, _message: &str) {}
}

/// Progress reporter using indicatif.
pub struct Progress {
    multi: MultiProgress,
    walking: Mutex<Option<ProgressBar>>,
    hashing: Mutex<Option<ProgressBar>>,
    quiet: bool,
}

impl Progress {
    /// Create a new progress reporter.
    ///
    /// # Arguments
    ///
    /// * `quiet` - If true, no progress bars will be displayed.
    ///
    /// # Examples
    ///
    /// ```
    /// use dups::progress::Progress;
    ///
    /// let progress = Progress::new(false);
    /// ```
    #[must_use]
    pub fn new(quiet: bool) -> Self {
        let multi = if quiet {
            MultiProgress::with_draw_target(ProgressDrawTarget::hidden())
        } else {
            MultiProgress::new()
        };
        Self {
            multi,
            walking: Mutex::new(None),
            hashing: Mutex::new(None),
            quiet,
        }
    }

    fn walking_style() -> ProgressStyle {
        ProgressStyle::with_template("{spinner:.green} {msg} [{elapsed_precise}] {pos} files")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
    }

    fn hashing_style() -> ProgressStyle {
        ProgressStyle::with_template(
            "[{elapsed_precise}] [{bar:40.green/blue}] {pos}/{len} ({percent}%) {msg} {per_sec} (ETA: {eta})",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█>-")
    }

    /// The bar that should receive ticks and messages right now.
    fn active(&self) -> Option<ProgressBar> {
        if let Some(pb) = self.hashing.lock().as_ref() {
            return Some(pb.clone());
        }
        self.walking.lock().as_ref().cloned()
    }
}

impl ProgressCallback for Progress {
    fn on_phase_start(&self, phase: &str, total: usize) {
        if self.quiet {
            return;
        }

        match phase {
            PHASE_WALKING => {
                let pb = self.multi.add(ProgressBar::new_spinner());
                pb.set_style(Self::walking_style());
                pb.set_message("Listing files");
                pb.enable_steady_tick(Duration::from_millis(100));
                *self.walking.lock() = Some(pb);
            }
            PHASE_HASHING => {
                let pb = self.multi.add(ProgressBar::new(total as u64));
                pb.set_style(Self::hashing_style());
                pb.set_message("Hashing");
                *self.hashing.lock() = Some(pb);
            }
            other => {
                log::debug!("Progress: ignoring unknown phase '{}'", other);
            }
        }
    }

    fn on_tick(&self) {
        if self.quiet {
            return;
        }
        if let Some(pb) = self.active() {
            pb.inc(1);
        }
    }

    fn on_phase_end(&self, phase: &str) {
        if self.quiet {
            return;
        }

        let slot = match phase {
            PHASE_WALKING => &self.walking,
            PHASE_HASHING => &self.hashing,
            _ => return,
        };
        if let Some(pb) = slot.lock().take() {
            pb.finish_and_clear();
        }
    }

    fn on_message(&self, message: &str) {
        if self.quiet {
            return;
        }
        if let Some(pb) = self.active() {
            pb.set_message(message.to_string());
        }
    }
}
