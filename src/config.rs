//! Layered application configuration.
//!
//! Settings are merged with `figment` in increasing priority:
//!
//! 1. Built-in defaults
//! 2. `config.toml` in the platform config directory (or `--config FILE`)
//! 3. `DUPS_*` environment variables (e.g. `DUPS_MIN_SIZE=4096`)
//! 4. Command-line flags ([`Config::merge_scan_args`])
//!
//! ```toml
//! # ~/.config/dups/config.toml
//! min_size = 1024
//! algorithm = "xxhash"
//! io_threads = 2
//! ```

use anyhow::Result;
use directories::ProjectDirs;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::cli::ScanArgs;
use crate::duplicates::{default_io_threads, FinderConfig, DEFAULT_MIN_SIZE};
use crate::scanner::Algorithm;

/// Prefix for environment overrides.
pub const ENV_PREFIX: &str = "DUPS_";

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Files of this size or smaller are ignored.
    pub min_size: u64,
    /// Hash algorithm name; unknown names fall back to md5.
    pub algorithm: String,
    /// Hash on the calling thread only.
    pub single_core: bool,
    /// Descend into subdirectories.
    pub full: bool,
    /// Maximum concurrent hash tasks; processor count when unset.
    pub io_threads: Option<usize>,
    /// Abort on the first unreadable file.
    pub strict: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            min_size: DEFAULT_MIN_SIZE,
            algorithm: Algorithm::default().to_string(),
            single_core: false,
            full: true,
            io_threads: None,
            strict: false,
        }
    }
}

impl Config {
    /// Load from the default file location and the environment.
    ///
    /// Any failure is logged and the defaults are used.
    #[must_use]
    pub fn load() -> Self {
        let path = match Self::config_path() {
            Ok(path) => Some(path),
            Err(e) => {
                log::debug!("No config directory: {}", e);
                None
            }
        };
        Self::load_or_default(path.as_deref())
    }

    /// Load from an explicit file (if any) and the environment.
    ///
    /// Any failure is logged and the defaults are used.
    #[must_use]
    pub fn load_or_default(path: Option<&Path>) -> Self {
        match Self::load_from(path) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Failed to load config, using defaults: {}", e);
                Self::default()
            }
        }
    }

    /// Build the figment for the given file and extract it.
    ///
    /// A missing file is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error for malformed TOML or values of the wrong type.
    pub fn load_from(path: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        if let Some(path) = path {
            log::debug!("Reading config from {}", path.display());
            figment = figment.merge(Toml::file(path));
        }
        let config = figment.merge(Env::prefixed(ENV_PREFIX)).extract()?;
        Ok(config)
    }

    /// Default platform-specific configuration file path.
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined.
    pub fn config_path() -> Result<PathBuf> {
        let project_dirs = ProjectDirs::from("com", "dups", "dups")
            .ok_or_else(|| anyhow::anyhow!("Failed to determine project directories"))?;
        Ok(project_dirs.config_dir().join("config.toml"))
    }

    /// Apply command-line flags on top of this configuration.
    ///
    /// Boolean switches can only turn a setting on; `--full=false` is the
    /// way to turn recursion off.
    #[must_use]
    pub fn merge_scan_args(mut self, args: &ScanArgs) -> Self {
        if let Some(min_size) = args.min_size {
            self.min_size = min_size;
        }
        if let Some(ref algorithm) = args.algorithm {
            self.algorithm.clone_from(algorithm);
        }
        if let Some(full) = args.full {
            self.full = full;
        }
        if let Some(threads) = args.io_threads {
            self.io_threads = Some(usize::try_from(threads).unwrap_or(usize::MAX));
        }
        self.single_core |= args.single_core;
        self.strict |= args.strict;
        self
    }

    /// The resolved algorithm.
    #[must_use]
    pub fn algorithm(&self) -> Algorithm {
        Algorithm::from_name(&self.algorithm)
    }

    /// Finder configuration for these settings.
    #[must_use]
    pub fn finder_config(&self) -> FinderConfig {
        FinderConfig::default()
            .with_min_size(self.min_size)
            .with_recursive(self.full)
            .with_parallel(!self.single_core)
            .with_algorithm(self.algorithm())
            .with_io_threads(self.io_threads.unwrap_or_else(default_io_threads))
            .with_strict(self.strict)
    }
}
