//! File actions module.
//!
//! The delete module removes the redundant members of duplicate classes:
//! - Permanent deletion (default)
//! - Move to system trash (`--trash`, recoverable)
//! - Stops at the first failure and reports partial totals
//!
//! ```no_run
//! use dups::actions::{remove_duplicates, DeleteConfig};
//!
//! let summary = remove_duplicates(&[], &DeleteConfig::default()).unwrap();
//! assert_eq!(summary.files_deleted, 0);
//! ```

pub mod delete;

// Re-export commonly used types
pub use delete::{
    delete_to_trash, permanent_delete, remove_duplicates, DeleteConfig, DeleteError,
    RemovalSummary,
};
