//! Exit codes and structured error output.

use serde::Serialize;

use crate::actions::DeleteError;
use crate::duplicates::FinderError;

/// Process exit codes.
///
/// - 0: Success (with or without duplicates)
/// - 1: General error (bad path, listing failure, deletion failure, strict hash failure)
/// - 130: Interrupted by user (Ctrl+C)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExitCode {
    /// Completed normally.
    Success = 0,
    /// A fatal error occurred.
    GeneralError = 1,
    /// Interrupted by Ctrl+C.
    Interrupted = 130,
}

impl ExitCode {
    /// Get the numeric exit code.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Get the machine-readable code prefix.
    #[must_use]
    pub fn code_prefix(self) -> &'static str {
        match self {
            Self::Success => "DP000",
            Self::GeneralError => "DP001",
            Self::Interrupted => "DP130",
        }
    }

    /// Classify an application error.
    #[must_use]
    pub fn from_error(err: &anyhow::Error) -> Self {
        let interrupted = err.chain().any(|cause| {
            cause
                .downcast_ref::<FinderError>()
                .is_some_and(|e| matches!(e, FinderError::Interrupted))
        });
        if interrupted {
            Self::Interrupted
        } else {
            Self::GeneralError
        }
    }
}

/// Structured error information for JSON output.
#[derive(Debug, Serialize)]
pub struct StructuredError {
    /// The error code (e.g., "DP001")
    pub code: String,
    /// The exit code number
    pub exit_code: i32,
    /// Human-readable error message
    pub message: String,
    /// Whether the operation was interrupted
    pub interrupted: bool,
    /// Files removed before a deletion failure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub files_deleted: Option<usize>,
    /// Bytes reclaimed before a deletion failure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bytes_reclaimed: Option<u64>,
}

impl StructuredError {
    /// Create a new structured error from an anyhow error and an exit code.
    #[must_use]
    pub fn new(err: &anyhow::Error, exit_code: ExitCode) -> Self {
        let partial = err
            .chain()
            .find_map(|cause| cause.downcast_ref::<DeleteError>())
            .map(DeleteError::partial);
        Self {
            code: exit_code.code_prefix().to_string(),
            exit_code: exit_code.as_i32(),
            message: err.to_string(),
            interrupted: exit_code == ExitCode::Interrupted,
            files_deleted: partial.map(|p| p.files_deleted),
            bytes_reclaimed: partial.map(|p| p.bytes_reclaimed),
        }
    }

    /// The single stderr line used without `--json-errors`.
    #[must_use]
    pub fn plain_line(&self) -> String {
        format!("[{}] Error: {}", self.code, self.message)
    }
}
