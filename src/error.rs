//! Structured error handling and exit codes.

use serde::Serialize;

use crate::actions::DeletionReport;
use crate::duplicates::{FinderError, ScanSummary};

/// Exit codes for the dupsweep application.
///
/// - 0: Success (completed normally, with or without duplicates)
/// - 1: General error (invalid root or unexpected failure)
/// - 3: Partial success (completed, but some files could not be processed)
/// - 130: Interrupted by user (Ctrl+C)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExitCode {
    /// Success: Run completed without per-file errors.
    Success = 0,
    /// General error: An unexpected error occurred.
    GeneralError = 1,
    /// Partial success: Run completed but encountered non-fatal errors.
    PartialSuccess = 3,
    /// Interrupted: Run was interrupted by user (Ctrl+C).
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
            Self::Success => "DS000",
            Self::GeneralError => "DS001",
            Self::PartialSuccess => "DS003",
            Self::Interrupted => "DS130",
        }
    }

    /// Exit code for a completed scan.
    ///
    /// An interrupted scan never completes; it surfaces as
    /// [`FinderError::Interrupted`](crate::duplicates::FinderError) instead.
    #[must_use]
    pub fn for_scan(summary: &ScanSummary) -> Self {
        if summary.scan_errors.is_empty() {
            Self::Success
        } else {
            Self::PartialSuccess
        }
    }

    /// Exit code for a run that ended in a fatal error.
    #[must_use]
    pub fn for_error(err: &anyhow::Error) -> Self {
        match err.downcast_ref::<FinderError>() {
            Some(FinderError::Interrupted) => Self::Interrupted,
            _ => Self::GeneralError,
        }
    }

    /// Exit code for a completed deduplication run.
    #[must_use]
    pub fn for_report(report: &DeletionReport) -> Self {
        if report.interrupted {
            Self::Interrupted
        } else if report.has_errors() {
            Self::PartialSuccess
        } else {
            Self::Success
        }
    }
}

/// Structured error information for JSON output.
#[derive(Debug, Serialize)]
pub struct StructuredError {
    /// The error code (e.g., "DS001")
    pub code: String,
    /// The exit code number
    pub exit_code: i32,
    /// Human-readable error message
    pub message: String,
    /// Whether the operation was interrupted
    pub interrupted: bool,
}

impl StructuredError {
    /// Create a new structured error from an anyhow error and an exit code.
    #[must_use]
    pub fn new(err: &anyhow::Error, exit_code: ExitCode) -> Self {
        Self {
            code: exit_code.code_prefix().to_string(),
            exit_code: exit_code.as_i32(),
            message: format!("{:#}", err),
            interrupted: exit_code == ExitCode::Interrupted,
        }
    }
}

/// Render a fatal error for stderr, as JSON when `json` is set.
#[must_use]
pub fn render_error(err: &anyhow::Error, exit_code: ExitCode, json: bool) -> String {
    let plain = || format!("[{}] Error: {:#}", exit_code.code_prefix(), err);
    if !json {
        return plain();
    }
    serde_json::to_string_pretty(&StructuredError::new(err, exit_code)).unwrap_or_else(|_| plain())
}
