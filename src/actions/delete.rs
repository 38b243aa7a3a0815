//! Committing a deletion plan to disk.
//!
//! # Overview
//!
//! [`commit`] walks a [`DeletionPlan`] and removes every candidate with
//! [`std::fs::remove_file`]. A failure on one file is recorded and the
//! remaining files are still processed. The result is a
//! [`DeletionReport`] describing what happened.
//!
//! # Safety checks
//!
//! Before each deletion the candidate is re-statted. If its size no longer
//! matches the fingerprint it was grouped under, it is left alone and
//! [`DeleteError::Modified`] is recorded. With `verify` enabled the
//! candidate is also compared byte for byte against the group's survivor.
//! A candidate that resolves to the same file as its survivor is never
//! removed ([`DeleteError::SameFile`]).
//!
//! The survivor of a group is never touched.
//!
//! # Example
//!
//! ```no_run
//! use dupsweep::actions::{commit, plan_deletions, DeleteConfig, SurvivorPolicy};
//! use dupsweep::duplicates::DuplicateFinder;
//! use std::path::Path;
//!
//! let (groups, _) = DuplicateFinder::with_defaults()
//!     .find_duplicates(Path::new("."))
//!     .unwrap();
//! let plan = plan_deletions(groups, SurvivorPolicy::FirstSeen);
//! let report = commit(&plan, &DeleteConfig::default().with_dry_run(true), None);
//! println!("Would reclaim {} bytes", report.bytes_reclaimed);
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;

use super::plan::{DeletionPlan, PlannedGroup};
use super::verify::files_identical;
use crate::scanner::{FileEntry, Fingerprint, ScanError};

/// Error type for deletion operations.
#[derive(Debug, Error)]
pub enum DeleteError {
    /// File was not found (may have been deleted or moved).
    #[error("file not found: {0}")]
    NotFound(PathBuf),

    /// Permission denied when attempting to delete.
    #[error("permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// File size changed since it was fingerprinted.
    #[error("file modified since scan: {path} (expected {expected} bytes, found {actual})")]
    Modified {
        /// Candidate path
        path: PathBuf,
        /// Size recorded in the fingerprint
        expected: u64,
        /// Size found on disk
        actual: u64,
    },

    /// Byte comparison against the survivor found a difference.
    #[error("content differs from {survivor}: {path}")]
    ContentMismatch {
        /// Candidate path
        path: PathBuf,
        /// Survivor it was compared against
        survivor: PathBuf,
    },

    /// Candidate and survivor resolve to the same file on disk.
    #[error("same file as survivor {survivor}: {path}")]
    SameFile {
        /// Candidate path
        path: PathBuf,
        /// Survivor it resolves to
        survivor: PathBuf,
    },

    /// The survivor can no longer be resolved.
    #[error("survivor {survivor} unavailable, keeping {path}: {source}")]
    SurvivorUnavailable {
        /// Candidate path
        path: PathBuf,
        /// Survivor that could not be resolved
        survivor: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Byte comparison could not be performed.
    #[error("verification failed for {path}: {source}")]
    VerifyFailed {
        /// Candidate path
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },

    /// General I/O error.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },
}

impl DeleteError {
    /// Classify an I/O error for the given path.
    #[must_use]
    pub fn from_io(path: &Path, error: io::Error) -> Self {
        match error.kind() {
            io::ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            io::ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            _ => Self::Io {
                path: path.to_path_buf(),
                source: error,
            },
        }
    }

    /// Get the path associated with this error.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::NotFound(p) | Self::PermissionDenied(p) => p,
            Self::Modified { path, .. }
            | Self::ContentMismatch { path, .. }
            | Self::SameFile { path, .. }
            | Self::SurvivorUnavailable { path, .. }
            | Self::VerifyFailed { path, .. }
            | Self::Io { path, .. } => path,
        }
    }

    /// Pipeline stage that produced this error.
    #[must_use]
    pub fn stage(&self) -> ErrorStage {
        match self {
            Self::ContentMismatch { .. } | Self::VerifyFailed { .. } => ErrorStage::Verify,
            _ => ErrorStage::Delete,
        }
    }
}

/// Pipeline stage where a per-file error occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorStage {
    /// Directory traversal
    Walk,
    /// Reading a file for its fingerprint
    Read,
    /// Removing a file
    Delete,
    /// Byte comparison before removal
    Verify,
}

impl std::fmt::Display for ErrorStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Walk => write!(f, "walk"),
            Self::Read => write!(f, "read"),
            Self::Delete => write!(f, "delete"),
            Self::Verify => write!(f, "verify"),
        }
    }
}

/// A per-file failure recorded in a [`DeletionReport`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileError {
    /// Affected path, if known
    pub path: Option<PathBuf>,
    /// Stage that failed
    pub stage: ErrorStage,
    /// Human-readable error message
    pub message: String,
}

impl FileError {
    /// Create a new file error.
    #[must_use]
    pub fn new(path: Option<PathBuf>, stage: ErrorStage, message: impl Into<String>) -> Self {
        Self {
            path,
            stage,
            message: message.into(),
        }
    }
}

impl From<&ScanError> for FileError {
    fn from(error: &ScanError) -> Self {
        let stage = match error {
            ScanError::Hash(_) => ErrorStage::Read,
            _ => ErrorStage::Walk,
        };
        Self::new(
            error.path().map(Path::to_path_buf),
            stage,
            error.to_string(),
        )
    }
}

impl From<&DeleteError> for FileError {
    fn from(error: &DeleteError) -> Self {
        Self::new(
            Some(error.path().to_path_buf()),
            error.stage(),
            error.to_string(),
        )
    }
}

/// A file that was deleted, or would be in a dry run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeletionRecord {
    /// Deleted path
    pub path: PathBuf,
    /// Fingerprint of the deleted content
    pub fingerprint: Fingerprint,
    /// The copy that was kept
    pub survivor_path: PathBuf,
    /// Bytes freed
    pub size: u64,
}

/// Outcome of a deduplication run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeletionReport {
    /// Number of duplicate groups in the plan
    pub groups_examined: usize,
    /// Number of deletion candidates in the plan
    pub duplicates_found: usize,
    /// Sum of sizes of deleted (or would-be-deleted) files
    pub bytes_reclaimed: u64,
    /// One record per successful deletion, in plan order
    pub deletions: Vec<DeletionRecord>,
    /// Per-file errors, scan errors first
    pub errors: Vec<FileError>,
    /// Whether this was a dry run
    pub dry_run: bool,
    /// Whether a shutdown request stopped the run early
    pub interrupted: bool,
}

impl DeletionReport {
    /// Number of files deleted.
    #[must_use]
    pub fn deleted_count(&self) -> usize {
        self.deletions.len()
    }

    /// Check if any per-file error was recorded.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Insert errors ahead of those already recorded.
    pub fn prepend_errors(&mut self, errors: impl IntoIterator<Item = FileError>) {
        let mut merged: Vec<FileError> = errors.into_iter().collect();
        merged.append(&mut self.errors);
        self.errors = merged;
    }

    /// Human-readable summary of the operation.
    #[must_use]
    pub fn summary(&self) -> String {
        let verb = if self.dry_run { "Would delete" } else { "Deleted" };
        let mut text = format!(
            "{} {} of {} duplicate file(s) in {} group(s), {} bytes reclaimed",
            verb,
            self.deleted_count(),
            self.duplicates_found,
            self.groups_examined,
            self.bytes_reclaimed
        );
        if self.has_errors() {
            text.push_str(&format!(", {} error(s)", self.errors.len()));
        }
        if self.interrupted {
            text.push_str(" (interrupted)");
        }
        text
    }
}

/// Configuration for deletion operations.
#[derive(Debug, Clone, Default)]
pub struct DeleteConfig {
    /// Report what would be deleted without removing anything.
    pub dry_run: bool,
    /// Compare each candidate byte for byte with its survivor first.
    pub verify: bool,
    /// Optional shutdown flag checked before every deletion.
    pub shutdown_flag: Option<Arc<AtomicBool>>,
}

impl DeleteConfig {
    /// Enable/disable dry run.
    #[must_use]
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Enable/disable byte verification.
    #[must_use]
    pub fn with_verify(mut self, verify: bool) -> Self {
        self.verify = verify;
        self
    }

    /// Set the shutdown flag for graceful termination.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }
}

/// Callback trait for deletion progress reporting.
pub trait DeleteProgressCallback: Send + Sync {
    /// Called before each file deletion.
    fn on_before_delete(&self, path: &Path, index: usize, total: usize);

    /// Called after successful deletion.
    fn on_delete_success(&self, path: &Path, size: u64);

    /// Called after failed deletion.
    fn on_delete_failure(&self, path: &Path, error: &str);

    /// Called when the plan has been processed.
    fn on_complete(&self, _report: &DeletionReport) {}
}

/// Confirm the candidate still has the size it was fingerprinted with.
fn check_unchanged(candidate: &FileEntry, fingerprint: &Fingerprint) -> Result<(), DeleteError> {
    let metadata =
        fs::metadata(&candidate.path).map_err(|e| DeleteError::from_io(&candidate.path, e))?;

    if metadata.len() != fingerprint.size {
        log::warn!(
            "File modified since scan: {} (size changed from {} to {})",
            candidate.path.display(),
            fingerprint.size,
            metadata.len()
        );
        return Err(DeleteError::Modified {
            path: candidate.path.clone(),
            expected: fingerprint.size,
            actual: metadata.len(),
        });
    }
    Ok(())
}

/// Refuse candidates that are another path to the survivor itself.
///
/// Two paths can reach one file through a symlink or a symlinked
/// directory. Removing either would leave nothing behind.
fn check_distinct(candidate: &FileEntry, survivor: &FileEntry) -> Result<(), DeleteError> {
    let target =
        fs::canonicalize(&candidate.path).map_err(|e| DeleteError::from_io(&candidate.path, e))?;
    let kept = fs::canonicalize(&survivor.path).map_err(|e| DeleteError::SurvivorUnavailable {
        path: candidate.path.clone(),
        survivor: survivor.path.clone(),
        source: e,
    })?;

    if target == kept {
        log::warn!(
            "Skipping {}: resolves to survivor {}",
            candidate.path.display(),
            survivor.path.display()
        );
        return Err(DeleteError::SameFile {
            path: candidate.path.clone(),
            survivor: survivor.path.clone(),
        });
    }
    Ok(())
}

/// Run all checks for one candidate, then delete it unless dry-running.
fn delete_candidate(
    candidate: &FileEntry,
    group: &PlannedGroup,
    config: &DeleteConfig,
) -> Result<(), DeleteError> {
    check_unchanged(candidate, &group.fingerprint)?;
    check_distinct(candidate, &group.survivor)?;

    if config.verify {
        let identical = files_identical(&group.survivor.path, &candidate.path).map_err(|e| {
            DeleteError::VerifyFailed {
                path: candidate.path.clone(),
                source: e,
            }
        })?;
        if !identical {
            return Err(DeleteError::ContentMismatch {
                path: candidate.path.clone(),
                survivor: group.survivor.path.clone(),
            });
        }
    }

    if config.dry_run {
        log::debug!("Dry run, keeping: {}", candidate.path.display());
        return Ok(());
    }

    fs::remove_file(&candidate.path).map_err(|e| {
        log::error!("Delete failed for {}: {}", candidate.path.display(), e);
        DeleteError::from_io(&candidate.path, e)
    })?;
    log::info!(
        "Deleted: {} ({} bytes)",
        candidate.path.display(),
        group.fingerprint.size
    );
    Ok(())
}

/// Apply a deletion plan.
///
/// Every candidate is processed in plan order. Per-file failures are
/// recorded in [`DeletionReport::errors`] and do not stop the run. If the
/// shutdown flag is set, no further files are deleted and the partial
/// report is returned with `interrupted` set.
pub fn commit(
    plan: &DeletionPlan,
    config: &DeleteConfig,
    callback: Option<&dyn DeleteProgressCallback>,
) -> DeletionReport {
    let total = plan.candidate_count();
    let mut report = DeletionReport {
        groups_examined: plan.group_count(),
        duplicates_found: total,
        dry_run: config.dry_run,
        ..Default::default()
    };

    let mut index = 0;
    'groups: for group in &plan.groups {
        for candidate in &group.candidates {
            if config.is_shutdown_requested() {
                log::warn!(
                    "Shutdown requested, stopping after {} of {} deletion(s)",
                    report.deleted_count(),
                    total
                );
                report.interrupted = true;
                break 'groups;
            }

            if let Some(cb) = callback {
                cb.on_before_delete(&candidate.path, index, total);
            }
            index += 1;

            match delete_candidate(candidate, group, config) {
                Ok(()) => {
                    report.bytes_reclaimed += group.fingerprint.size;
                    report.deletions.push(DeletionRecord {
                        path: candidate.path.clone(),
                        fingerprint: group.fingerprint.clone(),
                        survivor_path: group.survivor.path.clone(),
                        size: group.fingerprint.size,
                    });
                    if let Some(cb) = callback {
                        cb.on_delete_success(&candidate.path, group.fingerprint.size);
                    }
                }
                Err(e) => {
                    let message = e.to_string();
                    log::warn!("Failed to delete {}: {}", candidate.path.display(), message);
                    if let Some(cb) = callback {
                        cb.on_delete_failure(&candidate.path, &message);
                    }
                    report.errors.push(FileError::from(&e));
                }
            }
        }
    }

    if let Some(cb) = callback {
        cb.on_complete(&report);
    }

    log::info!("{}", report.summary());

    report
}
