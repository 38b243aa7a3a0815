//! Duplicate finder: walk, fingerprint, group.
//!
//! # Overview
//!
//! [`DuplicateFinder`] runs the detection pipeline for one root directory:
//! 1. **Walk** - Collect every regular file in walk order
//! 2. **Fingerprint** - Compute size + MD5 + SHA-256 for each file on a
//!    bounded thread pool
//! 3. **Group** - Bucket files by fingerprint (see [`crate::duplicates::groups`])
//!
//! Fingerprinting may complete in any order. Results are sorted back into
//! walk order before grouping, so the output never depends on thread timing.
//!
//! # Example
//!
//! ```no_run
//! use dupsweep::duplicates::{DuplicateFinder, FinderConfig};
//! use std::path::Path;
//!
//! let finder = DuplicateFinder::new(FinderConfig::default().with_io_threads(2));
//! let (groups, summary) = finder.find_duplicates(Path::new(".")).unwrap();
//! println!("{} groups, {} reclaimable", groups.len(), summary.reclaimable_display());
//! ```

use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use bytesize::ByteSize;
use rayon::prelude::*;

use crate::progress::ProgressCallback;
use crate::scanner::{
    validate_root, FileEntry, Fingerprint, HashError, Hasher, ScanError, Walker, WalkerConfig,
};

use super::{group_by_fingerprint, DuplicateGroup};

/// Configuration for the duplicate finder.
#[derive(Clone)]
pub struct FinderConfig {
    /// Number of I/O threads for parallel fingerprinting.
    /// Default is 4 to prevent disk thrashing; 1 runs sequentially.
    pub io_threads: usize,
    /// Walker configuration for directory traversal.
    pub walker_config: WalkerConfig,
    /// Optional shutdown flag for graceful termination.
    pub shutdown_flag: Option<Arc<AtomicBool>>,
    /// Optional progress callback for reporting.
    pub progress_callback: Option<Arc<dyn ProgressCallback>>,
}

impl std::fmt::Debug for FinderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FinderConfig")
            .field("io_threads", &self.io_threads)
            .field("walker_config", &self.walker_config)
            .field("shutdown_flag", &self.shutdown_flag)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<callback>"),
            )
            .finish()
    }
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            io_threads: 4,
            walker_config: WalkerConfig::default(),
            shutdown_flag: None,
            progress_callback: None,
        }
    }
}

impl FinderConfig {
    /// Set the I/O thread count (minimum 1).
    #[must_use]
    pub fn with_io_threads(mut self, threads: usize) -> Self {
        self.io_threads = threads.max(1);
        self
    }

    /// Set the walker configuration.
    #[must_use]
    pub fn with_walker_config(mut self, config: WalkerConfig) -> Self {
        self.walker_config = config;
        self
    }

    /// Set the shutdown flag for graceful termination.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    /// Set the progress callback.
    #[must_use]
    pub fn with_progress_callback(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    /// Check if shutdown has been requested.
    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }
}

/// Summary statistics from a duplicate scan.
#[derive(Debug, Default)]
pub struct ScanSummary {
    /// Total number of files successfully fingerprinted
    pub total_files: usize,
    /// Total size of those files in bytes
    pub total_size: u64,
    /// Files that were discovered but could not be read
    pub failed_files: usize,
    /// Number of confirmed duplicate groups
    pub duplicate_groups: usize,
    /// Total number of duplicate files (excluding one survivor per group)
    pub duplicate_files: usize,
    /// Total space that can be reclaimed by removing duplicates
    pub reclaimable_space: u64,
    /// Duration of the entire scan
    pub scan_duration: Duration,
    /// Per-file errors encountered during the scan, in the order they occurred
    pub scan_errors: Vec<ScanError>,
}

impl ScanSummary {
    /// Calculate the percentage of space that is wasted by duplicates.
    #[must_use]
    pub fn wasted_percentage(&self) -> f64 {
        if self.total_size == 0 {
            0.0
        } else {
            (self.reclaimable_space as f64 / self.total_size as f64) * 100.0
        }
    }

    /// Format reclaimable space as human-readable string.
    #[must_use]
    pub fn reclaimable_display(&self) -> String {
        ByteSize(self.reclaimable_space).to_string()
    }

    /// Format total size as human-readable string.
    #[must_use]
    pub fn total_size_display(&self) -> String {
        ByteSize(self.total_size).to_string()
    }

    fn record_groups(&mut self, groups: &[DuplicateGroup]) {
        self.duplicate_groups = groups.len();
        self.duplicate_files = groups.iter().map(DuplicateGroup::duplicate_count).sum();
        self.reclaimable_space = groups.iter().map(DuplicateGroup::wasted_space).sum();
    }
}

/// Errors that abort a duplicate scan.
///
/// Per-file failures never show up here; they are collected in
/// [`ScanSummary::scan_errors`].
#[derive(thiserror::Error, Debug)]
pub enum FinderError {
    /// The scan was interrupted by user (Ctrl+C or shutdown signal).
    #[error("Scan interrupted by user")]
    Interrupted,

    /// The root path is missing, not a directory, or unreadable.
    #[error(transparent)]
    Path(#[from] ScanError),
}

/// Duplicate finder that orchestrates the detection pipeline.
pub struct DuplicateFinder {
    config: FinderConfig,
    hasher: Hasher,
}

impl DuplicateFinder {
    /// Create a new duplicate finder with the given configuration.
    #[must_use]
    pub fn new(config: FinderConfig) -> Self {
        let mut hasher = Hasher::new();
        if let Some(ref flag) = config.shutdown_flag {
            hasher = hasher.with_shutdown_flag(flag.clone());
        }
        Self { config, hasher }
    }

    /// Create a new duplicate finder with default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(FinderConfig::default())
    }

    /// Find all duplicate files under `path`.
    ///
    /// Returns groups with two or more members, each listing its files in
    /// walk order, together with summary statistics.
    ///
    /// # Errors
    ///
    /// - [`FinderError::Path`] if the root does not exist, is not a
    ///   directory, or cannot be listed
    /// - [`FinderError::Interrupted`] if the shutdown flag is set before
    ///   grouping finishes
    pub fn find_duplicates(
        &self,
        path: &Path,
    ) -> Result<(Vec<DuplicateGroup>, ScanSummary), FinderError> {
        let start_time = Instant::now();
        validate_root(path)?;

        log::info!("Starting duplicate scan of {}", path.display());

        if self.config.is_shutdown_requested() {
            return Err(FinderError::Interrupted);
        }

        if let Some(ref callback) = self.config.progress_callback {
            callback.on_phase_start("walking", 0);
            callback.on_message(&format!("Walking {}", path.display()));
        }

        let mut walker = Walker::new(path, self.config.walker_config.clone());
        if let Some(ref flag) = self.config.shutdown_flag {
            walker = walker.with_shutdown_flag(flag.clone());
        }

        let mut files = Vec::new();
        let mut walk_errors = Vec::new();
        for result in walker.walk() {
            match result {
                Ok(file) => {
                    if let Some(ref callback) = self.config.progress_callback {
                        callback.on_progress(files.len() + 1, &file.path.to_string_lossy());
                    }
                    files.push(file);
                }
                Err(e) => walk_errors.push(e),
            }
        }

        if let Some(ref callback) = self.config.progress_callback {
            callback.on_phase_end("walking");
        }

        if self.config.is_shutdown_requested() {
            return Err(FinderError::Interrupted);
        }

        log::info!(
            "Walk complete: {} files, {} errors",
            files.len(),
            walk_errors.len()
        );

        let (groups, mut summary) = self.find_duplicates_from_files(files)?;
        walk_errors.append(&mut summary.scan_errors);
        summary.scan_errors = walk_errors;
        summary.scan_duration = start_time.elapsed();

        log::info!(
            "Scan complete: {} duplicate groups, {} duplicate files, {} reclaimable",
            summary.duplicate_groups,
            summary.duplicate_files,
            summary.reclaimable_display()
        );

        Ok((groups, summary))
    }

    /// Find duplicates from a pre-collected list of files.
    ///
    /// Files are fingerprinted and grouped; no directory walk happens. Input
    /// order is irrelevant since results are ordered by [`FileEntry::seq`].
    ///
    /// # Errors
    ///
    /// Returns [`FinderError::Interrupted`] if shutdown is requested.
    pub fn find_duplicates_from_files(
        &self,
        files: Vec<FileEntry>,
    ) -> Result<(Vec<DuplicateGroup>, ScanSummary), FinderError> {
        let start_time = Instant::now();
        let mut summary = ScanSummary::default();

        let results = self.fingerprint_all(files);

        let mut fingerprinted = Vec::with_capacity(results.len());
        let mut interrupted = false;
        for (file, result) in results {
            match result {
                Ok(fingerprint) => fingerprinted.push((file, fingerprint)),
                Err(HashError::Interrupted(_)) => interrupted = true,
                Err(e) => {
                    log::warn!("Skipping unreadable file: {}", e);
                    summary.failed_files += 1;
                    summary.scan_errors.push(ScanError::Hash(e));
                }
            }
        }

        if interrupted || self.config.is_shutdown_requested() {
            return Err(FinderError::Interrupted);
        }

        let (groups, stats) = group_by_fingerprint(fingerprinted);
        summary.total_files = stats.total_files;
        summary.total_size = stats.total_size;
        summary.record_groups(&groups);
        summary.scan_duration = start_time.elapsed();

        Ok((groups, summary))
    }

    /// Fingerprint every file and return results sorted by walk sequence.
    fn fingerprint_all(
        &self,
        files: Vec<FileEntry>,
    ) -> Vec<(FileEntry, Result<Fingerprint, HashError>)> {
        let total = files.len();
        if let Some(ref callback) = self.config.progress_callback {
            callback.on_phase_start("fingerprinting", total);
        }
        log::info!("Fingerprinting {} files", total);

        let completed = AtomicUsize::new(0);
        let fingerprint_one = |file: FileEntry| {
            if self.config.is_shutdown_requested() {
                let path = file.path.clone();
                return (file, Err(HashError::Interrupted(path)));
            }

            let result = self.hasher.fingerprint(&file.path);

            if let Some(ref callback) = self.config.progress_callback {
                let current = completed.fetch_add(1, Ordering::Relaxed) + 1;
                callback.on_progress(current, &file.path.to_string_lossy());
                if let Ok(ref fp) = result {
                    callback.on_item_completed(fp.size);
                }
            }
            (file, result)
        };

        let mut results: Vec<_> = if self.config.io_threads <= 1 {
            files.into_iter().map(fingerprint_one).collect()
        } else {
            match rayon::ThreadPoolBuilder::new()
                .num_threads(self.config.io_threads)
                .build()
            {
                Ok(pool) => pool.install(|| files.into_par_iter().map(fingerprint_one).collect()),
                Err(e) => {
                    log::warn!(
                        "Failed to create I/O thread pool ({}), using global pool with {} threads",
                        e,
                        rayon::current_num_threads()
                    );
                    files.into_par_iter().map(fingerprint_one).collect()
                }
            }
        };

        results.sort_by_key(|(file, _)| file.seq);

        if let Some(ref callback) = self.config.progress_callback {
            callback.on_phase_end("fingerprinting");
        }

        results
    }
}
