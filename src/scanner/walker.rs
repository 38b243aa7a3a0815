//! Directory walker implementation using jwalk.
//!
//! # Overview
//!
//! This module provides the [`Walker`] struct for traversing a directory
//! tree and yielding every regular file beneath it, in a deterministic
//! order. Each yielded [`FileEntry`] carries a sequence number that records
//! its position in that order; later stages use it to identify the
//! first-discovered copy of a duplicate.
//!
//! # Features
//!
//! - Children sorted by file name, so traversal order does not depend on
//!   the file system's listing order
//! - Symbolic links skipped unless `follow_symlinks` is set
//! - Gitignore-style pattern matching via the `ignore` crate; ignored
//!   directories are not descended into
//! - Hidden file filtering
//! - Graceful shutdown via atomic flag
//!
//! # Example
//!
//! ```no_run
//! use dupsweep::scanner::{Walker, WalkerConfig};
//! use std::path::Path;
//!
//! let walker = Walker::new(Path::new("/home/user/Downloads"), WalkerConfig::default());
//! for entry in walker.walk() {
//!     match entry {
//!         Ok(file) => println!("#{} {}: {} bytes", file.seq, file.path.display(), file.size),
//!         Err(e) => eprintln!("Warning: {}", e),
//!     }
//! }
//! ```

use std::fs::{self, Metadata};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use ignore::gitignore::{Gitignore, GitignoreBuilder};
use jwalk::{Parallelism, WalkDir};

use super::{FileEntry, ScanError, WalkerConfig};

/// Check that `root` exists, is a directory, and can be listed.
///
/// # Errors
///
/// - [`ScanError::NotFound`] if the path does not exist
/// - [`ScanError::NotADirectory`] if it is not a directory
/// - [`ScanError::PermissionDenied`] if it cannot be read
pub fn validate_root(root: &Path) -> Result<(), ScanError> {
    let metadata = fs::metadata(root).map_err(|e| match e.kind() {
        ErrorKind::NotFound => ScanError::NotFound(root.to_path_buf()),
        ErrorKind::PermissionDenied => ScanError::PermissionDenied(root.to_path_buf()),
        _ => ScanError::Io {
            path: root.to_path_buf(),
            source: e,
        },
    })?;

    if !metadata.is_dir() {
        return Err(ScanError::NotADirectory(root.to_path_buf()));
    }

    fs::read_dir(root).map_err(|e| match e.kind() {
        ErrorKind::PermissionDenied => ScanError::PermissionDenied(root.to_path_buf()),
        _ => ScanError::Io {
            path: root.to_path_buf(),
            source: e,
        },
    })?;

    Ok(())
}

/// Directory walker for file discovery.
#[derive(Debug)]
pub struct Walker {
    /// Root path to walk
    root: PathBuf,
    /// Walker configuration
    config: WalkerConfig,
    /// Optional shutdown flag for graceful termination
    shutdown_flag: Option<Arc<AtomicBool>>,
}

impl Walker {
    /// Create a new walker for the given path.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use dupsweep::scanner::{Walker, WalkerConfig};
    /// use std::path::Path;
    ///
    /// let walker = Walker::new(Path::new("."), WalkerConfig::default());
    /// ```
    #[must_use]
    pub fn new(path: &Path, config: WalkerConfig) -> Self {
        Self {
            root: path.to_path_buf(),
            config,
            shutdown_flag: None,
        }
    }

    /// Set the shutdown flag for graceful termination.
    ///
    /// When the flag is set to `true`, the walker stops yielding entries.
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

    /// Build gitignore matcher from config patterns.
    fn build_gitignore(&self) -> Option<Gitignore> {
        if self.config.ignore_patterns.is_empty() {
            return None;
        }

        let mut builder = GitignoreBuilder::new(&self.root);
        for pattern in &self.config.ignore_patterns {
            if let Err(e) = builder.add_line(None, pattern) {
                log::warn!("Invalid ignore pattern '{}': {}", pattern, e);
            }
        }

        match builder.build() {
            Ok(gitignore) if gitignore.is_empty() => None,
            Ok(gitignore) => Some(gitignore),
            Err(e) => {
                log::warn!("Failed to build ignore patterns: {}", e);
                None
            }
        }
    }

    /// Walk the directory tree, yielding file entries.
    ///
    /// The iterator is lazy. Per-entry errors are yielded as [`ScanError`]
    /// values rather than stopping iteration. Directories, symlinks (unless
    /// followed), sockets, FIFOs and devices are skipped silently.
    ///
    /// Call [`validate_root`] first if the root itself may be invalid; an
    /// unreadable root shows up here as a single error item.
    pub fn walk(&self) -> impl Iterator<Item = Result<FileEntry, ScanError>> + '_ {
        let gitignore = self.build_gitignore();
        let prune = gitignore.clone();
        let mut seq: u64 = 0;

        let walk_dir = WalkDir::new(&self.root)
            .parallelism(Parallelism::Serial)
            .follow_links(self.config.follow_symlinks)
            .skip_hidden(self.config.skip_hidden)
            .process_read_dir(move |_depth, _path, _read_dir_state, children| {
                // Sort children for deterministic output
                children.sort_by(|a, b| match (a, b) {
                    (Ok(a), Ok(b)) => a.file_name().cmp(b.file_name()),
                    (Ok(_), Err(_)) => std::cmp::Ordering::Less,
                    (Err(_), Ok(_)) => std::cmp::Ordering::Greater,
                    (Err(_), Err(_)) => std::cmp::Ordering::Equal,
                });

                // Do not descend into ignored directories
                if let Some(ref gi) = prune {
                    for entry in children.iter_mut().flatten() {
                        if entry.file_type().is_dir()
                            && gi.matched(entry.path(), true).is_ignore()
                        {
                            entry.read_children_path = None;
                        }
                    }
                }
            });

        walk_dir.into_iter().filter_map(move |entry_result| {
            if self.is_shutdown_requested() {
                log::debug!("Walker: Shutdown requested, stopping iteration");
                return None;
            }

            match entry_result {
                Ok(entry) => {
                    let path = entry.path();

                    // Skip the root directory itself
                    if path == self.root || entry.file_type().is_dir() {
                        return None;
                    }

                    if self.should_ignore(&path, &gitignore) {
                        log::trace!("Ignoring file: {}", path.display());
                        return None;
                    }

                    let (metadata, is_symlink) = match self.resolve_metadata(&path) {
                        Ok(Some(resolved)) => resolved,
                        Ok(None) => return None,
                        Err(e) => return Some(Err(self.handle_io_error(&path, e))),
                    };

                    // Sockets, FIFOs, devices, and links to directories
                    if !metadata.is_file() {
                        log::trace!("Skipping non-regular file: {}", path.display());
                        return None;
                    }

                    let file = FileEntry {
                        path,
                        size: metadata.len(),
                        seq,
                        is_symlink,
                    };
                    seq += 1;
                    Some(Ok(file))
                }
                Err(e) => {
                    let path = e
                        .path()
                        .map_or_else(|| self.root.clone(), std::borrow::ToOwned::to_owned);
                    Some(Err(self.handle_jwalk_error(path, e)))
                }
            }
        })
    }

    /// Check if a file should be ignored based on configured patterns.
    fn should_ignore(&self, path: &Path, gitignore: &Option<Gitignore>) -> bool {
        let Some(gi) = gitignore else {
            return false;
        };
        let relative_path = path.strip_prefix(&self.root).unwrap_or(path);
        gi.matched_path_or_any_parents(relative_path, false)
            .is_ignore()
    }

    /// Stat the entry, applying the symlink policy.
    ///
    /// Returns `Ok(None)` for symlinks when links are not followed.
    fn resolve_metadata(&self, path: &Path) -> std::io::Result<Option<(Metadata, bool)>> {
        let link_metadata = fs::symlink_metadata(path)?;
        if !link_metadata.file_type().is_symlink() {
            return Ok(Some((link_metadata, false)));
        }

        if !self.config.follow_symlinks {
            log::trace!("Skipping symlink: {}", path.display());
            return Ok(None);
        }

        Ok(Some((fs::metadata(path)?, true)))
    }

    /// Handle I/O errors during file access.
    fn handle_io_error(&self, path: &Path, error: std::io::Error) -> ScanError {
        match error.kind() {
            ErrorKind::PermissionDenied => {
                log::warn!("Permission denied: {}", path.display());
                ScanError::PermissionDenied(path.to_path_buf())
            }
            ErrorKind::NotFound => {
                log::warn!("File vanished during walk: {}", path.display());
                ScanError::NotFound(path.to_path_buf())
            }
            _ => {
                log::warn!("I/O error for {}: {}", path.display(), error);
                ScanError::Io {
                    path: path.to_path_buf(),
                    source: error,
                }
            }
        }
    }

    /// Handle jwalk errors.
    fn handle_jwalk_error(&self, path: PathBuf, error: jwalk::Error) -> ScanError {
        if error
            .io_error()
            .is_some_and(|e| e.kind() == ErrorKind::PermissionDenied)
        {
            log::warn!("Permission denied: {}", path.display());
            return ScanError::PermissionDenied(path);
        }

        log::warn!("Walker error for {}: {}", path.display(), error);
        ScanError::Io {
            path,
            source: std::io::Error::other(error.to_string()),
        }
    }
}
