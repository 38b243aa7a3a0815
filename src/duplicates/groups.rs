//! Duplicate group structures and fingerprint-based grouping.
//!
//! # Overview
//!
//! Once every discovered file has a [`Fingerprint`], files are bucketed by
//! that fingerprint. Buckets with a single member are unique files; buckets
//! with two or more members become [`DuplicateGroup`]s.
//!
//! Grouping keeps walk order in two places: the members of a group appear in
//! the order they were fed in, and the groups themselves appear in the order
//! their first member was seen.
//!
//! # Example
//!
//! ```
//! use dupsweep::scanner::{fingerprint_bytes, FileEntry};
//! use dupsweep::duplicates::group_by_fingerprint;
//! use std::path::PathBuf;
//!
//! let hello = fingerprint_bytes(b"hello");
//! let world = fingerprint_bytes(b"world");
//! let files = vec![
//!     (FileEntry::new(PathBuf::from("/a.txt"), 5, 0), hello.clone()),
//!     (FileEntry::new(PathBuf::from("/b.txt"), 5, 1), hello),
//!     (FileEntry::new(PathBuf::from("/c.txt"), 5, 2), world),
//! ];
//!
//! let (groups, stats) = group_by_fingerprint(files);
//!
//! assert_eq!(stats.total_files, 3);
//! assert_eq!(stats.unique_files, 1);
//! assert_eq!(groups.len(), 1);
//! assert_eq!(groups[0].files[0].path, PathBuf::from("/a.txt"));
//! ```

use indexmap::IndexMap;
use serde::Serialize;

use crate::scanner::{FileEntry, Fingerprint};

/// Confirmed duplicate group of files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateGroup {
    /// Fingerprint shared by every file in the group
    pub fingerprint: Fingerprint,
    /// Member files in walk order (index 0 was discovered first)
    pub files: Vec<FileEntry>,
}

impl DuplicateGroup {
    /// Create a new duplicate group.
    #[must_use]
    pub fn new(fingerprint: Fingerprint, files: Vec<FileEntry>) -> Self {
        Self { fingerprint, files }
    }

    /// Number of files in this group.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Check if this group is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Content size shared by every member.
    #[must_use]
    pub fn size(&self) -> u64 {
        self.fingerprint.size
    }

    /// Total wasted space (all copies minus one).
    #[must_use]
    pub fn wasted_space(&self) -> u64 {
        self.size() * self.duplicate_count() as u64
    }

    /// Number of duplicate copies (total - 1 original).
    #[must_use]
    pub fn duplicate_count(&self) -> usize {
        self.files.len().saturating_sub(1)
    }
}

/// Statistics from the grouping phase.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupingStats {
    /// Total number of fingerprinted files processed
    pub total_files: usize,
    /// Total size of all files in bytes
    pub total_size: u64,
    /// Files whose fingerprint matched no other file
    pub unique_files: usize,
    /// Files belonging to a group of 2+
    pub duplicate_files: usize,
    /// Number of groups with 2+ files
    pub duplicate_groups: usize,}

/// Group fingerprinted files into duplicate groups.
///
/// Input order is preserved: callers feed files sorted by walk sequence,
/// so each group lists its members in walk order and groups are ordered
/// by their first member.
///
/// Only groups with two or more files are returned.
///
/// # Performance
///
/// - Time complexity: O(n) where n is the number of files
/// - No file I/O is performed
#[must_use]
pub fn group_by_fingerprint(
    files: impl IntoIterator<Item = (FileEntry, Fingerprint)>,
) -> (Vec<DuplicateGroup>, GroupingStats) {
    let mut buckets: IndexMap<Fingerprint, Vec<FileEntry>> = IndexMap::new();
    let mut stats = GroupingStats::default();

    for (file, fingerprint) in files {
        stats.total_files += 1;
        stats.total_size += fingerprint.size;
        buckets.entry(fingerprint).or_default().push(file);
    }

    let groups: Vec<DuplicateGroup> = buckets
        .into_iter()
        .filter_map(|(fingerprint, files)| {
            if files.len() < 2 {
                stats.unique_files += files.len();
                return None;
            }
            stats.duplicate_files += files.len();
            stats.duplicate_groups += 1;
            log::debug!(
                "Duplicate group {}: {} files of {} bytes",
                fingerprint.md5,
                files.len(),
                fingerprint.size
            );
            Some(DuplicateGroup::new(fingerprint, files))
        })
        .collect();

    log::info!(
        "Grouping complete: {} files, {} in {} duplicate groups, {} unique",
        stats.total_files,
        stats.duplicate_files,
        stats.duplicate_groups,
        stats.unique_files
    );

    (groups, stats)
}
