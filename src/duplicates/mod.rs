//! Duplicate detection module.
//!
//! This module provides functionality for:
//! - Walking and fingerprinting a directory tree ([`finder`])
//! - Grouping files by fingerprint ([`groups`])

pub mod finder;
pub mod groups;

pub use finder::{DuplicateFinder, FinderConfig, FinderError, ScanSummary};
pub use groups::{group_by_fingerprint, DuplicateGroup, GroupingStats};
