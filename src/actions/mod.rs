//! File actions module.
//!
//! This module provides functionality for:
//! - Planning which copy of each duplicate group survives ([`plan`])
//! - Byte-for-byte comparison of two files ([`verify`])
//! - Committing a plan to disk with per-file error collection ([`delete`])
//!
//! Planning never touches the file system, so a plan can be inspected
//! before anything is removed:
//!
//! ```no_run
//! use dupsweep::actions::{commit, plan_deletions, DeleteConfig, SurvivorPolicy};
//! use dupsweep::duplicates::DuplicateFinder;
//! use std::path::Path;
//!
//! let (groups, _) = DuplicateFinder::with_defaults()
//!     .find_duplicates(Path::new("."))
//!     .unwrap();
//! let plan = plan_deletions(groups, SurvivorPolicy::Lexicographic);
//! for group in &plan.groups {
//!     println!("keep {}", group.survivor.path.display());
//! }
//! let report = commit(&plan, &DeleteConfig::default(), None);
//! println!("{}", report.summary());
//! ```

pub mod delete;
pub mod plan;
pub mod verify;

// Re-export commonly used types
pub use delete::{
    commit, DeleteConfig, DeleteError, DeleteProgressCallback, DeletionRecord, DeletionReport,
    ErrorStage, FileError,
};
pub use plan::{plan_deletions, DeletionPlan, PlannedGroup, SurvivorPolicy};
pub use verify::files_identical;
