//! Deletion planning: choose one survivor per duplicate group.
//!
//! Planning is pure. It touches no files, so a plan can be printed,
//! serialized, or discarded without side effects before
//! [`commit`](super::delete::commit) acts on it.

use serde::Serialize;

use crate::duplicates::DuplicateGroup;
use crate::scanner::{FileEntry, Fingerprint};

/// Rule for picking which file in a group is kept.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SurvivorPolicy {
    /// Keep the file discovered first during the walk
    #[default]
    #[value(name = "first")]
    #[serde(rename = "first")]
    FirstSeen,
    /// Keep the file with the lexicographically smallest path
    Lexicographic,
}

impl std::fmt::Display for SurvivorPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FirstSeen => write!(f, "first"),
            Self::Lexicographic => write!(f, "lexicographic"),
        }
    }
}

impl SurvivorPolicy {
    /// Index of the survivor within `files`, or `None` for an empty slice.
    ///
    /// Regular files always win over symlinks; the policy only breaks ties
    /// within the preferred kind.
    #[must_use]
    pub fn select(self, files: &[FileEntry]) -> Option<usize> {
        let indexed = files.iter().enumerate();
        match self {
            Self::FirstSeen => indexed
                .min_by_key(|(_, f)| (f.is_symlink, f.seq))
                .map(|(i, _)| i),
            Self::Lexicographic => indexed
                .min_by(|(_, a), (_, b)| {
                    a.is_symlink
                        .cmp(&b.is_symlink)
                        .then_with(|| a.path.cmp(&b.path))
                })
                .map(|(i, _)| i),
        }
    }
}

/// One group's planned outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedGroup {
    /// Fingerprint shared by survivor and candidates
    pub fingerprint: Fingerprint,
    /// File that will be kept
    pub survivor: FileEntry,
    /// Files that will be deleted, in walk order
    pub candidates: Vec<FileEntry>,
}

impl PlannedGroup {
    /// Bytes freed if every candidate is deleted.
    #[must_use]
    pub fn reclaimable(&self) -> u64 {
        self.fingerprint.size * self.candidates.len() as u64
    }
}

/// The full set of planned deletions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeletionPlan {
    /// Policy used to pick survivors
    pub policy: SurvivorPolicy,
    /// Planned groups, in group order
    pub groups: Vec<PlannedGroup>,
}

impl DeletionPlan {
    /// Number of groups in the plan.
    #[must_use]
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Number of files slated for deletion.
    #[must_use]
    pub fn candidate_count(&self) -> usize {
        self.groups.iter().map(|g| g.candidates.len()).sum()
    }

    /// Bytes freed if every candidate is deleted.
    #[must_use]
    pub fn reclaimable(&self) -> u64 {
        self.groups.iter().map(PlannedGroup::reclaimable).sum()
    }

    /// Check if the plan has nothing to do.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Turn duplicate groups into a deletion plan.
///
/// Exactly one survivor is chosen per group. Groups with fewer than two
/// files are dropped.
#[must_use]
pub fn plan_deletions(groups: Vec<DuplicateGroup>, policy: SurvivorPolicy) -> DeletionPlan {
    let planned: Vec<PlannedGroup> = groups
        .into_iter()
        .filter(|g| g.len() > 1)
        .filter_map(|group| {
            let DuplicateGroup { fingerprint, mut files } = group;
            let index = policy.select(&files)?;
            let survivor = files.remove(index);
            log::debug!(
                "Keeping {} ({} candidate(s) for deletion)",
                survivor.path.display(),
                files.len()
            );
            Some(PlannedGroup {
                fingerprint,
                survivor,
                candidates: files,
            })
        })
        .collect();

    DeletionPlan {
        policy,
        groups: planned,
    }
}
