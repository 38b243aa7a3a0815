//! End-to-end deduplication: find, plan, commit.
//!
//! [`Deduplicator`] ties the finder and the deletion actions together for
//! one root directory. The two phases stay separate: [`Deduplicator::plan`]
//! only reads, [`Deduplicator::run`] plans and then commits.
//!
//! # Example
//!
//! ```no_run
//! use dupsweep::dedupe::Deduplicator;
//! use dupsweep::actions::SurvivorPolicy;
//! use std::path::Path;
//!
//! let report = Deduplicator::default()
//!     .with_policy(SurvivorPolicy::Lexicographic)
//!     .with_dry_run(true)
//!     .deduplicate(Path::new("/tmp/photos"))
//!     .unwrap();
//! println!("{}", report.summary());
//! ```

use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use crate::actions::{
    commit, plan_deletions, DeleteConfig, DeleteProgressCallback, DeletionPlan, DeletionReport,
    FileError, SurvivorPolicy,
};
use crate::duplicates::{DuplicateFinder, FinderConfig, FinderError, ScanSummary};

/// Everything produced by a full run.
#[derive(Debug)]
pub struct DedupeOutcome {
    /// The plan that was committed
    pub plan: DeletionPlan,
    /// Scan statistics
    pub summary: ScanSummary,
    /// What the commit phase did, with scan errors merged in
    pub report: DeletionReport,
}

/// Finds duplicates under a root and removes all but one copy of each.
#[derive(Default)]
pub struct Deduplicator {
    finder_config: FinderConfig,
    delete_config: DeleteConfig,
    policy: SurvivorPolicy,
    delete_callback: Option<Arc<dyn DeleteProgressCallback>>,
}

impl std::fmt::Debug for Deduplicator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Deduplicator")
            .field("finder_config", &self.finder_config)
            .field("delete_config", &self.delete_config)
            .field("policy", &self.policy)
            .field(
                "delete_callback",
                &self.delete_callback.as_ref().map(|_| "<callback>"),
            )
            .finish()
    }
}

impl Deduplicator {
    /// Create a deduplicator that scans with the given finder configuration.
    #[must_use]
    pub fn new(finder_config: FinderConfig) -> Self {
        Self {
            finder_config,
            ..Default::default()
        }
    }

    /// Set the survivor policy.
    #[must_use]
    pub fn with_policy(mut self, policy: SurvivorPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Enable/disable dry run.
    #[must_use]
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.delete_config = self.delete_config.with_dry_run(dry_run);
        self
    }

    /// Enable/disable byte verification before each deletion.
    #[must_use]
    pub fn with_verify(mut self, verify: bool) -> Self {
        self.delete_config = self.delete_config.with_verify(verify);
        self
    }

    /// Share one shutdown flag between scanning and deleting.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.finder_config = self.finder_config.with_shutdown_flag(flag.clone());
        self.delete_config = self.delete_config.with_shutdown_flag(flag);
        self
    }

    /// Set the deletion progress callback.
    #[must_use]
    pub fn with_delete_callback(mut self, callback: Arc<dyn DeleteProgressCallback>) -> Self {
        self.delete_callback = Some(callback);
        self
    }

    /// Scan `root` and plan deletions without touching any file.
    ///
    /// # Errors
    ///
    /// Returns [`FinderError`] if the root is invalid or the scan is
    /// interrupted.
    pub fn plan(&self, root: &Path) -> Result<(DeletionPlan, ScanSummary), FinderError> {
        let finder = DuplicateFinder::new(self.finder_config.clone());
        let (groups, summary) = finder.find_duplicates(root)?;
        Ok((plan_deletions(groups, self.policy), summary))
    }

    /// Scan, plan and commit.
    ///
    /// Scan errors are placed ahead of deletion errors in the report.
    ///
    /// # Errors
    ///
    /// Returns [`FinderError`] if the root is invalid or the scan is
    /// interrupted. An interruption during commit is not an error; the
    /// report comes back with `interrupted` set.
    pub fn run(&self, root: &Path) -> Result<DedupeOutcome, FinderError> {
        let (plan, summary) = self.plan(root)?;

        log::info!(
            "Planned {} deletion(s) across {} group(s) (keep: {})",
            plan.candidate_count(),
            plan.group_count(),
            self.policy
        );

        let mut report = commit(&plan, &self.delete_config, self.delete_callback.as_deref());
        report.prepend_errors(summary.scan_errors.iter().map(FileError::from));

        Ok(DedupeOutcome {
            plan,
            summary,
            report,
        })
    }

    /// Scan, plan and commit, returning only the report.
    ///
    /// # Errors
    ///
    /// See [`Deduplicator::run`].
    pub fn deduplicate(&self, root: &Path) -> Result<DeletionReport, FinderError> {
        self.run(root).map(|outcome| outcome.report)
    }
}
