//! Human-readable text output.
//!
//! Each duplicate group is printed as a block:
//!
//! ```text
//! File size: 5 bytes
//! MD5 hash: 5d41402abc4b2a76b9719d911017c592
//! SHA-256 hash: 2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824
//! Duplicate Files:
//!     - File 1: ./a.txt
//!     - File 2: ./b.txt
//! Deleted: ./b.txt
//! ----------------------------------------
//! ```
//!
//! Member lines are tab-indented. The `Deleted:` lines only appear for
//! `dedupe`; a dry run prints `Would delete:` instead.

use std::collections::{HashMap, HashSet};
use std::fmt::Display;
use std::io::{self, Write};
use std::path::Path;

use bytesize::ByteSize;
use yansi::{Color, Paint, Style};

use crate::actions::{DeletionReport, FileError, PlannedGroup};
use crate::dedupe::DedupeOutcome;
use crate::duplicates::{DuplicateGroup, ScanSummary};
use crate::scanner::{FileEntry, Fingerprint};

/// Message printed when a run finds nothing to do.
pub const NO_DUPLICATES: &str = "No duplicate files found.";

const SEPARATOR_WIDTH: usize = 40;

/// Text formatter with optional ANSI colors.
#[derive(Debug, Clone, Copy)]
pub struct TextOutput {
    color: bool,
}

impl TextOutput {
    /// Create a new formatter.
    #[must_use]
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    fn styled(&self, text: impl Display, style: Style) -> String {
        if self.color {
            text.paint(style).to_string()
        } else {
            text.to_string()
        }
    }

    fn write_fingerprint<W: Write>(&self, w: &mut W, fingerprint: &Fingerprint) -> io::Result<()> {
        let bold = Style::new().bold();
        writeln!(w, "File size: {} bytes", self.styled(fingerprint.size, bold))?;
        writeln!(w, "MD5 hash: {}", fingerprint.md5)?;
        writeln!(w, "SHA-256 hash: {}", fingerprint.sha256)?;
        Ok(())
    }

    fn write_members<'a, W: Write>(
        &self,
        w: &mut W,
        files: impl IntoIterator<Item = &'a FileEntry>,
    ) -> io::Result<()> {
        writeln!(w, "Duplicate Files:")?;
        for (i, file) in files.into_iter().enumerate() {
            writeln!(w, "\t- File {}: {}", i + 1, file.path.display())?;
        }
        Ok(())
    }

    fn write_separator<W: Write>(&self, w: &mut W) -> io::Result<()> {
        writeln!(w, "{}", "-".repeat(SEPARATOR_WIDTH))
    }

    fn write_errors<W: Write>(&self, w: &mut W, errors: &[FileError]) -> io::Result<()> {
        if errors.is_empty() {
            return Ok(());
        }
        let warn = Style::new().fg(Color::Yellow);
        writeln!(w)?;
        writeln!(w, "{}", self.styled("Errors:", warn.bold()))?;
        for error in errors {
            writeln!(w, "\t[{}] {}", error.stage, error.message)?;
        }
        Ok(())
    }

    /// Write the result of `scan`: every group, then a summary line.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn write_scan<W: Write>(
        &self,
        w: &mut W,
        groups: &[DuplicateGroup],
        summary: &ScanSummary,
    ) -> io::Result<()> {
        if groups.is_empty() {
            writeln!(w, "{}", NO_DUPLICATES)?;
        } else {
            writeln!(w)?;
            writeln!(w, "Duplicate Files:")?;
            for group in groups {
                self.write_fingerprint(w, &group.fingerprint)?;
                self.write_members(w, &group.files)?;
                self.write_separator(w)?;
            }
        }

        let errors: Vec<FileError> = summary.scan_errors.iter().map(FileError::from).collect();
        self.write_errors(w, &errors)?;

        writeln!(
            w,
            "Scanned {} file(s) ({}): {} duplicate group(s), {} duplicate file(s), {} reclaimable",
            summary.total_files,
            summary.total_size_display(),
            summary.duplicate_groups,
            summary.duplicate_files,
            self.styled(summary.reclaimable_display(), Style::new().bold())
        )
    }

    /// Write the result of `dedupe`: every group with what happened to
    /// each candidate, then errors and a summary line.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn write_dedupe<W: Write>(&self, w: &mut W, outcome: &DedupeOutcome) -> io::Result<()> {
        let report = &outcome.report;

        if outcome.plan.is_empty() {
            writeln!(w, "{}", NO_DUPLICATES)?;
        } else {
            let deleted: HashSet<&Path> =
                report.deletions.iter().map(|d| d.path.as_path()).collect();
            let failed: HashMap<&Path, &FileError> = report
                .errors
                .iter()
                .filter_map(|e| e.path.as_deref().map(|p| (p, e)))
                .collect();

            writeln!(w)?;
            writeln!(w, "Duplicate Files:")?;
            for group in &outcome.plan.groups {
                self.write_planned_group(w, group, report.dry_run, &deleted, &failed)?;
            }
        }

        self.write_errors(w, &report.errors)?;
        self.write_report_summary(w, report)
    }

    fn write_planned_group<W: Write>(
        &self,
        w: &mut W,
        group: &PlannedGroup,
        dry_run: bool,
        deleted: &HashSet<&Path>,
        failed: &HashMap<&Path, &FileError>,
    ) -> io::Result<()> {
        let mut members: Vec<&FileEntry> = std::iter::once(&group.survivor)
            .chain(group.candidates.iter())
            .collect();
        members.sort_by_key(|f| f.seq);

        self.write_fingerprint(w, &group.fingerprint)?;
        self.write_members(w, members)?;

        let red = Style::new().fg(Color::Red);
        for candidate in &group.candidates {
            let path = candidate.path.as_path();
            if deleted.contains(path) {
                let label = if dry_run { "Would delete:" } else { "Deleted:" };
                writeln!(w, "{} {}", self.styled(label, red), path.display())?;
            } else if let Some(error) = failed.get(path) {
                writeln!(
                    w,
                    "{} {} ({})",
                    self.styled("Failed:", red.bold()),
                    path.display(),
                    error.message
                )?;
            } else {
                writeln!(w, "Skipped: {}", path.display())?;
            }
        }
        self.write_separator(w)
    }

    fn write_report_summary<W: Write>(&self, w: &mut W, report: &DeletionReport) -> io::Result<()> {
        let verb = if report.dry_run {
            "Would delete"
        } else {
            "Deleted"
        };
        let reclaimed = ByteSize(report.bytes_reclaimed).to_string();
        write!(
            w,
            "{} {} of {} duplicate file(s) in {} group(s), {} reclaimed",
            verb,
            report.deleted_count(),
            report.duplicates_found,
            report.groups_examined,
            self.styled(reclaimed, Style::new().fg(Color::Green).bold())
        )?;
        if report.interrupted {
            write!(w, " {}", self.styled("(interrupted)", Style::new().fg(Color::Yellow)))?;
        }
        writeln!(w)
    }
}
