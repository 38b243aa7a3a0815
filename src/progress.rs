//! Terminal progress bars using indicatif.
//!
//! [`Progress`] implements both [`ProgressCallback`] (walking and
//! fingerprinting) and [`DeleteProgressCallback`] (deleting), so one
//! reporter covers a whole `dedupe` run. Bars are drawn on stderr and
//! cleared when a phase ends.

use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

use crate::actions::{DeleteProgressCallback, DeletionReport};

/// Progress callback for the scanning phases.
///
/// Phases are reported by name: `"walking"` (total unknown, reported as 0)
/// and `"fingerprinting"`.
pub trait ProgressCallback: Send + Sync {
    /// Called when a phase starts.
    fn on_phase_start(&self, phase: &str, total: usize);

    /// Called for each item processed.
    ///
    /// `current` is 1-based. During fingerprinting items complete out of
    /// order, so `path` is the last finished file, not the `current`-th one.
    fn on_progress(&self, current: usize, path: &str);

    /// Called when an item has been processed, with its size in bytes.
    fn on_item_completed(&self, _bytes: u64) {}

    /// Called when a phase completes.
    fn on_phase_end(&self, phase: &str);

    /// Called to replace the progress message.
    fn on_message(&self, _message: &str) {}
}

/// Progress reporter using indicatif.
pub struct Progress {
    multi: MultiProgress,
    walking: Mutex<Option<ProgressBar>>,
    fingerprinting: Mutex<Option<ProgressBar>>,
    deleting: Mutex<Option<ProgressBar>>,
    quiet: bool,
}

impl Progress {
    /// Create a new progress reporter. A quiet reporter draws nothing.
    ///
    /// ```
    /// use dupsweep::progress::Progress;
    ///
    /// let progress = Progress::new(false);
    /// ```
    #[must_use]
    pub fn new(quiet: bool) -> Self {
        Self {
            multi: MultiProgress::new(),
            walking: Mutex::new(None),
            fingerprinting: Mutex::new(None),
            deleting: Mutex::new(None),
            quiet,
        }
    }

    fn walking_style() -> ProgressStyle {
        ProgressStyle::with_template("{spinner:.green} {msg} [{elapsed_precise}] {pos} files")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
    }

    fn fingerprint_style() -> ProgressStyle {
        ProgressStyle::with_template(
            "[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg} (ETA: {eta})",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█>-")
    }

    fn delete_style() -> ProgressStyle {
        ProgressStyle::with_template("[{elapsed_precise}] [{bar:40.red/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█>-")
    }

    fn slot(&self, phase: &str) -> Option<&Mutex<Option<ProgressBar>>> {
        match phase {
            "walking" => Some(&self.walking),
            "fingerprinting" => Some(&self.fingerprinting),
            "deleting" => Some(&self.deleting),
            _ => None,
        }
    }

    /// The bar of the most advanced phase still running.
    fn active_bar(&self) -> Option<ProgressBar> {
        [&self.deleting, &self.fingerprinting, &self.walking]
            .into_iter()
            .find_map(|slot| slot.lock().ok().and_then(|bar| bar.clone()))
    }

    fn start_bar(&self, phase: &str, bar: ProgressBar) {
        let bar = self.multi.add(bar);
        if let Some(slot) = self.slot(phase) {
            if let Ok(mut guard) = slot.lock() {
                if let Some(old) = guard.replace(bar) {
                    old.finish_and_clear();
                }
            }
        }
    }

    fn finish_bar(&self, phase: &str) {
        if let Some(slot) = self.slot(phase) {
            if let Some(bar) = slot.lock().ok().and_then(|mut guard| guard.take()) {
                bar.finish_and_clear();
            }
        }
    }
}

impl ProgressCallback for Progress {
    fn on_phase_start(&self, phase: &str, total: usize) {
        if self.quiet {
            return;
        }

        match phase {
            "walking" => {
                let pb = ProgressBar::new_spinner();
                pb.set_style(Self::walking_style());
                pb.set_message("Walking directory");
                pb.enable_steady_tick(Duration::from_millis(100));
                self.start_bar(phase, pb);
            }
            "fingerprinting" => {
                let pb = ProgressBar::new(total as u64);
                pb.set_style(Self::fingerprint_style());
                pb.set_message("Fingerprinting");
                self.start_bar(phase, pb);
            }
            _ => log::trace!("Unknown progress phase: {}", phase),
        }
    }

    fn on_progress(&self, current: usize, path: &str) {
        if self.quiet {
            return;
        }
        if let Some(pb) = self.active_bar() {
            pb.set_position(current as u64);
            pb.set_message(truncate_path(path, 30));
        }
    }

    fn on_phase_end(&self, phase: &str) {
        if !self.quiet {
            self.finish_bar(phase);
        }
    }

    fn on_message(&self, message: &str) {
        if self.quiet {
            return;
        }
        if let Some(pb) = self.active_bar() {
            pb.set_message(message.to_string());
        }
    }
}

impl DeleteProgressCallback for Progress {
    fn on_before_delete(&self, path: &Path, index: usize, total: usize) {
        if self.quiet {
            return;
        }
        if index == 0 {
            let pb = ProgressBar::new(total as u64);
            pb.set_style(Self::delete_style());
            self.start_bar("deleting", pb);
        }
        if let Some(pb) = self.active_bar() {
            pb.set_position(index as u64);
            pb.set_message(truncate_path(&path.to_string_lossy(), 30));
        }
    }

    fn on_delete_success(&self, _path: &Path, _size: u64) {
        if let Some(pb) = self.active_bar() {
            pb.inc(1);
        }
    }

    fn on_delete_failure(&self, path: &Path, error: &str) {
        log::debug!("Delete failed for {}: {}", path.display(), error);
        if let Some(pb) = self.active_bar() {
            pb.inc(1);
        }
    }

    fn on_complete(&self, _report: &DeletionReport) {
        self.finish_bar("deleting");
    }
}

/// Shorten a path to its file name when it does not fit in `max_len`.
fn truncate_path(path: &str, max_len: usize) -> String {
    if path.chars().count() <= max_len {
        return path.to_string();
    }

    let file_name = Path::new(path)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let name_len = file_name.chars().count();
    if name_len + 4 > max_len {
        let tail: String = file_name
            .chars()
            .skip(name_len.saturating_sub(max_len.saturating_sub(3)))
            .collect();
        return format!("...{}", tail);
    }

    format!(".../{}", file_name)
}
