//! Multi-file progress tracking with automatic batching for large sets

use crate::io::configuration::MAX_INDIVIDUAL_PROGRESS_BARS;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::path::Path;
use std::sync::LazyLock;

/// Coordinates progress display for batch conversions
///
/// Small batches get one bar per file. Larger batches add an overall bar and
/// recycle a fixed number of per-file bars.
pub struct ProgressManager {
    multi_progress: MultiProgress,
    batch_bar: Option<ProgressBar>,
    file_bars: Vec<ProgressBar>,
    file_count: usize,
}

impl Default for ProgressManager {
    fn default() -> Self {
        Self::new()
    }
}

static ROW_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template("{prefix} [{bar:30.cyan/blue}] {pos}/{len} rows")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏ ")
});

static BATCH_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template("[{elapsed_precise}] Files: [{bar:40.cyan/blue}] {pos}/{len}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
});

impl ProgressManager {
    /// Create a new progress manager
    pub fn new() -> Self {
        Self {
            multi_progress: MultiProgress::new(),
            batch_bar: None,
            file_bars: Vec::new(),
            file_count: 0,
        }
    }

    /// Number of files announced by [`Self::initialize`]
    pub const fn file_count(&self) -> usize {
        self.file_count
    }

    /// Create bars for a batch of `file_count` files
    pub fn initialize(&mut self, file_count: usize) {
        self.file_count = file_count;

        // Switch to batch mode for large file sets to avoid terminal spam
        if file_count > MAX_INDIVIDUAL_PROGRESS_BARS + 1 {
            let batch_bar = ProgressBar::new(file_count as u64);
            batch_bar.set_style(BATCH_STYLE.clone());
            self.batch_bar = Some(self.multi_progress.add(batch_bar));
        }

        for _ in 0..file_count.min(MAX_INDIVIDUAL_PROGRESS_BARS) {
            let pb = ProgressBar::new(0);
            pb.set_style(ROW_STYLE.clone());
            self.file_bars.push(self.multi_progress.add(pb));
        }
    }

    /// Reset a bar for file `index` and hand it out for per-row updates
    ///
    /// The returned bar is cheap to clone and safe to advance from worker threads.
    pub fn start_file(&self, index: usize, path: &Path, rows: u32) -> Option<ProgressBar> {
        let slot = index.checked_rem(self.file_bars.len())?;
        let bar = self.file_bars.get(slot)?;

        let display_name = path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();
        bar.reset();
        bar.set_length(u64::from(rows));
        bar.set_prefix(display_name);
        Some(bar.clone())
    }

    /// Mark file `index` as completed and update batch progress
    pub fn complete_file(&self, index: usize) {
        if let Some(ref batch_bar) = self.batch_bar {
            batch_bar.inc(1);
        }

        let slot = index.checked_rem(self.file_bars.len());
        if let Some(bar) = slot.and_then(|slot| self.file_bars.get(slot)) {
            bar.set_prefix(format!("✓ {}", bar.prefix()));
            if let Some(length) = bar.length() {
                bar.set_position(length);
            }
        }
    }

    /// Clean up all progress displays
    pub fn finish(&self) {
        if let Some(ref batch_bar) = self.batch_bar {
            batch_bar.finish_with_message("All files processed");
        }
        let _ = self.multi_progress.clear();
    }
}
