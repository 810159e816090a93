//! Terminal progress bar for resampling runs.

use indicatif::{ProgressBar, ProgressStyle};
use voxwarp_core::progress::{ProgressCallback, ProgressInfo};

/// Progress callback that draws an indicatif bar on stderr, one tick per
/// output k-slice.
#[derive(Debug, Clone)]
pub struct SliceProgressBar {
    bar: ProgressBar,
}

impl SliceProgressBar {
    /// Create a hidden bar; its length is set when the run starts.
    pub fn new() -> anyhow::Result<Self> {
        let bar = ProgressBar::new(0);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} slices ({eta})")?
                .progress_chars("#>-"),
        );
        Ok(Self { bar })
    }
}

impl ProgressCallback for SliceProgressBar {
    fn on_start(&self, total_slices: usize) {
        self.bar.set_length(total_slices as u64);
        self.bar.set_position(0);
    }

    fn on_progress(&self, info: &ProgressInfo) {
        self.bar.set_position(info.completed_slices as u64);
    }

    fn on_complete(&self, _info: &ProgressInfo) {
        self.bar.finish_with_message("Resampling complete");
    }
}
