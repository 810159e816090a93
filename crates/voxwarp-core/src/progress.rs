//! Progress tracking and callbacks for resampling runs.
//!
//! The resample filter reports after every completed k-slice and polls for
//! cancellation before starting the next one.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

/// Progress information for a resampling run.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressInfo {
    /// Number of output k-slices written so far.
    pub completed_slices: usize,
    /// Total number of output k-slices.
    pub total_slices: usize,
    /// Time elapsed since start.
    pub elapsed: Duration,
    /// Estimated remaining time.
    pub estimated_remaining: Option<Duration>,
}

impl ProgressInfo {
    /// Create new progress information.
    pub fn new(completed_slices: usize, total_slices: usize, elapsed: Duration) -> Self {
        Self {
            completed_slices,
            total_slices,
            elapsed,
            estimated_remaining: None,
        }
    }

    /// Calculate progress percentage.
    pub fn progress_percent(&self) -> f64 {
        if self.total_slices == 0 {
            return 100.0;
        }
        (self.completed_slices as f64 / self.total_slices as f64) * 100.0
    }

    /// Calculate estimated remaining time.
    pub fn calculate_remaining(&mut self) {
        if self.completed_slices > 0 {
            let per_slice = self.elapsed.as_secs_f64() / self.completed_slices as f64;
            let remaining = self.total_slices.saturating_sub(self.completed_slices);
            self.estimated_remaining = Some(Duration::from_secs_f64(per_slice * remaining as f64));
        }
    }
}

/// Progress callback trait for monitoring resampling.
///
/// With a parallel filter, `on_progress` is called from worker threads and
/// slices may complete out of order; `completed_slices` still increases by
/// one per call.
pub trait ProgressCallback: Send + Sync {
    /// Called after each completed k-slice.
    fn on_progress(&self, info: &ProgressInfo);

    /// Called once before the first slice.
    fn on_start(&self, _total_slices: usize) {}

    /// Called when the run completes successfully.
    fn on_complete(&self, _info: &ProgressInfo) {}

    /// Polled before each k-slice. Returning `true` stops the run.
    fn should_cancel(&self) -> bool {
        false
    }
}

/// Progress callback that logs to tracing.
#[derive(Debug, Clone)]
pub struct LoggingProgressCallback {
    log_interval: usize,
}

impl Default for LoggingProgressCallback {
    fn default() -> Self {
        Self { log_interval: 16 }
    }
}

impl LoggingProgressCallback {
    /// Create a new logging callback. An interval of zero is treated as one.
    pub fn new(log_interval: usize) -> Self {
        Self {
            log_interval: log_interval.max(1),
        }
    }

    /// Number of slices between log lines (at least one).
    pub fn log_interval(&self) -> usize {
        self.log_interval
    }
}

impl ProgressCallback for LoggingProgressCallback {
    fn on_progress(&self, info: &ProgressInfo) {
        if info.completed_slices % self.log_interval == 0
            || info.completed_slices == info.total_slices
        {
            let remaining = info
                .estimated_remaining
                .map(|d| format!("{:.2}s", d.as_secs_f64()))
                .unwrap_or_else(|| "N/A".to_string());

            tracing::info!(
                "Slice {}/{} ({:.1}%) | Elapsed: {:.2}s | ETA: {}",
                info.completed_slices,
                info.total_slices,
                info.progress_percent(),
                info.elapsed.as_secs_f64(),
                remaining
            );
        }
    }

    fn on_start(&self, total_slices: usize) {
        tracing::info!("Resampling started ({} slices)", total_slices);
    }

    fn on_complete(&self, info: &ProgressInfo) {
        tracing::info!(
            "Resampling completed in {:.2}s",
            info.elapsed.as_secs_f64()
        );
    }
}

/// History callback that records all progress information.
#[derive(Debug, Clone, Default)]
pub struct HistoryCallback {
    history: Arc<Mutex<Vec<ProgressInfo>>>,
    started: Arc<Mutex<Option<usize>>>,
    completed: Arc<Mutex<Option<ProgressInfo>>>,
}

impl HistoryCallback {
    /// Create a new history callback.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the recorded history.
    pub fn get_history(&self) -> Vec<ProgressInfo> {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Total slice count reported by `on_start`, if the run started.
    pub fn started_with(&self) -> Option<usize> {
        *self.started.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Final information reported by `on_complete`, if the run completed.
    pub fn completion(&self) -> Option<ProgressInfo> {
        self.completed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Clear the history.
    pub fn clear(&self) {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        *self.started.lock().unwrap_or_else(PoisonError::into_inner) = None;
        *self.completed.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

impl ProgressCallback for HistoryCallback {
    fn on_progress(&self, info: &ProgressInfo) {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(info.clone());
    }

    fn on_start(&self, total_slices: usize) {
        *self.started.lock().unwrap_or_else(PoisonError::into_inner) = Some(total_slices);
    }

    fn on_complete(&self, info: &ProgressInfo) {
        *self.completed.lock().unwrap_or_else(PoisonError::into_inner) = Some(info.clone());
    }
}

/// Progress tracker shared by the workers of one run.
///
/// Counts completed slices and forwards to an optional callback.
pub struct ProgressTracker {
    callback: Option<Arc<dyn ProgressCallback>>,
    total_slices: usize,
    completed: AtomicUsize,
    start_time: Instant,
}

impl ProgressTracker {
    /// Start tracking a run of `total_slices` slices.
    pub fn start(callback: Option<Arc<dyn ProgressCallback>>, total_slices: usize) -> Self {
        if let Some(callback) = &callback {
            callback.on_start(total_slices);
        }
        Self {
            callback,
            total_slices,
            completed: AtomicUsize::new(0),
            start_time: Instant::now(),
        }
    }

    /// Number of slices reported done so far.
    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }

    /// Total number of slices in the run.
    pub fn total(&self) -> usize {
        self.total_slices
    }

    /// Ask the callback whether to stop.
    pub fn should_cancel(&self) -> bool {
        self.callback
            .as_ref()
            .is_some_and(|callback| callback.should_cancel())
    }

    /// Record one finished slice.
    pub fn slice_done(&self) {
        let completed = self.completed.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(callback) = &self.callback {
            let mut info = ProgressInfo::new(completed, self.total_slices, self.start_time.elapsed());
            info.calculate_remaining();
            callback.on_progress(&info);
        }
    }

    /// Report completion.
    pub fn complete(&self) {
        if let Some(callback) = &self.callback {
            let info = ProgressInfo::new(self.completed(), self.total_slices, self.start_time.elapsed());
            callback.on_complete(&info);
        }
    }
}
