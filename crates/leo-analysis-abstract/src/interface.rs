use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Source of the random draws behind reservoir replacement decisions.
/// Implementations must be uniform for sampling to stay unbiased.
pub trait IndexSource {
    /// Return an integer drawn uniformly from `[0, upper)`.
    /// Callers never pass `upper == 0`.
    fn next_index(&mut self, upper: u64) -> u64;
}

impl<S: IndexSource + ?Sized> IndexSource for &mut S {
    fn next_index(&mut self, upper: u64) -> u64 {
        (**self).next_index(upper)
    }
}

/// Running totals handed to a [`ProgressObserver`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IngestProgress {
    /// Lines read from the vector file so far, definitions included.
    pub lines_read: u64,
    /// Valid data records folded into reservoirs.
    pub records_accepted: u64,
    /// Distinct series seen so far.
    pub series_seen: usize,
}

/// Side channel for monitoring long ingestion passes.
pub trait ProgressObserver {
    fn on_progress(&mut self, progress: &IngestProgress);
}

impl<F: FnMut(&IngestProgress)> ProgressObserver for F {
    fn on_progress(&mut self, progress: &IngestProgress) {
        self(progress)
    }
}

/// Observer that ignores every report.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressObserver for NoProgress {
    fn on_progress(&mut self, _progress: &IngestProgress) {}
}

/// Cloneable flag used to end an ingestion pass at the next line boundary.
#[derive(Debug, Clone, Default)]
pub struct StopHandle {
    flag: Arc<AtomicBool>,
}

impl StopHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self) {
        self.flag.store(true, Ordering::Release);
    }

    pub fn is_stopped(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }
}
