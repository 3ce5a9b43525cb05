use leo_analysis_abstract::{IngestProgress, ProgressObserver, StopHandle};

/// Progress reporting and stop checks shared by every line of a vector pass,
/// header included.
pub(crate) struct Pace<'a, O: ?Sized> {
    interval: u64,
    observer: &'a mut O,
    stop: &'a StopHandle,
}

impl<'a, O: ProgressObserver + ?Sized> Pace<'a, O> {
    pub(crate) fn new(interval: u64, observer: &'a mut O, stop: &'a StopHandle) -> Self {
        Self {
            interval,
            observer,
            stop,
        }
    }

    /// Checked before each line is read.
    pub(crate) fn stop_requested(&self) -> bool {
        self.stop.is_stopped()
    }

    /// Called once per physical line after it has been handled.
    pub(crate) fn line_done(&mut self, progress: IngestProgress) {
        if self.interval > 0 && progress.lines_read % self.interval == 0 {
            self.observer.on_progress(&progress);
        }
    }
}
