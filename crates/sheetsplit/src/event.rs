//! Progress/status events flowing from the split worker to the shell.

use std::sync::mpsc::Sender;

use crate::report::ReportSplit;
use crate::spec::SplitError;

/// One update emitted during a split, in chunk order.
#[derive(Debug, Clone)]
pub enum EnumSplitEvent {
    /// A chunk file was written.
    Progress {
        /// Files written so far.
        n_files_done: usize,
        /// Planned file count.
        n_files_total: usize,
        /// Completion in `[0, 100]`.
        percent: f64,
    },
    /// Status line for the log.
    Status(String),
    /// Split finished; terminal event.
    Finished(ReportSplit),
    /// Split failed; terminal event.
    Failed(SplitError),
}

impl EnumSplitEvent {
    /// Whether no further events follow.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Finished(_) | Self::Failed(_))
    }
}

/// Consumer of split events.
pub trait SplitEventSink {
    /// Deliver one event.
    fn emit(&mut self, event: EnumSplitEvent);
}

impl SplitEventSink for Vec<EnumSplitEvent> {
    fn emit(&mut self, event: EnumSplitEvent) {
        self.push(event);
    }
}

impl SplitEventSink for Sender<EnumSplitEvent> {
    fn emit(&mut self, event: EnumSplitEvent) {
        if self.send(event).is_err() {
            tracing::debug!("split event dropped: receiver closed");
        }
    }
}

/// Completion percentage after `n_done` of `n_total` files.
pub fn calculate_progress_percent(n_done: usize, n_total: usize) -> f64 {
    if n_total == 0 {
        return 100.0;
    }
    (n_done as f64 / n_total as f64) * 100.0
}
