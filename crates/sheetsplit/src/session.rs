//! Interactive session state behind the shell.
//!
//! The session owns everything the foreground thread renders: selections,
//! the status log, the progress value and the split trigger. A split runs on
//! one background worker that only talks back through an event channel; the
//! trigger stays disabled until that worker reports a terminal event or
//! disappears.

use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, RecvError, TryRecvError};
use std::thread::{self, JoinHandle};

use sheetsplit_io_fs::{derive_parent_directory, open_folder};

use crate::analyze::{
    analyze_file, derive_split_preview, format_file_info_lines, format_preview_line,
};
use crate::conf::{C_RECALCULATE_MARKER, C_ROWS_PER_FILE_DEFAULT, L_WELCOME_LINES};
use crate::event::{EnumSplitEvent, SplitEventSink};
use crate::report::ReportSplit;
use crate::spec::{SpecFileInfo, SpecSplitOptions, SplitError, parse_rows_per_file};
use crate::split::split_file;

/// Result of a finished split, shown to the user as a modal summary.
#[derive(Debug, Clone)]
pub enum SessionOutcome {
    /// All chunk files were written.
    Completed(ReportSplit),
    /// The split stopped with an error.
    Failed(SplitError),
}

impl SessionOutcome {
    /// Text of the final alert.
    pub fn alert_text(&self) -> String {
        match self {
            Self::Completed(report) => format!(
                "File split complete!\nGenerated {} files",
                report.file_count()
            ),
            Self::Failed(err) => format!("Split failed: {err}"),
        }
    }
}

struct SplitWorker {
    handle: JoinHandle<()>,
    rx: Receiver<EnumSplitEvent>,
}

/// Foreground state of one interactive session.
pub struct SplitSession {
    path_file_input: Option<PathBuf>,
    path_dir_output: Option<PathBuf>,
    rows_per_file_text: String,
    file_info: Option<SpecFileInfo>,
    l_status_log: Vec<String>,
    n_progress_percent: f64,
    if_split_enabled: bool,
    split_options: SpecSplitOptions,
    worker: Option<SplitWorker>,
}

impl Default for SplitSession {
    fn default() -> Self {
        Self::new(SpecSplitOptions::default())
    }
}

impl SplitSession {
    /// New session seeded with the welcome lines.
    pub fn new(split_options: SpecSplitOptions) -> Self {
        let mut session = Self {
            path_file_input: None,
            path_dir_output: None,
            rows_per_file_text: C_ROWS_PER_FILE_DEFAULT.to_string(),
            file_info: None,
            l_status_log: Vec::new(),
            n_progress_percent: 0.0,
            if_split_enabled: true,
            split_options,
            worker: None,
        };
        for c_line in L_WELCOME_LINES {
            session.add_info(c_line);
        }
        session
    }

    ////////////////////////////////////////////////////////////////////////////
    // #region Accessors

    /// Selected input file.
    pub fn input_file(&self) -> Option<&Path> {
        self.path_file_input.as_deref()
    }

    /// Selected output directory.
    pub fn output_dir(&self) -> Option<&Path> {
        self.path_dir_output.as_deref()
    }

    /// Current rows-per-file text.
    pub fn rows_per_file_text(&self) -> &str {
        &self.rows_per_file_text
    }

    /// Analysis of the selected input file, if it succeeded.
    pub fn file_info(&self) -> Option<&SpecFileInfo> {
        self.file_info.as_ref()
    }

    /// Append-only status log.
    pub fn status_log(&self) -> &[String] {
        &self.l_status_log
    }

    /// Progress of the running split in `[0, 100]`.
    pub fn progress_percent(&self) -> f64 {
        self.n_progress_percent
    }

    /// Whether the split trigger is enabled.
    pub fn is_split_enabled(&self) -> bool {
        self.if_split_enabled
    }

    /// Whether a split worker is in flight.
    pub fn is_running(&self) -> bool {
        self.worker.is_some()
    }

    // #endregion
    ////////////////////////////////////////////////////////////////////////////
    // #region Actions

    /// Select the input file, pre-fill the output directory and analyze it.
    pub fn select_input_file(&mut self, path: PathBuf) {
        self.file_info = None;
        if self.path_dir_output.is_none() {
            self.path_dir_output = derive_parent_directory(&path);
        }
        self.path_file_input = Some(path.clone());
        self.analyze_input_file(&path);
    }

    /// Select the output directory.
    pub fn select_output_dir(&mut self, path: PathBuf) {
        self.path_dir_output = Some(path);
    }

    /// Replace the rows-per-file text and refresh the preview.
    pub fn set_rows_per_file_text(&mut self, text: &str) {
        self.rows_per_file_text = text.to_string();
        if self.file_info.is_some() {
            self.add_info(C_RECALCULATE_MARKER);
            self.update_split_info();
        }
    }

    /// Empty the status log.
    pub fn clear_log(&mut self) {
        self.l_status_log.clear();
    }

    /// Open the output directory in the OS file browser.
    pub fn open_output_folder(&self) -> Result<(), SplitError> {
        let Some(path_dir) = self.path_dir_output.as_deref() else {
            return Err(SplitError::InvalidInput(
                "Please select an output directory.".to_string(),
            ));
        };
        open_folder(path_dir).map_err(|e| SplitError::from_fs_open_error(path_dir, e))
    }

    /// Validate the selections and start the split on a background worker.
    ///
    /// The trigger is disabled until [`Self::poll`] or [`Self::wait`] sees
    /// the worker finish.
    pub fn start_split(&mut self) -> Result<(), SplitError> {
        if self.worker.is_some() || !self.if_split_enabled {
            return Err(SplitError::InvalidInput(
                "A split is already running.".to_string(),
            ));
        }
        let (path_file_input, path_dir_output, n_rows_per_file) = self.validate_split_request()?;

        let (tx, rx) = mpsc::channel();
        let split_options = self.split_options.clone();
        let path_dir_output_worker = path_dir_output.clone();
        let handle = thread::Builder::new()
            .name("sheetsplit-worker".to_string())
            .spawn(move || {
                let mut tx = tx;
                let event = match split_file(
                    &path_file_input,
                    &path_dir_output_worker,
                    n_rows_per_file,
                    &split_options,
                    &mut tx,
                ) {
                    Ok(report) => EnumSplitEvent::Finished(report),
                    Err(err) => EnumSplitEvent::Failed(err),
                };
                tx.emit(event);
            })
            .map_err(|e| SplitError::Write {
                path: path_dir_output,
                message: format!("Failed to start split worker: {e}"),
            })?;

        self.if_split_enabled = false;
        self.n_progress_percent = 0.0;
        self.worker = Some(SplitWorker { handle, rx });
        Ok(())
    }

    /// Apply every pending worker event without blocking.
    ///
    /// Returns the outcome once the worker has finished.
    pub fn poll(&mut self) -> Option<SessionOutcome> {
        loop {
            let event = match self.worker.as_ref()?.rx.try_recv() {
                Ok(event) => event,
                Err(TryRecvError::Empty) => return None,
                Err(TryRecvError::Disconnected) => return Some(self.finish_vanished_worker()),
            };
            if let Some(outcome) = self.apply_event(event) {
                return Some(outcome);
            }
        }
    }

    /// Block until the in-flight split finishes. `None` when idle.
    pub fn wait(&mut self) -> Option<SessionOutcome> {
        loop {
            let event = match self.worker.as_ref()?.rx.recv() {
                Ok(event) => event,
                Err(RecvError) => return Some(self.finish_vanished_worker()),
            };
            if let Some(outcome) = self.apply_event(event) {
                return Some(outcome);
            }
        }
    }

    // #endregion
    ////////////////////////////////////////////////////////////////////////////
    // #region Internals

    fn add_info(&mut self, message: &str) {
        tracing::debug!(target: "sheetsplit::status", "{message}");
        self.l_status_log.push(message.to_string());
    }

    fn analyze_input_file(&mut self, path: &Path) {
        match analyze_file(path) {
            Ok(info) => {
                for c_line in format_file_info_lines(&info) {
                    self.add_info(&c_line);
                }
                self.file_info = Some(info);
                self.update_split_info();
            }
            Err(err) => {
                self.add_info(&format!("File analysis failed: {err}"));
                if let Some(c_hint) = err.hint() {
                    self.add_info(c_hint);
                }
            }
        }
    }

    fn update_split_info(&mut self) {
        let Some(info) = self.file_info.as_ref() else {
            return;
        };
        let Ok(n_rows_per_file) = parse_rows_per_file(&self.rows_per_file_text) else {
            return;
        };
        let n_files = derive_split_preview(info, n_rows_per_file);
        let c_line = format_preview_line(n_rows_per_file, n_files);
        self.add_info(&c_line);
    }

    fn validate_split_request(&self) -> Result<(PathBuf, PathBuf, usize), SplitError> {
        let Some(path_file_input) = self.path_file_input.clone() else {
            return Err(SplitError::InvalidInput(
                "Please select a spreadsheet file to split.".to_string(),
            ));
        };
        let Some(path_dir_output) = self.path_dir_output.clone() else {
            return Err(SplitError::InvalidInput(
                "Please select an output directory.".to_string(),
            ));
        };
        let n_rows_per_file = parse_rows_per_file(&self.rows_per_file_text)?;
        Ok((path_file_input, path_dir_output, n_rows_per_file))
    }

    fn apply_event(&mut self, event: EnumSplitEvent) -> Option<SessionOutcome> {
        match event {
            EnumSplitEvent::Progress { percent, .. } => {
                self.n_progress_percent = percent;
                None
            }
            EnumSplitEvent::Status(c_line) => {
                self.add_info(&c_line);
                None
            }
            EnumSplitEvent::Finished(report) => {
                self.finish_worker();
                Some(SessionOutcome::Completed(report))
            }
            EnumSplitEvent::Failed(err) => {
                self.add_info(&format!("Split failed: {err}"));
                if let Some(c_hint) = err.hint() {
                    self.add_info(c_hint);
                }
                self.finish_worker();
                Some(SessionOutcome::Failed(err))
            }
        }
    }

    fn finish_vanished_worker(&mut self) -> SessionOutcome {
        let err = SplitError::Write {
            path: self.path_dir_output.clone().unwrap_or_default(),
            message: "Split worker stopped unexpectedly.".to_string(),
        };
        self.add_info(&format!("Split failed: {err}"));
        self.finish_worker();
        SessionOutcome::Failed(err)
    }

    fn finish_worker(&mut self) {
        if let Some(worker) = self.worker.take()
            && worker.handle.join().is_err()
        {
            tracing::warn!("split worker panicked");
        }
        self.if_split_enabled = true;
        self.n_progress_percent = 0.0;
    }

    // #endregion
    ////////////////////////////////////////////////////////////////////////////
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::EnumSplitErrorKind;

    #[test]
    fn new_session_shows_welcome_and_default_rows() {
        let session = SplitSession::default();
        assert_eq!(session.status_log().len(), L_WELCOME_LINES.len());
        assert_eq!(session.rows_per_file_text(), "50");
        assert!(session.is_split_enabled());
        assert!(!session.is_running());
    }

    #[test]
    fn start_split_requires_input_output_and_rows() {
        let mut session = SplitSession::default();
        let err = session.start_split().expect_err("no input");
        assert_eq!(err.kind(), EnumSplitErrorKind::InvalidInput);

        session.path_file_input = Some(PathBuf::from("/data/in.xlsx"));
        let err = session.start_split().expect_err("no output");
        assert!(err.to_string().contains("output directory"));

        session.select_output_dir(PathBuf::from("/data/out"));
        session.set_rows_per_file_text("zero");
        let err = session.start_split().expect_err("bad rows");
        assert_eq!(err.kind(), EnumSplitErrorKind::InvalidInput);
        assert!(session.is_split_enabled());
        assert!(!session.is_running());
    }

    #[test]
    fn select_missing_file_logs_failure_and_prefills_output() {
        let mut session = SplitSession::default();
        session.select_input_file(PathBuf::from("/nonexistent/in.xls"));
        assert_eq!(session.output_dir(), Some(Path::new("/nonexistent")));
        assert!(session.file_info().is_none());
        let l_log = session.status_log();
        assert!(l_log.iter().any(|line| line.starts_with("File analysis failed")));
        assert!(l_log.last().is_some_and(|line| line.starts_with("Hint:")));
    }

    #[test]
    fn rows_change_without_file_info_logs_nothing() {
        let mut session = SplitSession::default();
        let n_before = session.status_log().len();
        session.set_rows_per_file_text("10");
        assert_eq!(session.status_log().len(), n_before);
        session.clear_log();
        assert!(session.status_log().is_empty());
    }

    #[test]
    fn poll_and_wait_are_idle_without_worker() {
        let mut session = SplitSession::default();
        assert!(session.poll().is_none());
        assert!(session.wait().is_none());
    }

    #[test]
    fn open_output_folder_requires_selection() {
        let session = SplitSession::default();
        let err = session.open_output_folder().expect_err("none");
        assert_eq!(err.kind(), EnumSplitErrorKind::InvalidInput);
    }
}
