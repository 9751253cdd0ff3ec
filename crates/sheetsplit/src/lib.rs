//! `sheetsplit` v1:
//! Split one spreadsheet into numbered workbooks of at most N data rows.
//!
//! Modules:
//! - `conf`    : session defaults and fixed log texts
//! - `spec`    : options, file info, job state and errors
//! - `analyze` : input analysis and split preview
//! - `event`   : worker-to-session events and sinks
//! - `report`  : split summary
//! - `split`   : the split orchestrator
//! - `session` : interactive state with a background worker
//! - `shell`   : terminal front end
pub mod analyze;
pub mod conf;
pub mod event;
pub mod report;
pub mod session;
pub mod shell;
pub mod spec;
pub mod split;

pub use analyze::{analyze_file, derive_split_preview};
pub use event::{EnumSplitEvent, SplitEventSink, calculate_progress_percent};
pub use report::{ReportSplit, SpecSplitFile};
pub use session::{SessionOutcome, SplitSession};
pub use shell::{EnumShellCommand, TerminalShell, parse_shell_command, render_progress_bar};
pub use spec::{
    EnumSplitErrorKind, SpecFileInfo, SpecSplitJob, SpecSplitOptions, SplitError,
    parse_rows_per_file,
};
pub use split::split_file;
