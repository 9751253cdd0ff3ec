//! Line-oriented terminal shell over [`SplitSession`].

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use sheetsplit_io_fs::{SpecFileFilter, derive_default_file_filters, list_picker_entries};

use crate::conf::N_WIDTH_PROGRESS_BAR;
use crate::session::{SessionOutcome, SplitSession};

const C_HELP: &str = "\
Commands:
  open <file>      select the spreadsheet to split
  ls [dir]         list folders and files matching the active filter
  filter excel|all switch the file filter
  rows <n>         rows per output file
  out <dir>        output directory (created if missing)
  split            start splitting
  status           show current selections
  clear            clear the status log
  folder           open the output directory
  help             show this help
  quit | exit      leave";

/// One parsed shell command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnumShellCommand {
    /// Select input file.
    Open(PathBuf),
    /// List a directory through the active filter.
    List(Option<PathBuf>),
    /// Switch filter by index into the filter list.
    Filter(usize),
    /// Set rows-per-file text.
    Rows(String),
    /// Select output directory.
    Out(PathBuf),
    /// Start the split.
    Split,
    /// Print selections.
    Status,
    /// Clear the status log.
    Clear,
    /// Open the output directory.
    Folder,
    /// Print help.
    Help,
    /// Leave the shell.
    Quit,
    /// Blank line.
    Empty,
}

/// Parse one input line.
pub fn parse_shell_command(line: &str) -> Result<EnumShellCommand, String> {
    let c_line = line.trim();
    let (c_head, c_rest) = match c_line.split_once(char::is_whitespace) {
        Some((c_head, c_rest)) => (c_head, c_rest.trim()),
        None => (c_line, ""),
    };

    let require_arg = |c_name: &str| -> Result<String, String> {
        if c_rest.is_empty() {
            Err(format!("`{c_name}` needs an argument. Type `help` for usage."))
        } else {
            Ok(c_rest.to_string())
        }
    };

    match c_head.to_ascii_lowercase().as_str() {
        "" => Ok(EnumShellCommand::Empty),
        "open" => Ok(EnumShellCommand::Open(PathBuf::from(require_arg("open")?))),
        "ls" => Ok(EnumShellCommand::List(
            (!c_rest.is_empty()).then(|| PathBuf::from(c_rest)),
        )),
        "filter" => match c_rest.to_ascii_lowercase().as_str() {
            "excel" => Ok(EnumShellCommand::Filter(0)),
            "all" => Ok(EnumShellCommand::Filter(1)),
            _ => Err("`filter` expects `excel` or `all`.".to_string()),
        },
        "rows" => Ok(EnumShellCommand::Rows(require_arg("rows")?)),
        "out" => Ok(EnumShellCommand::Out(PathBuf::from(require_arg("out")?))),
        "split" => Ok(EnumShellCommand::Split),
        "status" => Ok(EnumShellCommand::Status),
        "clear" => Ok(EnumShellCommand::Clear),
        "folder" => Ok(EnumShellCommand::Folder),
        "help" | "?" => Ok(EnumShellCommand::Help),
        "quit" | "exit" => Ok(EnumShellCommand::Quit),
        other => Err(format!("Unknown command `{other}`. Type `help` for usage.")),
    }
}

/// Text progress bar, e.g. `[##########----------]  50%`.
pub fn render_progress_bar(percent: f64, n_width: usize) -> String {
    let n_percent = percent.clamp(0.0, 100.0);
    let n_filled = ((n_percent / 100.0) * n_width as f64).round() as usize;
    format!(
        "[{}{}] {:>3.0}%",
        "#".repeat(n_filled),
        "-".repeat(n_width.saturating_sub(n_filled)),
        n_percent
    )
}

/// Terminal front end: reads commands, renders the log and progress.
///
/// Commands keep being accepted while a split runs; worker events are
/// rendered between input lines.
pub struct TerminalShell<W: Write> {
    session: SplitSession,
    out: W,
    n_log_printed: usize,
    n_percent_shown: Option<f64>,
    l_filters: Vec<SpecFileFilter>,
    idx_filter: usize,
    poll_interval: Duration,
}

impl<W: Write> TerminalShell<W> {
    /// Wrap `session`, writing all output to `out`.
    pub fn new(session: SplitSession, out: W) -> Self {
        Self {
            session,
            out,
            n_log_printed: 0,
            n_percent_shown: None,
            l_filters: derive_default_file_filters(),
            idx_filter: 0,
            poll_interval: Duration::from_millis(50),
        }
    }

    /// Session driven by the shell.
    pub fn session(&self) -> &SplitSession {
        &self.session
    }

    /// Read commands from `input` until `quit` or end of input.
    ///
    /// Input is read on its own thread. A split still running when the
    /// shell stops is waited for and its outcome reported.
    pub fn run<R>(&mut self, input: R) -> io::Result<()>
    where
        R: BufRead + Send + 'static,
    {
        let rx_lines = spawn_line_reader(input)?;
        self.flush_log()?;
        self.prompt()?;
        loop {
            match rx_lines.recv_timeout(self.poll_interval) {
                Ok(line) => {
                    match parse_shell_command(&line?) {
                        Ok(EnumShellCommand::Quit) => break,
                        Ok(command) => self.execute(command)?,
                        Err(message) => writeln!(self.out, "{message}")?,
                    }
                    self.refresh()?;
                    self.prompt()?;
                }
                Err(RecvTimeoutError::Timeout) => {
                    if self.refresh()? {
                        self.prompt()?;
                    }
                }
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
        self.finish_running_split()
    }

    /// Execute one command.
    pub fn execute(&mut self, command: EnumShellCommand) -> io::Result<()> {
        match command {
            EnumShellCommand::Open(path) => self.session.select_input_file(path),
            EnumShellCommand::List(path_dir) => self.list_directory(path_dir)?,
            EnumShellCommand::Filter(idx_filter) => {
                self.idx_filter = idx_filter.min(self.l_filters.len().saturating_sub(1));
                writeln!(self.out, "Filter: {}", self.l_filters[self.idx_filter].label())?;
            }
            EnumShellCommand::Rows(text) => self.session.set_rows_per_file_text(&text),
            EnumShellCommand::Out(path) => self.session.select_output_dir(path),
            EnumShellCommand::Split => self.run_split()?,
            EnumShellCommand::Status => self.print_status()?,
            EnumShellCommand::Clear => {
                self.session.clear_log();
                self.n_log_printed = 0;
            }
            EnumShellCommand::Folder => {
                if let Err(err) = self.session.open_output_folder() {
                    self.alert("ERROR", &err.to_string())?;
                }
            }
            EnumShellCommand::Help => writeln!(self.out, "{C_HELP}")?,
            EnumShellCommand::Quit | EnumShellCommand::Empty => {}
        }
        Ok(())
    }

    fn run_split(&mut self) -> io::Result<()> {
        match self.session.start_split() {
            Ok(()) => {
                self.n_percent_shown = None;
                Ok(())
            }
            Err(err) => self.alert("ERROR", &err.to_string()),
        }
    }

    /// Apply pending worker events and render what changed.
    ///
    /// Returns whether anything was written.
    fn refresh(&mut self) -> io::Result<bool> {
        let outcome = self.session.poll();
        let mut if_written = self.flush_log()?;
        if self.session.is_running() {
            let n_percent = self.session.progress_percent();
            if self.n_percent_shown != Some(n_percent) {
                writeln!(self.out, "{}", render_progress_bar(n_percent, N_WIDTH_PROGRESS_BAR))?;
                self.n_percent_shown = Some(n_percent);
                if_written = true;
            }
        }
        if let Some(outcome) = outcome {
            self.report_outcome(&outcome)?;
            if_written = true;
        }
        self.out.flush()?;
        Ok(if_written)
    }

    fn finish_running_split(&mut self) -> io::Result<()> {
        if !self.session.is_running() {
            return Ok(());
        }
        writeln!(self.out, "Waiting for the running split to finish...")?;
        let outcome = self.session.wait();
        self.flush_log()?;
        if let Some(outcome) = outcome {
            self.report_outcome(&outcome)?;
        }
        self.out.flush()
    }

    fn report_outcome(&mut self, outcome: &SessionOutcome) -> io::Result<()> {
        self.n_percent_shown = None;
        match outcome {
            SessionOutcome::Completed(_) => {
                writeln!(self.out, "{}", render_progress_bar(100.0, N_WIDTH_PROGRESS_BAR))?;
                self.alert("DONE", &outcome.alert_text())
            }
            SessionOutcome::Failed(_) => self.alert("ERROR", &outcome.alert_text()),
        }
    }

    fn list_directory(&mut self, path_dir: Option<PathBuf>) -> io::Result<()> {
        let path_dir = path_dir
            .or_else(|| self.session.output_dir().map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from("."));
        let filter = &self.l_filters[self.idx_filter];
        match list_picker_entries(&path_dir, filter) {
            Ok((l_dirs, l_files)) => {
                writeln!(self.out, "{} [{}]", path_dir.display(), filter.label())?;
                for path in l_dirs {
                    writeln!(self.out, "  {}/", path.display())?;
                }
                for path in l_files {
                    writeln!(self.out, "  {}", path.display())?;
                }
                Ok(())
            }
            Err(err) => self.alert("ERROR", &err.to_string()),
        }
    }

    fn print_status(&mut self) -> io::Result<()> {
        let c_none = "<not selected>".to_string();
        let c_input = self
            .session
            .input_file()
            .map_or(c_none.clone(), |p| p.display().to_string());
        let c_output = self
            .session
            .output_dir()
            .map_or(c_none, |p| p.display().to_string());
        writeln!(self.out, "Input file:    {c_input}")?;
        writeln!(self.out, "Rows per file: {}", self.session.rows_per_file_text())?;
        writeln!(self.out, "Output dir:    {c_output}")?;
        writeln!(
            self.out,
            "Split:         {}",
            if self.session.is_split_enabled() { "ready" } else { "running" }
        )
    }

    fn alert(&mut self, title: &str, message: &str) -> io::Result<()> {
        writeln!(self.out, "[{title}] {}", message.replace('\n', &format!("\n[{title}] ")))
    }

    fn flush_log(&mut self) -> io::Result<bool> {
        let l_log = self.session.status_log();
        if self.n_log_printed > l_log.len() {
            self.n_log_printed = 0;
        }
        let if_new = self.n_log_printed < l_log.len();
        for c_line in &l_log[self.n_log_printed..] {
            writeln!(self.out, "{c_line}")?;
        }
        self.n_log_printed = l_log.len();
        self.out.flush()?;
        Ok(if_new)
    }

    fn prompt(&mut self) -> io::Result<()> {
        write!(self.out, "sheetsplit> ")?;
        self.out.flush()
    }
}

fn spawn_line_reader<R>(input: R) -> io::Result<Receiver<io::Result<String>>>
where
    R: BufRead + Send + 'static,
{
    let (tx, rx) = mpsc::channel();
    thread::Builder::new()
        .name("sheetsplit-input".to_string())
        .spawn(move || {
            for line in input.lines() {
                if tx.send(line).is_err() {
                    break;
                }
            }
        })?;
    Ok(rx)
}

#[cfg(test)]
mod tests {
    use std::path::Path;
    use std::time::{SystemTime, UNIX_EPOCH};

    use sheetsplit_io_xlsx::{
        EnumCellValue, SpecTable, derive_default_xlsx_write_options, write_table_file,
    };

    use super::*;

    struct TestDir {
        path: PathBuf,
    }

    impl TestDir {
        fn new(c_name: &str) -> Self {
            let n = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .expect("clock")
                .as_nanos();
            let path = std::env::temp_dir().join(format!("sheetsplit_shell_{c_name}_{n}"));
            std::fs::create_dir_all(&path).expect("create test dir");
            Self { path }
        }

        fn path(&self) -> &Path {
            &self.path
        }
    }

    impl Drop for TestDir {
        fn drop(&mut self) {
            let _ = std::fs::remove_dir_all(&self.path);
        }
    }

    #[test]
    fn parse_commands_with_arguments() {
        assert_eq!(
            parse_shell_command("open  /data/my file.xlsx ").expect("open"),
            EnumShellCommand::Open(PathBuf::from("/data/my file.xlsx"))
        );
        assert_eq!(
            parse_shell_command("ROWS 25").expect("rows"),
            EnumShellCommand::Rows("25".to_string())
        );
        assert_eq!(parse_shell_command("ls").expect("ls"), EnumShellCommand::List(None));
        assert_eq!(parse_shell_command("filter all").expect("filter"), EnumShellCommand::Filter(1));
        assert_eq!(parse_shell_command("   ").expect("empty"), EnumShellCommand::Empty);
        assert_eq!(parse_shell_command("exit").expect("quit"), EnumShellCommand::Quit);
    }

    #[test]
    fn parse_rejects_missing_arguments_and_unknown_commands() {
        assert!(parse_shell_command("open").is_err());
        assert!(parse_shell_command("out").is_err());
        assert!(parse_shell_command("filter csv").is_err());
        assert!(parse_shell_command("explode").is_err());
    }

    #[test]
    fn progress_bar_fills_proportionally() {
        assert_eq!(render_progress_bar(0.0, 10), "[----------]   0%");
        assert_eq!(render_progress_bar(50.0, 10), "[#####-----]  50%");
        assert_eq!(render_progress_bar(100.0, 10), "[##########] 100%");
        assert_eq!(render_progress_bar(150.0, 4), "[####] 100%");
    }

    #[test]
    fn shell_reports_invalid_split_and_keeps_running() {
        let mut l_out = Vec::new();
        {
            let mut shell = TerminalShell::new(SplitSession::default(), &mut l_out);
            shell
                .run("split\nrows 0\nstatus\nclear\nquit\nrows 5\n".as_bytes())
                .expect("run");
            assert_eq!(shell.session().rows_per_file_text(), "0");
            assert!(shell.session().is_split_enabled());
        }
        let c_out = String::from_utf8(l_out).expect("utf8");
        assert!(c_out.contains("Welcome to the spreadsheet splitter!"));
        assert!(c_out.contains("[ERROR] Please select a spreadsheet file to split."));
        assert!(c_out.contains("Rows per file: 0"));
    }

    #[test]
    fn shell_renders_split_outcome_from_background_worker() {
        let tmp = TestDir::new("split");
        let rows = (0..5)
            .map(|idx| vec![EnumCellValue::Integer(idx)])
            .collect();
        let table = SpecTable::new(vec!["id".to_string()], rows).expect("table");
        let path_file_in = tmp.path().join("data.xlsx");
        write_table_file(
            &path_file_in,
            table.view(),
            "Data",
            &derive_default_xlsx_write_options(),
        )
        .expect("write fixture");
        let path_dir_out = tmp.path().join("out");

        let c_input = format!(
            "open {}\nout {}\nrows 2\nsplit\nstatus\n",
            path_file_in.display(),
            path_dir_out.display()
        );
        let mut l_out = Vec::new();
        {
            let mut shell = TerminalShell::new(SplitSession::default(), &mut l_out);
            shell.run(io::Cursor::new(c_input)).expect("run");
            assert!(!shell.session().is_running());
            assert!(shell.session().is_split_enabled());
        }
        let c_out = String::from_utf8(l_out).expect("utf8");
        assert!(c_out.contains("Input file:"));
        assert!(c_out.contains("[DONE] File split complete!"));
        assert!(c_out.contains("[DONE] Generated 3 files"));
        assert!(c_out.contains(&render_progress_bar(100.0, N_WIDTH_PROGRESS_BAR)));
        assert!(path_dir_out.join("data_003.xlsx").is_file());
    }
}
