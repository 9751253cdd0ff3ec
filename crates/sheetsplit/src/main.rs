use std::io::{self, BufReader};
use std::process::ExitCode;

use sheetsplit::{SplitSession, TerminalShell};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let mut shell = TerminalShell::new(SplitSession::default(), io::stdout());
    match shell.run(BufReader::new(io::stdin())) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "terminal shell stopped");
            eprintln!("sheetsplit: {err}");
            ExitCode::FAILURE
        }
    }
}
