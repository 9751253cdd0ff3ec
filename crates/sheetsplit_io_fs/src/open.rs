//! Hand a folder to the host file browser.

use std::path::Path;
use std::process::Command;

use crate::spec::FsError;

/// Launcher program for an OS family (`std::env::consts::OS` values).
pub fn derive_folder_open_program(os: &str) -> &'static str {
    match os {
        "windows" => "explorer",
        "macos" => "open",
        _ => "xdg-open",
    }
}

/// Open `path_dir` in the file browser of the current OS.
pub fn open_folder(path_dir: &Path) -> Result<(), FsError> {
    if !path_dir.is_dir() {
        return Err(FsError::FolderMissing(path_dir.to_path_buf()));
    }

    let os = std::env::consts::OS;
    let program = derive_folder_open_program(os);
    let status = Command::new(program)
        .arg(path_dir)
        .status()
        .map_err(|e| FsError::FolderOpenFailed {
            path: path_dir.to_path_buf(),
            program: program.to_string(),
            message: e.to_string(),
        })?;

    // explorer.exe reports 1 even when the window opened.
    if !status.success() && os != "windows" {
        return Err(FsError::FolderOpenFailed {
            path: path_dir.to_path_buf(),
            program: program.to_string(),
            message: format!("exited with {status}"),
        });
    }
    Ok(())
}
