//! Filesystem specification models and top-level error types.

use std::fmt;
use std::path::PathBuf;

////////////////////////////////////////////////////////////////////////////////
// #region Filters

/// One named file-picker filter, e.g. `Excel files (*.xlsx *.xls)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecFileFilter {
    /// Label shown to the user.
    pub name: String,
    /// Glob patterns applied to file basenames.
    pub patterns: Vec<String>,
}

impl SpecFileFilter {
    /// Build a filter from a label and basename patterns.
    pub fn new(name: &str, patterns: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            patterns: patterns.iter().map(ToString::to_string).collect(),
        }
    }

    /// `"Excel files (*.xlsx *.xls)"`.
    pub fn label(&self) -> String {
        format!("{} ({})", self.name, self.patterns.join(" "))
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Errors

/// Filesystem failures surfaced to the splitter.
#[derive(Debug)]
pub enum FsError {
    /// Directory creation failed.
    DirectoryInitFailed {
        /// Directory that could not be created.
        path: PathBuf,
        /// Underlying IO error text.
        message: String,
    },
    /// Directory contents could not be listed.
    DirectoryListFailed {
        /// Directory that could not be read.
        path: PathBuf,
        /// Underlying IO error text.
        message: String,
    },
    /// Path exists but is not a directory.
    NotADirectory(PathBuf),
    /// Path has no usable file name.
    InvalidFileName(PathBuf),
    /// Derived output path escapes its directory.
    UnsafeDestination {
        /// Offending path.
        path: PathBuf,
        /// Directory the path must stay in.
        root: PathBuf,
    },
    /// Invalid file-picker pattern.
    InvalidPattern(String),
    /// Folder to open does not exist.
    FolderMissing(PathBuf),
    /// OS file browser could not be launched.
    FolderOpenFailed {
        /// Folder passed to the browser.
        path: PathBuf,
        /// Launcher program.
        program: String,
        /// Underlying error text.
        message: String,
    },
}

impl fmt::Display for FsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DirectoryInitFailed { path, message } => {
                write!(f, "Failed to create directory {}: {message}", path.display())
            }
            Self::DirectoryListFailed { path, message } => {
                write!(f, "Failed to list directory {}: {message}", path.display())
            }
            Self::NotADirectory(path) => write!(f, "Not a directory: {}", path.display()),
            Self::InvalidFileName(path) => {
                write!(f, "Path has no usable file name: {}", path.display())
            }
            Self::UnsafeDestination { path, root } => write!(
                f,
                "Unsafe destination path escapes output directory: {} (root={})",
                path.display(),
                root.display()
            ),
            Self::InvalidPattern(msg) => write!(f, "{msg}"),
            Self::FolderMissing(path) => write!(f, "Folder does not exist: {}", path.display()),
            Self::FolderOpenFailed {
                path,
                program,
                message,
            } => write!(
                f,
                "Failed to open {} with `{program}`: {message}",
                path.display()
            ),
        }
    }
}

impl std::error::Error for FsError {}

// #endregion
////////////////////////////////////////////////////////////////////////////////
