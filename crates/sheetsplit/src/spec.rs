//! Split options, job/file-info models and the user-facing error type.

use std::path::{Path, PathBuf};

use sheetsplit_io_fs::FsError;
use sheetsplit_io_xlsx::{C_SHEET_NAME_DEFAULT, EnumReaderKind, SpecXlsxWriteOptions, XlsxReadError};
use thiserror::Error;

////////////////////////////////////////////////////////////////////////////////
// #region Options

/// Options for one split run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecSplitOptions {
    /// Writer options applied to every output file.
    pub write_options: SpecXlsxWriteOptions,
    /// Sheet name inside each output workbook.
    pub sheet_name_out: String,
}

impl Default for SpecSplitOptions {
    fn default() -> Self {
        Self {
            write_options: SpecXlsxWriteOptions::default(),
            sheet_name_out: C_SHEET_NAME_DEFAULT.to_string(),
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Models

/// Analysis result for one selected input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecFileInfo {
    /// Analyzed file.
    pub path: PathBuf,
    /// Data rows (header excluded).
    pub n_rows_total: usize,
    /// Column count.
    pub n_columns: usize,
    /// Reader used for the file.
    pub reader: EnumReaderKind,
}

/// State of one in-flight split.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecSplitJob {
    /// Input workbook.
    pub path_file_input: PathBuf,
    /// Directory receiving the output files.
    pub path_dir_output: PathBuf,
    /// Maximum data rows per output file.
    pub n_rows_per_file: usize,
    /// Zero-based chunk being written.
    pub idx_chunk_current: usize,
    /// Planned number of output files.
    pub n_files: usize,
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Errors

/// Error category shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumSplitErrorKind {
    /// Missing selection or bad rows-per-file value.
    InvalidInput,
    /// Input could not be parsed as a table.
    ReadError,
    /// Output directory or a chunk file could not be written.
    WriteError,
    /// File browser could not be opened.
    FolderOpenError,
}

/// Failure surfaced by the analyzer, the orchestrator or the session.
#[derive(Debug, Clone, Error)]
pub enum SplitError {
    /// Invalid user input; nothing was read or written.
    #[error("{0}")]
    InvalidInput(String),
    /// Input file could not be read.
    #[error("{message}")]
    Read {
        /// Input file.
        path: PathBuf,
        /// User-facing message.
        message: String,
        /// Targeted hint, e.g. for legacy workbooks.
        hint: Option<String>,
    },
    /// Output could not be written; earlier chunk files are kept.
    #[error("{message}")]
    Write {
        /// Directory or file that failed.
        path: PathBuf,
        /// User-facing message.
        message: String,
    },
    /// Output folder could not be opened.
    #[error("{message}")]
    FolderOpen {
        /// Folder to open.
        path: PathBuf,
        /// User-facing message.
        message: String,
    },
}

impl SplitError {
    /// Error category.
    pub fn kind(&self) -> EnumSplitErrorKind {
        match self {
            Self::InvalidInput(_) => EnumSplitErrorKind::InvalidInput,
            Self::Read { .. } => EnumSplitErrorKind::ReadError,
            Self::Write { .. } => EnumSplitErrorKind::WriteError,
            Self::FolderOpen { .. } => EnumSplitErrorKind::FolderOpenError,
        }
    }

    /// Optional follow-up hint for the status log.
    pub fn hint(&self) -> Option<&str> {
        match self {
            Self::Read { hint, .. } => hint.as_deref(),
            _ => None,
        }
    }

    pub(crate) fn from_read_error(err: XlsxReadError) -> Self {
        let path = match &err {
            XlsxReadError::Open { path, .. }
            | XlsxReadError::NoSheet { path }
            | XlsxReadError::Sheet { path, .. } => path.clone(),
        };
        Self::Read {
            path,
            message: err.to_string(),
            hint: err.hint().map(ToString::to_string),
        }
    }

    pub(crate) fn from_write_text(path: &Path, message: String) -> Self {
        Self::Write {
            path: path.to_path_buf(),
            message: format!("Failed to write {}: {message}", path.display()),
        }
    }

    pub(crate) fn from_fs_write_error(path: &Path, err: FsError) -> Self {
        Self::Write {
            path: path.to_path_buf(),
            message: err.to_string(),
        }
    }

    pub(crate) fn from_fs_open_error(path: &Path, err: FsError) -> Self {
        Self::FolderOpen {
            path: path.to_path_buf(),
            message: err.to_string(),
        }
    }
}

/// Parse the rows-per-file text field into a positive count.
pub fn parse_rows_per_file(text: &str) -> Result<usize, SplitError> {
    let c_text = text.trim();
    let n_value: i64 = c_text.parse().map_err(|_| {
        SplitError::InvalidInput(format!(
            "Please enter a valid row count (positive integer), got {c_text:?}."
        ))
    })?;
    if n_value <= 0 {
        return Err(SplitError::InvalidInput(format!(
            "Row count must be greater than 0, got {n_value}."
        )));
    }
    usize::try_from(n_value).map_err(|_| {
        SplitError::InvalidInput(format!("Row count is too large: {n_value}."))
    })
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
