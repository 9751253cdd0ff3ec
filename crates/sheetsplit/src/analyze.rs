//! Input file analysis and split preview.

use std::path::Path;

use sheetsplit_io_xlsx::{calculate_file_count, derive_reader_kind, read_table};

use crate::spec::{SpecFileInfo, SplitError};

/// Read `path` and report its row and column counts.
///
/// The file is re-read on every call.
pub fn analyze_file(path: &Path) -> Result<SpecFileInfo, SplitError> {
    let reader = derive_reader_kind(path);
    tracing::debug!(path = %path.display(), %reader, "analyzing input file");

    let table = read_table(path).map_err(SplitError::from_read_error)?;
    Ok(SpecFileInfo {
        path: path.to_path_buf(),
        n_rows_total: table.height(),
        n_columns: table.width(),
        reader,
    })
}

/// Number of output files a split of `info` would produce.
pub fn derive_split_preview(info: &SpecFileInfo, n_rows_per_file: usize) -> usize {
    calculate_file_count(info.n_rows_total, n_rows_per_file)
}

/// Status-log lines describing an analyzed file.
pub fn format_file_info_lines(info: &SpecFileInfo) -> Vec<String> {
    vec![
        "File analysis complete:".to_string(),
        format!("  File path: {}", info.path.display()),
        format!("  Total rows: {}", info.n_rows_total),
        format!("  Columns: {}", info.n_columns),
    ]
}

/// Status-log line previewing the output file count.
pub fn format_preview_line(n_rows_per_file: usize, n_files: usize) -> String {
    format!("  Splitting at {n_rows_per_file} rows per file will generate {n_files} files")
}
