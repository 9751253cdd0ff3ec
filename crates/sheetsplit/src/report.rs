//! Split report models and mutable report builder.

use std::fmt;
use std::path::PathBuf;

/// One written output file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecSplitFile {
    /// Output file name (no directory).
    pub file_name: String,
    /// Data rows written (header excluded).
    pub n_rows: usize,
}

/// Summary of one completed split.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReportSplit {
    /// Directory holding the output files.
    pub path_dir_output: PathBuf,
    /// Data rows in the input table.
    pub n_rows_total: usize,
    /// Output files in chunk order.
    pub files: Vec<SpecSplitFile>,
}

impl ReportSplit {
    /// Number of output files written.
    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// Row count of each output file, in chunk order.
    pub fn per_file_row_counts(&self) -> Vec<usize> {
        self.files.iter().map(|file| file.n_rows).collect()
    }

    /// Human-readable one-line summary.
    pub fn format(&self, prefix: &str) -> String {
        format!(
            "{prefix} files={} rows={} output={}",
            self.file_count(),
            self.n_rows_total,
            self.path_dir_output.display()
        )
    }
}

impl fmt::Display for ReportSplit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format("[SPLIT]"))
    }
}

/// Mutable accumulator filled while chunks are written.
#[derive(Debug, Default, Clone)]
pub struct ReportSplitBuilder {
    /// See [`ReportSplit::path_dir_output`].
    pub path_dir_output: PathBuf,
    /// See [`ReportSplit::n_rows_total`].
    pub n_rows_total: usize,
    /// See [`ReportSplit::files`].
    pub files: Vec<SpecSplitFile>,
}

impl ReportSplitBuilder {
    /// Start a report for `path_dir_output`.
    pub fn new(path_dir_output: PathBuf, n_rows_total: usize) -> Self {
        Self {
            path_dir_output,
            n_rows_total,
            files: Vec::new(),
        }
    }

    /// Record one written file.
    pub fn add_file(&mut self, file_name: String, n_rows: usize) {
        self.files.push(SpecSplitFile { file_name, n_rows });
    }

    /// Finalize builder into immutable report.
    pub fn build(self) -> ReportSplit {
        ReportSplit {
            path_dir_output: self.path_dir_output,
            n_rows_total: self.n_rows_total,
            files: self.files,
        }
    }
}
