//! Shared table, cell and option models.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::conf::{C_NUM_FORMAT_DATE, C_NUM_FORMAT_DATETIME, C_NUM_FORMAT_DURATION};

////////////////////////////////////////////////////////////////////////////////
// #region CellFormatSpecification

/// Cell format specification.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct SpecCellFormat {
    /// Bold style.
    pub bold: Option<bool>,
    /// Horizontal alignment.
    pub align: Option<String>,
    /// Vertical alignment.
    pub valign: Option<String>,
    /// Thin border on all sides.
    pub border: Option<bool>,
    /// Number format code.
    pub num_format: Option<String>,
}

impl SpecCellFormat {
    /// Merge two formats with right-side non-`None` overwrite semantics.
    pub fn merge(&self, other: &SpecCellFormat) -> SpecCellFormat {
        SpecCellFormat {
            bold: other.bold.or(self.bold),
            align: other.align.clone().or_else(|| self.align.clone()),
            valign: other.valign.clone().or_else(|| self.valign.clone()),
            border: other.border.or(self.border),
            num_format: other.num_format.clone().or_else(|| self.num_format.clone()),
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region CellAndTable

/// Dynamically typed cell value carried from read to write.
///
/// Date-times and durations keep the raw Excel serial so nothing is lost
/// when the value is written back out.
#[derive(Debug, Clone, PartialEq)]
pub enum EnumCellValue {
    /// Missing/blank value.
    None,
    /// Text value.
    String(String),
    /// Integer value.
    Integer(i64),
    /// Floating point value.
    Number(f64),
    /// Boolean value.
    Boolean(bool),
    /// Date or date-time as an Excel serial number.
    DateTime(f64),
    /// Duration as an Excel serial number (fraction of days).
    Duration(f64),
    /// Cell error such as `#DIV/0!`.
    Error(String),
}

impl EnumCellValue {
    /// Numeric view of the value, when it has one.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Integer(val) => Some(*val as f64),
            Self::Number(val) | Self::DateTime(val) | Self::Duration(val) => Some(*val),
            _ => None,
        }
    }

    /// Value equality that treats integers and whole floats as the same number.
    pub fn is_equivalent_to(&self, other: &EnumCellValue) -> bool {
        match (self, other) {
            (Self::Integer(_) | Self::Number(_), Self::Integer(_) | Self::Number(_)) => {
                self.as_f64() == other.as_f64()
            }
            _ => self == other,
        }
    }
}

impl fmt::Display for EnumCellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => Ok(()),
            Self::String(val) | Self::Error(val) => write!(f, "{val}"),
            Self::Integer(val) => write!(f, "{val}"),
            Self::Number(val) => {
                if val.fract() == 0.0 && val.is_finite() {
                    write!(f, "{val:.0}")
                } else {
                    write!(f, "{val}")
                }
            }
            Self::Boolean(val) => write!(f, "{}", if *val { "True" } else { "False" }),
            Self::DateTime(val) | Self::Duration(val) => write!(f, "{val}"),
        }
    }
}

/// In-memory first sheet of a workbook: header plus data rows.
///
/// `columns` are the unique display names; `header` keeps the typed header
/// cells that are written back out.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SpecTable {
    columns: Vec<String>,
    header: Vec<EnumCellValue>,
    rows: Vec<Vec<EnumCellValue>>,
}

impl SpecTable {
    /// Build a table with text headers; every row must have exactly
    /// `columns.len()` values.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<EnumCellValue>>) -> Result<Self, String> {
        let header = columns.iter().cloned().map(EnumCellValue::String).collect();
        Self::with_header(columns, header, rows)
    }

    /// Build a table whose written header cells differ from the column names.
    pub fn with_header(
        columns: Vec<String>,
        header: Vec<EnumCellValue>,
        rows: Vec<Vec<EnumCellValue>>,
    ) -> Result<Self, String> {
        let n_width = columns.len();
        if header.len() != n_width {
            return Err(format!(
                "Header has {} cells; expected {n_width}.",
                header.len()
            ));
        }
        if let Some((n_idx_row, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != n_width)
        {
            return Err(format!(
                "Row {n_idx_row} has {} values; expected {n_width}.",
                row.len()
            ));
        }
        Ok(Self {
            columns,
            header,
            rows,
        })
    }

    /// Column names in source order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Typed header cells in source order.
    pub fn header(&self) -> &[EnumCellValue] {
        &self.header
    }

    /// Data rows in source order (header excluded).
    pub fn rows(&self) -> &[Vec<EnumCellValue>] {
        &self.rows
    }

    /// Number of data rows.
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Borrow all rows as a view.
    pub fn view(&self) -> SpecTableView<'_> {
        SpecTableView {
            columns: &self.columns,
            header: &self.header,
            rows: &self.rows,
        }
    }

    /// Borrow rows `[row_start_inclusive, row_end_exclusive)` with all columns.
    pub fn slice_rows(
        &self,
        row_start_inclusive: usize,
        row_end_exclusive: usize,
    ) -> Result<SpecTableView<'_>, String> {
        if row_start_inclusive > row_end_exclusive || row_end_exclusive > self.rows.len() {
            return Err(format!(
                "Row slice [{row_start_inclusive}, {row_end_exclusive}) is out of bounds for {} rows.",
                self.rows.len()
            ));
        }
        Ok(SpecTableView {
            columns: &self.columns,
            header: &self.header,
            rows: &self.rows[row_start_inclusive..row_end_exclusive],
        })
    }
}

/// Borrowed row range of a [`SpecTable`].
#[derive(Debug, Clone, Copy)]
pub struct SpecTableView<'a> {
    /// Column names in source order.
    pub columns: &'a [String],
    /// Typed header cells written as the first sheet row.
    pub header: &'a [EnumCellValue],
    /// Rows covered by the view.
    pub rows: &'a [Vec<EnumCellValue>],
}

impl SpecTableView<'_> {
    /// Number of data rows in the view.
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns in the view.
    pub fn width(&self) -> usize {
        self.columns.len()
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region RowChunking

/// One contiguous row range destined for one output file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpecRowChunk {
    /// Zero-based chunk index.
    pub idx_chunk: usize,
    /// Inclusive source row start.
    pub row_start_inclusive: usize,
    /// Exclusive source row end.
    pub row_end_exclusive: usize,
}

impl SpecRowChunk {
    /// Number of rows in the chunk.
    pub fn len(&self) -> usize {
        self.row_end_exclusive - self.row_start_inclusive
    }

    /// Whether the chunk covers no rows.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region ReadSpecification

/// Underlying reader chosen for an input file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumReaderKind {
    /// Office Open XML workbook (`.xlsx`).
    Xlsx,
    /// Legacy binary workbook (`.xls`).
    Xls,
    /// Format sniffed from the file itself.
    Auto,
}

impl EnumReaderKind {
    /// Short label used in messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Xlsx => "xlsx",
            Self::Xls => "xls",
            Self::Auto => "auto",
        }
    }
}

impl fmt::Display for EnumReaderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure to load a workbook into a [`SpecTable`].
#[derive(Debug, Error)]
pub enum XlsxReadError {
    /// Workbook could not be opened by the selected reader.
    #[error("Cannot open {} with the {reader} reader: {message}", path.display())]
    Open {
        /// Input file.
        path: PathBuf,
        /// Reader chosen from the extension.
        reader: EnumReaderKind,
        /// Underlying parser message.
        message: String,
    },
    /// Workbook contains no worksheet.
    #[error("Workbook has no sheets: {}", path.display())]
    NoSheet {
        /// Input file.
        path: PathBuf,
    },
    /// First sheet could not be decoded.
    #[error("Cannot read first sheet of {}: {message}", path.display())]
    Sheet {
        /// Input file.
        path: PathBuf,
        /// Reader chosen from the extension.
        reader: EnumReaderKind,
        /// Underlying parser message.
        message: String,
    },
}

impl XlsxReadError {
    /// Reader that produced the error, when known.
    pub fn reader(&self) -> Option<EnumReaderKind> {
        match self {
            Self::Open { reader, .. } | Self::Sheet { reader, .. } => Some(*reader),
            Self::NoSheet { .. } => None,
        }
    }

    /// Targeted hint for failures of the legacy binary reader.
    pub fn hint(&self) -> Option<&'static str> {
        match self.reader() {
            Some(EnumReaderKind::Xls) => Some(
                "Hint: .xls is the legacy binary format; if it cannot be parsed, \
                 re-save the file as .xlsx and try again.",
            ),
            _ => None,
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region WriteOptions

/// Writer-wide options controlling sheet layout and value formats.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecXlsxWriteOptions {
    /// Format applied to the header row.
    pub fmt_header: SpecCellFormat,
    /// Number format for date-time cells.
    pub num_format_datetime: String,
    /// Number format for whole-day date cells.
    pub num_format_date: String,
    /// Number format for duration cells.
    pub num_format_duration: String,
    /// Freeze the header row.
    pub if_freeze_header: bool,
}

impl Default for SpecXlsxWriteOptions {
    fn default() -> Self {
        Self {
            fmt_header: crate::conf::derive_default_header_format(),
            num_format_datetime: C_NUM_FORMAT_DATETIME.to_string(),
            num_format_date: C_NUM_FORMAT_DATE.to_string(),
            num_format_duration: C_NUM_FORMAT_DURATION.to_string(),
            if_freeze_header: false,
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
