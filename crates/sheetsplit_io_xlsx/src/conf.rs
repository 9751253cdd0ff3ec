//! XLSX constants and default preset factories.

use crate::spec::{EnumReaderKind, SpecCellFormat, SpecXlsxWriteOptions};

/// Excel worksheet maximum row count.
pub const N_NROWS_EXCEL_MAX: usize = 1_048_576;
/// Excel worksheet maximum column count.
pub const N_NCOLS_EXCEL_MAX: usize = 16_384;
/// Excel sheet name maximum length.
pub const N_LEN_EXCEL_SHEET_NAME_MAX: usize = 31;
/// Characters not allowed in sheet names.
pub const TUP_EXCEL_ILLEGAL: [&str; 7] = ["*", ":", "?", "/", "\\", "[", "]"];

/// Extension of every output file, whatever the input container was.
pub const C_EXT_XLSX_OUT: &str = "xlsx";
/// Zero-padding width of the 1-based chunk index in output file names.
pub const N_WIDTH_FILE_INDEX: usize = 3;
/// Sheet name written into each output workbook.
pub const C_SHEET_NAME_DEFAULT: &str = "Sheet1";
/// Prefix used for blank header cells, followed by the column index.
pub const C_HEADER_UNNAMED_PREFIX: &str = "Unnamed: ";

/// Extension → reader strategy table. Unlisted extensions use
/// [`EnumReaderKind::Auto`].
pub const TUP_READER_BY_EXTENSION: [(&str, EnumReaderKind); 2] = [
    ("xlsx", EnumReaderKind::Xlsx),
    ("xls", EnumReaderKind::Xls),
];

/// Error codes Excel stores as typed error cells.
pub const TUP_EXCEL_ERROR_CODES: [&str; 7] = [
    "#DIV/0!", "#N/A", "#NAME?", "#NULL!", "#NUM!", "#REF!", "#VALUE!",
];

/// Number format for date-time cells.
pub const C_NUM_FORMAT_DATETIME: &str = "yyyy-mm-dd hh:mm:ss";
/// Number format for date cells without a time part.
pub const C_NUM_FORMAT_DATE: &str = "yyyy-mm-dd";
/// Number format for duration cells.
pub const C_NUM_FORMAT_DURATION: &str = "[h]:mm:ss";

/// Header format preset: bold, thin border, centered.
pub fn derive_default_header_format() -> SpecCellFormat {
    SpecCellFormat {
        bold: Some(true),
        border: Some(true),
        align: Some("center".to_string()),
        valign: Some("top".to_string()),
        ..Default::default()
    }
}

/// Build default write options.
pub fn derive_default_xlsx_write_options() -> SpecXlsxWriteOptions {
    SpecXlsxWriteOptions::default()
}
