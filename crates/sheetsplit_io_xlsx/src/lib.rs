//! `sheetsplit_io_xlsx` v1:
//! Spreadsheet I/O kernel for the splitter.
//!
//! Modules:
//! - `conf`   : constants and default presets
//! - `spec`   : table/cell models, options and errors
//! - `util`   : pure helpers (chunk planning, naming, header cleanup)
//! - `reader` : extension-dispatched first-sheet reader
//! - `writer` : pure-Rust xlsx writer kernel
pub mod conf;
pub mod reader;
pub mod spec;
pub mod util;
pub mod writer;

pub use conf::{
    C_EXT_XLSX_OUT, C_SHEET_NAME_DEFAULT, N_NCOLS_EXCEL_MAX, N_NROWS_EXCEL_MAX,
    TUP_READER_BY_EXTENSION, derive_default_xlsx_write_options,
};
pub use reader::{derive_reader_kind, read_table};
pub use spec::{
    EnumCellValue, EnumReaderKind, SpecCellFormat, SpecRowChunk, SpecTable, SpecTableView,
    SpecXlsxWriteOptions, XlsxReadError,
};
pub use util::{
    calculate_file_count, derive_output_file_name, plan_row_chunks, sanitize_sheet_name,
};
pub use writer::{XlsxWriter, write_table_file};
