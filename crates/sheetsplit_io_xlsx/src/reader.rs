//! Extension-dispatched workbook reader that loads the first sheet into a
//! [`SpecTable`].

use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use calamine::{Data, Range, Reader, Xls, Xlsx, open_workbook, open_workbook_auto};

use crate::spec::{EnumCellValue, EnumReaderKind, SpecTable, XlsxReadError};
use crate::util::{
    derive_header_cell, derive_header_text, derive_unique_column_names, select_reader_kind,
};

/// Reader kind [`read_table`] will use for `path`.
pub fn derive_reader_kind(path: &Path) -> EnumReaderKind {
    select_reader_kind(path.extension().and_then(|ext| ext.to_str()))
}

/// Load the first sheet of the workbook at `path`.
///
/// The first row is the header; every later row becomes a data row.
pub fn read_table(path: &Path) -> Result<SpecTable, XlsxReadError> {
    let enum_reader = derive_reader_kind(path);
    let range = match enum_reader {
        EnumReaderKind::Xlsx => {
            let mut workbook: Xlsx<BufReader<File>> =
                open_workbook(path).map_err(|e| derive_open_error(path, enum_reader, e))?;
            read_first_range(&mut workbook, path, enum_reader)?
        }
        EnumReaderKind::Xls => {
            let mut workbook: Xls<BufReader<File>> =
                open_workbook(path).map_err(|e| derive_open_error(path, enum_reader, e))?;
            read_first_range(&mut workbook, path, enum_reader)?
        }
        EnumReaderKind::Auto => {
            let mut workbook =
                open_workbook_auto(path).map_err(|e| derive_open_error(path, enum_reader, e))?;
            read_first_range(&mut workbook, path, enum_reader)?
        }
    };

    derive_table_from_range(&range).map_err(|message| XlsxReadError::Sheet {
        path: path.to_path_buf(),
        reader: enum_reader,
        message,
    })
}

fn read_first_range<R>(
    workbook: &mut R,
    path: &Path,
    enum_reader: EnumReaderKind,
) -> Result<Range<Data>, XlsxReadError>
where
    R: Reader<BufReader<File>>,
    R::Error: fmt::Display,
{
    match workbook.worksheet_range_at(0) {
        None => Err(XlsxReadError::NoSheet {
            path: path.to_path_buf(),
        }),
        Some(Err(e)) => Err(XlsxReadError::Sheet {
            path: path.to_path_buf(),
            reader: enum_reader,
            message: e.to_string(),
        }),
        Some(Ok(range)) => Ok(range),
    }
}

fn derive_open_error(
    path: &Path,
    enum_reader: EnumReaderKind,
    err: impl fmt::Display,
) -> XlsxReadError {
    XlsxReadError::Open {
        path: path.to_path_buf(),
        reader: enum_reader,
        message: err.to_string(),
    }
}

/// Convert a sheet range into a table, using its first row as the header.
///
/// Columns are counted from column A even when the used range starts
/// further right.
pub fn derive_table_from_range(range: &Range<Data>) -> Result<SpecTable, String> {
    let n_col_offset = range.start().map_or(0, |(_, n_col)| n_col as usize);
    let mut it_rows = range.rows();
    let Some(row_header) = it_rows.next() else {
        return Ok(SpecTable::default());
    };

    let l_header_raw = derive_padded_row(row_header, n_col_offset);
    let l_columns_raw: Vec<String> = l_header_raw
        .iter()
        .enumerate()
        .map(|(n_idx_col, value)| derive_header_text(value, n_idx_col))
        .collect();
    let l_columns = derive_unique_column_names(&l_columns_raw);
    let l_header = l_header_raw
        .into_iter()
        .zip(&l_columns)
        .map(|(value, c_name)| derive_header_cell(value, c_name))
        .collect();

    let l_rows = it_rows
        .map(|row| derive_padded_row(row, n_col_offset))
        .collect();

    SpecTable::with_header(l_columns, l_header, l_rows)
}

fn derive_padded_row(row: &[Data], n_col_offset: usize) -> Vec<EnumCellValue> {
    std::iter::repeat_n(EnumCellValue::None, n_col_offset)
        .chain(row.iter().map(derive_cell_value))
        .collect()
}

/// Map one parsed cell to the tagged cell value.
pub fn derive_cell_value(cell: &Data) -> EnumCellValue {
    match cell {
        Data::Empty => EnumCellValue::None,
        Data::String(val) => EnumCellValue::String(val.clone()),
        Data::Int(val) => EnumCellValue::Integer(*val),
        Data::Float(val) => EnumCellValue::Number(*val),
        Data::Bool(val) => EnumCellValue::Boolean(*val),
        Data::DateTime(val) => {
            if val.is_duration() {
                EnumCellValue::Duration(val.as_f64())
            } else {
                EnumCellValue::DateTime(val.as_f64())
            }
        }
        Data::DateTimeIso(val) | Data::DurationIso(val) => EnumCellValue::String(val.clone()),
        Data::Error(val) => EnumCellValue::Error(val.to_string()),
    }
}
