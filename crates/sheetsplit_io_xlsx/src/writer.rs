//! XLSX writer kernel that writes table views into workbook output.

use std::path::{Path, PathBuf};

use rust_xlsxwriter::{Format, FormatAlign, FormatBorder, Formula, Workbook, Worksheet, XlsxError};

use crate::conf::{N_NCOLS_EXCEL_MAX, N_NROWS_EXCEL_MAX, TUP_EXCEL_ERROR_CODES};
use crate::spec::{EnumCellValue, SpecCellFormat, SpecTableView, SpecXlsxWriteOptions};
use crate::util::sanitize_sheet_name;

/// Formats for one row kind, resolved once per writer.
struct SpecValueFormats {
    base: Format,
    datetime: Format,
    date: Format,
    duration: Format,
}

impl SpecValueFormats {
    fn new(fmt_base: &SpecCellFormat, write_options: &SpecXlsxWriteOptions) -> Self {
        let derive_with_num_format = |num_format: &str| {
            derive_rust_xlsx_format(&fmt_base.merge(&SpecCellFormat {
                num_format: Some(num_format.to_string()),
                ..Default::default()
            }))
        };
        Self {
            base: derive_rust_xlsx_format(fmt_base),
            datetime: derive_with_num_format(&write_options.num_format_datetime),
            date: derive_with_num_format(&write_options.num_format_date),
            duration: derive_with_num_format(&write_options.num_format_duration),
        }
    }
}

/// Stateful workbook writer.
pub struct XlsxWriter {
    path_file_out: PathBuf,
    workbook: Workbook,
    formats_header: SpecValueFormats,
    formats_cell: SpecValueFormats,
    write_options: SpecXlsxWriteOptions,
    if_closed: bool,
}

impl XlsxWriter {
    /// Create writer bound to output path and options.
    ///
    /// The workbook is buffered in memory until [`Self::close`] is called.
    pub fn new(path_file_out: PathBuf, write_options: SpecXlsxWriteOptions) -> Self {
        Self {
            path_file_out,
            workbook: Workbook::new(),
            formats_header: SpecValueFormats::new(&write_options.fmt_header, &write_options),
            formats_cell: SpecValueFormats::new(&SpecCellFormat::default(), &write_options),
            write_options,
            if_closed: false,
        }
    }

    /// Output file path.
    pub fn file_out(&self) -> &Path {
        &self.path_file_out
    }

    /// Flush workbook to disk. Idempotent.
    pub fn close(&mut self) -> Result<(), String> {
        if self.if_closed {
            return Ok(());
        }
        self.workbook
            .save(&self.path_file_out)
            .map_err(derive_xlsx_error_text)?;
        self.if_closed = true;
        Ok(())
    }

    /// Write one sheet: the view's typed header row followed by its rows.
    pub fn write_sheet_from_view(
        &mut self,
        view: SpecTableView<'_>,
        sheet_name: &str,
    ) -> Result<(), String> {
        if self.if_closed {
            return Err("Cannot write after close().".to_string());
        }

        let n_rows_sheet = view.height() + 1;
        if n_rows_sheet > N_NROWS_EXCEL_MAX {
            return Err(format!(
                "Sheet needs {n_rows_sheet} rows (header included); Excel allows {N_NROWS_EXCEL_MAX}."
            ));
        }
        if view.width() > N_NCOLS_EXCEL_MAX {
            return Err(format!(
                "Sheet needs {} columns; Excel allows {N_NCOLS_EXCEL_MAX}.",
                view.width()
            ));
        }

        let worksheet = self.workbook.add_worksheet();
        worksheet
            .set_name(sanitize_sheet_name(sheet_name, "_"))
            .map_err(derive_xlsx_error_text)?;

        for (n_idx_col, value) in view.header.iter().enumerate() {
            write_cell(worksheet, 0, n_idx_col, value, &self.formats_header)?;
        }
        if self.write_options.if_freeze_header {
            worksheet
                .set_freeze_panes(1, 0)
                .map_err(derive_xlsx_error_text)?;
        }

        for (n_idx_row, row) in view.rows.iter().enumerate() {
            for (n_idx_col, value) in row.iter().enumerate() {
                write_cell(worksheet, n_idx_row + 1, n_idx_col, value, &self.formats_cell)?;
            }
        }

        Ok(())
    }
}

/// Write `view` as a single-sheet workbook at `path_file_out`.
pub fn write_table_file(
    path_file_out: &Path,
    view: SpecTableView<'_>,
    sheet_name: &str,
    write_options: &SpecXlsxWriteOptions,
) -> Result<(), String> {
    let mut writer = XlsxWriter::new(path_file_out.to_path_buf(), write_options.clone());
    writer.write_sheet_from_view(view, sheet_name)?;
    writer.close()
}

fn write_cell(
    worksheet: &mut Worksheet,
    row_idx: usize,
    col_idx: usize,
    value: &EnumCellValue,
    formats: &SpecValueFormats,
) -> Result<(), String> {
    let n_row = cast_row_num(row_idx)?;
    let n_col = cast_col_num(col_idx)?;
    let result = match value {
        EnumCellValue::None => return Ok(()),
        EnumCellValue::String(val) => {
            worksheet.write_string_with_format(n_row, n_col, val, &formats.base)
        }
        EnumCellValue::Error(val) if TUP_EXCEL_ERROR_CODES.contains(&val.as_str()) => {
            // Error literal formula with the code as its cached result.
            let formula = Formula::new(format!("={val}")).set_result(val.as_str());
            worksheet.write_formula_with_format(n_row, n_col, formula, &formats.base)
        }
        EnumCellValue::Error(val) => {
            worksheet.write_string_with_format(n_row, n_col, val, &formats.base)
        }
        EnumCellValue::Integer(val) => {
            worksheet.write_number_with_format(n_row, n_col, *val as f64, &formats.base)
        }
        EnumCellValue::Number(val) => {
            worksheet.write_number_with_format(n_row, n_col, *val, &formats.base)
        }
        EnumCellValue::Boolean(val) => {
            worksheet.write_boolean_with_format(n_row, n_col, *val, &formats.base)
        }
        EnumCellValue::DateTime(val) => {
            let format = if val.fract() == 0.0 {
                &formats.date
            } else {
                &formats.datetime
            };
            worksheet.write_number_with_format(n_row, n_col, *val, format)
        }
        EnumCellValue::Duration(val) => {
            worksheet.write_number_with_format(n_row, n_col, *val, &formats.duration)
        }
    };
    result.map_err(derive_xlsx_error_text)?;
    Ok(())
}

fn derive_rust_xlsx_format(spec: &SpecCellFormat) -> Format {
    let mut format = Format::new();

    if spec.bold.unwrap_or(false) {
        format = format.set_bold();
    }
    if let Some(val) = &spec.align
        && let Some(align) = derive_format_align(val)
    {
        format = format.set_align(align);
    }
    if let Some(val) = &spec.valign
        && let Some(align) = derive_format_align(val)
    {
        format = format.set_align(align);
    }
    if let Some(val) = &spec.num_format {
        format = format.set_num_format(val.clone());
    }
    if spec.border.unwrap_or(false) {
        format = format.set_border(FormatBorder::Thin);
    }

    format
}

fn derive_format_align(align: &str) -> Option<FormatAlign> {
    let value = align.trim().to_ascii_lowercase();
    match value.as_str() {
        "general" => Some(FormatAlign::General),
        "left" => Some(FormatAlign::Left),
        "center" => Some(FormatAlign::Center),
        "right" => Some(FormatAlign::Right),
        "top" => Some(FormatAlign::Top),
        "bottom" => Some(FormatAlign::Bottom),
        "vcenter" | "vertical_center" => Some(FormatAlign::VerticalCenter),
        _ => None,
    }
}

fn cast_row_num(value: usize) -> Result<u32, String> {
    u32::try_from(value).map_err(|_| format!("row index overflow: {value}"))
}

fn cast_col_num(value: usize) -> Result<u16, String> {
    u16::try_from(value).map_err(|_| format!("column index overflow: {value}"))
}

fn derive_xlsx_error_text(err: XlsxError) -> String {
    format!("xlsx write error: {err}")
}
