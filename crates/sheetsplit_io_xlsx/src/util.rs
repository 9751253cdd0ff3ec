//! Stateless helpers: row chunk planning, output naming and header cleanup.

use std::collections::BTreeSet;

use crate::conf::{
    C_EXT_XLSX_OUT, C_HEADER_UNNAMED_PREFIX, N_LEN_EXCEL_SHEET_NAME_MAX, N_WIDTH_FILE_INDEX,
    TUP_EXCEL_ILLEGAL, TUP_READER_BY_EXTENSION,
};
use crate::spec::{EnumCellValue, EnumReaderKind, SpecRowChunk};

////////////////////////////////////////////////////////////////////////////////
// #region RowChunking

/// Number of output files needed for `n_rows_total` rows (ceiling division).
///
/// Returns 0 when `n_rows_per_file` is 0; callers validate it before planning.
pub fn calculate_file_count(n_rows_total: usize, n_rows_per_file: usize) -> usize {
    if n_rows_per_file == 0 {
        return 0;
    }
    n_rows_total.div_ceil(n_rows_per_file)
}

/// Plan contiguous row chunks covering `[0, n_rows_total)`.
///
/// Every chunk holds `n_rows_per_file` rows except the last, which holds the
/// remainder in `[1, n_rows_per_file]`. Zero rows plan zero chunks.
pub fn plan_row_chunks(
    n_rows_total: usize,
    n_rows_per_file: usize,
) -> Result<Vec<SpecRowChunk>, String> {
    if n_rows_per_file == 0 {
        return Err("rows_per_file resolved to 0 rows; expected >= 1.".to_string());
    }

    let n_files = calculate_file_count(n_rows_total, n_rows_per_file);
    let l_chunks = (0..n_files)
        .map(|n_idx| SpecRowChunk {
            idx_chunk: n_idx,
            row_start_inclusive: n_idx * n_rows_per_file,
            row_end_exclusive: usize::min((n_idx + 1) * n_rows_per_file, n_rows_total),
        })
        .collect();
    Ok(l_chunks)
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Naming

/// Output file name for a 1-based chunk index, e.g. `sales_007.xlsx`.
pub fn derive_output_file_name(stem: &str, idx_1based: usize) -> String {
    format!("{stem}_{idx_1based:0width$}.{C_EXT_XLSX_OUT}", width = N_WIDTH_FILE_INDEX)
}

/// Pick the reader for a file extension (case-insensitive, without the dot).
pub fn select_reader_kind(extension: Option<&str>) -> EnumReaderKind {
    let Some(extension) = extension else {
        return EnumReaderKind::Auto;
    };
    let c_ext = extension.trim_start_matches('.').to_ascii_lowercase();
    TUP_READER_BY_EXTENSION
        .iter()
        .find(|(c_key, _)| *c_key == c_ext)
        .map(|(_, kind)| *kind)
        .unwrap_or(EnumReaderKind::Auto)
}

/// Replace invalid chars and trim to valid Excel sheet name.
pub fn sanitize_sheet_name(name: &str, replace_to: &str) -> String {
    let mut c_name = name.to_string();
    for c_illegal in TUP_EXCEL_ILLEGAL {
        c_name = c_name.replace(c_illegal, replace_to);
    }
    c_name = c_name.trim().to_string();
    if c_name.is_empty() {
        c_name = "Sheet".to_string();
    }

    c_name.chars().take(N_LEN_EXCEL_SHEET_NAME_MAX).collect()
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region HeaderNormalization

/// Header text for one cell of the header row.
///
/// Blank cells become `Unnamed: {idx_col}`.
pub fn derive_header_text(value: &EnumCellValue, idx_col: usize) -> String {
    let c_text = value.to_string();
    if c_text.trim().is_empty() {
        return format!("{C_HEADER_UNNAMED_PREFIX}{idx_col}");
    }
    c_text
}

/// Header cell written back for a column.
///
/// Typed cells are kept when their text survived deduplication; blank, text
/// and renamed headers are written as the column name.
pub fn derive_header_cell(value: EnumCellValue, column_name: &str) -> EnumCellValue {
    match value {
        EnumCellValue::None | EnumCellValue::String(_) => {
            EnumCellValue::String(column_name.to_string())
        }
        value if value.to_string() == column_name => value,
        _ => EnumCellValue::String(column_name.to_string()),
    }
}

/// Make column names unique by suffixing repeats with `.1`, `.2`, ...
///
/// The first occurrence keeps its name; a suffix is skipped when it would
/// collide with a name already present.
pub fn derive_unique_column_names(columns: &[String]) -> Vec<String> {
    let mut set_names_taken: BTreeSet<String> = BTreeSet::new();
    let mut l_names = Vec::with_capacity(columns.len());

    for c_name in columns {
        if set_names_taken.insert(c_name.clone()) {
            l_names.push(c_name.clone());
            continue;
        }

        let mut n_idx = 1usize;
        loop {
            let c_candidate = format!("{c_name}.{n_idx}");
            if !columns.contains(&c_candidate) && set_names_taken.insert(c_candidate.clone()) {
                l_names.push(c_candidate);
                break;
            }
            n_idx += 1;
        }
    }

    l_names
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
