//! Split orchestration: load, plan, then write one workbook per chunk.

use std::path::Path;

use sheetsplit_io_fs::{derive_file_stem, derive_output_path, ensure_directory};
use sheetsplit_io_xlsx::{derive_output_file_name, plan_row_chunks, read_table, write_table_file};

use crate::event::{EnumSplitEvent, SplitEventSink, calculate_progress_percent};
use crate::report::{ReportSplit, ReportSplitBuilder};
use crate::spec::{SpecSplitJob, SpecSplitOptions, SplitError};

/// Split the first sheet of `path_file_input` into files of at most
/// `n_rows_per_file` data rows inside `path_dir_output`.
///
/// Steps:
/// 1. Validate `n_rows_per_file >= 1` (no I/O on failure).
/// 2. Load the whole table.
/// 3. Plan contiguous chunks.
/// 4. Create the output directory (and parents) when missing.
/// 5. Write chunks strictly in order as `{stem}_{NNN}.xlsx`, emitting one
///    progress event and one status line after each file.
///
/// A write failure aborts the remaining chunks; files already written stay
/// on disk. Existing files with the same names are overwritten.
pub fn split_file(
    path_file_input: &Path,
    path_dir_output: &Path,
    n_rows_per_file: usize,
    options: &SpecSplitOptions,
    sink: &mut impl SplitEventSink,
) -> Result<ReportSplit, SplitError> {
    if n_rows_per_file == 0 {
        return Err(SplitError::InvalidInput(
            "Rows per file must be greater than 0.".to_string(),
        ));
    }
    let stem = derive_file_stem(path_file_input)
        .map_err(|e| SplitError::InvalidInput(e.to_string()))?;

    sink.emit(EnumSplitEvent::Status("Start splitting file...".to_string()));
    tracing::info!(
        input = %path_file_input.display(),
        output = %path_dir_output.display(),
        n_rows_per_file,
        "split started"
    );

    let table = read_table(path_file_input).map_err(|e| {
        tracing::warn!(error = %e, "split aborted: input not readable");
        SplitError::from_read_error(e)
    })?;
    let n_rows_total = table.height();

    let l_chunks =
        plan_row_chunks(n_rows_total, n_rows_per_file).map_err(SplitError::InvalidInput)?;
    let mut spec_job = SpecSplitJob {
        path_file_input: path_file_input.to_path_buf(),
        path_dir_output: path_dir_output.to_path_buf(),
        n_rows_per_file,
        idx_chunk_current: 0,
        n_files: l_chunks.len(),
    };
    sink.emit(EnumSplitEvent::Status(format!(
        "Total {n_rows_total} rows of data, will split into {} files",
        spec_job.n_files
    )));

    ensure_directory(path_dir_output).map_err(|e| {
        tracing::warn!(error = %e, "split aborted: output directory not usable");
        SplitError::from_fs_write_error(path_dir_output, e)
    })?;

    let mut builder_report = ReportSplitBuilder::new(path_dir_output.to_path_buf(), n_rows_total);
    for chunk in &l_chunks {
        spec_job.idx_chunk_current = chunk.idx_chunk;

        let view = table
            .slice_rows(chunk.row_start_inclusive, chunk.row_end_exclusive)
            .map_err(SplitError::InvalidInput)?;
        let file_name = derive_output_file_name(&stem, chunk.idx_chunk + 1);
        let path_file_out = derive_output_path(&spec_job.path_dir_output, &file_name)
            .map_err(|e| SplitError::from_fs_write_error(path_dir_output, e))?;

        write_table_file(
            &path_file_out,
            view,
            &options.sheet_name_out,
            &options.write_options,
        )
        .map_err(|message| {
            tracing::warn!(file = %path_file_out.display(), %message, "chunk write failed");
            SplitError::from_write_text(&path_file_out, message)
        })?;
        tracing::debug!(?spec_job, file = %file_name, n_rows = chunk.len(), "chunk written");

        let n_files_done = chunk.idx_chunk + 1;
        sink.emit(EnumSplitEvent::Progress {
            n_files_done,
            n_files_total: spec_job.n_files,
            percent: calculate_progress_percent(n_files_done, spec_job.n_files),
        });
        sink.emit(EnumSplitEvent::Status(format!(
            "Generated: {file_name} ({} rows)",
            chunk.len()
        )));
        builder_report.add_file(file_name, chunk.len());
    }

    let report = builder_report.build();
    sink.emit(EnumSplitEvent::Status("Split complete!".to_string()));
    sink.emit(EnumSplitEvent::Status(format!(
        "Output directory: {}",
        path_dir_output.display()
    )));
    tracing::info!(%report, "split finished");
    Ok(report)
}
