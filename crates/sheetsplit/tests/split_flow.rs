use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use sheetsplit::{
    EnumSplitErrorKind, EnumSplitEvent, SessionOutcome, SpecSplitOptions, SplitSession,
    analyze_file, split_file,
};
use sheetsplit_io_xlsx::{
    EnumCellValue, EnumReaderKind, SpecTable, derive_default_xlsx_write_options, read_table,
    write_table_file,
};

static N_TEST_DIR: AtomicUsize = AtomicUsize::new(0);

struct TestDir {
    path: PathBuf,
}

impl TestDir {
    fn new() -> Self {
        let n = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock")
            .as_nanos();
        let n_seq = N_TEST_DIR.fetch_add(1, Ordering::SeqCst);
        let path = std::env::temp_dir().join(format!("sheetsplit_flow_test_{n}_{n_seq}"));
        std::fs::create_dir_all(&path).expect("create test dir");
        Self { path }
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TestDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.path);
    }
}

fn build_table(n_rows: usize) -> SpecTable {
    let columns = vec!["id".to_string(), "name".to_string(), "score".to_string()];
    let rows = (0..n_rows)
        .map(|idx| {
            vec![
                EnumCellValue::Integer(idx as i64 + 1),
                EnumCellValue::String(format!("row-{idx}")),
                EnumCellValue::Number(idx as f64 * 0.5),
            ]
        })
        .collect();
    SpecTable::new(columns, rows).expect("table")
}

fn write_fixture(path_dir: &Path, file_name: &str, n_rows: usize) -> (PathBuf, SpecTable) {
    let table = build_table(n_rows);
    let path_file = path_dir.join(file_name);
    write_table_file(
        &path_file,
        table.view(),
        "Data",
        &derive_default_xlsx_write_options(),
    )
    .expect("write fixture");
    (path_file, table)
}

fn assert_rows_equivalent(l_actual: &[Vec<EnumCellValue>], l_expected: &[Vec<EnumCellValue>]) {
    assert_eq!(l_actual.len(), l_expected.len());
    for (row_actual, row_expected) in l_actual.iter().zip(l_expected) {
        assert_eq!(row_actual.len(), row_expected.len());
        for (cell_actual, cell_expected) in row_actual.iter().zip(row_expected) {
            assert!(
                cell_actual.is_equivalent_to(cell_expected),
                "{cell_actual:?} != {cell_expected:?}"
            );
        }
    }
}

#[test]
fn split_125_rows_into_three_files() {
    let tmp = TestDir::new();
    let (path_file_in, table) = write_fixture(tmp.path(), "data.xlsx", 125);
    let path_dir_out = tmp.path().join("out");

    let mut l_events = Vec::new();
    let report = split_file(
        &path_file_in,
        &path_dir_out,
        50,
        &SpecSplitOptions::default(),
        &mut l_events,
    )
    .expect("split");

    assert_eq!(report.file_count(), 3);
    assert_eq!(report.per_file_row_counts(), vec![50, 50, 25]);
    assert_eq!(report.n_rows_total, 125);

    let mut l_concat = Vec::new();
    for (idx, n_rows) in [(1, 50), (2, 50), (3, 25)] {
        let path_file = path_dir_out.join(format!("data_{idx:03}.xlsx"));
        let chunk = read_table(&path_file).expect("read chunk");
        assert_eq!(chunk.columns(), table.columns());
        assert_eq!(chunk.height(), n_rows);
        l_concat.extend(chunk.rows().iter().cloned());
    }
    assert!(!path_dir_out.join("data_004.xlsx").exists());
    assert_rows_equivalent(&l_concat, table.rows());

    let l_percents: Vec<f64> = l_events
        .iter()
        .filter_map(|event| match event {
            EnumSplitEvent::Progress { percent, .. } => Some(*percent),
            _ => None,
        })
        .collect();
    assert_eq!(l_percents.len(), 3);
    assert!(l_percents[..2].iter().all(|percent| *percent < 100.0));
    assert_eq!(l_percents[2], 100.0);
    assert!(!l_events.iter().any(EnumSplitEvent::is_terminal));

    let l_status: Vec<&str> = l_events
        .iter()
        .filter_map(|event| match event {
            EnumSplitEvent::Status(c_line) => Some(c_line.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(l_status[0], "Start splitting file...");
    assert_eq!(l_status[1], "Total 125 rows of data, will split into 3 files");
    assert!(l_status.contains(&"Generated: data_003.xlsx (25 rows)"));
    assert!(l_status.contains(&"Split complete!"));
}

#[test]
fn exact_multiple_and_single_row_chunks() {
    let tmp = TestDir::new();
    let (path_file_in, _) = write_fixture(tmp.path(), "exact.xlsx", 4);

    let path_dir_whole = tmp.path().join("whole");
    let report = split_file(
        &path_file_in,
        &path_dir_whole,
        4,
        &SpecSplitOptions::default(),
        &mut Vec::new(),
    )
    .expect("split whole");
    assert_eq!(report.per_file_row_counts(), vec![4]);

    let path_dir_single = tmp.path().join("single");
    let report = split_file(
        &path_file_in,
        &path_dir_single,
        1,
        &SpecSplitOptions::default(),
        &mut Vec::new(),
    )
    .expect("split single");
    assert_eq!(report.per_file_row_counts(), vec![1, 1, 1, 1]);
    assert!(path_dir_single.join("exact_004.xlsx").is_file());
}

#[test]
fn unlisted_extension_is_split_through_sniffing_reader() {
    let tmp = TestDir::new();
    let (path_xlsx, table) = write_fixture(tmp.path(), "data.xlsx", 12);
    let path_file_in = tmp.path().join("export.dat");
    std::fs::copy(&path_xlsx, &path_file_in).expect("copy");

    let info = analyze_file(&path_file_in).expect("analyze");
    assert_eq!(info.reader, EnumReaderKind::Auto);
    assert_eq!(info.n_rows_total, 12);

    let path_dir_out = tmp.path().join("out");
    let report = split_file(
        &path_file_in,
        &path_dir_out,
        5,
        &SpecSplitOptions::default(),
        &mut Vec::new(),
    )
    .expect("split");
    assert_eq!(report.per_file_row_counts(), vec![5, 5, 2]);

    let chunk = read_table(&path_dir_out.join("export_003.xlsx")).expect("read chunk");
    assert_eq!(chunk.columns(), table.columns());
    assert_rows_equivalent(chunk.rows(), &table.rows()[10..]);
}

#[test]
fn header_only_input_produces_no_files() {
    let tmp = TestDir::new();
    let (path_file_in, _) = write_fixture(tmp.path(), "empty.xlsx", 0);
    let path_dir_out = tmp.path().join("out");

    let report = split_file(
        &path_file_in,
        &path_dir_out,
        10,
        &SpecSplitOptions::default(),
        &mut Vec::new(),
    )
    .expect("split");
    assert_eq!(report.file_count(), 0);
    let n_entries = std::fs::read_dir(&path_dir_out).expect("out dir").count();
    assert_eq!(n_entries, 0);
}

#[test]
fn nested_output_directory_is_created_and_rerun_overwrites() {
    let tmp = TestDir::new();
    let (path_file_in, _) = write_fixture(tmp.path(), "data.xlsx", 7);
    let path_dir_out = tmp.path().join("a").join("b");

    for _ in 0..2 {
        let report = split_file(
            &path_file_in,
            &path_dir_out,
            5,
            &SpecSplitOptions::default(),
            &mut Vec::new(),
        )
        .expect("split");
        assert_eq!(report.per_file_row_counts(), vec![5, 2]);
    }
    assert!(path_dir_out.join("data_002.xlsx").is_file());
}

#[test]
fn write_failure_keeps_earlier_files_and_stops() {
    let tmp = TestDir::new();
    let (path_file_in, _) = write_fixture(tmp.path(), "data.xlsx", 30);
    let path_dir_out = tmp.path().join("out");
    std::fs::create_dir_all(path_dir_out.join("data_002.xlsx")).expect("blocker");

    let mut l_events = Vec::new();
    let err = split_file(
        &path_file_in,
        &path_dir_out,
        10,
        &SpecSplitOptions::default(),
        &mut l_events,
    )
    .expect_err("blocked");

    assert_eq!(err.kind(), EnumSplitErrorKind::WriteError);
    assert!(path_dir_out.join("data_001.xlsx").is_file());
    assert!(!path_dir_out.join("data_003.xlsx").exists());
    let n_progress = l_events
        .iter()
        .filter(|event| matches!(event, EnumSplitEvent::Progress { .. }))
        .count();
    assert_eq!(n_progress, 1);
}

#[test]
fn session_runs_split_and_resets_trigger() {
    let tmp = TestDir::new();
    let (path_file_in, _) = write_fixture(tmp.path(), "data.xlsx", 125);

    let mut session = SplitSession::default();
    session.select_input_file(path_file_in.clone());
    assert_eq!(session.output_dir(), Some(tmp.path()));
    assert_eq!(session.file_info().map(|info| info.n_rows_total), Some(125));
    assert_eq!(session.file_info().map(|info| info.n_columns), Some(3));

    session.set_rows_per_file_text("40");
    let l_log = session.status_log();
    assert_eq!(
        l_log.last().map(String::as_str),
        Some("  Splitting at 40 rows per file will generate 4 files")
    );
    assert!(l_log.iter().any(|c_line| c_line == "--- Recalculating split info ---"));

    let path_dir_out = tmp.path().join("out");
    session.select_output_dir(path_dir_out.clone());
    session.start_split().expect("start");
    assert!(!session.is_split_enabled());
    assert!(session.start_split().is_err());

    let outcome = session.wait().expect("outcome");
    match &outcome {
        SessionOutcome::Completed(report) => assert_eq!(report.file_count(), 4),
        SessionOutcome::Failed(err) => panic!("split failed: {err}"),
    }
    assert_eq!(outcome.alert_text(), "File split complete!\nGenerated 4 files");
    assert!(session.is_split_enabled());
    assert!(!session.is_running());
    assert_eq!(session.progress_percent(), 0.0);
    assert!(session.status_log().iter().any(|c_line| c_line == "Split complete!"));
    assert!(path_dir_out.join("data_004.xlsx").is_file());
    assert!(session.wait().is_none());
}

#[test]
fn session_failure_reenables_trigger() {
    let tmp = TestDir::new();
    let path_file_in = tmp.path().join("broken.xlsx");
    std::fs::write(&path_file_in, b"not a workbook").expect("write");

    let mut session = SplitSession::default();
    session.select_input_file(path_file_in);
    assert!(session.file_info().is_none());
    assert!(
        session
            .status_log()
            .iter()
            .any(|c_line| c_line.starts_with("File analysis failed:"))
    );

    session.start_split().expect("start");
    let outcome = session.wait().expect("outcome");
    match &outcome {
        SessionOutcome::Failed(err) => assert_eq!(err.kind(), EnumSplitErrorKind::ReadError),
        SessionOutcome::Completed(_) => panic!("broken input must fail"),
    }
    assert!(outcome.alert_text().starts_with("Split failed: "));
    assert!(session.is_split_enabled());
    assert_eq!(session.progress_percent(), 0.0);
}
