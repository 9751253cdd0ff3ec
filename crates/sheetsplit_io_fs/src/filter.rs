//! File-picker filters and directory listing.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};

use crate::spec::{FsError, SpecFileFilter};

/// Filters offered by the input file picker: spreadsheets first, then all files.
pub fn derive_default_file_filters() -> Vec<SpecFileFilter> {
    vec![
        SpecFileFilter::new("Excel files", &["*.xlsx", "*.xls"]),
        SpecFileFilter::new("All files", &["*"]),
    ]
}

/// Compiled form of a [`SpecFileFilter`].
#[derive(Debug, Clone)]
pub struct FileFilterMatcher {
    set_glob: GlobSet,
}

impl FileFilterMatcher {
    /// Compile the filter's patterns; matching ignores ASCII case.
    pub fn new(filter: &SpecFileFilter) -> Result<Self, FsError> {
        let mut builder = GlobSetBuilder::new();
        for pattern in &filter.patterns {
            let glob = GlobBuilder::new(pattern)
                .case_insensitive(true)
                .literal_separator(true)
                .build()
                .map_err(|e| FsError::InvalidPattern(format!("Invalid file filter pattern: {e}")))?;
            builder.add(glob);
        }
        let set_glob = builder
            .build()
            .map_err(|e| FsError::InvalidPattern(format!("Invalid file filter pattern: {e}")))?;
        Ok(Self { set_glob })
    }

    /// Whether the basename of `path` matches any pattern.
    pub fn is_match(&self, path: &Path) -> bool {
        path.file_name()
            .is_some_and(|name| self.set_glob.is_match(Path::new(name)))
    }
}

fn derive_list_error(path_dir: &Path, err: &io::Error) -> FsError {
    FsError::DirectoryListFailed {
        path: path_dir.to_path_buf(),
        message: err.to_string(),
    }
}

/// Directory entries visible in the picker: sub-directories plus files
/// matching `filter`, each group sorted by name.
pub fn list_picker_entries(
    path_dir: &Path,
    filter: &SpecFileFilter,
) -> Result<(Vec<PathBuf>, Vec<PathBuf>), FsError> {
    if !path_dir.is_dir() {
        return Err(FsError::NotADirectory(path_dir.to_path_buf()));
    }
    let matcher = FileFilterMatcher::new(filter)?;
    let it_entries = fs::read_dir(path_dir).map_err(|e| derive_list_error(path_dir, &e))?;

    let mut l_dirs = Vec::new();
    let mut l_files = Vec::new();
    for entry in it_entries.flatten() {
        let path_entry = entry.path();
        if path_entry.is_dir() {
            l_dirs.push(path_entry);
        } else if matcher.is_match(&path_entry) {
            l_files.push(path_entry);
        }
    }
    l_dirs.sort();
    l_files.sort();
    Ok((l_dirs, l_files))
}
