//! Output path helpers: destination safety, file stems and directory setup.

use std::fs;
use std::path::{Path, PathBuf};

use crate::spec::FsError;

////////////////////////////////////////////////////////////////////////////////
// #region PathUtilities

fn _absolutize_path(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(path)
}

pub(crate) fn validate_destination_path_safety(
    path_dst_item: &Path,
    path_dir_dst_root: &Path,
) -> Result<(), FsError> {
    let path_dir_dst_root_abs = _absolutize_path(path_dir_dst_root);
    let path_dst_item_abs = _absolutize_path(path_dst_item);

    let if_is_direct_child = path_dst_item_abs.parent() == Some(path_dir_dst_root_abs.as_path());
    if !if_is_direct_child {
        return Err(FsError::UnsafeDestination {
            path: path_dst_item.to_path_buf(),
            root: path_dir_dst_root.to_path_buf(),
        });
    }
    Ok(())
}

/// Base name of `path` without its extension.
pub fn derive_file_stem(path: &Path) -> Result<String, FsError> {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().to_string())
        .filter(|stem| !stem.is_empty())
        .ok_or_else(|| FsError::InvalidFileName(path.to_path_buf()))
}

/// Join `file_name` onto `path_dir`, rejecting names that leave the directory.
pub fn derive_output_path(path_dir: &Path, file_name: &str) -> Result<PathBuf, FsError> {
    let path_out = path_dir.join(file_name);
    validate_destination_path_safety(&path_out, path_dir)?;
    Ok(path_out)
}

/// Create `path_dir` and any missing parents. Existing directories are fine.
pub fn ensure_directory(path_dir: &Path) -> Result<(), FsError> {
    fs::create_dir_all(path_dir).map_err(|e| FsError::DirectoryInitFailed {
        path: path_dir.to_path_buf(),
        message: e.to_string(),
    })?;
    if !path_dir.is_dir() {
        return Err(FsError::NotADirectory(path_dir.to_path_buf()));
    }
    Ok(())
}

/// Parent directory of a selected file, used to pre-fill the output directory.
pub fn derive_parent_directory(path_file: &Path) -> Option<PathBuf> {
    path_file
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .map(Path::to_path_buf)
}

// #endregion
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use std::time::{SystemTime, UNIX_EPOCH};

    use super::*;

    struct TestDir {
        path: PathBuf,
    }

    impl TestDir {
        fn new() -> Self {
            let n = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .expect("clock")
                .as_nanos();
            let path = std::env::temp_dir().join(format!("sheetsplit_fs_test_{n}"));
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

    #[test]
    fn derive_file_stem_strips_extension() {
        assert_eq!(derive_file_stem(Path::new("/a/b/report.xlsx")).expect("stem"), "report");
        assert_eq!(derive_file_stem(Path::new("data.v2.xls")).expect("stem"), "data.v2");
        assert!(derive_file_stem(Path::new("/")).is_err());
    }

    #[test]
    fn ensure_directory_creates_nested_and_accepts_existing() {
        let tmp = TestDir::new();
        let path_dir = tmp.path().join("a").join("b");
        ensure_directory(&path_dir).expect("create");
        assert!(path_dir.is_dir());
        ensure_directory(&path_dir).expect("existing is fine");
    }

    #[test]
    fn ensure_directory_under_file_fails() {
        let tmp = TestDir::new();
        let path_file = tmp.path().join("plain.txt");
        std::fs::write(&path_file, "x").expect("write");
        let err = ensure_directory(&path_file.join("sub")).expect_err("under a file");
        assert!(matches!(err, FsError::DirectoryInitFailed { .. }));

        let err = ensure_directory(&path_file).expect_err("a file");
        assert!(matches!(
            err,
            FsError::DirectoryInitFailed { .. } | FsError::NotADirectory(_)
        ));
    }

    #[test]
    fn derive_output_path_rejects_escaping_names() {
        let tmp = TestDir::new();
        let path_out = derive_output_path(tmp.path(), "a_001.xlsx").expect("path");
        assert_eq!(path_out, tmp.path().join("a_001.xlsx"));
        assert!(derive_output_path(tmp.path(), "../a_001.xlsx").is_err());
        assert!(derive_output_path(tmp.path(), "sub/a_001.xlsx").is_err());
    }

    #[test]
    fn derive_parent_directory_skips_bare_names() {
        assert_eq!(
            derive_parent_directory(Path::new("/data/in.xlsx")),
            Some(PathBuf::from("/data"))
        );
        assert_eq!(derive_parent_directory(Path::new("in.xlsx")), None);
    }
}
