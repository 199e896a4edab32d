use crate::error::Result;
use crate::options::Extension;
use std::path::{Path, PathBuf};
use tracing::trace;

/// The columns every interval frame must carry.
pub const REQUIRED_COLUMNS: [&str; 3] = ["chr", "start", "end"];

/// File extensions recognised as Parquet.
pub const PARQUET_EXTENSIONS: [&str; 2] = [".parquet", ".parq"];

/// Returns the elements of `vec1` that are not in `vec2`, keeping the order of `vec1`.
pub fn setdiff<T: Eq + Clone>(vec1: &[T], vec2: &[T]) -> Vec<T> {
    let mut diff: Vec<T> = Vec::new();
    for v in vec1.iter() {
        if !vec2.contains(v) {
            diff.push(v.to_owned());
        }
    }
    diff
}

/// Returns `true` if the file name of `path` ends with one of `extensions`,
/// ignoring case. Non UTF-8 bytes in the name are replaced before matching,
/// so only the suffix has to be readable.
pub fn has_extension<P: AsRef<Path>>(path: P, extensions: &[Extension]) -> bool {
    match path.as_ref().file_name() {
        Some(name) => {
            let name = name.to_string_lossy().to_lowercase();
            extensions.iter().any(|e| e.matches(&name))
        }
        None => false,
    }
}

/// Recursively collects the Parquet files below `dir`, sorted by path.
///
/// Hidden entries (names starting with `.` or `_`, e.g. `_SUCCESS` or
/// `_metadata`) are skipped, as partitioned dataset writers use them for
/// bookkeeping. Symlinks to directories are not followed; symlinks to files
/// are collected like regular files.
pub fn parquet_files_in_dir<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
    let extensions: Vec<Extension> = PARQUET_EXTENSIONS
        .iter()
        .map(|e| Extension::new(e.to_string()))
        .collect();
    let mut files = Vec::new();
    let mut stack = vec![dir.as_ref().to_path_buf()];

    while let Some(current) = stack.pop() {
        for entry in std::fs::read_dir(&current)? {
            let entry = entry?;
            let path = entry.path();
            let hidden = path
                .file_name()
                .and_then(|n| n.to_str())
                .map_or(false, |n| n.starts_with('.') || n.starts_with('_'));
            if hidden {
                trace!("skipping hidden entry {:?}", path);
                continue;
            }
            let file_type = entry.file_type()?;
            if file_type.is_dir() {
                stack.push(path);
            } else if file_type.is_symlink() && path.is_dir() {
                trace!("not following directory link {:?}", path);
            } else if has_extension(&path, &extensions) {
                files.push(path);
            }
        }
    }

    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setdiff_keeps_order() {
        let required = ["chr", "start", "end"];
        let available = ["start", "score"];
        assert_eq!(setdiff(&required, &available), vec!["chr", "end"]);
        assert!(setdiff(&required, &required).is_empty());
    }

    #[test]
    fn test_has_extension() {
        let exts = vec![
            Extension::new(String::from(".parquet")),
            Extension::new(String::from(".parq")),
        ];
        assert!(has_extension("/data/a.PARQUET", &exts));
        assert!(has_extension("b.parq", &exts));
        assert!(!has_extension("c.csv", &exts));
        assert!(!has_extension("/", &exts));
    }

    #[cfg(unix)]
    #[test]
    fn test_has_extension_non_utf8_name() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let exts = vec![Extension::new(String::from(".parquet"))];
        let name = OsStr::from_bytes(b"peaks\xff.parquet");
        assert!(has_extension(Path::new("/data").join(name), &exts));
        let name = OsStr::from_bytes(b"peaks\xff.csv");
        assert!(!has_extension(Path::new("/data").join(name), &exts));
    }

    #[test]
    fn test_parquet_files_in_dir() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let nested = dir.path().join("chr=chr2");
        std::fs::create_dir(&nested)?;
        std::fs::write(dir.path().join("b.parquet"), b"")?;
        std::fs::write(dir.path().join("a.PARQ"), b"")?;
        std::fs::write(dir.path().join("notes.txt"), b"")?;
        std::fs::write(dir.path().join("_SUCCESS"), b"")?;
        std::fs::write(nested.join("c.parquet"), b"")?;

        let files = parquet_files_in_dir(dir.path())?;
        let names: Vec<_> = files
            .iter()
            .map(|p| p.strip_prefix(dir.path()).unwrap().to_path_buf())
            .collect();
        assert_eq!(
            names,
            vec![
                PathBuf::from("a.PARQ"),
                PathBuf::from("b.parquet"),
                PathBuf::from("chr=chr2").join("c.parquet"),
            ]
        );
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn test_parquet_files_in_dir_skips_directory_links() -> anyhow::Result<()> {
        use std::os::unix::fs::symlink;

        let dir = tempfile::tempdir()?;
        let nested = dir.path().join("batch0");
        std::fs::create_dir(&nested)?;
        std::fs::write(nested.join("a.parquet"), b"")?;
        // a loop back to the root and a second view of a sibling
        symlink(dir.path(), nested.join("loop"))?;
        symlink(&nested, dir.path().join("alias"))?;
        // a link to a file is still a file
        symlink(nested.join("a.parquet"), dir.path().join("b.parquet"))?;

        let files = parquet_files_in_dir(dir.path())?;
        let names: Vec<_> = files
            .iter()
            .map(|p| p.strip_prefix(dir.path()).unwrap().to_path_buf())
            .collect();
        assert_eq!(
            names,
            vec![
                PathBuf::from("b.parquet"),
                PathBuf::from("batch0").join("a.parquet"),
            ]
        );
        Ok(())
    }
}
