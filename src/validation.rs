//! Filesystem path validation.
//!
//! [validate_file_path] normalises a user-supplied path and checks it, in
//! order, for existence, file/directory kind and extension. The checks are
//! read-only and the result is only valid at the time of the call.

use crate::error::{DuckRangesError, Result};
use crate::options::PathOptions;
use crate::utils::has_extension;
use std::path::{Component, Path, PathBuf};
use tracing::trace;

/// Validates `path` and returns its absolute, symlink-resolved form.
///
/// ### Arguments
///
/// * `path`: The path to check. A leading `~` is expanded to the current user's
///   home directory (`~name` is not expanded).
/// * `allowed_extensions`: If `Some`, the file name must end with one of these
///   extensions, compared case-insensitively.
/// * `check_exists`: If `true`, the path must exist.
/// * `dirs_allowed`: If `true`, an existing directory is returned as is.
///
/// ### Returns
///
/// * [Ok]`(PathBuf)` with the resolved path if all checks pass.
/// * [DuckRangesError::NotFound] if `check_exists` is set and nothing exists at the path.
/// * [DuckRangesError::IsDirectory] if the path is an existing directory and `dirs_allowed` is `false`.
/// * [DuckRangesError::InvalidFormat] if the file name matches none of `allowed_extensions`.
///
/// ### Example
///
/// ```rust,no_run
/// use duckranges::validate_file_path;
/// let p = validate_file_path("~/data/peaks.parquet", Some(&[".parquet", ".parq"][..]), true, false)?;
/// assert!(p.is_absolute());
/// # Ok::<(), duckranges::DuckRangesError>(())
/// ```
pub fn validate_file_path<P: AsRef<Path>, T: AsRef<str>>(
    path: P,
    allowed_extensions: Option<&[T]>,
    check_exists: bool,
    dirs_allowed: bool,
) -> Result<PathBuf> {
    PathOptions::new(allowed_extensions, check_exists, dirs_allowed).validate(path)
}

impl PathOptions {
    /// Validates `path` against these options. See [validate_file_path].
    pub fn validate<P: AsRef<Path>>(&self, path: P) -> Result<PathBuf> {
        let path = resolve_path(expand_home(path.as_ref()))?;
        trace!("validating path {:?}", path);

        if self.check_exists {
            if !path.exists() {
                return Err(DuckRangesError::NotFound { path });
            }
            if path.is_dir() {
                if !self.dirs_allowed {
                    return Err(DuckRangesError::IsDirectory { path });
                }
                return Ok(path);
            }
        }

        if let Some(extensions) = self.extensions() {
            if !has_extension(&path, &extensions) {
                return Err(DuckRangesError::InvalidFormat {
                    path,
                    allowed: self.allowed_extensions.clone().unwrap_or_default(),
                });
            }
        }

        // only reachable with `check_exists == false`: an unchecked path that
        // turns out to be a directory is still never treated as a file.
        if !self.dirs_allowed && path.is_dir() {
            return Err(DuckRangesError::IsDirectory { path });
        }

        Ok(path)
    }
}

/// Replaces a leading `~` component with the current user's home directory.
/// Paths without one, or a missing `HOME`, leave the path unchanged.
///
/// Only the current user is expanded: `~name/...` forms are kept literally and
/// end up relative to the working directory.
pub(crate) fn expand_home(path: &Path) -> PathBuf {
    let mut components = path.components();
    match components.next() {
        Some(Component::Normal(first)) if first == "~" => match std::env::var_os("HOME") {
            Some(home) => PathBuf::from(home).join(components.as_path()),
            None => path.to_path_buf(),
        },
        _ => path.to_path_buf(),
    }
}

/// Makes `path` absolute and resolves symlinks without requiring it to exist.
///
/// The longest existing ancestor is canonicalised and the remaining
/// components are appended, with `.` dropped and `..` popping a component.
pub(crate) fn resolve_path(path: PathBuf) -> Result<PathBuf> {
    let absolute = if path.is_absolute() {
        path
    } else {
        std::env::current_dir()?.join(path)
    };

    if let Ok(resolved) = absolute.canonicalize() {
        return Ok(resolved);
    }

    let mut existing = absolute.as_path();
    let mut rest: Vec<Component> = Vec::new();
    let mut resolved = loop {
        match existing.canonicalize() {
            Ok(p) => break p,
            Err(_) => {
                let mut comps = existing.components();
                match comps.next_back() {
                    Some(last) => {
                        rest.push(last);
                        existing = comps.as_path();
                    }
                    // nothing exists, not even the root
                    None => break PathBuf::new(),
                }
            }
        }
    };

    for comp in rest.into_iter().rev() {
        match comp {
            Component::CurDir => {}
            Component::ParentDir => {
                resolved.pop();
            }
            other => resolved.push(other.as_os_str()),
        }
    }
    Ok(resolved)
}
