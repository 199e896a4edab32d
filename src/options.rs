use crate::utils::PARQUET_EXTENSIONS;
use nutype::nutype;

/// A file extension used for suffix matching, e.g. `.parquet`.
///
/// Extensions are lowercased on construction so that matching against a
/// lowercased file name is case-insensitive on both sides.
///
/// # Examples
///
/// ```rust
/// use duckranges::options::Extension;
/// let ext = Extension::new(String::from(".PARQ"));
/// assert_eq!(ext.to_string(), ".parq");
/// assert!(ext.matches("peaks.parq"));
/// ```
#[nutype(
    sanitize(lowercase),
    derive(Debug, Clone, PartialEq, Eq, Hash, AsRef, Display)
)]
pub struct Extension(String);

impl Extension {
    /// Returns `true` if the (already lowercased) `file_name` ends with this extension.
    pub fn matches(&self, file_name: &str) -> bool {
        let ext: &str = self.as_ref();
        file_name.ends_with(ext)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// Options controlling how [crate::validate_file_path] checks a path.
///
/// # Fields
///
/// * `allowed_extensions`: If `Some`, the file name must end with one of these
///   extensions (case-insensitive). The values are kept as given so that
///   error messages echo what the caller asked for.
/// * `check_exists`: If `true`, the path must exist.
/// * `dirs_allowed`: If `true`, an existing directory is accepted in place of a file.
///
/// # Default
///
/// No extension restriction, existence required, directories rejected.
///
/// # Examples
///
/// ```rust
/// use duckranges::options::PathOptions;
/// let opts = PathOptions::new(Some(&[".bed"][..]), true, false);
/// assert_eq!(opts.allowed_extensions, Some(vec![String::from(".bed")]));
/// assert!(!PathOptions::default().dirs_allowed);
/// ```
pub struct PathOptions {
    pub allowed_extensions: Option<Vec<String>>,
    pub check_exists: bool,
    pub dirs_allowed: bool,
}

impl Default for PathOptions {
    fn default() -> PathOptions {
        PathOptions {
            allowed_extensions: None,
            check_exists: true,
            dirs_allowed: false,
        }
    }
}

impl PathOptions {
    pub fn new<T: AsRef<str>>(
        allowed_extensions: Option<&[T]>,
        check_exists: bool,
        dirs_allowed: bool,
    ) -> PathOptions {
        PathOptions {
            allowed_extensions: allowed_extensions
                .map(|exts| exts.iter().map(|e| e.as_ref().to_string()).collect()),
            check_exists,
            dirs_allowed,
        }
    }

    /// The options used for Parquet inputs: `.parquet`/`.parq` files that must
    /// exist, or a directory holding such files (partitioned datasets).
    pub fn parquet() -> PathOptions {
        PathOptions::new(Some(PARQUET_EXTENSIONS.as_slice()), true, true)
    }

    /// The allowed extensions normalised for matching, if any were given.
    pub fn extensions(&self) -> Option<Vec<Extension>> {
        self.allowed_extensions
            .as_ref()
            .map(|exts| exts.iter().map(|e| Extension::new(e.to_string())).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_lowercases() {
        let ext = Extension::new(String::from(".PaRqUeT"));
        assert_eq!(ext.to_string(), ".parquet");
        assert!(ext.matches("intervals.parquet"));
        assert!(!ext.matches("intervals.parq"));
    }

    #[test]
    fn test_extension_as_str() {
        let ext = Extension::new(String::from(".BED"));
        let inner: &str = ext.as_ref();
        assert_eq!(inner, ".bed");
        assert!(ext.matches("peaks.bed"));
        assert!(!ext.matches("peaks.bed.gz"));
    }

    #[test]
    fn test_parquet_options() {
        let opts = PathOptions::parquet();
        assert!(opts.check_exists);
        assert!(opts.dirs_allowed);
        let exts = opts.extensions().unwrap();
        assert_eq!(exts.len(), 2);
        assert!(exts.iter().any(|e| e.matches("a.parq")));
    }

    #[test]
    fn test_default_has_no_extensions() {
        let opts = PathOptions::default();
        assert!(opts.extensions().is_none());
        assert!(opts.check_exists);
    }
}
