use crate::conf::error::ConfigError;
use glob::{Pattern, glob};
use std::path::{Path, PathBuf};

/// Discovers every file belonging to a logical log path.
///
/// The live file, its rotated siblings (`access.log.1`, `access.log-20240101`)
/// and their compressed variants (`access.log.1.gz`) all share the base path as
/// a prefix, so they are found with the glob `basepath*`. Directories are skipped.
///
/// Paths are returned in lexicographic order. This is a naming heuristic that
/// puts older-looking names first, not a chronological guarantee.
///
/// # Errors
///
/// Returns `ConfigError::Glob` if the base path produces a malformed pattern.
pub fn discover_log_files(base: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let pattern = sibling_pattern(base);
    let mut paths: Vec<_> = glob(&pattern)
        .map_err(|e| ConfigError::Glob {
            pattern: pattern.clone(),
            source: e,
        })?
        .filter_map(Result::ok)
        .filter(|p| p.is_file())
        .collect();

    paths.sort();
    Ok(paths)
}

/// Builds the `basepath*` glob, escaping any glob metacharacters that are
/// part of the base path itself.
pub fn sibling_pattern(base: &Path) -> String {
    format!("{}*", Pattern::escape(&base.to_string_lossy()))
}

/// Returns true when the path names a gzip-compressed file.
pub fn is_gzip(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("gz"))
}
