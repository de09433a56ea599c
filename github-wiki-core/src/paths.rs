//! Path normalization against an explicit working directory.

use std::path::{Component, Path, PathBuf};

/// Makes `path` absolute relative to `cwd`.
///
/// Empty and `.`/`./` resolve to `cwd`. Absolute paths come back with any
/// trailing separator removed. Relative paths are joined onto `cwd` and
/// canonicalized when the target exists; otherwise the joined path is kept
/// so error messages can still name it.
pub fn make_absolute(path: &Path, cwd: &Path) -> PathBuf {
    let is_current = path
        .components()
        .all(|c| matches!(c, Component::CurDir));
    if path.as_os_str().is_empty() || is_current {
        return cwd.to_path_buf();
    }
    if path.is_absolute() {
        // Collecting components drops trailing separators.
        return path.components().collect();
    }
    let joined = cwd.join(path);
    joined.canonicalize().unwrap_or(joined)
}
