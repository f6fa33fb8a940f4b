use std::path::{Component, Path, PathBuf};

/// Make `path` absolute against the current directory and normalize it
/// lexically. Symlinks are not resolved.
pub(crate) fn absolutize(path: &Path) -> std::io::Result<PathBuf> {
    if path.is_absolute() {
        return Ok(normalize(path));
    }
    Ok(normalize(&std::env::current_dir()?.join(path)))
}

/// Resolve `relative` against `base` the way a shell would, without touching
/// the filesystem. Absolute inputs replace the base.
pub(crate) fn resolve(base: &Path, relative: &str) -> PathBuf {
    normalize(&base.join(relative))
}

/// Collapse `.` and `..` components lexically.
pub(crate) fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                // `..` at the root stays at the root
                let ends_in_parent =
                    matches!(out.components().next_back(), Some(Component::ParentDir));
                if ends_in_parent || (!out.pop() && !out.has_root()) {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Path relative to `root` with forward slashes, for glob matching and display.
pub(crate) fn relative_slash(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.to_string_lossy().replace('\\', "/")
}
