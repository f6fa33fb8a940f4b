use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

/// Entry names that are always pruned: dependency caches, build output and
/// version-control metadata.
pub const EXCLUDED_NAMES: &[&str] = &["node_modules", "dist", ".git"];

/// The set of entry names a walk never descends into or reports.
///
/// # Examples
///
/// ```
/// use std::ffi::OsStr;
/// use onboard_scan::walker::Exclusions;
///
/// let exclusions = Exclusions::new(&["coverage".to_string()]);
/// assert!(exclusions.is_excluded(OsStr::new("node_modules")));
/// assert!(exclusions.is_excluded(OsStr::new("coverage")));
/// assert!(!exclusions.is_excluded(OsStr::new("src")));
/// ```
#[derive(Debug, Clone)]
pub struct Exclusions {
    names: Vec<String>,
}

impl Exclusions {
    /// Built-in names plus `extra`.
    pub fn new(extra: &[String]) -> Self {
        let mut names: Vec<String> = EXCLUDED_NAMES.iter().map(|s| s.to_string()).collect();
        for name in extra {
            if !names.contains(name) {
                names.push(name.clone());
            }
        }
        Self { names }
    }

    /// Whether an entry with this file name is excluded.
    pub fn is_excluded(&self, name: &OsStr) -> bool {
        let name = name.to_string_lossy();
        self.names.iter().any(|n| *n == name)
    }

    /// Whether any component of `path` is excluded.
    pub fn excludes_any_component(&self, path: &Path) -> bool {
        path.components()
            .any(|c| self.is_excluded(c.as_os_str()))
    }
}

impl Default for Exclusions {
    fn default() -> Self {
        Self::new(&[])
    }
}

/// Walk `root` depth-first and return every non-directory entry.
///
/// Excluded directories are pruned before they are entered. Entries come
/// back in the order the filesystem enumerates them; nothing is sorted.
/// Symlinks are reported as files and never followed. A missing root (or a
/// root that is not a directory) yields an empty list. A subtree that cannot
/// be read is logged and skipped while the rest of the walk continues.
///
/// # Examples
///
/// ```no_run
/// use std::path::Path;
/// use onboard_scan::walker::{walk_files, Exclusions};
///
/// for path in walk_files(Path::new("."), &Exclusions::default()) {
///     println!("{}", path.display());
/// }
/// ```
pub fn walk_files(root: &Path, exclusions: &Exclusions) -> Vec<PathBuf> {
    if !root.is_dir() {
        debug!(root = %root.display(), "walk root is not a directory");
        return Vec::new();
    }

    let prune = exclusions.clone();
    let walker = ignore::WalkBuilder::new(root)
        .standard_filters(false)
        .follow_links(false)
        .filter_entry(move |entry| entry.depth() == 0 || !prune.is_excluded(entry.file_name()))
        .build();

    let mut files = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(e) => e,
            Err(err) => {
                warn!(error = %err, "skipping unreadable part of the workspace");
                continue;
            }
        };

        let Some(file_type) = entry.file_type() else {
            continue;
        };
        if file_type.is_dir() {
            continue;
        }

        files.push(entry.into_path());
    }

    files
}
