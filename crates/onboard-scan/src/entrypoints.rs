use std::path::{Path, PathBuf};

use crate::manifest::PackageJson;
use crate::paths;

/// Conventional entry files, tried after the manifest's own entries.
pub const DEFAULT_ENTRYPOINTS: &[&str] = &["src/index.ts", "src/index.js"];

/// Resolve the workspace's entry files.
///
/// Candidates are taken in precedence order: every `bin` target, then
/// `main`, then [`DEFAULT_ENTRYPOINTS`]. Each is resolved against `root`
/// and normalized lexically; only paths that exist survive, and a path seen
/// twice keeps its first position.
///
/// # Examples
///
/// ```
/// use std::fs;
/// use onboard_scan::entrypoints::resolve_entrypoints;
///
/// let dir = tempfile::tempdir().unwrap();
/// fs::create_dir_all(dir.path().join("src")).unwrap();
/// fs::write(dir.path().join("src/index.ts"), "").unwrap();
///
/// let found = resolve_entrypoints(dir.path(), None);
/// assert_eq!(found, vec![dir.path().join("src/index.ts")]);
/// ```
pub fn resolve_entrypoints(root: &Path, package: Option<&PackageJson>) -> Vec<PathBuf> {
    let declared = package
        .into_iter()
        .flat_map(|pkg| pkg.bin.iter().chain(pkg.main.iter()))
        .map(String::as_str);
    let candidates = declared.chain(DEFAULT_ENTRYPOINTS.iter().copied());

    let mut found: Vec<PathBuf> = Vec::new();
    for candidate in candidates {
        let path = paths::resolve(root, candidate);
        if path.exists() && !found.contains(&path) {
            found.push(path);
        }
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "").unwrap();
    }

    #[test]
    fn precedence_is_bin_then_main_then_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        touch(root, "bin/cli.js");
        touch(root, "lib/main.js");
        touch(root, "src/index.ts");
        touch(root, "src/index.js");

        let pkg = PackageJson {
            main: Some("lib/main.js".into()),
            bin: vec!["bin/cli.js".into()],
            ..PackageJson::default()
        };
        assert_eq!(
            resolve_entrypoints(root, Some(&pkg)),
            vec![
                root.join("bin/cli.js"),
                root.join("lib/main.js"),
                root.join("src/index.ts"),
                root.join("src/index.js"),
            ]
        );
    }

    #[test]
    fn duplicates_keep_first_position() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        touch(root, "src/index.ts");

        let pkg = PackageJson {
            main: Some("src/index.ts".into()),
            bin: vec!["./src/../src/index.ts".into()],
            ..PackageJson::default()
        };
        assert_eq!(
            resolve_entrypoints(root, Some(&pkg)),
            vec![root.join("src/index.ts")]
        );
    }

    #[test]
    fn missing_targets_are_dropped() {
        let dir = tempfile::tempdir().unwrap();
        let pkg = PackageJson {
            main: Some("dist/index.js".into()),
            bin: vec!["bin/gone.js".into()],
            ..PackageJson::default()
        };
        assert!(resolve_entrypoints(dir.path(), Some(&pkg)).is_empty());
    }
}
