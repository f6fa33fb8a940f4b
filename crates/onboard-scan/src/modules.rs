use std::path::Path;

use onboard_core::{LanguageTag, ModuleBucket};
use tracing::warn;

use crate::walker::{walk_files, Exclusions};

/// Directory (relative to the workspace root) whose children become modules.
pub const SOURCE_DIR: &str = "src";

/// Group source files by the immediate subdirectories of `<root>/src`.
///
/// Each subdirectory becomes one bucket, in the order the filesystem lists
/// them. A bucket holds the `ts`/`js` files of a fresh walk of its subtree
/// with the same exclusions; a subdirectory whose own name is excluded still
/// gets a bucket, but an empty one. A symlink to a directory counts as a
/// subdirectory and is walked through its link path; links below it are not
/// followed. Plain files directly in `src` are not buckets. No `src`
/// directory means no modules.
///
/// # Examples
///
/// ```
/// use std::fs;
/// use onboard_scan::modules::cluster_modules;
/// use onboard_scan::walker::Exclusions;
///
/// let dir = tempfile::tempdir().unwrap();
/// fs::create_dir_all(dir.path().join("src/api")).unwrap();
/// fs::write(dir.path().join("src/api/routes.ts"), "").unwrap();
///
/// let modules = cluster_modules(dir.path(), &Exclusions::default());
/// assert_eq!(modules.len(), 1);
/// assert_eq!(modules[0].name, "api");
/// assert_eq!(modules[0].files, vec![dir.path().join("src/api/routes.ts")]);
/// ```
pub fn cluster_modules(root: &Path, exclusions: &Exclusions) -> Vec<ModuleBucket> {
    let src = root.join(SOURCE_DIR);
    if !src.is_dir() {
        return Vec::new();
    }

    let entries = match std::fs::read_dir(&src) {
        Ok(entries) => entries,
        Err(err) => {
            warn!(path = %src.display(), error = %err, "cannot list source directory");
            return Vec::new();
        }
    };

    let mut modules = Vec::new();
    for entry in entries {
        let entry = match entry {
            Ok(e) => e,
            Err(err) => {
                warn!(path = %src.display(), error = %err, "skipping unreadable source entry");
                continue;
            }
        };
        let path = entry.path();
        // metadata() follows the link, file_type() would not
        if !std::fs::metadata(&path).is_ok_and(|m| m.is_dir()) {
            continue;
        }

        let name = entry.file_name();
        let files = if exclusions.is_excluded(&name) {
            Vec::new()
        } else {
            walk_files(&path, exclusions)
                .into_iter()
                .filter(|f| LanguageTag::classify(f).is_source())
                .collect()
        };

        modules.push(ModuleBucket {
            name: name.to_string_lossy().into_owned(),
            files,
        });
    }

    modules
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn names(modules: &[ModuleBucket]) -> Vec<String> {
        let mut names: Vec<String> = modules.iter().map(|m| m.name.clone()).collect();
        names.sort();
        names
    }

    #[test]
    fn no_src_means_no_modules() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("lib/core")).unwrap();
        assert!(cluster_modules(dir.path(), &Exclusions::default()).is_empty());
    }

    #[test]
    fn src_as_a_file_means_no_modules() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("src"), "").unwrap();
        assert!(cluster_modules(dir.path(), &Exclusions::default()).is_empty());
    }

    #[test]
    fn buckets_hold_only_source_files() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("src/core/deep")).unwrap();
        fs::write(root.join("src/core/a.ts"), "").unwrap();
        fs::write(root.join("src/core/deep/b.jsx"), "").unwrap();
        fs::write(root.join("src/core/notes.md"), "").unwrap();
        fs::create_dir_all(root.join("src/assets")).unwrap();
        fs::write(root.join("src/assets/logo.svg"), "").unwrap();
        fs::write(root.join("src/index.ts"), "").unwrap();

        let modules = cluster_modules(root, &Exclusions::default());
        assert_eq!(names(&modules), vec!["assets", "core"]);

        let core = modules.iter().find(|m| m.name == "core").unwrap();
        let mut files = core.files.clone();
        files.sort();
        assert_eq!(
            files,
            vec![root.join("src/core/a.ts"), root.join("src/core/deep/b.jsx")]
        );
        let assets = modules.iter().find(|m| m.name == "assets").unwrap();
        assert!(assets.files.is_empty());
    }

    #[test]
    fn excluded_bucket_is_present_but_empty() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("src/dist")).unwrap();
        fs::write(root.join("src/dist/out.js"), "").unwrap();
        fs::create_dir_all(root.join("src/ui/node_modules/x")).unwrap();
        fs::write(root.join("src/ui/node_modules/x/i.js"), "").unwrap();
        fs::write(root.join("src/ui/view.tsx"), "").unwrap();

        let modules = cluster_modules(root, &Exclusions::default());
        let dist = modules.iter().find(|m| m.name == "dist").unwrap();
        assert!(dist.files.is_empty());
        let ui = modules.iter().find(|m| m.name == "ui").unwrap();
        assert_eq!(ui.files, vec![root.join("src/ui/view.tsx")]);
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_directory_becomes_a_bucket() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("src/core")).unwrap();
        fs::write(root.join("src/core/b.ts"), "").unwrap();
        fs::create_dir_all(root.join("shared/lib")).unwrap();
        fs::write(root.join("shared/lib/a.ts"), "").unwrap();
        std::os::unix::fs::symlink(root.join("shared/lib"), root.join("src/linked")).unwrap();
        fs::write(root.join("src/loose.ts"), "").unwrap();
        std::os::unix::fs::symlink(root.join("src/loose.ts"), root.join("src/alias.ts")).unwrap();

        let modules = cluster_modules(root, &Exclusions::default());
        assert_eq!(names(&modules), vec!["core", "linked"]);

        let linked = modules.iter().find(|m| m.name == "linked").unwrap();
        assert_eq!(linked.files, vec![root.join("src/linked/a.ts")]);
    }
}
