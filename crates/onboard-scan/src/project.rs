//! Compiler configuration (`tsconfig.json`) and the two ways the declaration
//! extractor decides which files make up the project.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use glob::{MatchOptions, Pattern};
use onboard_core::{LanguageTag, OnboardError};
use serde_json::Value;
use tracing::{debug, warn};

use crate::paths;
use crate::walker::Exclusions;

/// Compiler configuration file name, relative to the workspace root.
pub const COMPILER_CONFIG_FILE: &str = "tsconfig.json";

/// Directory names the compiler never picks up through wildcards.
const IMPLICIT_EXCLUDES: &[&str] = &["node_modules", "bower_components", "jspm_packages"];

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// How the extractor's file set is chosen.
///
/// `ConfigDriven` lets the compiler configuration decide membership, which
/// can add or drop files relative to the raw walk. `Explicit` is exactly the
/// walked files classified as source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectMode {
    ConfigDriven(CompilerConfig),
    Explicit(Vec<PathBuf>),
}

impl ProjectMode {
    /// Pick the mode for `root`: config-driven when a compiler configuration
    /// file exists there, explicit otherwise.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::path::PathBuf;
    /// use onboard_scan::project::ProjectMode;
    ///
    /// let dir = tempfile::tempdir().unwrap();
    /// let walked = vec![dir.path().join("a.ts"), dir.path().join("notes.md")];
    /// let mode = ProjectMode::detect(dir.path(), &walked);
    /// assert_eq!(mode, ProjectMode::Explicit(vec![dir.path().join("a.ts")]));
    /// ```
    pub fn detect(root: &Path, walked: &[PathBuf]) -> Self {
        match CompilerConfig::load(root) {
            Some(config) => ProjectMode::ConfigDriven(config),
            None => ProjectMode::Explicit(
                walked
                    .iter()
                    .filter(|p| LanguageTag::classify(p).is_source())
                    .cloned()
                    .collect(),
            ),
        }
    }

    /// The files to hand to the extractor.
    pub fn into_source_files(self, root: &Path, exclusions: &Exclusions) -> Vec<PathBuf> {
        match self {
            ProjectMode::ConfigDriven(config) => config.source_files(root, exclusions),
            ProjectMode::Explicit(paths) => paths,
        }
    }
}

/// The subset of `tsconfig.json` that decides project membership.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompilerConfig {
    pub files: Option<Vec<String>>,
    pub include: Option<Vec<String>>,
    pub exclude: Option<Vec<String>>,
    pub allow_js: bool,
    pub out_dir: Option<String>,
}

impl CompilerConfig {
    /// Parse configuration text. Comments and trailing commas are accepted.
    ///
    /// # Errors
    ///
    /// Returns [`OnboardError::Serialization`] for malformed JSON and
    /// [`OnboardError::Parse`] when the top level is not an object.
    ///
    /// # Examples
    ///
    /// ```
    /// use onboard_scan::project::CompilerConfig;
    ///
    /// let config = CompilerConfig::parse(r#"{
    ///     // emit to build/
    ///     "compilerOptions": { "outDir": "build", "allowJs": true, },
    ///     "include": ["src"],
    /// }"#).unwrap();
    /// assert!(config.allow_js);
    /// assert_eq!(config.include, Some(vec!["src".to_string()]));
    /// ```
    pub fn parse(content: &str) -> Result<Self, OnboardError> {
        let json: Value = serde_json::from_str(&strip_jsonc(content))?;
        let Some(obj) = json.as_object() else {
            return Err(OnboardError::Parse(format!(
                "{COMPILER_CONFIG_FILE} must contain a JSON object"
            )));
        };
        let options = obj.get("compilerOptions").and_then(Value::as_object);

        Ok(Self {
            files: string_list(obj.get("files")),
            include: string_list(obj.get("include")),
            exclude: string_list(obj.get("exclude")),
            allow_js: options
                .and_then(|o| o.get("allowJs"))
                .and_then(Value::as_bool)
                .unwrap_or(false),
            out_dir: options
                .and_then(|o| o.get("outDir"))
                .and_then(Value::as_str)
                .map(String::from),
        })
    }

    /// Load `<root>/tsconfig.json`.
    ///
    /// Returns `None` only when the file does not exist. A file that exists
    /// but cannot be read or parsed still selects config-driven mode, with
    /// default inclusion rules.
    pub fn load(root: &Path) -> Option<Self> {
        let path = root.join(COMPILER_CONFIG_FILE);
        if !path.is_file() {
            return None;
        }

        let parsed = std::fs::read_to_string(&path)
            .map_err(OnboardError::from)
            .and_then(|content| Self::parse(&content));
        match parsed {
            Ok(config) => Some(config),
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "compiler configuration unusable, falling back to default inclusion rules"
                );
                Some(Self::default())
            }
        }
    }

    /// Enumerate the files this configuration puts in the project.
    ///
    /// `files` entries come first (when they exist), then every file under
    /// `root` matched by `include` (default `**/*`) and not by `exclude`
    /// (default: implicit package directories plus `outDir`). Only `.ts` and
    /// `.tsx` files qualify, plus `.js` and `.jsx` with `allowJs`. Names in
    /// `exclusions` are never entered.
    pub fn source_files(&self, root: &Path, exclusions: &Exclusions) -> Vec<PathBuf> {
        let mut seen = HashSet::new();
        let mut selected = Vec::new();

        for entry in self.files.iter().flatten() {
            let path = paths::resolve(root, entry);
            let rel = path.strip_prefix(root).unwrap_or(&path);
            if path.is_file() && !exclusions.excludes_any_component(rel) && seen.insert(path.clone())
            {
                selected.push(path);
            }
        }

        if self.files.is_some() && self.include.is_none() {
            return selected;
        }

        let default_include = vec!["**/*".to_string()];
        let include = compile_specs(self.include.as_ref().unwrap_or(&default_include), true);
        let exclude_specs = self.exclude_specs();
        let exclude = compile_specs(&exclude_specs, true);
        let prune_dirs = compile_specs(&exclude_specs, false);

        let prune_root = root.to_path_buf();
        let prune_names = exclusions.clone();
        let walker = ignore::WalkBuilder::new(root)
            .standard_filters(false)
            .follow_links(false)
            .filter_entry(move |entry| {
                if entry.depth() == 0 {
                    return true;
                }
                let name = entry.file_name();
                if name.to_string_lossy().starts_with('.')
                    || prune_names.is_excluded(name)
                    || IMPLICIT_EXCLUDES.iter().any(|n| name == *n)
                {
                    return false;
                }
                if entry.file_type().is_some_and(|t| t.is_dir()) {
                    let rel = paths::relative_slash(&prune_root, entry.path());
                    return !prune_dirs.iter().any(|p| p.matches_with(&rel, MATCH_OPTIONS));
                }
                true
            })
            .build();

        for entry in walker {
            let entry = match entry {
                Ok(e) => e,
                Err(err) => {
                    warn!(error = %err, "skipping unreadable part of the project");
                    continue;
                }
            };
            if !entry.file_type().is_some_and(|t| t.is_file()) {
                continue;
            }

            let path = entry.path();
            if !self.accepts_extension(path) {
                continue;
            }
            let rel = paths::relative_slash(root, path);
            let included = include.iter().any(|p| p.matches_with(&rel, MATCH_OPTIONS));
            let excluded = exclude.iter().any(|p| p.matches_with(&rel, MATCH_OPTIONS));
            if included && !excluded && seen.insert(path.to_path_buf()) {
                selected.push(path.to_path_buf());
            }
        }

        debug!(count = selected.len(), "compiler configuration selected files");
        selected
    }

    fn exclude_specs(&self) -> Vec<String> {
        match &self.exclude {
            Some(specs) => specs.clone(),
            None => {
                let mut specs: Vec<String> = IMPLICIT_EXCLUDES.iter().map(|s| s.to_string()).collect();
                if let Some(out_dir) = &self.out_dir {
                    specs.push(out_dir.clone());
                }
                specs
            }
        }
    }

    fn accepts_extension(&self, path: &Path) -> bool {
        match path.extension().and_then(|e| e.to_str()) {
            Some("ts" | "tsx") => true,
            Some("js" | "jsx") => self.allow_js,
            _ => false,
        }
    }
}

/// Compile include/exclude specs into glob patterns.
///
/// With `as_files`, a spec whose last segment has neither a wildcard nor an
/// extension names a directory and matches everything below it.
fn compile_specs(specs: &[String], as_files: bool) -> Vec<Pattern> {
    specs
        .iter()
        .filter_map(|spec| {
            let trimmed = spec.trim_start_matches("./").trim_end_matches('/');
            let expanded = if !as_files {
                trimmed.to_string()
            } else if trimmed.is_empty() {
                "**/*".to_string()
            } else {
                let last = trimmed.rsplit('/').next().unwrap_or(trimmed);
                if last.contains(['*', '?', '.']) {
                    trimmed.to_string()
                } else {
                    format!("{trimmed}/**/*")
                }
            };
            match Pattern::new(&expanded) {
                Ok(p) => Some(p),
                Err(err) => {
                    warn!(spec = %spec, error = %err, "ignoring invalid compiler configuration pattern");
                    None
                }
            }
        })
        .collect()
}

fn string_list(value: Option<&Value>) -> Option<Vec<String>> {
    let items = value?.as_array()?;
    Some(
        items
            .iter()
            .filter_map(|v| v.as_str().map(String::from))
            .collect(),
    )
}

/// Remove `//` and `/* */` comments and trailing commas from JSON text,
/// leaving string contents untouched.
///
/// # Examples
///
/// ```
/// use onboard_scan::project::strip_jsonc;
///
/// let clean = strip_jsonc("{ \"a\": \"//x\", /* note */ \"b\": [1, 2,], }");
/// let value: serde_json::Value = serde_json::from_str(&clean).unwrap();
/// assert_eq!(value["a"], "//x");
/// assert_eq!(value["b"][1], 2);
/// ```
pub fn strip_jsonc(input: &str) -> String {
    let chars: Vec<char> = input.chars().collect();
    let mut without_comments = String::with_capacity(input.len());
    let mut i = 0;
    let mut in_string = false;

    while i < chars.len() {
        let c = chars[i];
        if in_string {
            without_comments.push(c);
            if c == '\\' {
                if let Some(&next) = chars.get(i + 1) {
                    without_comments.push(next);
                    i += 1;
                }
            } else if c == '"' {
                in_string = false;
            }
            i += 1;
            continue;
        }

        match (c, chars.get(i + 1)) {
            ('"', _) => {
                in_string = true;
                without_comments.push(c);
                i += 1;
            }
            ('/', Some('/')) => {
                while i < chars.len() && chars[i] != '\n' {
                    i += 1;
                }
            }
            ('/', Some('*')) => {
                i += 2;
                while i < chars.len() && !(chars[i] == '*' && chars.get(i + 1) == Some(&'/')) {
                    i += 1;
                }
                i += 2;
                without_comments.push(' ');
            }
            _ => {
                without_comments.push(c);
                i += 1;
            }
        }
    }

    let chars: Vec<char> = without_comments.chars().collect();
    let mut out = String::with_capacity(chars.len());
    let mut in_string = false;
    let mut escaped = false;
    for (idx, &c) in chars.iter().enumerate() {
        if in_string {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }
        if c == '"' {
            in_string = true;
        } else if c == ',' {
            let next = chars[idx + 1..].iter().find(|ch| !ch.is_whitespace());
            if matches!(next, Some('}' | ']')) {
                continue;
            }
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn rels(root: &Path, files: &[PathBuf]) -> Vec<String> {
        let mut out: Vec<String> = files.iter().map(|f| paths::relative_slash(root, f)).collect();
        out.sort();
        out
    }

    #[test]
    fn strip_jsonc_keeps_comment_markers_inside_strings() {
        let clean = strip_jsonc(r#"{"url": "http://x/*y*/", "q": "a\"//b"}"#);
        let value: Value = serde_json::from_str(&clean).unwrap();
        assert_eq!(value["url"], "http://x/*y*/");
        assert_eq!(value["q"], "a\"//b");
    }

    #[test]
    fn strip_jsonc_removes_trailing_commas_across_lines() {
        let clean = strip_jsonc("{\n  \"include\": [\n    \"src\", // sources\n  ],\n}\n");
        let value: Value = serde_json::from_str(&clean).unwrap();
        assert_eq!(value["include"][0], "src");
    }

    #[test]
    fn parse_reads_membership_fields() {
        let config = CompilerConfig::parse(
            r#"{"files": ["main.ts"], "exclude": ["**/*.spec.ts"], "compilerOptions": {"outDir": "out"}}"#,
        )
        .unwrap();
        assert_eq!(config.files, Some(vec!["main.ts".to_string()]));
        assert_eq!(config.exclude, Some(vec!["**/*.spec.ts".to_string()]));
        assert_eq!(config.out_dir.as_deref(), Some("out"));
        assert!(!config.allow_js);
    }

    #[test]
    fn default_config_takes_ts_everywhere_but_skips_js() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write(root, "src/a.ts", "");
        write(root, "src/b.tsx", "");
        write(root, "src/c.js", "");
        write(root, "types/global.d.ts", "");
        write(root, "bower_components/x/y.ts", "");
        write(root, ".cache/z.ts", "");

        let files = CompilerConfig::default().source_files(root, &Exclusions::default());
        assert_eq!(
            rels(root, &files),
            vec!["src/a.ts", "src/b.tsx", "types/global.d.ts"]
        );
    }

    #[test]
    fn allow_js_adds_script_files() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write(root, "src/a.ts", "");
        write(root, "src/c.js", "");

        let config = CompilerConfig {
            allow_js: true,
            ..CompilerConfig::default()
        };
        assert_eq!(
            rels(root, &config.source_files(root, &Exclusions::default())),
            vec!["src/a.ts", "src/c.js"]
        );
    }

    #[test]
    fn include_directory_and_exclude_glob() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write(root, "src/a.ts", "");
        write(root, "src/a.spec.ts", "");
        write(root, "scripts/tool.ts", "");

        let config = CompilerConfig {
            include: Some(vec!["src".into()]),
            exclude: Some(vec!["**/*.spec.ts".into()]),
            ..CompilerConfig::default()
        };
        assert_eq!(
            rels(root, &config.source_files(root, &Exclusions::default())),
            vec!["src/a.ts"]
        );
    }

    #[test]
    fn out_dir_is_excluded_by_default() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write(root, "src/a.ts", "");
        write(root, "build/a.d.ts", "");

        let config = CompilerConfig {
            out_dir: Some("./build".into()),
            ..CompilerConfig::default()
        };
        assert_eq!(
            rels(root, &config.source_files(root, &Exclusions::default())),
            vec!["src/a.ts"]
        );
    }

    #[test]
    fn files_only_config_ignores_the_rest() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write(root, "main.ts", "");
        write(root, "other.ts", "");

        let config = CompilerConfig {
            files: Some(vec!["./main.ts".into(), "missing.ts".into()]),
            ..CompilerConfig::default()
        };
        assert_eq!(
            rels(root, &config.source_files(root, &Exclusions::default())),
            vec!["main.ts"]
        );
    }

    #[test]
    fn scan_exclusions_apply_in_config_mode() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write(root, "src/a.ts", "");
        write(root, "dist/a.d.ts", "");

        let files = CompilerConfig::default().source_files(root, &Exclusions::default());
        assert_eq!(rels(root, &files), vec!["src/a.ts"]);
    }

    #[test]
    fn unparseable_config_still_selects_config_mode() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write(root, COMPILER_CONFIG_FILE, "{ this is not json");

        let mode = ProjectMode::detect(root, &[]);
        assert_eq!(mode, ProjectMode::ConfigDriven(CompilerConfig::default()));
    }

    #[test]
    fn config_mode_differs_from_walk() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write(root, COMPILER_CONFIG_FILE, r#"{"include": ["src"]}"#);
        write(root, "src/a.ts", "");
        write(root, "src/b.js", "");
        write(root, "tools/gen.ts", "");

        let walked = crate::walker::walk_files(root, &Exclusions::default());
        let files =
            ProjectMode::detect(root, &walked).into_source_files(root, &Exclusions::default());
        assert_eq!(rels(root, &files), vec!["src/a.ts"]);
    }
}
