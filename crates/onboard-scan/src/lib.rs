//! Static architecture scanning for TypeScript and JavaScript workspaces.
//!
//! Walks a workspace, reads `package.json`, classifies every file by
//! extension, extracts imports and exports with tree-sitter, groups sources
//! under `src/` into modules and resolves entry files. The result is one
//! immutable [`ArchitectureSummary`].

pub mod entrypoints;
pub mod manifest;
pub mod modules;
pub mod output;
pub mod parser;
mod paths;
pub mod project;
pub mod walker;

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use onboard_core::{
    ArchitectureSummary, LanguageTag, ModuleBucket, OnboardError, OutputFormat, ProjectManifest,
    ScanConfig,
};
use tracing::info;

use crate::parser::Extraction;
use crate::project::ProjectMode;
use crate::walker::Exclusions;

/// Knobs for a scan beyond the root path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanOptions {
    /// Entry names pruned in addition to the built-in exclusions.
    pub exclude: Vec<String>,
}

impl From<&ScanConfig> for ScanOptions {
    fn from(config: &ScanConfig) -> Self {
        Self {
            exclude: config.exclude.clone(),
        }
    }
}

/// Scan `root` with default options.
///
/// # Errors
///
/// Returns [`OnboardError::Io`] only when a relative `root` cannot be made
/// absolute because the working directory is unavailable.
///
/// # Examples
///
/// ```no_run
/// use std::path::Path;
/// use onboard_scan::scan_workspace;
///
/// let summary = scan_workspace(Path::new(".")).unwrap();
/// println!("{} files modelled", summary.files.len());
/// ```
pub fn scan_workspace(root: &Path) -> Result<ArchitectureSummary, OnboardError> {
    scan_workspace_with(root, &ScanOptions::default())
}

/// Scan `root`: manifest, walk, extraction, modules, entrypoints.
///
/// Everything below the root is best-effort; missing or broken inputs
/// shrink the summary rather than failing the scan.
///
/// # Errors
///
/// See [`scan_workspace`].
pub fn scan_workspace_with(
    root: &Path,
    options: &ScanOptions,
) -> Result<ArchitectureSummary, OnboardError> {
    let root = paths::absolutize(root)?;
    let exclusions = Exclusions::new(&options.exclude);

    let package = manifest::load_manifest(&root);
    let walked = walker::walk_files(&root, &exclusions);
    let sources = ProjectMode::detect(&root, &walked).into_source_files(&root, &exclusions);
    let extraction = parser::extract_all(&sources);
    let modules = modules::cluster_modules(&root, &exclusions);
    let entrypoints = entrypoints::resolve_entrypoints(&root, package.as_ref());

    let summary = build_summary(
        root,
        &walked,
        package.map(|p| p.manifest),
        modules,
        extraction,
        entrypoints,
    );

    info!(
        root = %summary.root.display(),
        walked = walked.len(),
        modelled = summary.files.len(),
        unparsed = summary.unparsed.len(),
        modules = summary.modules.len(),
        "workspace scan complete"
    );
    Ok(summary)
}

/// Assemble the summary from already computed parts. Pure.
///
/// `languages` is derived from `walked`, so it covers every walked file
/// whether or not the extractor modelled it.
pub fn build_summary(
    root: PathBuf,
    walked: &[PathBuf],
    manifest: Option<ProjectManifest>,
    modules: Vec<ModuleBucket>,
    extraction: Extraction,
    entrypoints: Vec<PathBuf>,
) -> ArchitectureSummary {
    let languages: BTreeSet<LanguageTag> =
        walked.iter().map(|p| LanguageTag::classify(p)).collect();

    ArchitectureSummary {
        root,
        languages,
        manifest,
        modules,
        files: extraction.records,
        unparsed: extraction.unparsed,
        entrypoints,
    }
}

/// Render a summary in the requested format.
///
/// # Errors
///
/// Returns [`OnboardError::Serialization`] if JSON rendering fails.
pub fn render(summary: &ArchitectureSummary, format: OutputFormat) -> Result<String, OnboardError> {
    match format {
        OutputFormat::Text => Ok(output::format_text(summary)),
        OutputFormat::Json => output::format_json(summary),
        OutputFormat::Markdown => Ok(output::format_markdown(summary)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_summary_derives_languages_from_walk() {
        let walked = vec![
            PathBuf::from("/r/README.md"),
            PathBuf::from("/r/src/a.ts"),
            PathBuf::from("/r/Makefile"),
            PathBuf::from("/r/src/b.ts"),
        ];
        let summary = build_summary(
            PathBuf::from("/r"),
            &walked,
            None,
            Vec::new(),
            Extraction::default(),
            Vec::new(),
        );
        let tags: Vec<String> = summary.languages.iter().map(|t| t.to_string()).collect();
        assert_eq!(tags, vec!["ts", "md", "other"]);
        assert!(summary.files.is_empty());
    }

    #[test]
    fn scan_options_from_config() {
        let config = ScanConfig {
            exclude: vec!["coverage".into()],
        };
        assert_eq!(ScanOptions::from(&config).exclude, vec!["coverage"]);
    }

    #[test]
    fn render_dispatches_on_format() {
        let summary = ArchitectureSummary::empty(PathBuf::from("/r"));
        assert!(render(&summary, OutputFormat::Json).unwrap().starts_with('{'));
        assert!(render(&summary, OutputFormat::Markdown).unwrap().starts_with("# "));
        assert!(render(&summary, OutputFormat::Text).unwrap().starts_with("Workspace:"));
    }
}
