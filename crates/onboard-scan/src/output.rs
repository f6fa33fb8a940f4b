use std::fmt::Write;

use onboard_core::{ArchitectureSummary, OnboardError};

use crate::paths::relative_slash;

const BRANCH: &str = "\u{251c}\u{2500}\u{2500} ";
const LAST_BRANCH: &str = "\u{2514}\u{2500}\u{2500} ";
const PIPE: &str = "\u{2502}   ";
const SPACE: &str = "    ";

/// Render a human-readable overview: workspace facts, modules,
/// entrypoints, then an import tree per modelled file.
///
/// Paths are shown relative to the workspace root.
///
/// # Examples
///
/// ```
/// use std::path::PathBuf;
/// use onboard_core::ArchitectureSummary;
/// use onboard_scan::output::format_text;
///
/// let text = format_text(&ArchitectureSummary::empty(PathBuf::from("/repo")));
/// assert!(text.starts_with("Workspace: /repo"));
/// assert!(text.contains("Modules: (none)"));
/// ```
pub fn format_text(summary: &ArchitectureSummary) -> String {
    let root = summary.root.as_path();
    let mut out = String::new();

    let _ = writeln!(out, "Workspace: {}", root.display());
    if let Some(name) = summary.manifest.as_ref().and_then(|m| m.name.as_deref()) {
        let _ = writeln!(out, "Package: {name}");
    }
    let _ = writeln!(out, "Languages: {}", join_or_none(summary.languages.iter()));
    let _ = writeln!(
        out,
        "Entrypoints: {}",
        join_or_none(summary.entrypoints.iter().map(|p| relative_slash(root, p)))
    );

    if summary.modules.is_empty() {
        out.push_str("Modules: (none)\n");
    } else {
        out.push_str("Modules:\n");
        let count = summary.modules.len();
        for (idx, module) in summary.modules.iter().enumerate() {
            let prefix = if idx + 1 == count { LAST_BRANCH } else { BRANCH };
            let _ = writeln!(
                out,
                "{prefix}{} ({} {})",
                module.name,
                module.files.len(),
                plural(module.files.len(), "file", "files")
            );
        }
    }

    let _ = writeln!(
        out,
        "Files: {} modelled, {} unparsed",
        summary.files.len(),
        summary.unparsed.len()
    );
    let count = summary.files.len();
    for (idx, file) in summary.files.iter().enumerate() {
        let is_last = idx + 1 == count;
        let prefix = if is_last { LAST_BRANCH } else { BRANCH };
        let _ = writeln!(
            out,
            "{prefix}{} [{}] exports: {}",
            relative_slash(root, &file.path),
            file.language,
            join_or_none(file.exported_symbols.iter())
        );

        let child_prefix = if is_last { SPACE } else { PIPE };
        let dep_count = file.dependencies.len();
        for (dep_idx, dep) in file.dependencies.iter().enumerate() {
            let dep_prefix = if dep_idx + 1 == dep_count { LAST_BRANCH } else { BRANCH };
            let _ = writeln!(out, "{child_prefix}{dep_prefix}{dep}");
        }
    }

    if !summary.unparsed.is_empty() {
        out.push_str("Unparsed:\n");
        for skipped in &summary.unparsed {
            let _ = writeln!(out, "  {}: {}", relative_slash(root, &skipped.path), skipped.reason);
        }
    }

    out
}

/// Render the summary as pretty-printed JSON with camelCase keys.
///
/// # Errors
///
/// Returns [`OnboardError::Serialization`] if serialization fails.
///
/// # Examples
///
/// ```
/// use std::path::PathBuf;
/// use onboard_core::ArchitectureSummary;
/// use onboard_scan::output::format_json;
///
/// let json = format_json(&ArchitectureSummary::empty(PathBuf::from("/repo"))).unwrap();
/// assert!(json.contains("\"entrypoints\": []"));
/// ```
pub fn format_json(summary: &ArchitectureSummary) -> Result<String, OnboardError> {
    serde_json::to_string_pretty(summary).map_err(OnboardError::from)
}

/// Render the summary as a Markdown report.
pub fn format_markdown(summary: &ArchitectureSummary) -> String {
    let root = summary.root.as_path();
    let mut out = String::new();

    let title = summary
        .manifest
        .as_ref()
        .and_then(|m| m.name.as_deref())
        .unwrap_or("Workspace");
    let _ = writeln!(out, "# {title} architecture\n");
    let _ = writeln!(out, "- **Root:** `{}`", root.display());
    let _ = writeln!(
        out,
        "- **Languages:** {}",
        join_or_none(summary.languages.iter())
    );
    out.push('\n');

    out.push_str("## Entrypoints\n\n");
    if summary.entrypoints.is_empty() {
        out.push_str("_none_\n");
    }
    for entry in &summary.entrypoints {
        let _ = writeln!(out, "- `{}`", relative_slash(root, entry));
    }
    out.push('\n');

    out.push_str("## Modules\n\n");
    if summary.modules.is_empty() {
        out.push_str("_none_\n");
    } else {
        out.push_str("| Module | Files |\n|---|---|\n");
        for module in &summary.modules {
            let _ = writeln!(out, "| `{}` | {} |", module.name, module.files.len());
        }
    }
    out.push('\n');

    if let Some(scripts) = summary.manifest.as_ref().and_then(|m| m.scripts.as_ref()) {
        out.push_str("## Scripts\n\n");
        for (name, command) in scripts {
            let command = command.as_str().unwrap_or_default();
            let _ = writeln!(out, "- `{name}`: `{command}`");
        }
        out.push('\n');
    }

    out.push_str("## Files\n\n");
    for file in &summary.files {
        let _ = writeln!(out, "### `{}`\n", relative_slash(root, &file.path));
        let _ = writeln!(
            out,
            "- imports: {}",
            join_or_none(file.dependencies.iter().map(|d| format!("`{d}`")))
        );
        let _ = writeln!(
            out,
            "- exports: {}\n",
            join_or_none(file.exported_symbols.iter().map(|s| format!("`{s}`")))
        );
    }

    if !summary.unparsed.is_empty() {
        out.push_str("## Unparsed files\n\n");
        for skipped in &summary.unparsed {
            let _ = writeln!(out, "- `{}`: {}", relative_slash(root, &skipped.path), skipped.reason);
        }
    }

    out
}

fn join_or_none<I>(items: I) -> String
where
    I: Iterator,
    I::Item: std::fmt::Display,
{
    let joined = items.map(|i| i.to_string()).collect::<Vec<_>>().join(", ");
    if joined.is_empty() {
        "(none)".to_string()
    } else {
        joined
    }
}

fn plural<'a>(n: usize, one: &'a str, many: &'a str) -> &'a str {
    if n == 1 {
        one
    } else {
        many
    }
}
