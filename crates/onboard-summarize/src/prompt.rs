use std::fmt::Write;
use std::path::Path;

use onboard_core::ArchitectureSummary;

/// At most this many modules are listed in a prompt.
pub const MAX_PROMPT_MODULES: usize = 40;
/// At most this many files contribute import counts to a prompt.
pub const MAX_PROMPT_FILES: usize = 60;

const INSTRUCTIONS: &str = "\
INSTRUCTIONS:
You are an expert software architecture and onboarding assistant writing for a plain terminal \
(simple UTF-8, no rich formatting). The reader is a competent engineer who is new to THIS \
codebase and wants a fast mental model plus prioritized next steps.

OUTPUT FORMAT RULES:
1. Use ALL CAPS headings followed by a blank line.
2. Keep each bullet under about 120 characters.
3. No markdown tables, no emojis, no filler prose.
4. Prefer short relative paths when naming files or modules and group related items.
5. Write \"(unknown)\" for anything the data does not cover instead of guessing.
6. Do not invent functionality the data does not imply.

SECTIONS (in this order):
EXECUTIVE SUMMARY: 2-3 sentences on overall purpose and structure.
ARCHITECTURE MAP: major modules, their role and notable coupling.
ENTRYPOINTS & FLOW: where execution begins and the high-level control and data flow.
KEY DEPENDENCIES & INTEGRATIONS: internal and external libraries or services that shape the design.
COMPLEXITY HOTSPOTS: likely risk areas (size, fan-in, fan-out, unclear boundaries) with a short rationale.
FIRST 5 EXPLORATION TASKS: ordered, concrete actions for a newcomer.
RECOMMENDED IMPROVEMENTS: QUICK WINS and STRATEGIC, listed separately.
NEXT READING ORDER: files or modules to read afterwards, in order.
OMISSIONS / DATA GAPS: what the scan data could not tell you.
";

const NOTES: &str = "\
NOTES:
- Import counts approximate each file's dependency surface; use them to spot hotspots.
- Only name an architectural pattern when the data strongly signals it, and label it \"Possible\" otherwise.

Generate the sections now.";

/// Render `summary` into a single, size-bounded completion prompt.
///
/// The context block lists the root, languages, up to
/// [`MAX_PROMPT_MODULES`] modules with file counts, entrypoints and up to
/// [`MAX_PROMPT_FILES`] files as `parent/file=imports`. Empty lists render
/// as `(none)`.
///
/// # Examples
///
/// ```
/// use std::path::PathBuf;
/// use onboard_core::ArchitectureSummary;
/// use onboard_summarize::prompt::build_prompt;
///
/// let prompt = build_prompt(&ArchitectureSummary::empty(PathBuf::from("/repo")));
/// assert!(prompt.contains("ROOT: /repo"));
/// assert!(prompt.contains("LANGUAGES: (none)"));
/// ```
pub fn build_prompt(summary: &ArchitectureSummary) -> String {
    let languages = summary
        .languages
        .iter()
        .map(|l| l.to_string())
        .collect::<Vec<_>>()
        .join(", ");

    let module_lines = summary
        .modules
        .iter()
        .take(MAX_PROMPT_MODULES)
        .map(|m| format!("- {}: {} files", m.name, m.files.len()))
        .collect::<Vec<_>>()
        .join("\n");

    let entrypoints = summary
        .entrypoints
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ");

    let fan_out = summary
        .files
        .iter()
        .take(MAX_PROMPT_FILES)
        .map(|f| format!("{}={}", shorten(&f.path), f.dependencies.len()))
        .collect::<Vec<_>>()
        .join(", ");

    let mut prompt = String::from(INSTRUCTIONS);
    prompt.push_str("\nCONTEXT DATA:\n");
    let _ = writeln!(prompt, "ROOT: {}", summary.root.display());
    let _ = writeln!(prompt, "LANGUAGES: {}", or_none(&languages));
    let _ = writeln!(
        prompt,
        "MODULES ({}):\n{}",
        summary.modules.len(),
        or_none(&module_lines)
    );
    let _ = writeln!(prompt, "ENTRYPOINTS: {}", or_none(&entrypoints));
    let _ = writeln!(
        prompt,
        "FILE IMPORT FAN-OUT (approx counts): {}",
        or_none(&fan_out)
    );
    prompt.push('\n');
    prompt.push_str(NOTES);
    prompt
}

/// The last two components of `path`, slash-separated.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use onboard_summarize::prompt::shorten;
///
/// assert_eq!(shorten(Path::new("/repo/src/core/engine.ts")), "core/engine.ts");
/// assert_eq!(shorten(Path::new("main.ts")), "main.ts");
/// ```
pub fn shorten(path: &Path) -> String {
    let normalized = path.to_string_lossy().replace('\\', "/");
    let parts: Vec<&str> = normalized.split('/').collect();
    let start = parts.len().saturating_sub(2);
    parts[start..].join("/")
}

fn or_none(text: &str) -> &str {
    if text.is_empty() {
        "(none)"
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use onboard_core::{FileRecord, LanguageTag, ModuleBucket};
    use std::path::PathBuf;

    fn record(path: &str, deps: usize) -> FileRecord {
        FileRecord {
            path: PathBuf::from(path),
            dependencies: (0..deps).map(|i| format!("./dep{i}")).collect(),
            exported_symbols: Vec::new(),
            language: LanguageTag::Typed,
        }
    }

    #[test]
    fn context_block_lists_summary_facts() {
        let mut summary = ArchitectureSummary::empty(PathBuf::from("/repo"));
        summary.languages = [LanguageTag::Typed, LanguageTag::Untyped].into_iter().collect();
        summary.modules = vec![ModuleBucket {
            name: "core".into(),
            files: vec![PathBuf::from("/repo/src/core/a.ts")],
        }];
        summary.entrypoints = vec![PathBuf::from("/repo/src/index.ts")];
        summary.files = vec![record("/repo/src/core/a.ts", 3)];

        let prompt = build_prompt(&summary);
        assert!(prompt.starts_with("INSTRUCTIONS:"));
        assert!(prompt.contains("LANGUAGES: ts, js"));
        assert!(prompt.contains("MODULES (1):\n- core: 1 files"));
        assert!(prompt.contains("ENTRYPOINTS: /repo/src/index.ts"));
        assert!(prompt.contains("FILE IMPORT FAN-OUT (approx counts): core/a.ts=3"));
        assert!(prompt.ends_with("Generate the sections now."));
    }

    #[test]
    fn empty_lists_use_placeholder() {
        let prompt = build_prompt(&ArchitectureSummary::empty(PathBuf::from("/repo")));
        assert!(prompt.contains("MODULES (0):\n(none)"));
        assert!(prompt.contains("ENTRYPOINTS: (none)"));
        assert!(prompt.contains("FILE IMPORT FAN-OUT (approx counts): (none)"));
    }

    #[test]
    fn modules_and_files_are_capped() {
        let mut summary = ArchitectureSummary::empty(PathBuf::from("/repo"));
        summary.modules = (0..50)
            .map(|i| ModuleBucket {
                name: format!("mod{i}"),
                files: Vec::new(),
            })
            .collect();
        summary.files = (0..80)
            .map(|i| record(&format!("/repo/src/f{i}.ts"), 1))
            .collect();

        let prompt = build_prompt(&summary);
        assert!(prompt.contains("MODULES (50):"));
        assert!(prompt.contains("- mod39: 0 files"));
        assert!(!prompt.contains("- mod40:"));
        assert!(prompt.contains("src/f59.ts=1"));
        assert!(!prompt.contains("src/f60.ts=1"));
    }

    #[test]
    fn shorten_handles_backslashes() {
        assert_eq!(shorten(Path::new("C:\\repo\\src\\x.ts")), "src/x.ts");
    }
}
