use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Language tag assigned to a file from its extension alone.
///
/// Serialized as a plain string: `"ts"`, `"js"`, or the raw extension of any
/// other file (`"other"` when the file has no extension).
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use onboard_core::LanguageTag;
///
/// assert_eq!(LanguageTag::classify(Path::new("src/app.tsx")), LanguageTag::Typed);
/// assert_eq!(LanguageTag::classify(Path::new("src/app.jsx")), LanguageTag::Untyped);
/// assert_eq!(LanguageTag::classify(Path::new("README.md")).to_string(), "md");
/// assert_eq!(LanguageTag::classify(Path::new("Makefile")).to_string(), "other");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum LanguageTag {
    /// `.ts` / `.tsx`
    Typed,
    /// `.js` / `.jsx`
    Untyped,
    /// Anything else, keyed by raw extension.
    Other(String),
}

const NO_EXTENSION: &str = "other";

impl LanguageTag {
    /// Classify a path by its extension. No content inspection.
    pub fn classify(path: &Path) -> Self {
        match path.extension().map(|e| e.to_string_lossy()) {
            Some(ext) => Self::from_extension(&ext),
            None => LanguageTag::Other(NO_EXTENSION.into()),
        }
    }

    /// Classify an extension string (without the dot).
    pub fn from_extension(ext: &str) -> Self {
        match ext {
            "ts" | "tsx" => LanguageTag::Typed,
            "js" | "jsx" => LanguageTag::Untyped,
            "" => LanguageTag::Other(NO_EXTENSION.into()),
            other => LanguageTag::Other(other.to_string()),
        }
    }

    /// `true` for the two dialects the declaration extractor understands.
    pub fn is_source(&self) -> bool {
        matches!(self, LanguageTag::Typed | LanguageTag::Untyped)
    }

    /// Short string form.
    pub fn as_str(&self) -> &str {
        match self {
            LanguageTag::Typed => "ts",
            LanguageTag::Untyped => "js",
            LanguageTag::Other(ext) => ext,
        }
    }
}

impl fmt::Display for LanguageTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<LanguageTag> for String {
    fn from(tag: LanguageTag) -> Self {
        tag.as_str().to_string()
    }
}

impl From<String> for LanguageTag {
    fn from(s: String) -> Self {
        match s.as_str() {
            "ts" => LanguageTag::Typed,
            "js" => LanguageTag::Untyped,
            _ => LanguageTag::Other(s),
        }
    }
}

/// One source file the declaration extractor modelled.
///
/// # Examples
///
/// ```
/// use std::path::PathBuf;
/// use onboard_core::{FileRecord, LanguageTag};
///
/// let record = FileRecord {
///     path: PathBuf::from("/repo/src/index.ts"),
///     dependencies: vec!["./helper".into()],
///     exported_symbols: vec!["run".into()],
///     language: LanguageTag::Typed,
/// };
/// let json = serde_json::to_value(&record).unwrap();
/// assert_eq!(json["exportedSymbols"][0], "run");
/// assert_eq!(json["language"], "ts");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRecord {
    /// Absolute path of the file.
    pub path: PathBuf,
    /// Import specifiers exactly as written, in source order.
    pub dependencies: Vec<String>,
    /// Exported binding names, first-declaration order, no duplicates.
    pub exported_symbols: Vec<String>,
    /// Language tag of the file.
    pub language: LanguageTag,
}

/// An eligible file the extractor could not model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnparsedFile {
    /// Absolute path of the file.
    pub path: PathBuf,
    /// Why it was dropped.
    pub reason: SkipReason,
}

/// Why the extractor dropped a file.
///
/// # Examples
///
/// ```
/// use onboard_core::SkipReason;
///
/// let reason = SkipReason::SyntaxError { line: 3 };
/// assert_eq!(reason.to_string(), "syntax error near line 3");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum SkipReason {
    /// The file could not be read as UTF-8 text.
    Unreadable { message: String },
    /// The syntax tree contains errors; `line` is the first one (1-indexed).
    SyntaxError { line: u32 },
    /// The parsing engine refused the file.
    Engine { message: String },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Unreadable { message } => write!(f, "unreadable: {message}"),
            SkipReason::SyntaxError { line } => write!(f, "syntax error near line {line}"),
            SkipReason::Engine { message } => write!(f, "parser failure: {message}"),
        }
    }
}

/// String-valued manifest table in the order the file lists it.
pub type ManifestTable = serde_json::Map<String, serde_json::Value>;

/// Recognized fields of the project descriptor (`package.json`).
///
/// `scripts`, `dependencies` and `devDependencies` keep the manifest's key
/// order; entries whose value is not a string are dropped by the loader.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectManifest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scripts: Option<ManifestTable>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependencies: Option<ManifestTable>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dev_dependencies: Option<ManifestTable>,
}

/// A coarse grouping of files under one top-level source directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleBucket {
    /// Directory basename.
    pub name: String,
    /// Source files found under the directory, walk order.
    pub files: Vec<PathBuf>,
}

/// The result of one workspace scan.
///
/// Built once by the scanner and never mutated afterwards; every consumer
/// (CLI, MCP server, summarizer) reads it as-is.
///
/// # Examples
///
/// ```
/// use onboard_core::ArchitectureSummary;
/// use std::path::PathBuf;
///
/// let summary = ArchitectureSummary::empty(PathBuf::from("/repo"));
/// let json = serde_json::to_value(&summary).unwrap();
/// assert_eq!(json["files"].as_array().unwrap().len(), 0);
/// assert!(json.get("manifest").is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchitectureSummary {
    /// Absolute workspace root.
    pub root: PathBuf,
    /// Tags observed across every walked file.
    pub languages: BTreeSet<LanguageTag>,
    /// Project descriptor, when it parsed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manifest: Option<ProjectManifest>,
    pub modules: Vec<ModuleBucket>,
    pub files: Vec<FileRecord>,
    /// Eligible files the extractor dropped.
    #[serde(default)]
    pub unparsed: Vec<UnparsedFile>,
    /// Existing entry files, deduplicated, precedence order.
    pub entrypoints: Vec<PathBuf>,
}

impl ArchitectureSummary {
    /// A summary with nothing in it, rooted at `root`.
    pub fn empty(root: PathBuf) -> Self {
        Self {
            root,
            languages: BTreeSet::new(),
            manifest: None,
            modules: Vec::new(),
            files: Vec::new(),
            unparsed: Vec::new(),
            entrypoints: Vec::new(),
        }
    }

    /// Look up the record for `path`, if the extractor modelled it.
    pub fn file(&self, path: &Path) -> Option<&FileRecord> {
        self.files.iter().find(|f| f.path == path)
    }
}

/// Output format for CLI subcommands.
///
/// Implements [`FromStr`] so it can be used directly with `clap` argument parsing.
///
/// # Examples
///
/// ```
/// use onboard_core::OutputFormat;
///
/// let fmt: OutputFormat = "json".parse().unwrap();
/// assert_eq!(fmt, OutputFormat::Json);
///
/// let fmt: OutputFormat = "md".parse().unwrap();
/// assert_eq!(fmt, OutputFormat::Markdown);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable overview.
    #[default]
    Text,
    /// Machine-readable JSON with camelCase keys.
    Json,
    /// Markdown-formatted output.
    Markdown,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Markdown => write!(f, "markdown"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            other => Err(format!("unknown output format: {other}")),
        }
    }
}
