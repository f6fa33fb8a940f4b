//! Import and export extraction for TypeScript and JavaScript sources.

use std::path::{Path, PathBuf};

use onboard_core::{FileRecord, LanguageTag, SkipReason, UnparsedFile};
use tracing::debug;
use tree_sitter::{Language, Node, Parser};

/// What the extractor produced for a file list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    /// Files that parsed cleanly, input order.
    pub records: Vec<FileRecord>,
    /// Files that were dropped, input order.
    pub unparsed: Vec<UnparsedFile>,
}

/// Reusable tree-sitter front end. One parser is shared across files and
/// switched between grammars as needed.
pub struct Extractor {
    parser: Parser,
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new()
    }
}

impl Extractor {
    pub fn new() -> Self {
        Self {
            parser: Parser::new(),
        }
    }

    /// Read `path` from disk and extract its record.
    ///
    /// # Errors
    ///
    /// Returns the [`SkipReason`] when the file is unreadable, is not UTF-8,
    /// has no grammar, or parses with errors.
    pub fn extract_file(&mut self, path: &Path) -> Result<FileRecord, SkipReason> {
        let bytes = std::fs::read(path).map_err(|e| SkipReason::Unreadable {
            message: e.to_string(),
        })?;
        let content = String::from_utf8(bytes).map_err(|_| SkipReason::Unreadable {
            message: "not valid UTF-8".into(),
        })?;
        self.extract_source(path, &content)
    }

    /// Extract the record for `content` as if it lived at `path`. The path
    /// picks the grammar and the language tag; the filesystem is not touched.
    ///
    /// # Errors
    ///
    /// Returns [`SkipReason::SyntaxError`] when the syntax tree contains an
    /// error or missing node, and [`SkipReason::Engine`] when no grammar
    /// applies or the parser gives up.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::path::Path;
    /// use onboard_scan::parser::Extractor;
    ///
    /// let source = "import { readFile } from 'fs';\nexport const load = () => readFile;\n";
    /// let record = Extractor::new()
    ///     .extract_source(Path::new("/repo/src/load.ts"), source)
    ///     .unwrap();
    /// assert_eq!(record.dependencies, vec!["fs"]);
    /// assert_eq!(record.exported_symbols, vec!["load"]);
    /// ```
    pub fn extract_source(&mut self, path: &Path, content: &str) -> Result<FileRecord, SkipReason> {
        let Some(grammar) = grammar_for(path) else {
            return Err(SkipReason::Engine {
                message: format!("no grammar for {}", path.display()),
            });
        };
        self.parser
            .set_language(&grammar)
            .map_err(|e| SkipReason::Engine {
                message: format!("failed to set language: {e}"),
            })?;

        let content = content.strip_prefix('\u{feff}').unwrap_or(content);
        let Some(tree) = self.parser.parse(content, None) else {
            return Err(SkipReason::Engine {
                message: "parser produced no tree".into(),
            });
        };

        let root = tree.root_node();
        if root.has_error() {
            return Err(SkipReason::SyntaxError {
                line: first_error_line(root),
            });
        }

        let source = content.as_bytes();
        let mut dependencies = Vec::new();
        let mut exported = Vec::new();
        let mut cursor = root.walk();
        for item in root.named_children(&mut cursor) {
            match item.kind() {
                "import_statement" => {
                    if let Some(spec) = item.child_by_field_name("source") {
                        dependencies.push(unquote(node_text(&spec, source)));
                    }
                }
                "export_statement" => collect_exports(item, source, &mut exported),
                _ => {}
            }
        }

        Ok(FileRecord {
            path: path.to_path_buf(),
            dependencies,
            exported_symbols: exported,
            language: LanguageTag::classify(path),
        })
    }
}

/// Extract every file in `paths`, splitting them into records and drops.
///
/// Never fails as a whole: each problem file is logged at debug level and
/// reported in [`Extraction::unparsed`].
pub fn extract_all(paths: &[PathBuf]) -> Extraction {
    let mut extractor = Extractor::new();
    let mut extraction = Extraction::default();

    for path in paths {
        match extractor.extract_file(path) {
            Ok(record) => extraction.records.push(record),
            Err(reason) => {
                debug!(path = %path.display(), reason = %reason, "dropping file from extraction");
                extraction.unparsed.push(UnparsedFile {
                    path: path.clone(),
                    reason,
                });
            }
        }
    }

    extraction
}

fn grammar_for(path: &Path) -> Option<Language> {
    match path.extension()?.to_str()? {
        "ts" => Some(tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into()),
        "tsx" => Some(tree_sitter_typescript::LANGUAGE_TSX.into()),
        "js" | "jsx" => Some(tree_sitter_javascript::LANGUAGE.into()),
        _ => None,
    }
}

/// 1-indexed line of the first error or missing node in document order.
fn first_error_line(root: Node) -> u32 {
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if node.is_error() || node.is_missing() {
            return node.start_position().row as u32 + 1;
        }
        let mut cursor = node.walk();
        let children: Vec<Node> = node
            .children(&mut cursor)
            .filter(|c| c.has_error() || c.is_missing())
            .collect();
        stack.extend(children.into_iter().rev());
    }
    root.start_position().row as u32 + 1
}

fn collect_exports(stmt: Node, source: &[u8], out: &mut Vec<String>) {
    let mut cursor = stmt.walk();
    let children: Vec<Node> = stmt.children(&mut cursor).collect();

    // `export default ...` and `export = ...`
    if children.iter().any(|c| matches!(c.kind(), "default" | "=")) {
        push_unique(out, "default".into());
        return;
    }

    if let Some(decl) = stmt.child_by_field_name("declaration") {
        for name in declaration_names(decl, source) {
            push_unique(out, name);
        }
        return;
    }

    for child in children {
        match child.kind() {
            "export_clause" => {
                let mut spec_cursor = child.walk();
                for spec in child.named_children(&mut spec_cursor) {
                    if spec.kind() != "export_specifier" {
                        continue;
                    }
                    let exposed = spec
                        .child_by_field_name("alias")
                        .or_else(|| spec.child_by_field_name("name"));
                    if let Some(node) = exposed {
                        push_unique(out, unquote(node_text(&node, source)));
                    }
                }
            }
            "namespace_export" => {
                if let Some(name) = child.named_child(0) {
                    push_unique(out, unquote(node_text(&name, source)));
                }
            }
            _ => {}
        }
    }
}

/// Names bound by an exported declaration.
fn declaration_names(decl: Node, source: &[u8]) -> Vec<String> {
    match decl.kind() {
        "lexical_declaration" | "variable_declaration" => {
            let mut names = Vec::new();
            let mut cursor = decl.walk();
            for declarator in decl.named_children(&mut cursor) {
                if declarator.kind() != "variable_declarator" {
                    continue;
                }
                if let Some(pattern) = declarator.child_by_field_name("name") {
                    binding_names(pattern, source, &mut names);
                }
            }
            names
        }
        "ambient_declaration" => {
            let mut cursor = decl.walk();
            let inner: Vec<Node> = decl.named_children(&mut cursor).collect();
            inner
                .into_iter()
                .flat_map(|n| declaration_names(n, source))
                .collect()
        }
        "internal_module" | "module" => match decl.child_by_field_name("name") {
            Some(name) if name.kind() != "string" => {
                let text = node_text(&name, source);
                let head = text.split('.').next().unwrap_or(text);
                vec![head.trim().to_string()]
            }
            _ => Vec::new(),
        },
        "import_alias" => decl
            .named_child(0)
            .map(|n| vec![node_text(&n, source).to_string()])
            .unwrap_or_default(),
        _ => decl
            .child_by_field_name("name")
            .map(|n| vec![node_text(&n, source).to_string()])
            .unwrap_or_default(),
    }
}

/// Identifiers bound by a (possibly destructuring) pattern, left to right.
fn binding_names(pattern: Node, source: &[u8], out: &mut Vec<String>) {
    let mut stack = vec![pattern];
    while let Some(node) = stack.pop() {
        match node.kind() {
            "identifier" | "shorthand_property_identifier_pattern" => {
                out.push(node_text(&node, source).to_string());
            }
            "pair_pattern" => stack.extend(node.child_by_field_name("value")),
            "assignment_pattern" | "object_assignment_pattern" => {
                stack.extend(node.child_by_field_name("left"));
            }
            "object_pattern" | "array_pattern" | "rest_pattern" => {
                let mut cursor = node.walk();
                let children: Vec<Node> = node.named_children(&mut cursor).collect();
                stack.extend(children.into_iter().rev());
            }
            _ => {}
        }
    }
}

fn push_unique(out: &mut Vec<String>, name: String) {
    if !name.is_empty() && !out.contains(&name) {
        out.push(name);
    }
}

fn node_text<'a>(node: &Node, source: &'a [u8]) -> &'a str {
    node.utf8_text(source).unwrap_or_default()
}

fn unquote(text: &str) -> String {
    let quoted = text.len() >= 2
        && (text.starts_with('"') || text.starts_with('\'') || text.starts_with('`'))
        && text.ends_with(&text[..1]);
    if quoted {
        text[1..text.len() - 1].to_string()
    } else {
        text.to_string()
    }
}
