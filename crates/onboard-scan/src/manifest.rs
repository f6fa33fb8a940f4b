//! Best-effort `package.json` loading.

use std::path::Path;

use onboard_core::{ManifestTable, OnboardError, ProjectManifest};
use serde_json::Value;
use tracing::debug;

/// Project descriptor file name, relative to the workspace root.
pub const MANIFEST_FILE: &str = "package.json";

/// Everything the scanner reads from `package.json`.
///
/// `manifest` is what ends up in the summary; `main` and `bin` only feed
/// entrypoint resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageJson {
    pub manifest: ProjectManifest,
    /// Primary entry (`main`).
    pub main: Option<String>,
    /// Binary targets in declaration order. A string-valued `bin` yields one.
    pub bin: Vec<String>,
}

/// Load `<root>/package.json`. Any failure means "no manifest".
///
/// # Examples
///
/// ```no_run
/// use std::path::Path;
/// use onboard_scan::manifest::load_manifest;
///
/// if let Some(pkg) = load_manifest(Path::new(".")) {
///     println!("{:?}", pkg.manifest.name);
/// }
/// ```
pub fn load_manifest(root: &Path) -> Option<PackageJson> {
    let path = root.join(MANIFEST_FILE);
    let content = match std::fs::read_to_string(&path) {
        Ok(c) => c,
        Err(err) => {
            debug!(path = %path.display(), error = %err, "no readable manifest");
            return None;
        }
    };

    match parse_manifest(&content) {
        Ok(pkg) => Some(pkg),
        Err(err) => {
            debug!(path = %path.display(), error = %err, "ignoring invalid manifest");
            None
        }
    }
}

/// Parse manifest text.
///
/// Recognized fields of the wrong type are treated as absent; map entries
/// whose value is not a string are dropped.
///
/// # Errors
///
/// Returns [`OnboardError::Serialization`] for invalid JSON and
/// [`OnboardError::Parse`] when the top level is not an object.
///
/// # Examples
///
/// ```
/// use onboard_scan::manifest::parse_manifest;
///
/// let pkg = parse_manifest(r#"{"name": "demo", "main": "lib/index.js"}"#).unwrap();
/// assert_eq!(pkg.manifest.name.as_deref(), Some("demo"));
/// assert_eq!(pkg.main.as_deref(), Some("lib/index.js"));
/// ```
pub fn parse_manifest(content: &str) -> Result<PackageJson, OnboardError> {
    let json: Value = serde_json::from_str(content)?;
    let Some(obj) = json.as_object() else {
        return Err(OnboardError::Parse(format!(
            "{MANIFEST_FILE} must contain a JSON object"
        )));
    };

    let manifest = ProjectManifest {
        name: obj.get("name").and_then(Value::as_str).map(String::from),
        scripts: string_map(obj.get("scripts")),
        dependencies: string_map(obj.get("dependencies")),
        dev_dependencies: string_map(obj.get("devDependencies")),
    };

    let bin = match obj.get("bin") {
        Some(Value::String(path)) => vec![path.clone()],
        Some(Value::Object(targets)) => targets
            .values()
            .filter_map(|v| v.as_str().map(String::from))
            .collect(),
        _ => Vec::new(),
    };

    Ok(PackageJson {
        manifest,
        main: obj.get("main").and_then(Value::as_str).map(String::from),
        bin,
    })
}

fn string_map(value: Option<&Value>) -> Option<ManifestTable> {
    let obj = value?.as_object()?;
    Some(
        obj.iter()
            .filter(|(_, v)| v.is_string())
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect(),
    )
}
