use std::path::PathBuf;

/// Errors that can occur across onboard.
///
/// Absence conditions (missing manifest, missing compiler configuration,
/// missing root) are never reported through this type; they surface as
/// empty or absent values in the summary. Library crates use this type
/// directly; the binary reports it through `miette`.
///
/// # Examples
///
/// ```
/// use onboard_core::OnboardError;
///
/// let err = OnboardError::Config("missing API key".into());
/// assert!(err.to_string().contains("missing API key"));
/// ```
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum OnboardError {
    /// Filesystem I/O failure.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// Source or manifest parsing failure.
    #[error("parse error: {0}")]
    Parse(String),

    /// Completion service request or response error.
    #[error("LLM error: {0}")]
    Llm(String),

    /// JSON serialization / deserialization failure.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML deserialization failure.
    #[error("TOML parse error: {0}")]
    #[diagnostic(help("check the syntax of your .onboard.toml"))]
    Toml(#[from] toml::de::Error),

    /// A required file was not found.
    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),
}
