use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::OnboardError;

/// Top-level configuration loaded from `.onboard.toml`.
///
/// Supports layered resolution: CLI flags > env vars > local config > defaults.
/// Only the binary consults the environment; libraries receive the resolved
/// value.
///
/// # Examples
///
/// ```
/// use onboard_core::OnboardConfig;
///
/// let config = OnboardConfig::default();
/// assert!(config.llm.provider.is_none());
/// assert!(config.scan.exclude.is_empty());
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OnboardConfig {
    /// Completion service settings.
    #[serde(default)]
    pub llm: LlmConfig,
    /// Workspace scanning settings.
    #[serde(default)]
    pub scan: ScanConfig,
}

impl OnboardConfig {
    /// Load configuration from a TOML file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`OnboardError::Io`] if the file cannot be read, or
    /// [`OnboardError::Toml`] if the content is not valid TOML.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use onboard_core::OnboardConfig;
    /// use std::path::Path;
    ///
    /// let config = OnboardConfig::from_file(Path::new(".onboard.toml")).unwrap();
    /// ```
    pub fn from_file(path: &Path) -> Result<Self, OnboardError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns [`OnboardError::Toml`] if parsing fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use onboard_core::OnboardConfig;
    ///
    /// let toml = r#"
    /// [llm]
    /// model = "openai/gpt-4o-mini"
    /// "#;
    /// let config = OnboardConfig::from_toml(toml).unwrap();
    /// assert_eq!(config.llm.model, "openai/gpt-4o-mini");
    /// ```
    pub fn from_toml(content: &str) -> Result<Self, OnboardError> {
        let config: Self = toml::from_str(content)?;
        Ok(config)
    }
}

/// Completion service configuration.
///
/// Any OpenAI-compatible chat completions endpoint works; the defaults point
/// at OpenRouter.
///
/// # Examples
///
/// ```
/// use onboard_core::LlmConfig;
///
/// let config = LlmConfig::default();
/// assert_eq!(config.model, "anthropic/claude-3-opus:latest");
/// assert!(config.api_key.is_none());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Provider name. `"openrouter"` selects the remote service even when no
    /// key is configured (the summary then falls back with a reason).
    pub provider: Option<String>,
    /// Model identifier.
    #[serde(default = "default_model")]
    pub model: String,
    /// API key for the provider.
    pub api_key: Option<String>,
    /// Base URL of the API; `/chat/completions` is appended.
    pub base_url: Option<String>,
    /// Token budget for the completion.
    pub max_tokens: Option<u32>,
    /// Sampling temperature.
    pub temperature: Option<f32>,
    /// Optional system message sent ahead of the prompt.
    pub system_prompt: Option<String>,
}

fn default_model() -> String {
    "anthropic/claude-3-opus:latest".into()
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: None,
            model: default_model(),
            api_key: None,
            base_url: None,
            max_tokens: None,
            temperature: None,
            system_prompt: None,
        }
    }
}

impl LlmConfig {
    /// Overlay values from environment-style variables.
    ///
    /// `lookup` maps a variable name to its value. Recognized variables:
    /// `LLM_PROVIDER`, `OPENROUTER_API_KEY`, `OPENROUTER_MODEL`,
    /// `OPENROUTER_BASE_URL`, `OPENROUTER_MAX_TOKENS`. Empty values and
    /// unparseable token counts are ignored.
    ///
    /// # Examples
    ///
    /// ```
    /// use onboard_core::LlmConfig;
    ///
    /// let mut config = LlmConfig::default();
    /// config.apply_env(|key| (key == "OPENROUTER_MODEL").then(|| "mistral/large".to_string()));
    /// assert_eq!(config.model, "mistral/large");
    /// ```
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(provider) = get("LLM_PROVIDER") {
            self.provider = Some(provider.to_lowercase());
        }
        if let Some(key) = get("OPENROUTER_API_KEY") {
            self.api_key = Some(key);
        }
        if let Some(model) = get("OPENROUTER_MODEL") {
            self.model = model;
        }
        if let Some(url) = get("OPENROUTER_BASE_URL") {
            self.base_url = Some(url);
        }
        if let Some(tokens) = get("OPENROUTER_MAX_TOKENS").and_then(|v| v.trim().parse().ok()) {
            self.max_tokens = Some(tokens);
        }
    }

    /// Whether the remote provider should be attempted.
    pub fn wants_remote(&self) -> bool {
        self.provider.as_deref() == Some("openrouter") || self.api_key.is_some()
    }
}

/// Workspace scanning configuration.
///
/// # Examples
///
/// ```
/// use onboard_core::OnboardConfig;
///
/// let config = OnboardConfig::from_toml("[scan]\nexclude = [\"coverage\"]").unwrap();
/// assert_eq!(config.scan.exclude, vec!["coverage"]);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Directory or file names excluded in addition to the built-in ones
    /// (`node_modules`, `dist`, `.git`).
    #[serde(default)]
    pub exclude: Vec<String>,
}
