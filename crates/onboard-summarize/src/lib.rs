//! Natural-language architecture summaries from a completion service.
//!
//! [`summarize_architecture`] turns an [`ArchitectureSummary`] into a prompt,
//! sends it to an OpenAI-compatible chat endpoint (OpenRouter by default) and
//! returns the reply. Any problem with the service degrades to a short
//! offline overview instead of an error.

pub mod llm;
pub mod prompt;

use onboard_core::{ArchitectureSummary, LlmConfig, OnboardError};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::llm::ChatClient;

/// Provider name reported when the remote service answered.
pub const REMOTE_PROVIDER: &str = "openrouter";
/// Provider name reported for the offline overview.
pub const FALLBACK_PROVIDER: &str = "fallback";

/// Result of a summarization attempt.
///
/// # Examples
///
/// ```
/// use onboard_summarize::AiSummary;
///
/// let summary = AiSummary::fallback("Overview".into(), "offline");
/// let json = serde_json::to_value(&summary).unwrap();
/// assert_eq!(json["provider"], "fallback");
/// assert!(json.get("promptChars").is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiSummary {
    /// `openrouter` or `fallback`.
    pub provider: String,
    /// Model that produced the text (remote only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Why the fallback was used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Prompt length in characters (remote only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_chars: Option<usize>,
    pub summary: String,
}

impl AiSummary {
    pub fn fallback(summary: String, reason: impl Into<String>) -> Self {
        Self {
            provider: FALLBACK_PROVIDER.into(),
            model: None,
            reason: Some(reason.into()),
            prompt_chars: None,
            summary,
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.provider == FALLBACK_PROVIDER
    }
}

/// Summarize `summary` with the configured completion service.
///
/// The remote service is tried when [`LlmConfig::wants_remote`] holds. A
/// missing key, a failed request or no configured provider all produce a
/// fallback result carrying the reason; this function never fails.
///
/// # Examples
///
/// ```
/// use std::path::PathBuf;
/// use onboard_core::{ArchitectureSummary, LlmConfig};
/// use onboard_summarize::summarize_architecture;
///
/// let rt = tokio::runtime::Runtime::new().unwrap();
/// let summary = ArchitectureSummary::empty(PathBuf::from("/repo"));
/// let result = rt.block_on(summarize_architecture(&summary, &LlmConfig::default()));
/// assert!(result.is_fallback());
/// assert_eq!(result.reason.as_deref(), Some("No OpenRouter key or provider specified"));
/// ```
pub async fn summarize_architecture(summary: &ArchitectureSummary, config: &LlmConfig) -> AiSummary {
    if !config.wants_remote() {
        return AiSummary::fallback(
            fallback_overview(summary),
            "No OpenRouter key or provider specified",
        );
    }
    if config.api_key.is_none() {
        return AiSummary::fallback(fallback_overview(summary), "Missing OpenRouter API key");
    }

    let prompt = prompt::build_prompt(summary);
    debug!(model = %config.model, prompt_chars = prompt.chars().count(), "requesting architecture summary");

    match request_summary(&prompt, config).await {
        Ok(text) => AiSummary {
            provider: REMOTE_PROVIDER.into(),
            model: Some(config.model.clone()),
            reason: None,
            prompt_chars: Some(prompt.chars().count()),
            summary: text,
        },
        Err(err) => {
            let message = match err {
                OnboardError::Llm(msg) => msg,
                other => other.to_string(),
            };
            warn!(error = %message, "completion service failed, using fallback summary");
            AiSummary::fallback(
                fallback_overview(summary),
                format!("OpenRouter error: {message}"),
            )
        }
    }
}

async fn request_summary(prompt: &str, config: &LlmConfig) -> Result<String, OnboardError> {
    let client = ChatClient::new(config)?;
    client.complete(prompt).await
}

/// Offline overview: languages, module names and entrypoints.
///
/// # Examples
///
/// ```
/// use std::path::PathBuf;
/// use onboard_core::{ArchitectureSummary, LanguageTag};
/// use onboard_summarize::fallback_overview;
///
/// let mut summary = ArchitectureSummary::empty(PathBuf::from("/repo"));
/// summary.languages.insert(LanguageTag::Typed);
/// assert!(fallback_overview(&summary).contains("Languages: ts"));
/// ```
pub fn fallback_overview(summary: &ArchitectureSummary) -> String {
    let languages = summary
        .languages
        .iter()
        .map(|l| l.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    let modules = summary
        .modules
        .iter()
        .map(|m| m.name.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    let entrypoints = summary
        .entrypoints
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "Overview:\nLanguages: {languages}\nModules: {modules}\nEntrypoints: {entrypoints}\n\
         (Configure an OpenRouter API key to enable the full AI summary.)"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use onboard_core::{LanguageTag, ModuleBucket};
    use std::path::PathBuf;

    fn summary() -> ArchitectureSummary {
        let mut summary = ArchitectureSummary::empty(PathBuf::from("/repo"));
        summary.languages.insert(LanguageTag::Typed);
        summary.modules.push(ModuleBucket {
            name: "core".into(),
            files: Vec::new(),
        });
        summary.entrypoints.push(PathBuf::from("/repo/src/index.ts"));
        summary
    }

    #[tokio::test]
    async fn no_provider_falls_back() {
        let result = summarize_architecture(&summary(), &LlmConfig::default()).await;
        assert!(result.is_fallback());
        assert_eq!(
            result.reason.as_deref(),
            Some("No OpenRouter key or provider specified")
        );
        assert!(result.summary.contains("Languages: ts"));
        assert!(result.summary.contains("Modules: core"));
        assert!(result.summary.contains("Entrypoints: /repo/src/index.ts"));
    }

    #[tokio::test]
    async fn provider_without_key_falls_back() {
        let config = LlmConfig {
            provider: Some("openrouter".into()),
            ..LlmConfig::default()
        };
        let result = summarize_architecture(&summary(), &config).await;
        assert!(result.is_fallback());
        assert_eq!(result.reason.as_deref(), Some("Missing OpenRouter API key"));
        assert!(result.model.is_none());
    }

    #[tokio::test]
    async fn unreachable_service_falls_back_with_error() {
        // bind then drop to get a port nothing listens on
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let config = LlmConfig {
            api_key: Some("sk-test".into()),
            base_url: Some(format!("http://127.0.0.1:{port}/api/v1")),
            ..LlmConfig::default()
        };

        let result = summarize_architecture(&summary(), &config).await;
        assert!(result.is_fallback());
        let reason = result.reason.unwrap();
        assert!(reason.starts_with("OpenRouter error: "), "{reason}");
    }

    #[test]
    fn fallback_serializes_without_remote_fields() {
        let result = AiSummary::fallback("text".into(), "why");
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["reason"], "why");
        assert!(json.get("model").is_none());
    }
}
