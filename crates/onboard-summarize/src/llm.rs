use std::time::Duration;

use onboard_core::{LlmConfig, OnboardError};
use serde::{Deserialize, Serialize};

/// Base URL used when none is configured.
pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";
/// Token budget used when none is configured.
pub const DEFAULT_MAX_TOKENS: u32 = 600;
/// Sampling temperature used when none is configured.
pub const DEFAULT_TEMPERATURE: f32 = 0.2;
/// Returned in place of an empty completion.
pub const NO_CONTENT: &str = "No content returned";

const COMPLETIONS_PATH: &str = "/chat/completions";

/// A message in a chat conversation with the completion service.
///
/// # Examples
///
/// ```
/// use onboard_summarize::llm::{ChatMessage, Role};
///
/// let msg = ChatMessage::user("Describe this workspace");
/// assert!(matches!(msg.role, Role::User));
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Role in the chat conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

/// OpenAI-compatible chat completions client, defaulting to OpenRouter.
///
/// # Examples
///
/// ```
/// use onboard_core::LlmConfig;
/// use onboard_summarize::llm::ChatClient;
///
/// let config = LlmConfig {
///     base_url: Some("http://localhost:8080/v1/".into()),
///     ..LlmConfig::default()
/// };
/// let client = ChatClient::new(&config).unwrap();
/// assert_eq!(client.endpoint(), "http://localhost:8080/v1/chat/completions");
/// ```
pub struct ChatClient {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
    max_tokens: u32,
    temperature: f32,
    system_prompt: Option<String>,
}

impl ChatClient {
    /// Create a client from configuration.
    ///
    /// `/chat/completions` is appended to the base URL unless the URL
    /// already ends with it.
    ///
    /// # Errors
    ///
    /// Returns [`OnboardError::Llm`] if the HTTP client cannot be built.
    pub fn new(config: &LlmConfig) -> Result<Self, OnboardError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(|e| OnboardError::Llm(format!("failed to create HTTP client: {e}")))?;

        let base = config
            .base_url
            .as_deref()
            .unwrap_or(DEFAULT_BASE_URL)
            .trim_end_matches('/');
        let endpoint = if base.ends_with(COMPLETIONS_PATH) {
            base.to_string()
        } else {
            format!("{base}{COMPLETIONS_PATH}")
        };

        Ok(Self {
            client,
            endpoint,
            model: config.model.clone(),
            api_key: config.api_key.clone(),
            max_tokens: config.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
            temperature: config.temperature.unwrap_or(DEFAULT_TEMPERATURE),
            system_prompt: config.system_prompt.clone().filter(|p| !p.trim().is_empty()),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Send `prompt` as a user message and return the reply text.
    ///
    /// The configured system prompt, if any, goes first as a system message.
    ///
    /// A response without `choices[0].message.content` yields
    /// [`NO_CONTENT`] rather than an error.
    ///
    /// # Errors
    ///
    /// Returns [`OnboardError::Llm`] on transport failures, non-success
    /// statuses (the status and body are included) and non-JSON bodies.
    pub async fn complete(&self, prompt: &str) -> Result<String, OnboardError> {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = &self.system_prompt {
            messages.push(ChatMessage::system(system.as_str()));
        }
        messages.push(ChatMessage::user(prompt));

        let body = serde_json::json!({
            "model": self.model,
            "messages": messages,
            "temperature": self.temperature,
            "max_tokens": self.max_tokens,
        });

        let mut request = self.client.post(&self.endpoint);
        if let Some(api_key) = &self.api_key {
            request = request.header("Authorization", format!("Bearer {api_key}"));
        }
        request = request.header("Content-Type", "application/json");

        let response = request
            .json(&body)
            .send()
            .await
            .map_err(|e| OnboardError::Llm(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            return Err(OnboardError::Llm(format!(
                "request failed: {status} {body_text}"
            )));
        }

        let response_body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| OnboardError::Llm(format!("failed to parse response: {e}")))?;

        let content = response_body
            .get("choices")
            .and_then(|c| c.get(0))
            .and_then(|c| c.get("message"))
            .and_then(|m| m.get("content"))
            .and_then(|c| c.as_str())
            .filter(|c| !c.is_empty())
            .unwrap_or(NO_CONTENT);

        Ok(content.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_openrouter() {
        let client = ChatClient::new(&LlmConfig::default()).unwrap();
        assert_eq!(client.endpoint(), "https://openrouter.ai/api/v1/chat/completions");
        assert_eq!(client.model(), "anthropic/claude-3-opus:latest");
        assert_eq!(client.max_tokens, DEFAULT_MAX_TOKENS);
    }

    #[test]
    fn full_endpoint_is_not_doubled() {
        let config = LlmConfig {
            base_url: Some("https://openrouter.ai/api/v1/chat/completions".into()),
            ..LlmConfig::default()
        };
        let client = ChatClient::new(&config).unwrap();
        assert_eq!(client.endpoint(), "https://openrouter.ai/api/v1/chat/completions");
    }

    #[test]
    fn blank_system_prompt_is_ignored() {
        let config = LlmConfig {
            system_prompt: Some("  ".into()),
            ..LlmConfig::default()
        };
        assert!(ChatClient::new(&config).unwrap().system_prompt.is_none());
    }

    #[test]
    fn chat_message_serializes() {
        let json = serde_json::to_value(ChatMessage::user("hello")).unwrap();
        assert_eq!(json["role"], "user");
        assert_eq!(json["content"], "hello");
    }
}
