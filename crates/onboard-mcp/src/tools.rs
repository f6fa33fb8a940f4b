//! Tool implementations for the onboard MCP server.
//!
//! Both tools scan on a blocking task and return pretty JSON via
//! `CallToolResult`.

use std::path::PathBuf;

use onboard_core::{ArchitectureSummary, LlmConfig, OnboardConfig};
use onboard_scan::ScanOptions;
use onboard_summarize::AiSummary;
use rmcp::{
    handler::server::{tool::ToolRouter, wrapper::Parameters},
    model::*,
    schemars, tool, tool_router, ErrorData as McpError,
};
use serde::{Deserialize, Serialize};

/// MCP server exposing the workspace scan and the AI summary.
///
/// # Examples
///
/// ```
/// use std::path::PathBuf;
/// use onboard_core::OnboardConfig;
/// use onboard_mcp::tools::OnboardServer;
///
/// let server = OnboardServer::new(PathBuf::from("."), OnboardConfig::default());
/// ```
#[derive(Clone)]
pub struct OnboardServer {
    pub(crate) root: PathBuf,
    pub(crate) llm: LlmConfig,
    pub(crate) scan: ScanOptions,
    pub(crate) tool_router: ToolRouter<Self>,
}

/// Parameters for the `scan_workspace` tool.
#[derive(Debug, Default, Deserialize, schemars::JsonSchema)]
pub struct ScanWorkspaceParams {
    /// Workspace path (default: server's configured root).
    pub path: Option<String>,
}

/// Parameters for the `summarize_architecture` tool.
#[derive(Debug, Default, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SummarizeArchitectureParams {
    /// Workspace path (default: server's configured root).
    pub path: Option<String>,
    /// Model identifier overriding the configured one.
    pub model: Option<String>,
    /// Token budget for the completion (default: 600).
    pub max_tokens: Option<u32>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ScanResponse {
    #[serde(flatten)]
    summary: ArchitectureSummary,
    total_files: usize,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SummaryResponse {
    #[serde(flatten)]
    summary: AiSummary,
    timestamp: String,
}

fn mcp_err(msg: impl Into<String>) -> McpError {
    McpError::internal_error(msg.into(), None)
}

#[tool_router]
impl OnboardServer {
    /// Create a server rooted at `root`.
    pub fn new(root: PathBuf, config: OnboardConfig) -> Self {
        Self {
            root,
            scan: ScanOptions::from(&config.scan),
            llm: config.llm,
            tool_router: Self::tool_router(),
        }
    }

    fn resolve_path(&self, path: &Option<String>) -> Result<PathBuf, McpError> {
        let canonical_root = self.root.canonicalize().map_err(|e| {
            mcp_err(format!(
                "Failed to access configured workspace {}: {e}",
                self.root.display()
            ))
        })?;

        let requested = match path {
            Some(p) => {
                let input = PathBuf::from(p);
                if input.is_absolute() {
                    input
                } else {
                    canonical_root.join(input)
                }
            }
            None => canonical_root.clone(),
        };

        let canonical_requested = requested.canonicalize().map_err(|e| {
            mcp_err(format!("Failed to resolve path {}: {e}", requested.display()))
        })?;

        if !canonical_requested.starts_with(&canonical_root) {
            return Err(mcp_err(format!(
                "Path {} is outside the configured workspace {}",
                canonical_requested.display(),
                canonical_root.display()
            )));
        }

        Ok(canonical_requested)
    }

    async fn scan(&self, path: &Option<String>) -> Result<ArchitectureSummary, McpError> {
        let root = self.resolve_path(path)?;
        let options = self.scan.clone();
        tokio::task::spawn_blocking(move || onboard_scan::scan_workspace_with(&root, &options))
            .await
            .map_err(|e| mcp_err(format!("Scan task failed: {e}")))?
            .map_err(|e| mcp_err(format!("Scan failed: {e}")))
    }

    #[tool(
        name = "scan_workspace",
        description = "Scan a TypeScript/JavaScript workspace and return its architecture: every source file with its import specifiers and exported names, modules (subdirectories of src/), entrypoints, languages present, the package.json summary, and files that could not be parsed. Use this to get oriented in an unfamiliar codebase."
    )]
    pub async fn scan_workspace(
        &self,
        Parameters(params): Parameters<ScanWorkspaceParams>,
    ) -> Result<CallToolResult, McpError> {
        let summary = self.scan(&params.path).await?;
        let response = ScanResponse {
            total_files: summary.files.len(),
            summary,
        };

        let json = serde_json::to_string_pretty(&response).map_err(|e| mcp_err(e.to_string()))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(
        name = "summarize_architecture",
        description = "Scan a workspace and ask the configured completion service (OpenRouter) for an onboarding-oriented architecture summary. Falls back to a short offline overview, with a reason, when no API key is configured or the service fails."
    )]
    pub async fn summarize_architecture(
        &self,
        Parameters(params): Parameters<SummarizeArchitectureParams>,
    ) -> Result<CallToolResult, McpError> {
        let summary = self.scan(&params.path).await?;

        let mut llm = self.llm.clone();
        if let Some(model) = params.model {
            llm.model = model;
        }
        if let Some(max_tokens) = params.max_tokens {
            llm.max_tokens = Some(max_tokens);
        }

        let ai = onboard_summarize::summarize_architecture(&summary, &llm).await;
        let response = SummaryResponse {
            summary: ai,
            timestamp: chrono::Utc::now().to_rfc3339(),
        };

        let json = serde_json::to_string_pretty(&response).map_err(|e| mcp_err(e.to_string()))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }
}
