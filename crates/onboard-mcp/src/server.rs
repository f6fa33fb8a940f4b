//! MCP server setup and lifecycle.

use std::path::PathBuf;

use onboard_core::{OnboardConfig, OnboardError};
use rmcp::{model::*, tool_handler, transport::stdio, ServerHandler, ServiceExt};
use tracing::info;

use crate::tools::OnboardServer;

const SERVER_INSTRUCTIONS: &str = "\
onboard gives a fast architectural overview of a TypeScript/JavaScript workspace:\n\
- scan_workspace: files with their imports and exports, modules under src/, entrypoints, languages\n\
- summarize_architecture: a natural-language onboarding summary built from the scan";

#[tool_handler]
impl ServerHandler for OnboardServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "onboard".to_string(),
                title: Some("Onboard Architecture Scanner".to_string()),
                version: env!("CARGO_PKG_VERSION").to_string(),
                description: Some("Workspace architecture scanning for onboarding".to_string()),
                icons: None,
                website_url: None,
            },
            instructions: Some(SERVER_INSTRUCTIONS.to_string()),
        }
    }
}

/// Start the MCP server on stdio and block until the client closes stdin.
///
/// # Errors
///
/// Returns [`OnboardError::Config`] if the server fails to initialize or
/// hits a transport error.
pub async fn run_server(root: PathBuf, config: OnboardConfig) -> Result<(), OnboardError> {
    info!(root = %root.display(), "starting MCP server on stdio");
    let server = OnboardServer::new(root, config);
    let service = server
        .serve(stdio())
        .await
        .map_err(|e| OnboardError::Config(format!("MCP server failed to start: {e}")))?;

    service
        .waiting()
        .await
        .map_err(|e| OnboardError::Config(format!("MCP server error: {e}")))?;

    Ok(())
}
