//! MCP server exposing onboard's workspace scan to IDEs and agents.
//!
//! Implements a Model Context Protocol server using rmcp with two tools,
//! `scan_workspace` and `summarize_architecture`, served over stdio.
//!
//! # Examples
//!
//! ```no_run
//! use std::path::PathBuf;
//! use onboard_core::OnboardConfig;
//!
//! # async fn example() -> Result<(), onboard_core::OnboardError> {
//! onboard_mcp::server::run_server(PathBuf::from("."), OnboardConfig::default()).await?;
//! # Ok(())
//! # }
//! ```

pub mod server;
pub mod tools;
