//! Core types, configuration, and error handling for onboard.
//!
//! This crate provides the shared foundation used by all other onboard crates:
//! - [`OnboardError`]: unified error type using `thiserror`
//! - [`OnboardConfig`]: configuration loaded from `.onboard.toml`
//! - The scan result: [`ArchitectureSummary`] and its parts ([`FileRecord`],
//!   [`UnparsedFile`], [`ProjectManifest`], [`ModuleBucket`], [`LanguageTag`])
//! - [`OutputFormat`] for CLI rendering

mod config;
mod error;
mod types;

pub use config::{LlmConfig, OnboardConfig, ScanConfig};
pub use error::OnboardError;
pub use types::{
    ArchitectureSummary, FileRecord, LanguageTag, ManifestTable, ModuleBucket, OutputFormat,
    ProjectManifest, SkipReason, UnparsedFile,
};

/// A convenience `Result` type for onboard operations.
pub type Result<T> = std::result::Result<T, OnboardError>;
