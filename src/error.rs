//! Error taxonomy for the extraction engine.
//!
//! Registration errors (`Validation`, `CircularDependency`) are returned to the
//! caller of [`crate::plugins::PluginManager::register`]. Everything below the
//! pipeline boundary is converted into an
//! [`crate::pipeline::ExtractionResult`] failure instead of propagating.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the plugin manager.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ManagerError {
    /// The plugin failed its self-check or could not be initialised.
    #[error("invalid plugin '{plugin}': {reason}")]
    Validation { plugin: String, reason: String },

    /// Registering the plugin would introduce a dependency cycle.
    #[error("circular dependency detected involving plugin '{plugin}'")]
    CircularDependency { plugin: String },

    #[error("plugin '{0}' not found")]
    NotFound(String),

    #[error("plugin '{0}' is disabled")]
    Disabled(String),
}

impl ManagerError {
    pub fn validation(plugin: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            plugin: plugin.into(),
            reason: reason.into(),
        }
    }
}

/// Errors raised inside one pipeline run. Always caught at the pipeline
/// boundary and turned into a failure result.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("target path does not exist: {}", .0.display())]
    TargetNotFound(PathBuf),

    #[error("discovery failed: {0:#}")]
    Discovery(anyhow::Error),

    #[error("processing failed for {}: {error:#}", path.display())]
    Processing { path: PathBuf, error: anyhow::Error },

    #[error("aggregation failed: {0:#}")]
    Aggregate(anyhow::Error),

    #[error("failed to serialize summary: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("plugin '{0}' has not been initialised with a context")]
    Uninitialised(String),
}
