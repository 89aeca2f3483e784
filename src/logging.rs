//! Logger instance threaded through the execution context.
//!
//! There is no process-wide verbosity setter: a [`Logger`] is created once with
//! its level and handed to whatever needs to report diagnostics. Events are
//! emitted through `tracing`, so the binary decides where they end up (see
//! [`install_subscriber`]).

use std::{fmt::Display, io, sync::Arc};

use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

/// Verbosity level, ordered from least to most verbose.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Deserialize, Serialize,
    clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    #[default]
    Warn,
    Info,
    Debug,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Error => write!(f, "error"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Debug => write!(f, "debug"),
        }
    }
}

/// Level-filtered logger, optionally scoped to a component (plugin name, stage).
#[derive(Debug, Clone, Default)]
pub struct Logger {
    level: LogLevel,
    scope: Option<Arc<str>>,
}

impl Logger {
    pub fn new(level: LogLevel) -> Self {
        Self { level, scope: None }
    }

    pub fn level(&self) -> LogLevel {
        self.level
    }

    pub fn scope(&self) -> Option<&str> {
        self.scope.as_deref()
    }

    /// Derive a logger with the same level that tags every event with `scope`.
    pub fn scoped(&self, scope: &str) -> Self {
        Self {
            level: self.level,
            scope: Some(Arc::from(scope)),
        }
    }

    pub fn enabled(&self, level: LogLevel) -> bool {
        level <= self.level
    }

    pub fn error(&self, message: impl Display) {
        if self.enabled(LogLevel::Error) {
            tracing::error!(scope = self.scope_field(), "{}", message);
        }
    }

    pub fn warn(&self, message: impl Display) {
        if self.enabled(LogLevel::Warn) {
            tracing::warn!(scope = self.scope_field(), "{}", message);
        }
    }

    pub fn info(&self, message: impl Display) {
        if self.enabled(LogLevel::Info) {
            tracing::info!(scope = self.scope_field(), "{}", message);
        }
    }

    pub fn debug(&self, message: impl Display) {
        if self.enabled(LogLevel::Debug) {
            tracing::debug!(scope = self.scope_field(), "{}", message);
        }
    }

    fn scope_field(&self) -> &str {
        self.scope.as_deref().unwrap_or("glean")
    }
}

/// Install a stderr `tracing` subscriber for the binary.
///
/// The subscriber lets everything through; filtering is done by each
/// [`Logger`]. `RUST_LOG` still narrows output when set. Returns false if a
/// global subscriber was already installed.
pub fn install_subscriber() -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .without_time()
        .try_init()
        .is_ok()
}
