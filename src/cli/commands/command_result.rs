use crate::{cli::exit_status::ExitStatus, pipeline::ExtractionMetadata};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    Extract,
    Plugins,
    Init,
}

#[derive(Debug)]
pub enum CommandSummary {
    Extract(ExtractSummary),
    /// Machine-readable output, printed verbatim.
    Json(String),
    Plugins(Vec<PluginListing>),
    Init(InitSummary),
}

/// One plugin's rendered output.
#[derive(Debug, Clone)]
pub struct PluginSection {
    pub name: String,
    pub success: bool,
    /// Formatted summary; `None` when the plugin produced no data.
    pub body: Option<String>,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub metadata: ExtractionMetadata,
}

#[derive(Debug)]
pub struct ExtractSummary {
    pub sections: Vec<PluginSection>,
    /// Critical plugin that stopped the run early.
    pub stopped_by: Option<String>,
    /// `None` when timing output is disabled.
    pub elapsed_ms: Option<u64>,
}

impl ExtractSummary {
    /// Files that errored during processing, across every plugin.
    pub fn failed_files(&self) -> usize {
        self.sections.iter().map(|s| s.metadata.failed).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginListing {
    pub name: String,
    pub version: String,
    pub priority: i32,
    pub description: String,
    pub dependencies: Vec<String>,
    pub enabled: bool,
}

#[derive(Debug)]
pub struct InitSummary {
    /// The config file, as shown to the user.
    pub file: String,
    /// Set when the file already existed.
    pub error: Option<String>,
}

/// Result of running a glean command.
pub struct CommandResult {
    pub kind: CommandKind,
    pub summary: CommandSummary,
    pub status: ExitStatus,
}
