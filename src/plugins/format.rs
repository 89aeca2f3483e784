use anyhow::Result;
use serde::Serialize;
use serde_json::Value;

/// How summaries are rendered for the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Optional capability: a plugin-specific text rendering of its summary.
///
/// Summaries reach the formatter as JSON because the manager stores them
/// type-erased; formatters typically deserialize them back into their
/// concrete type.
pub trait SummaryFormatter: Send + Sync {
    fn format_text(&self, summary: &Value) -> Result<String>;
}

/// Render `summary` with `formatter`, falling back to pretty JSON when the
/// plugin has no formatter or JSON output was requested.
pub fn format_summary(
    formatter: Option<&dyn SummaryFormatter>,
    summary: &Value,
    format: OutputFormat,
) -> Result<String> {
    match (format, formatter) {
        (OutputFormat::Text, Some(formatter)) => formatter.format_text(summary),
        _ => Ok(serde_json::to_string_pretty(summary)?),
    }
}
