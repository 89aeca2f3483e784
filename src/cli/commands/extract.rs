use std::{env, time::Instant};

use anyhow::{Result, bail};

use super::{
    CommandKind, CommandResult, CommandSummary, ExtractSummary, PluginSection,
    helper::{build_manager, load_project_config},
};
use crate::{
    cli::{args::ExtractCommand, exit_status::ExitStatus},
    plugins::{OutputFormat, PluginManager, PluginRun, RunReport, format_summary},
};

/// Set to a non-empty value to drop timings from the output.
pub const DISABLE_TIMING_ENV: &str = "GLEAN_DISABLE_TIMING";

pub fn timing_disabled() -> bool {
    env::var_os(DISABLE_TIMING_ENV).is_some_and(|value| !value.is_empty())
}

pub fn extract(cmd: ExtractCommand) -> Result<CommandResult> {
    let mut config = load_project_config(&cmd.common)?;
    if let Some(batch_size) = cmd.batch_size {
        config.batch_size = batch_size;
    }
    if cmd.no_parallel {
        config.parallel = false;
    }

    let manager = build_manager(&cmd.common, &config)?;
    let report = if cmd.plugins.is_empty() {
        manager.execute_all(None)
    } else {
        run_selected(&manager, &cmd.plugins)?
    };

    let status = ExitStatus::from_report(&report);
    let with_timings = !timing_disabled();
    let summary = match cmd.format {
        OutputFormat::Json => CommandSummary::Json(render_json(report, with_timings)?),
        OutputFormat::Text => CommandSummary::Extract(render_text(&manager, report, with_timings)),
    };

    Ok(CommandResult {
        kind: CommandKind::Extract,
        summary,
        status,
    })
}

/// Run the named plugins in manager execution order, regardless of the
/// order they were given on the command line.
fn run_selected(manager: &PluginManager, selected: &[String]) -> Result<RunReport> {
    for name in selected {
        if manager.get_plugin(name).is_none() {
            bail!(
                "unknown plugin '{}' (available: {})",
                name,
                manager.execution_order().join(", ")
            );
        }
    }

    let started = Instant::now();
    let runs = manager
        .execution_order()
        .iter()
        .filter(|name| selected.contains(*name))
        .map(|name| PluginRun {
            name: name.clone(),
            result: manager.execute_plugin(name, None),
        })
        .collect();

    Ok(RunReport {
        runs,
        stopped_by: None,
        elapsed_ms: started.elapsed().as_millis() as u64,
    })
}

fn render_json(mut report: RunReport, with_timings: bool) -> Result<String> {
    if !with_timings {
        report.elapsed_ms = 0;
        for run in &mut report.runs {
            run.result.metadata = run.result.metadata.without_timings();
        }
    }
    Ok(serde_json::to_string_pretty(&report)?)
}

fn render_text(manager: &PluginManager, report: RunReport, with_timings: bool) -> ExtractSummary {
    let sections = report
        .runs
        .into_iter()
        .map(|run| {
            let formatter = manager
                .get_plugin(&run.name)
                .and_then(|plugin| plugin.formatter());
            let mut errors = run.result.errors;
            let body = match run.result.data.as_ref() {
                Some(data) => match format_summary(formatter, data, OutputFormat::Text) {
                    Ok(body) => Some(body),
                    Err(err) => {
                        errors.push(format!("failed to format summary: {:#}", err));
                        None
                    }
                },
                None => None,
            };
            PluginSection {
                name: run.name,
                success: run.result.success,
                body,
                errors,
                warnings: run.result.warnings,
                metadata: run.result.metadata,
            }
        })
        .collect();

    ExtractSummary {
        sections,
        stopped_by: report.stopped_by,
        elapsed_ms: with_timings.then_some(report.elapsed_ms),
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use crate::cli::args::CommonArgs;
    use crate::cli::commands::extract::*;

    fn project() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("src")).unwrap();
        fs::write(
            dir.path().join("src/app.tsx"),
            r#"import { useState } from "react";

export default function App() {
  const [open, setOpen] = useState(false);
  return <button title="Open menu">Click me</button>;
}
"#,
        )
        .unwrap();
        dir
    }

    fn command(dir: &TempDir, plugins: &[&str], format: OutputFormat) -> ExtractCommand {
        ExtractCommand {
            plugins: plugins.iter().map(|p| p.to_string()).collect(),
            format,
            batch_size: None,
            no_parallel: true,
            common: CommonArgs {
                path: dir.path().to_path_buf(),
                verbose: false,
            },
        }
    }

    #[test]
    fn test_selected_plugins_run_in_execution_order() {
        let dir = project();
        let result = extract(command(&dir, &["i18n", "hooks"], OutputFormat::Text)).unwrap();

        assert_eq!(result.status, ExitStatus::Success);
        let CommandSummary::Extract(summary) = result.summary else {
            panic!("expected text summary");
        };
        let names: Vec<_> = summary.sections.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["hooks", "i18n"]);
        assert!(summary.sections.iter().all(|s| s.body.is_some()));
    }

    #[test]
    fn test_unknown_plugin_is_an_error() {
        let dir = project();
        let err = extract(command(&dir, &["routes"], OutputFormat::Text))
            .err()
            .unwrap();
        assert!(err.to_string().contains("unknown plugin 'routes'"));
    }

    #[test]
    fn test_json_output_is_run_report() {
        let dir = project();
        let result = extract(command(&dir, &["hooks"], OutputFormat::Json)).unwrap();
        let CommandSummary::Json(json) = result.summary else {
            panic!("expected json summary");
        };
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["runs"][0]["name"], "hooks");
        assert_eq!(value["runs"][0]["result"]["data"]["totalCalls"], 1);
    }

    #[test]
    fn test_missing_path_fails_plugins() {
        let dir = project();
        let mut cmd = command(&dir, &[], OutputFormat::Text);
        cmd.common.path = dir.path().join("missing");
        let result = extract(cmd).unwrap();
        assert_eq!(result.status, ExitStatus::Failure);
    }
}
