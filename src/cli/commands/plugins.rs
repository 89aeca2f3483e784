use anyhow::Result;

use super::{
    CommandKind, CommandResult, CommandSummary, PluginListing,
    helper::{build_manager, load_project_config},
};
use crate::cli::{args::PluginsCommand, exit_status::ExitStatus};

/// List registered plugins in the order `extract` would run them.
pub fn plugins(cmd: PluginsCommand) -> Result<CommandResult> {
    let config = load_project_config(&cmd.common)?;
    let manager = build_manager(&cmd.common, &config)?;

    let listings = manager
        .execution_order()
        .iter()
        .filter_map(|name| manager.get_plugin(name))
        .map(|plugin| {
            let meta = plugin.meta();
            PluginListing {
                name: meta.name.clone(),
                version: meta.version.clone(),
                priority: meta.priority,
                description: meta.description.clone(),
                dependencies: meta.dependencies.clone(),
                enabled: plugin.config().enabled,
            }
        })
        .collect();

    Ok(CommandResult {
        kind: CommandKind::Plugins,
        summary: CommandSummary::Plugins(listings),
        status: ExitStatus::Success,
    })
}

#[cfg(test)]
mod tests {
    use std::fs;

    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use crate::cli::args::CommonArgs;
    use crate::cli::commands::plugins::*;
    use crate::config::CONFIG_FILE_NAME;

    #[test]
    fn test_lists_in_execution_order_with_config_applied() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            r#"{ "plugins": { "hooks": { "enabled": false, "priority": 5 } } }"#,
        )
        .unwrap();

        let result = plugins(PluginsCommand {
            common: CommonArgs {
                path: dir.path().to_path_buf(),
                verbose: false,
            },
        })
        .unwrap();

        let CommandSummary::Plugins(listings) = result.summary else {
            panic!("expected plugin listing");
        };
        let rows: Vec<_> = listings
            .iter()
            .map(|l| (l.name.as_str(), l.priority, l.enabled))
            .collect();
        assert_eq!(
            rows,
            vec![
                ("hooks", 5, false),
                ("modules", 10, true),
                ("components", 30, true),
                ("i18n", 40, true),
            ]
        );
        assert_eq!(listings[2].dependencies, vec!["modules".to_string()]);
    }
}
