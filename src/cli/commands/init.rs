use std::fs;

use anyhow::{Context, Result};

use super::{CommandKind, CommandResult, CommandSummary, InitSummary};
use crate::{
    cli::{args::InitCommand, exit_status::ExitStatus},
    config::{CONFIG_FILE_NAME, default_config_json},
};

/// Write a default `.gleanrc.json`, refusing to overwrite an existing one.
pub fn init(cmd: InitCommand) -> Result<CommandResult> {
    let config_path = cmd.path.join(CONFIG_FILE_NAME);
    let file = if cmd.path.as_os_str() == "." {
        CONFIG_FILE_NAME.to_string()
    } else {
        config_path.display().to_string()
    };

    let (error, status) = if config_path.exists() {
        (Some(format!("{} already exists", file)), ExitStatus::Failure)
    } else {
        fs::write(&config_path, default_config_json()?)
            .with_context(|| format!("Failed to write {}", config_path.display()))?;
        (None, ExitStatus::Success)
    };

    Ok(CommandResult {
        kind: CommandKind::Init,
        summary: CommandSummary::Init(InitSummary { file, error }),
        status,
    })
}
