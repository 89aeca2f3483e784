use anyhow::Result;

use super::{
    args::{Arguments, Command},
    commands::{CommandResult, extract::extract, init::init, plugins::plugins},
};

/// Dispatch to the command handler.
///
/// Returns `Err` only when the command could not run at all (bad config,
/// unknown plugin, I/O error); plugin failures are part of the result.
pub fn run(Arguments { command }: Arguments) -> Result<CommandResult> {
    match command {
        Some(Command::Extract(cmd)) => extract(cmd),
        Some(Command::Plugins(cmd)) => plugins(cmd),
        Some(Command::Init(cmd)) => init(cmd),
        None => anyhow::bail!("No command provided. Use --help to see available commands."),
    }
}
