//! CLI argument definitions using clap.
//!
//! ## Commands
//!
//! - `extract`: Run plugins against a project and print their summaries
//! - `plugins`: List registered plugins in execution order
//! - `init`: Write a default `.gleanrc.json`

use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand};

use crate::plugins::OutputFormat;

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Arguments {
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Arguments {
    /// Check if a command was provided, otherwise print help and return None.
    pub fn with_command_or_help(self) -> Option<Self> {
        if self.command.is_none() {
            Self::command().print_help().ok();
            None
        } else {
            Some(self)
        }
    }

    /// Get the verbose flag from the command's common args.
    pub fn verbose(&self) -> bool {
        match &self.command {
            Some(Command::Extract(cmd)) => cmd.common.verbose,
            Some(Command::Plugins(cmd)) => cmd.common.verbose,
            Some(Command::Init(_)) | None => false,
        }
    }
}

/// Common arguments shared by the commands that analyze a project.
#[derive(Debug, Clone, Args)]
pub struct CommonArgs {
    /// Project directory to analyze
    #[arg(long, default_value = ".")]
    pub path: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Args)]
pub struct ExtractCommand {
    /// Plugins to run (default: every enabled plugin)
    pub plugins: Vec<String>,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Files processed per batch (overrides config file)
    #[arg(long)]
    pub batch_size: Option<usize>,

    /// Process files sequentially (overrides config file)
    #[arg(long)]
    pub no_parallel: bool,

    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Debug, Args)]
pub struct PluginsCommand {
    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Debug, Args)]
pub struct InitCommand {
    /// Directory to write the config file into
    #[arg(long, default_value = ".")]
    pub path: PathBuf,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run plugins (all enabled ones when none are named) and print their summaries
    Extract(ExtractCommand),
    /// List plugins in execution order
    Plugins(PluginsCommand),
    /// Initialize a new .gleanrc.json configuration file
    Init(InitCommand),
}
