use anyhow::Result;

use crate::{
    cli::args::CommonArgs,
    config::{Config, load_config},
    core::ExecutionContext,
    logging::{LogLevel, Logger},
    plugins::{PluginManager, builtin::register_builtins},
};

/// Load the project config, searching upwards from `--path`.
pub fn load_project_config(common: &CommonArgs) -> Result<Config> {
    let start = common
        .path
        .canonicalize()
        .unwrap_or_else(|_| common.path.clone());
    Ok(load_config(&start)?.config)
}

/// Build a manager with every builtin plugin registered.
///
/// `-v` forces debug logging regardless of the configured level.
pub fn build_manager(common: &CommonArgs, config: &Config) -> Result<PluginManager> {
    let level = if common.verbose {
        LogLevel::Debug
    } else {
        config.log_level
    };
    let ctx = ExecutionContext::new(&common.path)
        .with_logger(Logger::new(level))
        .with_cache_ttl(config.cache_ttl());

    let mut manager = PluginManager::new(ctx);
    register_builtins(&mut manager, config)?;
    Ok(manager)
}
