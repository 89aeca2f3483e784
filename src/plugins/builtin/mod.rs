//! The analyzers shipped with the binary.
//!
//! Each one is an [`Extractor`] wrapped in a [`PipelinePlugin`] with a text
//! formatter. Shared settings come from [`Config`]; per-plugin overrides come
//! from its `plugins.<name>` section.
//!
//! ## Module Structure
//!
//! - `modules`: import/export inventory (priority 10)
//! - `hooks`: React hook usage and custom hooks (priority 20)
//! - `components`: exported components in JSX files (priority 30)
//! - `i18n`: hardcoded user-facing strings (priority 40)

pub mod components;
pub mod hooks;
pub mod i18n;
pub mod modules;

use std::{path::Path, sync::Arc};

use serde::Serialize;

use crate::{
    config::{Config, PluginEntry},
    core::{
        context::ExecutionContext,
        parsers::ParsedArtifact,
        traverse::facts::{ExportFact, collect_exports},
    },
    error::ManagerError,
    pipeline::Extractor,
    plugins::{PipelinePlugin, Plugin, PluginManager, PluginMeta, SummaryFormatter},
};

pub use components::ComponentsExtractor;
pub use hooks::HooksExtractor;
pub use i18n::I18nExtractor;
pub use modules::ModulesExtractor;

/// Version reported by every built-in plugin.
pub const BUILTIN_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Names of the built-in plugins, in registration order.
pub const BUILTIN_NAMES: &[&str] = &["modules", "hooks", "components", "i18n"];

/// Wrap `extractor` in a plugin, applying the `plugins.<name>` section of
/// `config` (priority override, enabled/critical switches, options).
fn configured<E, F>(meta: PluginMeta, extractor: E, formatter: F, config: &Config) -> Box<dyn Plugin>
where
    E: Extractor + Send + 'static,
    E::Summary: Serialize,
    F: SummaryFormatter + 'static,
{
    let entry = config.plugin_entry(&meta.name);
    let meta = match entry.and_then(|e| e.priority) {
        Some(priority) => meta.with_priority(priority),
        None => meta,
    };
    let plugin_config = entry.map(PluginEntry::plugin_config).unwrap_or_default();
    Box::new(
        PipelinePlugin::new(meta, extractor)
            .with_config(plugin_config)
            .with_formatter(formatter),
    )
}

/// Build every built-in plugin from `config`.
pub fn builtin_plugins(config: &Config) -> Vec<Box<dyn Plugin>> {
    vec![
        modules::plugin(config),
        hooks::plugin(config),
        components::plugin(config),
        i18n::plugin(config),
    ]
}

/// Register every built-in plugin with `manager`.
pub fn register_builtins(manager: &mut PluginManager, config: &Config) -> Result<(), ManagerError> {
    for plugin in builtin_plugins(config) {
        manager.register(plugin)?;
    }
    Ok(())
}

/// Cache key for a file's export facts.
pub fn exports_cache_key(path: &Path) -> String {
    format!("exports:{}", path.display())
}

/// Export facts for `artifact`, computed once per context and shared by every
/// plugin that needs them.
pub fn cached_exports(ctx: &ExecutionContext, artifact: &ParsedArtifact) -> Arc<Vec<ExportFact>> {
    let key = exports_cache_key(&artifact.path);
    ctx.cache()
        .memoize(&key, || collect_exports(artifact, ctx.logger()))
        .unwrap_or_else(|| Arc::new(collect_exports(artifact, ctx.logger())))
}

#[cfg(test)]
mod tests {
    use std::fs;

    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    use crate::core::parsers::parse_with_cache;
    use crate::plugins::builtin::*;

    #[test]
    fn test_register_builtins_orders_by_priority() {
        let dir = tempdir().unwrap();
        let mut manager = PluginManager::new(ExecutionContext::new(dir.path()));
        register_builtins(&mut manager, &Config::default()).unwrap();

        assert_eq!(
            manager.execution_order(),
            &["modules", "hooks", "components", "i18n"]
        );
        let names: Vec<&str> = manager
            .get_all_plugins()
            .into_iter()
            .map(|p| p.meta().name.as_str())
            .collect();
        assert_eq!(names, BUILTIN_NAMES);
    }

    #[test]
    fn test_config_overrides_priority_and_switches() {
        let config: Config = serde_json::from_str(
            r#"{ "plugins": {
                "i18n": { "priority": 1, "critical": true },
                "hooks": { "enabled": false }
            } }"#,
        )
        .unwrap();
        let dir = tempdir().unwrap();
        let mut manager = PluginManager::new(ExecutionContext::new(dir.path()));
        register_builtins(&mut manager, &config).unwrap();

        assert_eq!(manager.execution_order()[0], "i18n");
        assert!(manager.get_plugin("i18n").unwrap().config().critical);
        assert!(!manager.get_plugin("hooks").unwrap().config().enabled);
    }

    #[test]
    fn test_cached_exports_are_shared() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("Button.tsx");
        fs::write(&file, "export const Button = () => <button />;").unwrap();
        let ctx = ExecutionContext::new(dir.path());
        let artifact = parse_with_cache(&ctx, &file).unwrap();

        let first = cached_exports(&ctx, &artifact);
        let second = cached_exports(&ctx, &artifact);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first[0].name, "Button");
        assert!(ctx.cache().has(&exports_cache_key(&file)));
    }
}
