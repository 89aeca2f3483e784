use std::{
    collections::HashSet,
    panic::{self, AssertUnwindSafe},
    path::{Path, PathBuf},
    sync::Arc,
    time::Instant,
};

use serde::Serialize;
use serde_json::Value;

use crate::{
    core::{cache::CacheStats, context::ExecutionContext},
    error::ManagerError,
    logging::Logger,
    pipeline::{ExtractionMetadata, ExtractionResult},
    plugins::{Plugin, order},
    utils::panic_message,
};

/// One plugin's result inside an `execute_all` run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginRun {
    pub name: String,
    pub result: ExtractionResult<Value>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReport {
    /// Results in execution order.
    pub runs: Vec<PluginRun>,
    /// Set when a critical plugin failed and the run stopped early.
    pub stopped_by: Option<String>,
    pub elapsed_ms: u64,
}

impl RunReport {
    pub fn is_success(&self) -> bool {
        self.runs.iter().all(|run| run.result.success)
    }

    pub fn failed(&self) -> impl Iterator<Item = &PluginRun> {
        self.runs.iter().filter(|run| !run.result.success)
    }

    pub fn get(&self, name: &str) -> Option<&PluginRun> {
        self.runs.iter().find(|run| run.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagerStats {
    pub total_plugins: usize,
    pub enabled_plugins: usize,
    pub execution_order: Vec<String>,
    pub cache: CacheStats,
}

/// Registry and scheduler for plugins.
///
/// Owns the shared [`ExecutionContext`] and every registered plugin. Plugins
/// run one at a time; mutation requires `&mut self`, so a manager cannot be
/// driven concurrently.
pub struct PluginManager {
    /// Registration order; ties in priority are broken by it.
    plugins: Vec<Box<dyn Plugin>>,
    order: Vec<String>,
    ctx: Arc<ExecutionContext>,
    logger: Logger,
}

impl PluginManager {
    pub fn new(ctx: ExecutionContext) -> Self {
        let logger = ctx.logger().scoped("manager");
        Self {
            plugins: Vec::new(),
            order: Vec::new(),
            ctx: Arc::new(ctx),
            logger,
        }
    }

    pub fn context(&self) -> &Arc<ExecutionContext> {
        &self.ctx
    }

    /// Validate, initialise and insert `plugin`, then recompute the order.
    ///
    /// On any error the registry is left exactly as it was.
    pub fn register(&mut self, mut plugin: Box<dyn Plugin>) -> Result<(), ManagerError> {
        let meta = plugin.meta().clone();
        meta.validate()?;

        if self.position(&meta.name).is_some() {
            return Err(ManagerError::validation(
                &meta.name,
                "a plugin with this name is already registered",
            ));
        }

        let order = order::execution_order(
            self.plugins
                .iter()
                .map(|p| p.meta())
                .chain(std::iter::once(&meta)),
        )?;

        plugin
            .validate()
            .map_err(|e| ManagerError::validation(&meta.name, format!("{:#}", e)))?;
        plugin.init(Arc::clone(&self.ctx)).map_err(|e| {
            ManagerError::validation(&meta.name, format!("initialisation failed: {:#}", e))
        })?;

        self.plugins.push(plugin);
        self.order = order;
        self.logger.debug(format_args!(
            "Registered plugin {}@{} (order: {})",
            meta.name,
            meta.version,
            self.order.join(", ")
        ));
        Ok(())
    }

    /// Clean up and remove a plugin, returning it.
    pub fn unregister(&mut self, name: &str) -> Result<Box<dyn Plugin>, ManagerError> {
        let index = self
            .position(name)
            .ok_or_else(|| ManagerError::NotFound(name.to_string()))?;
        let mut plugin = self.plugins.remove(index);
        plugin.cleanup();
        self.order = order::execution_order(self.plugins.iter().map(|p| p.meta()))?;
        self.logger
            .debug(format_args!("Unregistered plugin {}", name));
        Ok(plugin)
    }

    pub fn get_plugin(&self, name: &str) -> Option<&dyn Plugin> {
        self.position(name).map(|i| self.plugins[i].as_ref())
    }

    /// All plugins in execution order.
    pub fn get_all_plugins(&self) -> Vec<&dyn Plugin> {
        self.order
            .iter()
            .filter_map(|name| self.get_plugin(name))
            .collect()
    }

    pub fn execution_order(&self) -> &[String] {
        &self.order
    }

    pub fn set_enabled(&mut self, name: &str, enabled: bool) -> Result<(), ManagerError> {
        let index = self
            .position(name)
            .ok_or_else(|| ManagerError::NotFound(name.to_string()))?;
        self.plugins[index].config_mut().enabled = enabled;
        Ok(())
    }

    /// Run one plugin against `target` (the context's target when `None`).
    ///
    /// Never fails: unknown or disabled plugins, plugin errors and plugin
    /// panics all come back as failure results.
    pub fn execute_plugin(&self, name: &str, target: Option<&Path>) -> ExtractionResult<Value> {
        let metadata = ExtractionMetadata {
            plugin: Some(name.to_string()),
            ..Default::default()
        };
        let Some(plugin) = self.get_plugin(name) else {
            return ExtractionResult::failure(ManagerError::NotFound(name.to_string()), metadata);
        };
        if !plugin.config().enabled {
            return ExtractionResult::failure(ManagerError::Disabled(name.to_string()), metadata);
        }

        let meta = plugin.meta();
        let metadata = ExtractionMetadata {
            version: Some(meta.version.clone()),
            ..metadata
        };
        let target = target.unwrap_or_else(|| self.ctx.effective_target());
        let logger = self.logger.scoped(name);

        let registered: HashSet<&str> = self
            .plugins
            .iter()
            .map(|p| p.meta().name.as_str())
            .collect();
        let missing: Vec<String> = order::missing_dependencies(meta, &registered)
            .into_iter()
            .map(|dep| format!("dependency '{}' is not registered", dep))
            .collect();
        for warning in &missing {
            logger.warn(warning);
        }

        let started = Instant::now();
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            if !plugin.can_handle(target) {
                return None;
            }
            logger.info(format_args!("Running on {}", target.display()));
            Some(plugin.extract(target))
        }));
        let execution_ms = started.elapsed().as_millis() as u64;

        let mut result = match outcome {
            Ok(Some(result)) => result,
            Ok(None) => {
                let warning = format!("plugin declined target {}", target.display());
                logger.warn(&warning);
                let mut result = ExtractionResult::noop(warning, metadata);
                result.warnings.extend(missing);
                return result;
            }
            Err(payload) => {
                let message = format!("plugin '{}' panicked: {}", name, panic_message(&*payload));
                logger.error(&message);
                ExtractionResult::failure(message, ExtractionMetadata::default())
            }
        };
        result.metadata.plugin = metadata.plugin;
        result.metadata.version = metadata.version;
        result.metadata.execution_ms = Some(execution_ms);
        result.warnings.extend(missing);

        if result.success {
            logger.info(format_args!(
                "Finished in {}ms ({} files processed)",
                execution_ms, result.metadata.processed
            ));
        } else {
            logger.error(format_args!("Failed: {}", result.errors.join("; ")));
        }
        result
    }

    /// Run every enabled plugin in execution order, sequentially.
    ///
    /// A failing critical plugin stops the run; other failures are recorded
    /// and the run continues.
    pub fn execute_all(&self, target: Option<&Path>) -> RunReport {
        let started = Instant::now();
        let mut report = RunReport::default();

        for name in &self.order {
            let Some(plugin) = self.get_plugin(name) else {
                continue;
            };
            if !plugin.config().enabled {
                self.logger
                    .debug(format_args!("Skipping disabled plugin {}", name));
                continue;
            }

            let result = self.execute_plugin(name, target);
            let stop = !result.success && plugin.config().critical;
            report.runs.push(PluginRun {
                name: name.clone(),
                result,
            });
            if stop {
                self.logger.error(format_args!(
                    "Critical plugin {} failed, stopping run",
                    name
                ));
                report.stopped_by = Some(name.clone());
                break;
            }
        }

        report.elapsed_ms = started.elapsed().as_millis() as u64;
        report
    }

    /// Rebind every plugin to a context for new paths. The cache, logger and
    /// file system are carried over.
    pub fn update_context(&mut self, root: impl Into<PathBuf>, target: Option<PathBuf>) {
        self.ctx = Arc::new(self.ctx.rebind(root, target));
        for plugin in &mut self.plugins {
            plugin.bind_context(Arc::clone(&self.ctx));
        }
    }

    pub fn get_stats(&self) -> ManagerStats {
        ManagerStats {
            total_plugins: self.plugins.len(),
            enabled_plugins: self
                .plugins
                .iter()
                .filter(|p| p.config().enabled)
                .count(),
            execution_order: self.order.clone(),
            cache: self.ctx.cache().stats(),
        }
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.plugins.iter().position(|p| p.meta().name == name)
    }
}

impl Drop for PluginManager {
    fn drop(&mut self) {
        for plugin in &mut self.plugins {
            plugin.cleanup();
        }
    }
}
