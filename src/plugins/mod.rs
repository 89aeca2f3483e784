//! Plugin contract, the pipeline-backed plugin adapter and the manager.
//!
//! ## Module Structure
//!
//! - `meta`: plugin identity, validation and runtime config
//! - `order`: dependency-respecting execution order
//! - `format`: the optional summary formatter capability
//! - `manager`: registration, scheduling and failure isolation
//! - `builtin`: the analyzers shipped with the binary

pub mod builtin;
pub mod format;
pub mod manager;
pub mod meta;
pub mod order;

use std::{path::Path, sync::Arc};

use anyhow::Result;
use serde::Serialize;
use serde_json::Value;

use crate::{
    core::context::ExecutionContext,
    error::ExtractionError,
    pipeline::{self, ExtractionMetadata, ExtractionResult, Extractor},
};

pub use format::{OutputFormat, SummaryFormatter, format_summary};
pub use manager::{ManagerStats, PluginManager, PluginRun, RunReport};
pub use meta::{PluginConfig, PluginMeta};

/// A unit of analysis the manager can schedule.
///
/// Lifecycle: constructed once, [`Plugin::init`]-ed with the shared context
/// on registration, [`Plugin::extract`]-ed any number of times, and
/// [`Plugin::cleanup`]-ed on unregistration.
pub trait Plugin: Send {
    fn meta(&self) -> &PluginMeta;

    fn config(&self) -> &PluginConfig;

    fn config_mut(&mut self) -> &mut PluginConfig;

    /// Called once on registration. An error rejects the registration.
    fn init(&mut self, ctx: Arc<ExecutionContext>) -> Result<()>;

    /// Point the plugin at a new context after a path change.
    fn bind_context(&mut self, ctx: Arc<ExecutionContext>);

    /// Plugin-specific self-check run before `init`.
    fn validate(&self) -> Result<()> {
        Ok(())
    }

    /// Whether the plugin wants to run against `target` at all.
    fn can_handle(&self, _target: &Path) -> bool {
        true
    }

    fn extract(&self, target: &Path) -> ExtractionResult<Value>;

    fn formatter(&self) -> Option<&dyn SummaryFormatter> {
        None
    }

    fn cleanup(&mut self) {}
}

/// Adapts an [`Extractor`] into a [`Plugin`] that runs the pipeline template.
pub struct PipelinePlugin<E> {
    meta: PluginMeta,
    config: PluginConfig,
    extractor: E,
    formatter: Option<Box<dyn SummaryFormatter>>,
    ctx: Option<Arc<ExecutionContext>>,
}

impl<E> PipelinePlugin<E>
where
    E: Extractor + Send,
    E::Summary: Serialize,
{
    pub fn new(meta: PluginMeta, extractor: E) -> Self {
        Self {
            meta,
            config: PluginConfig::default(),
            extractor,
            formatter: None,
            ctx: None,
        }
    }

    pub fn with_config(mut self, config: PluginConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_formatter(mut self, formatter: impl SummaryFormatter + 'static) -> Self {
        self.formatter = Some(Box::new(formatter));
        self
    }

    pub fn extractor(&self) -> &E {
        &self.extractor
    }

    pub fn context(&self) -> Option<&Arc<ExecutionContext>> {
        self.ctx.as_ref()
    }
}

impl<E> Plugin for PipelinePlugin<E>
where
    E: Extractor + Send,
    E::Summary: Serialize,
{
    fn meta(&self) -> &PluginMeta {
        &self.meta
    }

    fn config(&self) -> &PluginConfig {
        &self.config
    }

    fn config_mut(&mut self) -> &mut PluginConfig {
        &mut self.config
    }

    fn init(&mut self, ctx: Arc<ExecutionContext>) -> Result<()> {
        self.ctx = Some(ctx);
        Ok(())
    }

    fn bind_context(&mut self, ctx: Arc<ExecutionContext>) {
        self.ctx = Some(ctx);
    }

    /// Single files must be accepted by the extractor; directories (and
    /// missing paths, which fail in discovery) are always handled.
    fn can_handle(&self, target: &Path) -> bool {
        let Some(ctx) = &self.ctx else {
            return true;
        };
        let fs = ctx.fs();
        if fs.exists(target) && !fs.is_directory(target) {
            return self.extractor.accepts(target);
        }
        true
    }

    fn extract(&self, target: &Path) -> ExtractionResult<Value> {
        let Some(ctx) = &self.ctx else {
            return ExtractionResult::failure(
                ExtractionError::Uninitialised(self.meta.name.clone()),
                ExtractionMetadata::default(),
            );
        };
        pipeline::run(&self.extractor, target, ctx).into_json()
    }

    fn formatter(&self) -> Option<&dyn SummaryFormatter> {
        self.formatter.as_deref()
    }

    fn cleanup(&mut self) {
        self.ctx = None;
    }
}
