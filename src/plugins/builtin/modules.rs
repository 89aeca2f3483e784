//! Import/export inventory.

use std::{
    collections::{BTreeMap, BTreeSet},
    fmt::Write as _,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{BUILTIN_VERSION, cached_exports, configured};
use crate::{
    config::Config,
    core::{
        context::ExecutionContext,
        parsers::parse_with_cache,
        traverse::facts::{ExportFact, ExportKind, ImportFact, collect_imports},
    },
    pipeline::{Extractor, PipelineSettings},
    plugins::{Plugin, PluginMeta, SummaryFormatter},
    utils::{display_relative, max_width, pad_end},
};

pub const NAME: &str = "modules";
pub const PRIORITY: i32 = 10;

/// Import specifier prefixes that point into the project, not at a package.
const LOCAL_ALIASES: &[&str] = &["@/", "~/", "#"];

/// Package an import specifier resolves to, or `None` for project-local paths.
///
/// Scoped packages keep their scope (`@tanstack/react-query/devtools` is
/// `@tanstack/react-query`); subpaths are dropped (`next/link` is `next`).
pub fn package_name(source: &str) -> Option<String> {
    if source.is_empty()
        || source.starts_with('.')
        || source.starts_with('/')
        || LOCAL_ALIASES.iter().any(|alias| source.starts_with(alias))
    {
        return None;
    }
    let mut segments = source.split('/');
    let first = segments.next()?;
    if first.starts_with('@') {
        let name = segments.next().filter(|s| !s.is_empty())?;
        return Some(format!("{}/{}", first, name));
    }
    Some(first.to_string())
}

/// Per-file facts.
#[derive(Debug, Clone)]
pub struct FileModules {
    pub path: PathBuf,
    pub imports: Vec<ImportFact>,
    pub exports: Arc<Vec<ExportFact>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModulesSummary {
    pub files: usize,
    pub total_imports: usize,
    pub total_exports: usize,
    /// Importing-file count per external package.
    pub external_packages: BTreeMap<String, usize>,
    /// Files with a default export, relative to the target.
    pub default_export_files: Vec<String>,
    /// Distinct side-effect-only import sources.
    pub side_effect_imports: Vec<String>,
}

pub struct ModulesExtractor {
    settings: PipelineSettings,
}

impl ModulesExtractor {
    pub fn new(settings: PipelineSettings) -> Self {
        Self { settings }
    }
}

impl Extractor for ModulesExtractor {
    type Item = FileModules;
    type Summary = ModulesSummary;

    fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    fn process_file(&self, path: &Path, ctx: &ExecutionContext) -> Result<Option<FileModules>> {
        let Some(artifact) = parse_with_cache(ctx, path) else {
            return Ok(None);
        };
        let imports = collect_imports(&artifact, ctx.logger());
        let exports = cached_exports(ctx, &artifact);
        Ok(Some(FileModules {
            path: path.to_path_buf(),
            imports,
            exports,
        }))
    }

    fn aggregate(
        &self,
        items: Vec<FileModules>,
        target: &Path,
        _ctx: &ExecutionContext,
    ) -> Result<ModulesSummary> {
        let mut summary = ModulesSummary {
            files: items.len(),
            ..Default::default()
        };
        let mut side_effects = BTreeSet::new();

        for file in &items {
            summary.total_imports += file.imports.len();
            summary.total_exports += file.exports.len();

            let packages: BTreeSet<String> = file
                .imports
                .iter()
                .filter_map(|import| package_name(&import.source))
                .collect();
            for package in packages {
                *summary.external_packages.entry(package).or_default() += 1;
            }

            side_effects.extend(
                file.imports
                    .iter()
                    .filter(|import| import.is_side_effect())
                    .map(|import| import.source.clone()),
            );

            if file.exports.iter().any(|e| e.kind == ExportKind::Default) {
                summary
                    .default_export_files
                    .push(display_relative(&file.path, target));
            }
        }

        summary.side_effect_imports = side_effects.into_iter().collect();
        Ok(summary)
    }
}

pub struct ModulesFormatter;

impl SummaryFormatter for ModulesFormatter {
    fn format_text(&self, summary: &Value) -> Result<String> {
        let summary: ModulesSummary = serde_json::from_value(summary.clone())?;
        let mut out = String::new();

        writeln!(
            out,
            "{} files, {} imports, {} exports",
            summary.files, summary.total_imports, summary.total_exports
        )?;

        if !summary.external_packages.is_empty() {
            writeln!(out, "External packages ({}):", summary.external_packages.len())?;
            let width = max_width(summary.external_packages.keys().map(String::as_str));
            for (package, count) in &summary.external_packages {
                writeln!(out, "  {}  {}", pad_end(package, width), count)?;
            }
        }

        if !summary.default_export_files.is_empty() {
            writeln!(
                out,
                "Default exports ({}):",
                summary.default_export_files.len()
            )?;
            for file in &summary.default_export_files {
                writeln!(out, "  {}", file)?;
            }
        }

        if !summary.side_effect_imports.is_empty() {
            writeln!(
                out,
                "Side-effect imports ({}):",
                summary.side_effect_imports.len()
            )?;
            for source in &summary.side_effect_imports {
                writeln!(out, "  {}", source)?;
            }
        }

        Ok(out.trim_end().to_string())
    }
}

pub fn meta() -> PluginMeta {
    PluginMeta::new(NAME, BUILTIN_VERSION)
        .with_description("Imports, exports and external package usage")
        .with_priority(PRIORITY)
}

pub fn plugin(config: &Config) -> Box<dyn Plugin> {
    configured(
        meta(),
        ModulesExtractor::new(config.pipeline_settings()),
        ModulesFormatter,
        config,
    )
}
