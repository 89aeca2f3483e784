//! Exported React components.
//!
//! Depends on `modules` so the shared export facts are already cached when
//! this plugin runs.

use std::{
    fmt::Write as _,
    path::{Path, PathBuf},
};

use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{BUILTIN_VERSION, cached_exports, configured, modules};
use crate::{
    config::Config,
    core::{
        context::ExecutionContext,
        parsers::parse_with_cache,
        traverse::facts::{ExportKind, contains_jsx},
    },
    pipeline::{Extractor, PipelineSettings},
    plugins::{Plugin, PluginMeta, SummaryFormatter},
    utils::{display_relative, is_pascal_case, max_width, pad_end},
};

pub const NAME: &str = "components";
pub const PRIORITY: i32 = 30;

/// Extensions that may hold components.
const COMPONENT_EXTENSIONS: &[&str] = &["tsx", "jsx", "js"];

/// `user-card.tsx` → `UserCard`. Used to name anonymous default exports.
pub fn component_name_from_stem(path: &Path) -> Option<String> {
    let stem = path.file_stem()?.to_str()?;
    let name: String = stem
        .split(['-', '_', '.'])
        .filter(|segment| !segment.is_empty())
        .map(|segment| {
            let mut chars = segment.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect();
    is_pascal_case(&name).then_some(name)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentInfo {
    pub name: String,
    pub file: String,
    pub default_export: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileComponents {
    pub path: PathBuf,
    /// `(name, is_default)` in export order.
    pub components: Vec<(String, bool)>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentsSummary {
    pub total_components: usize,
    pub files_with_jsx: usize,
    pub components: Vec<ComponentInfo>,
}

pub struct ComponentsExtractor {
    settings: PipelineSettings,
}

impl ComponentsExtractor {
    pub fn new(settings: PipelineSettings) -> Self {
        Self { settings }
    }
}

impl Extractor for ComponentsExtractor {
    type Item = FileComponents;
    type Summary = ComponentsSummary;

    fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    fn accepts(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| COMPONENT_EXTENSIONS.contains(&ext))
    }

    fn process_file(&self, path: &Path, ctx: &ExecutionContext) -> Result<Option<FileComponents>> {
        let Some(artifact) = parse_with_cache(ctx, path) else {
            return Ok(None);
        };
        if !contains_jsx(&artifact, ctx.logger()) {
            return Ok(None);
        }

        let components = cached_exports(ctx, &artifact)
            .iter()
            .filter(|export| export.source.is_none())
            .filter_map(|export| match export.kind {
                ExportKind::Named => {
                    is_pascal_case(&export.name).then(|| (export.name.clone(), false))
                }
                ExportKind::Default => export
                    .local
                    .clone()
                    .filter(|local| is_pascal_case(local))
                    .or_else(|| component_name_from_stem(path))
                    .map(|name| (name, true)),
                ExportKind::Namespace => None,
            })
            .collect();

        Ok(Some(FileComponents {
            path: path.to_path_buf(),
            components,
        }))
    }

    fn aggregate(
        &self,
        items: Vec<FileComponents>,
        target: &Path,
        _ctx: &ExecutionContext,
    ) -> Result<ComponentsSummary> {
        let mut summary = ComponentsSummary {
            files_with_jsx: items.len(),
            ..Default::default()
        };
        for file in items {
            let relative = display_relative(&file.path, target);
            summary
                .components
                .extend(file.components.into_iter().map(|(name, default_export)| {
                    ComponentInfo {
                        name,
                        file: relative.clone(),
                        default_export,
                    }
                }));
        }
        summary.total_components = summary.components.len();
        Ok(summary)
    }
}

pub struct ComponentsFormatter;

impl SummaryFormatter for ComponentsFormatter {
    fn format_text(&self, summary: &Value) -> Result<String> {
        let summary: ComponentsSummary = serde_json::from_value(summary.clone())?;
        let mut out = String::new();

        writeln!(
            out,
            "{} components in {} files with JSX",
            summary.total_components, summary.files_with_jsx
        )?;
        let width = max_width(summary.components.iter().map(|c| c.name.as_str()));
        for component in &summary.components {
            let marker = if component.default_export {
                " (default)"
            } else {
                ""
            };
            writeln!(
                out,
                "  {}  {}{}",
                pad_end(&component.name, width),
                component.file,
                marker
            )?;
        }

        Ok(out.trim_end().to_string())
    }
}

pub fn meta() -> PluginMeta {
    PluginMeta::new(NAME, BUILTIN_VERSION)
        .with_description("Exported React components in files that render JSX")
        .with_priority(PRIORITY)
        .with_dependencies([modules::NAME])
}

pub fn plugin(config: &Config) -> Box<dyn Plugin> {
    configured(
        meta(),
        ComponentsExtractor::new(config.pipeline_settings()),
        ComponentsFormatter,
        config,
    )
}

#[cfg(test)]
mod tests {
    use std::fs;

    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    use crate::pipeline;
    use crate::plugins::builtin::components::*;

    #[test]
    fn test_component_name_from_stem() {
        assert_eq!(
            component_name_from_stem(Path::new("src/user-card.tsx")),
            Some("UserCard".to_string())
        );
        assert_eq!(
            component_name_from_stem(Path::new("app/page.tsx")),
            Some("Page".to_string())
        );
        assert_eq!(
            component_name_from_stem(Path::new("Button.jsx")),
            Some("Button".to_string())
        );
        assert_eq!(component_name_from_stem(Path::new("_.tsx")), None);
    }

    #[test]
    fn test_components_summary() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("Button.tsx"),
            r#"
            export const Button = () => <button />;
            export const buttonVariants = ["primary"];
            export default Button;
            "#,
        )
        .unwrap();
        fs::write(
            dir.path().join("user-card.jsx"),
            "export default () => <div>card</div>;",
        )
        .unwrap();
        fs::write(
            dir.path().join("Icons.tsx"),
            "export const Icon = 1;\nexport * from \"./icons\";",
        )
        .unwrap();
        fs::write(dir.path().join("types.ts"), "export type Props = {};").unwrap();

        let ctx = ExecutionContext::new(dir.path());
        let result = pipeline::run(
            &ComponentsExtractor::new(PipelineSettings::default()),
            dir.path(),
            &ctx,
        );

        assert!(result.success);
        assert_eq!(result.metadata.discovered, 4);
        assert_eq!(result.metadata.filtered, 3);
        assert_eq!(result.metadata.skipped, 1);
        let summary = result.data.unwrap();
        assert_eq!(summary.files_with_jsx, 2);
        assert_eq!(
            summary
                .components
                .iter()
                .map(|c| (c.name.as_str(), c.file.as_str(), c.default_export))
                .collect::<Vec<_>>(),
            vec![
                ("Button", "Button.tsx", false),
                ("Button", "Button.tsx", true),
                ("UserCard", "user-card.jsx", true),
            ]
        );
        assert_eq!(summary.total_components, 3);
    }

    #[test]
    fn test_depends_on_modules() {
        let meta = meta();
        assert_eq!(meta.priority, PRIORITY);
        assert_eq!(meta.dependencies, vec!["modules".to_string()]);
    }

    #[test]
    fn test_text_format() {
        let summary = ComponentsSummary {
            total_components: 2,
            files_with_jsx: 1,
            components: vec![
                ComponentInfo {
                    name: "Card".to_string(),
                    file: "src/Card.tsx".to_string(),
                    default_export: false,
                },
                ComponentInfo {
                    name: "CardList".to_string(),
                    file: "src/Card.tsx".to_string(),
                    default_export: true,
                },
            ],
        };
        let text = ComponentsFormatter
            .format_text(&serde_json::to_value(&summary).unwrap())
            .unwrap();
        insta::assert_snapshot!(text, @r"
        2 components in 1 files with JSX
          Card      src/Card.tsx
          CardList  src/Card.tsx (default)
        ");
    }
}
