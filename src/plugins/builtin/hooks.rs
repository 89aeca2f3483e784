//! React hook usage.

use std::{
    collections::BTreeMap,
    fmt::Write as _,
    path::{Path, PathBuf},
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
        traverse::facts::{ExportKind, collect_calls},
    },
    pipeline::{Extractor, PipelineSettings},
    plugins::{Plugin, PluginMeta, SummaryFormatter},
    utils::{display_relative, is_hook_name, max_width, pad_end},
};

pub const NAME: &str = "hooks";
pub const PRIORITY: i32 = 20;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHooks {
    pub path: PathBuf,
    /// Hook names called in this file, one entry per call.
    pub calls: Vec<String>,
    /// Hooks this file exports.
    pub defined: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomHook {
    pub name: String,
    pub file: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HooksSummary {
    pub total_calls: usize,
    pub files_using_hooks: usize,
    /// Call count per hook name.
    pub usage: BTreeMap<String, usize>,
    pub custom_hooks: Vec<CustomHook>,
}

pub struct HooksExtractor {
    settings: PipelineSettings,
}

impl HooksExtractor {
    pub fn new(settings: PipelineSettings) -> Self {
        Self { settings }
    }
}

impl Extractor for HooksExtractor {
    type Item = FileHooks;
    type Summary = HooksSummary;

    fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    fn process_file(&self, path: &Path, ctx: &ExecutionContext) -> Result<Option<FileHooks>> {
        let Some(artifact) = parse_with_cache(ctx, path) else {
            return Ok(None);
        };

        let calls: Vec<String> = collect_calls(&artifact, ctx.logger())
            .iter()
            .map(|call| call.method_name())
            .filter(|name| is_hook_name(name))
            .map(str::to_string)
            .collect();

        let defined: Vec<String> = cached_exports(ctx, &artifact)
            .iter()
            .filter(|export| export.source.is_none())
            .filter_map(|export| match export.kind {
                ExportKind::Named => Some(export.name.as_str()),
                ExportKind::Default => export.local.as_deref(),
                ExportKind::Namespace => None,
            })
            .filter(|name| is_hook_name(name))
            .map(str::to_string)
            .collect();

        if calls.is_empty() && defined.is_empty() {
            return Ok(None);
        }
        Ok(Some(FileHooks {
            path: path.to_path_buf(),
            calls,
            defined,
        }))
    }

    fn aggregate(
        &self,
        items: Vec<FileHooks>,
        target: &Path,
        _ctx: &ExecutionContext,
    ) -> Result<HooksSummary> {
        let mut summary = HooksSummary::default();
        for file in items {
            if !file.calls.is_empty() {
                summary.files_using_hooks += 1;
            }
            summary.total_calls += file.calls.len();
            for name in file.calls {
                *summary.usage.entry(name).or_default() += 1;
            }
            let relative = display_relative(&file.path, target);
            summary
                .custom_hooks
                .extend(file.defined.into_iter().map(|name| CustomHook {
                    name,
                    file: relative.clone(),
                }));
        }
        Ok(summary)
    }
}

pub struct HooksFormatter;

impl SummaryFormatter for HooksFormatter {
    fn format_text(&self, summary: &Value) -> Result<String> {
        let summary: HooksSummary = serde_json::from_value(summary.clone())?;
        let mut out = String::new();

        writeln!(
            out,
            "{} hook calls in {} files",
            summary.total_calls, summary.files_using_hooks
        )?;

        // Most used first; ties alphabetical.
        let mut usage: Vec<(&String, &usize)> = summary.usage.iter().collect();
        usage.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
        let width = max_width(usage.iter().map(|(name, _)| name.as_str()));
        for (name, count) in usage {
            writeln!(out, "  {}  {}", pad_end(name, width), count)?;
        }

        if !summary.custom_hooks.is_empty() {
            writeln!(out, "Custom hooks ({}):", summary.custom_hooks.len())?;
            let width = max_width(summary.custom_hooks.iter().map(|h| h.name.as_str()));
            for hook in &summary.custom_hooks {
                writeln!(out, "  {}  {}", pad_end(&hook.name, width), hook.file)?;
            }
        }

        Ok(out.trim_end().to_string())
    }
}

pub fn meta() -> PluginMeta {
    PluginMeta::new(NAME, BUILTIN_VERSION)
        .with_description("React hook calls and custom hook definitions")
        .with_priority(PRIORITY)
}

pub fn plugin(config: &Config) -> Box<dyn Plugin> {
    configured(
        meta(),
        HooksExtractor::new(config.pipeline_settings()),
        HooksFormatter,
        config,
    )
}

#[cfg(test)]
mod tests {
    use std::fs;

    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    use crate::pipeline;
    use crate::plugins::builtin::hooks::*;

    #[test]
    fn test_hooks_summary() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("Counter.tsx"),
            r#"
            import React, { useState, useEffect } from "react";
            export function Counter() {
                const [count, setCount] = useState(0);
                const [step] = React.useState(1);
                useEffect(() => {}, []);
                const user = fetchUser();
                return <p>{count}</p>;
            }
            "#,
        )
        .unwrap();
        fs::write(
            dir.path().join("useToggle.ts"),
            r#"
            import { useCallback, useState } from "react";
            export function useToggle() {
                const [on, setOn] = useState(false);
                return [on, useCallback(() => setOn(v => !v), [])];
            }
            export const useDouble = (n: number) => n * 2;
            "#,
        )
        .unwrap();
        fs::write(dir.path().join("plain.ts"), "export const user = 1;").unwrap();

        let ctx = ExecutionContext::new(dir.path());
        let result = pipeline::run(
            &HooksExtractor::new(PipelineSettings::default()),
            dir.path(),
            &ctx,
        );

        assert!(result.success);
        assert_eq!(result.metadata.skipped, 1);
        let summary = result.data.unwrap();
        assert_eq!(summary.total_calls, 5);
        assert_eq!(summary.files_using_hooks, 2);
        assert_eq!(
            summary.usage,
            BTreeMap::from([
                ("useCallback".to_string(), 1),
                ("useEffect".to_string(), 1),
                ("useState".to_string(), 3),
            ])
        );
        assert_eq!(
            summary.custom_hooks,
            vec![
                CustomHook {
                    name: "useToggle".to_string(),
                    file: "useToggle.ts".to_string(),
                },
                CustomHook {
                    name: "useDouble".to_string(),
                    file: "useToggle.ts".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_text_format() {
        let summary = HooksSummary {
            total_calls: 4,
            files_using_hooks: 2,
            usage: BTreeMap::from([("useEffect".to_string(), 1), ("useState".to_string(), 3)]),
            custom_hooks: vec![CustomHook {
                name: "useToggle".to_string(),
                file: "hooks/useToggle.ts".to_string(),
            }],
        };
        let text = HooksFormatter
            .format_text(&serde_json::to_value(&summary).unwrap())
            .unwrap();
        insta::assert_snapshot!(text, @r"
        4 hook calls in 2 files
          useState   3
          useEffect  1
        Custom hooks (1):
          useToggle  hooks/useToggle.ts
        ");
    }
}
