//! Hardcoded user-facing strings.
//!
//! Strings are gathered from six places (JSX text, intrinsic element
//! attributes, component props, object literal values, validation calls and
//! alert-style calls) and classified through the [`ValidatorRegistry`]. Every
//! string the registry accepts is reported as a hardcoded finding.

use std::{
    cell::RefCell,
    collections::{BTreeMap, HashSet},
    fmt::Write as _,
    path::{Path, PathBuf},
};

use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use swc_common::BytePos;
use swc_ecma_ast::{
    Callee, Expr, JSXAttrName, JSXAttrOrSpread, JSXAttrValue, JSXElementName, JSXExpr,
    JSXMemberExpr, JSXObject, Lit, PropName,
};

use super::{BUILTIN_VERSION, configured};
use crate::{
    config::Config,
    core::{
        context::ExecutionContext,
        parsers::{ParsedArtifact, parse_with_cache},
        traverse::{NodeKind, NodeRef, Visitors, facts::callee_name, traverse},
    },
    logging::Logger,
    pipeline::{Extractor, PipelineSettings},
    plugins::{Plugin, PluginMeta, SummaryFormatter},
    rules::{InputKind, ValidationContext, ValidationInput, ValidatorRegistry},
    utils::{display_relative, is_pascal_case, max_width, pad_end},
};

pub const NAME: &str = "i18n";
pub const PRIORITY: i32 = 40;

/// Plugin option extending the config's `ignoreTexts`.
pub const IGNORE_TEXTS_OPTION: &str = "ignoreTexts";

const ALERT_FUNCTIONS: &[&str] = &["alert", "confirm", "prompt"];

/// Schema and form-library methods whose last string argument is an error
/// message (zod, yup, react-hook-form rules).
const VALIDATION_METHODS: &[&str] = &[
    "min",
    "max",
    "length",
    "email",
    "url",
    "uuid",
    "regex",
    "matches",
    "required",
    "nonempty",
    "refine",
    "superRefine",
    "oneOf",
    "notOneOf",
    "typeError",
    "positive",
    "negative",
    "integer",
    "lessThan",
    "moreThan",
    "startsWith",
    "endsWith",
    "test",
];

/// Calls whose first argument is shown (or logged) as a message.
pub fn is_alert_callee(callee: &str) -> bool {
    let (root, rest) = match callee.split_once('.') {
        Some((root, rest)) => (root, Some(rest)),
        None => (callee, None),
    };
    match (root, rest) {
        (_, None) => ALERT_FUNCTIONS.contains(&root) || root == "toast",
        ("window", Some(method)) => ALERT_FUNCTIONS.contains(&method),
        ("console", Some(_)) | ("toast", Some(_)) => true,
        _ => false,
    }
}

pub fn is_validation_method(callee: &str) -> bool {
    let method = callee.rsplit('.').next().unwrap_or(callee);
    callee.contains('.') && VALIDATION_METHODS.contains(&method)
}

/// A string found in the source, before classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub text: String,
    pub kind: InputKind,
    pub context: ValidationContext,
    pub line: usize,
    pub col: usize,
}

/// Plain string value of a literal expression (string literals and templates
/// without substitutions) with its start position.
fn string_literal(expr: &Expr) -> Option<(String, BytePos)> {
    match expr {
        Expr::Lit(Lit::Str(s)) => Some((s.value.to_string_lossy().to_string(), s.span.lo)),
        Expr::Tpl(tpl) if tpl.exprs.is_empty() => {
            let quasi = tpl.quasis.first()?;
            let cooked = quasi.cooked.as_ref()?.as_str()?;
            Some((cooked.to_string(), quasi.span.lo))
        }
        Expr::Paren(paren) => string_literal(&paren.expr),
        _ => None,
    }
}

fn jsx_member_name(member: &JSXMemberExpr) -> String {
    let object = match &member.obj {
        JSXObject::Ident(ident) => ident.sym.to_string(),
        JSXObject::JSXMemberExpr(inner) => jsx_member_name(inner),
    };
    format!("{}.{}", object, member.prop.sym)
}

fn jsx_element_name(name: &JSXElementName) -> String {
    match name {
        JSXElementName::Ident(ident) => ident.sym.to_string(),
        JSXElementName::JSXMemberExpr(member) => jsx_member_name(member),
        JSXElementName::JSXNamespacedName(ns) => format!("{}:{}", ns.ns.sym, ns.name.sym),
    }
}

fn jsx_attr_name(name: &JSXAttrName) -> String {
    match name {
        JSXAttrName::Ident(ident) => ident.sym.to_string(),
        JSXAttrName::JSXNamespacedName(ns) => format!("{}-{}", ns.ns.sym, ns.name.sym),
    }
}

fn jsx_attr_string(value: Option<&JSXAttrValue>) -> Option<(String, BytePos)> {
    match value? {
        JSXAttrValue::Str(s) => Some((s.value.to_string_lossy().to_string(), s.span.lo)),
        JSXAttrValue::JSXExprContainer(container) => match &container.expr {
            JSXExpr::Expr(expr) => string_literal(expr),
            JSXExpr::JSXEmptyExpr(_) => None,
        },
        _ => None,
    }
}

/// Gather every string the registry should classify, in source order.
pub fn collect_candidates(artifact: &ParsedArtifact, logger: &Logger) -> Vec<Candidate> {
    let candidates = RefCell::new(Vec::new());
    let push = |text: String, kind: InputKind, context: ValidationContext, pos: BytePos| {
        let (line, col) = artifact.line_col(pos);
        candidates.borrow_mut().push(Candidate {
            text,
            kind,
            context,
            line,
            col,
        });
    };

    let mut visitors = Visitors::new()
        .on(NodeKind::JsxText, |node| {
            let NodeRef::JsxText(text) = node else {
                return Ok(());
            };
            let value: &str = &text.value;
            let trimmed = value.trim();
            if trimmed.is_empty() {
                return Ok(());
            }
            let offset = value.len() - value.trim_start().len();
            let collapsed = trimmed.split_whitespace().collect::<Vec<_>>().join(" ");
            push(
                collapsed,
                InputKind::JsxText,
                ValidationContext::default(),
                text.span.lo + BytePos(offset as u32),
            );
            Ok(())
        })
        .on(NodeKind::JsxElement, |node| {
            let NodeRef::JsxElement(element) = node else {
                return Ok(());
            };
            let element_name = jsx_element_name(&element.opening.name);
            let is_component = is_pascal_case(&element_name) || element_name.contains('.');
            for attr in &element.opening.attrs {
                let JSXAttrOrSpread::JSXAttr(attr) = attr else {
                    continue;
                };
                let Some((text, pos)) = jsx_attr_string(attr.value.as_ref()) else {
                    continue;
                };
                let name = jsx_attr_name(&attr.name);
                if is_component {
                    push(
                        text,
                        InputKind::ComponentProp,
                        ValidationContext::prop(&element_name, name),
                        pos,
                    );
                } else {
                    push(
                        text,
                        InputKind::JsxAttribute,
                        ValidationContext::attribute(name),
                        pos,
                    );
                }
            }
            Ok(())
        })
        .on(NodeKind::KeyValueProp, |node| {
            let NodeRef::KeyValueProp(prop) = node else {
                return Ok(());
            };
            let key = match &prop.key {
                PropName::Ident(ident) => ident.sym.to_string(),
                PropName::Str(s) => s.value.to_string_lossy().to_string(),
                _ => return Ok(()),
            };
            if let Some((text, pos)) = string_literal(&prop.value) {
                push(
                    text,
                    InputKind::ObjectProperty,
                    ValidationContext::property(key),
                    pos,
                );
            }
            Ok(())
        })
        .on(NodeKind::CallExpr, |node| {
            let NodeRef::CallExpr(call) = node else {
                return Ok(());
            };
            let Callee::Expr(callee) = &call.callee else {
                return Ok(());
            };
            let Some(name) = callee_name(callee) else {
                return Ok(());
            };
            if is_alert_callee(&name)
                && let Some((text, pos)) = call
                    .args
                    .first()
                    .filter(|arg| arg.spread.is_none())
                    .and_then(|arg| string_literal(&arg.expr))
            {
                push(
                    text,
                    InputKind::AlertMessage,
                    ValidationContext::callee(name),
                    pos,
                );
            } else if is_validation_method(&name)
                && let Some((text, pos)) = call
                    .args
                    .iter()
                    .rev()
                    .filter(|arg| arg.spread.is_none())
                    .find_map(|arg| string_literal(&arg.expr))
            {
                push(
                    text,
                    InputKind::ValidationMessage,
                    ValidationContext::callee(name),
                    pos,
                );
            }
            Ok(())
        });

    traverse(&artifact.module, &mut visitors, logger);
    drop(visitors);
    candidates.into_inner()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HardcodedString {
    pub file: String,
    pub line: usize,
    pub col: usize,
    pub text: String,
    pub kind: InputKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileStrings {
    pub path: PathBuf,
    /// Candidates the registry accepted.
    pub findings: Vec<Candidate>,
    pub checked: usize,
    pub rejected: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct I18nSummary {
    /// Strings sent to the registry.
    pub checked: usize,
    /// Strings the registry rejected as not user-facing.
    pub rejected: usize,
    pub files_with_findings: usize,
    /// Finding count per input kind name.
    pub by_kind: BTreeMap<String, usize>,
    pub hardcoded: Vec<HardcodedString>,
}

pub struct I18nExtractor {
    settings: PipelineSettings,
    registry: ValidatorRegistry,
    ignore_texts: HashSet<String>,
}

impl I18nExtractor {
    pub fn new(
        settings: PipelineSettings,
        registry: ValidatorRegistry,
        ignore_texts: impl IntoIterator<Item = String>,
    ) -> Self {
        Self {
            settings,
            registry,
            ignore_texts: ignore_texts.into_iter().collect(),
        }
    }

    pub fn registry(&self) -> &ValidatorRegistry {
        &self.registry
    }
}

impl Extractor for I18nExtractor {
    type Item = FileStrings;
    type Summary = I18nSummary;

    fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    fn process_file(&self, path: &Path, ctx: &ExecutionContext) -> Result<Option<FileStrings>> {
        let Some(artifact) = parse_with_cache(ctx, path) else {
            return Ok(None);
        };
        let logger = ctx.logger();

        let mut file = FileStrings {
            path: path.to_path_buf(),
            findings: Vec::new(),
            checked: 0,
            rejected: 0,
        };
        for candidate in collect_candidates(&artifact, logger) {
            if self.ignore_texts.contains(candidate.text.trim()) {
                continue;
            }
            file.checked += 1;
            let input = ValidationInput::new(candidate.text.clone(), candidate.kind.as_str())
                .with_context(candidate.context.clone());
            let outcome = self.registry.validate(&input);
            if outcome.is_valid {
                file.findings.push(candidate);
            } else {
                file.rejected += 1;
                logger.debug(format_args!(
                    "{}:{}:{} rejected {:?}: {}",
                    path.display(),
                    candidate.line,
                    candidate.col,
                    candidate.text,
                    outcome.reason.as_deref().unwrap_or("invalid")
                ));
            }
        }

        if file.checked == 0 {
            return Ok(None);
        }
        Ok(Some(file))
    }

    fn aggregate(
        &self,
        items: Vec<FileStrings>,
        target: &Path,
        _ctx: &ExecutionContext,
    ) -> Result<I18nSummary> {
        let mut summary = I18nSummary::default();
        for file in items {
            summary.checked += file.checked;
            summary.rejected += file.rejected;
            if file.findings.is_empty() {
                continue;
            }
            summary.files_with_findings += 1;
            let relative = display_relative(&file.path, target);
            for finding in file.findings {
                *summary
                    .by_kind
                    .entry(finding.kind.to_string())
                    .or_default() += 1;
                summary.hardcoded.push(HardcodedString {
                    file: relative.clone(),
                    line: finding.line,
                    col: finding.col,
                    text: finding.text,
                    kind: finding.kind,
                });
            }
        }
        Ok(summary)
    }
}

pub struct I18nFormatter;

impl SummaryFormatter for I18nFormatter {
    fn format_text(&self, summary: &Value) -> Result<String> {
        let summary: I18nSummary = serde_json::from_value(summary.clone())?;
        let mut out = String::new();

        writeln!(
            out,
            "{} hardcoded strings in {} files ({} checked, {} rejected)",
            summary.hardcoded.len(),
            summary.files_with_findings,
            summary.checked,
            summary.rejected
        )?;

        let locations: Vec<String> = summary
            .hardcoded
            .iter()
            .map(|h| format!("{}:{}:{}", h.file, h.line, h.col))
            .collect();
        let width = max_width(locations.iter().map(String::as_str));
        for (location, finding) in locations.iter().zip(&summary.hardcoded) {
            writeln!(
                out,
                "  {}  {:<18}  {:?}",
                pad_end(location, width),
                finding.kind.as_str(),
                finding.text
            )?;
        }

        if !summary.by_kind.is_empty() {
            let counts: Vec<String> = summary
                .by_kind
                .iter()
                .map(|(kind, count)| format!("{} {}", kind, count))
                .collect();
            writeln!(out, "By kind: {}", counts.join(", "))?;
        }

        Ok(out.trim_end().to_string())
    }
}

pub fn meta() -> PluginMeta {
    PluginMeta::new(NAME, BUILTIN_VERSION)
        .with_description("Hardcoded user-facing strings that should be translated")
        .with_priority(PRIORITY)
}

pub fn plugin(config: &Config) -> Box<dyn Plugin> {
    let mut ignore_texts = config.ignore_texts.clone();
    if let Some(entry) = config.plugin_entry(NAME)
        && let Some(extra) = entry.plugin_config().option_strings(IGNORE_TEXTS_OPTION)
    {
        ignore_texts.extend(extra);
    }
    let extractor = I18nExtractor::new(
        config.pipeline_settings(),
        ValidatorRegistry::with_attributes(&config.checked_attributes),
        ignore_texts,
    );
    configured(meta(), extractor, I18nFormatter, config)
}
