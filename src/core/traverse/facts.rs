//! Generic fact helpers every analyzer composes: imports, exports, call sites
//! and JSX presence.

use std::cell::RefCell;

use serde::Serialize;
use swc_ecma_ast::{
    Callee, Decl, DefaultDecl, ExportSpecifier, Expr, ImportSpecifier, MemberProp,
    ModuleExportName, Pat,
};

use crate::core::{
    parsers::ParsedArtifact,
    traverse::{NodeKind, NodeRef, Visitors, traverse},
};
use crate::logging::Logger;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportKind {
    Default,
    Named,
    Namespace,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportBinding {
    pub kind: ImportKind,
    /// Local name in the importing file.
    pub local: String,
    /// Name in the source module (`default` / `*` for default and namespace).
    pub imported: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportFact {
    pub source: String,
    pub bindings: Vec<ImportBinding>,
    pub type_only: bool,
}

impl ImportFact {
    /// Side-effect imports (`import "./styles.css"`) bind nothing.
    pub fn is_side_effect(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn is_relative(&self) -> bool {
        self.source.starts_with('.')
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportKind {
    Default,
    Named,
    Namespace,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportFact {
    pub kind: ExportKind,
    /// Exported name; `default` for default exports, `*` for `export * from`.
    pub name: String,
    /// Local binding name when it differs from or names a default export.
    pub local: Option<String>,
    /// Module re-exported from, if any.
    pub source: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CallFact {
    /// Dotted callee (`useState`, `console.log`, `z.string().min`); `<computed>`
    /// segments for callees that are not plain names.
    pub callee: String,
    pub arg_count: usize,
    pub line: usize,
    pub col: usize,
}

impl CallFact {
    /// The last segment of the callee (`log` for `console.log`).
    pub fn method_name(&self) -> &str {
        self.callee.rsplit('.').next().unwrap_or(&self.callee)
    }
}

fn export_name(name: &ModuleExportName) -> String {
    match name {
        ModuleExportName::Ident(ident) => ident.sym.to_string(),
        ModuleExportName::Str(s) => s.value.to_string_lossy().to_string(),
    }
}

fn pat_names(pat: &Pat, out: &mut Vec<String>) {
    match pat {
        Pat::Ident(ident) => out.push(ident.id.sym.to_string()),
        Pat::Object(obj) => {
            for prop in &obj.props {
                match prop {
                    swc_ecma_ast::ObjectPatProp::KeyValue(kv) => pat_names(&kv.value, out),
                    swc_ecma_ast::ObjectPatProp::Assign(assign) => {
                        out.push(assign.key.id.sym.to_string())
                    }
                    swc_ecma_ast::ObjectPatProp::Rest(rest) => pat_names(&rest.arg, out),
                }
            }
        }
        Pat::Array(arr) => arr.elems.iter().flatten().for_each(|p| pat_names(p, out)),
        Pat::Assign(assign) => pat_names(&assign.left, out),
        Pat::Rest(rest) => pat_names(&rest.arg, out),
        _ => {}
    }
}

/// Render a callee expression as a dotted name.
pub fn callee_name(expr: &Expr) -> Option<String> {
    match expr {
        Expr::Ident(ident) => Some(ident.sym.to_string()),
        Expr::Member(member) => {
            let object = callee_name(&member.obj).unwrap_or_else(|| "<computed>".to_string());
            let prop = match &member.prop {
                MemberProp::Ident(ident) => ident.sym.to_string(),
                MemberProp::PrivateName(name) => format!("#{}", name.name),
                MemberProp::Computed(_) => "<computed>".to_string(),
            };
            Some(format!("{}.{}", object, prop))
        }
        Expr::Call(call) => match &call.callee {
            Callee::Expr(inner) => callee_name(inner).map(|name| format!("{}()", name)),
            _ => None,
        },
        Expr::This(_) => Some("this".to_string()),
        Expr::Paren(paren) => callee_name(&paren.expr),
        _ => None,
    }
}

/// Enumerate import declarations.
pub fn collect_imports(artifact: &ParsedArtifact, logger: &Logger) -> Vec<ImportFact> {
    let imports = RefCell::new(Vec::new());
    let mut visitors = Visitors::new().on(NodeKind::ImportDecl, |node| {
        let NodeRef::ImportDecl(decl) = node else {
            return Ok(());
        };
        let bindings = decl
            .specifiers
            .iter()
            .map(|specifier| match specifier {
                ImportSpecifier::Named(named) => {
                    let local = named.local.sym.to_string();
                    let imported = named
                        .imported
                        .as_ref()
                        .map(export_name)
                        .unwrap_or_else(|| local.clone());
                    ImportBinding {
                        kind: ImportKind::Named,
                        local,
                        imported,
                    }
                }
                ImportSpecifier::Default(default) => ImportBinding {
                    kind: ImportKind::Default,
                    local: default.local.sym.to_string(),
                    imported: "default".to_string(),
                },
                ImportSpecifier::Namespace(ns) => ImportBinding {
                    kind: ImportKind::Namespace,
                    local: ns.local.sym.to_string(),
                    imported: "*".to_string(),
                },
            })
            .collect();
        imports.borrow_mut().push(ImportFact {
            source: decl.src.value.to_string_lossy().to_string(),
            bindings,
            type_only: decl.type_only,
        });
        Ok(())
    });
    traverse(&artifact.module, &mut visitors, logger);
    drop(visitors);
    imports.into_inner()
}

/// Enumerate export declarations, including re-exports.
pub fn collect_exports(artifact: &ParsedArtifact, logger: &Logger) -> Vec<ExportFact> {
    let exports = RefCell::new(Vec::new());
    let named = |name: String| ExportFact {
        kind: ExportKind::Named,
        name,
        local: None,
        source: None,
    };
    let default = |local: Option<String>| ExportFact {
        kind: ExportKind::Default,
        name: "default".to_string(),
        local,
        source: None,
    };

    let mut visitors = Visitors::new()
        .on(NodeKind::ExportDecl, |node| {
            let NodeRef::ExportDecl(export) = node else {
                return Ok(());
            };
            let mut out = exports.borrow_mut();
            match &export.decl {
                Decl::Fn(f) => out.push(named(f.ident.sym.to_string())),
                Decl::Class(c) => out.push(named(c.ident.sym.to_string())),
                Decl::Var(var) => {
                    let mut names = Vec::new();
                    for declarator in &var.decls {
                        pat_names(&declarator.name, &mut names);
                    }
                    out.extend(names.into_iter().map(named));
                }
                Decl::TsInterface(i) => out.push(named(i.id.sym.to_string())),
                Decl::TsTypeAlias(t) => out.push(named(t.id.sym.to_string())),
                Decl::TsEnum(e) => out.push(named(e.id.sym.to_string())),
                _ => {}
            }
            Ok(())
        })
        .on(NodeKind::NamedExport, |node| {
            let NodeRef::NamedExport(export) = node else {
                return Ok(());
            };
            let source = export
                .src
                .as_ref()
                .map(|s| s.value.to_string_lossy().to_string());
            let mut out = exports.borrow_mut();
            for specifier in &export.specifiers {
                let fact = match specifier {
                    ExportSpecifier::Named(spec) => {
                        let orig = export_name(&spec.orig);
                        let exported = spec.exported.as_ref().map(export_name);
                        match exported {
                            Some(name) if name == "default" => ExportFact {
                                kind: ExportKind::Default,
                                name,
                                local: Some(orig),
                                source: source.clone(),
                            },
                            Some(name) => ExportFact {
                                kind: ExportKind::Named,
                                name,
                                local: Some(orig),
                                source: source.clone(),
                            },
                            None => ExportFact {
                                kind: ExportKind::Named,
                                name: orig,
                                local: None,
                                source: source.clone(),
                            },
                        }
                    }
                    ExportSpecifier::Default(spec) => ExportFact {
                        kind: ExportKind::Named,
                        name: spec.exported.sym.to_string(),
                        local: Some("default".to_string()),
                        source: source.clone(),
                    },
                    ExportSpecifier::Namespace(spec) => ExportFact {
                        kind: ExportKind::Namespace,
                        name: export_name(&spec.name),
                        local: None,
                        source: source.clone(),
                    },
                };
                out.push(fact);
            }
            Ok(())
        })
        .on(NodeKind::ExportAll, |node| {
            if let NodeRef::ExportAll(export) = node {
                exports.borrow_mut().push(ExportFact {
                    kind: ExportKind::Namespace,
                    name: "*".to_string(),
                    local: None,
                    source: Some(export.src.value.to_string_lossy().to_string()),
                });
            }
            Ok(())
        })
        .on(NodeKind::ExportDefaultDecl, |node| {
            let NodeRef::ExportDefaultDecl(export) = node else {
                return Ok(());
            };
            let local = match &export.decl {
                DefaultDecl::Fn(f) => f.ident.as_ref().map(|i| i.sym.to_string()),
                DefaultDecl::Class(c) => c.ident.as_ref().map(|i| i.sym.to_string()),
                DefaultDecl::TsInterfaceDecl(i) => Some(i.id.sym.to_string()),
            };
            exports.borrow_mut().push(default(local));
            Ok(())
        })
        .on(NodeKind::ExportDefaultExpr, |node| {
            let NodeRef::ExportDefaultExpr(export) = node else {
                return Ok(());
            };
            let local = match &*export.expr {
                Expr::Ident(ident) => Some(ident.sym.to_string()),
                _ => None,
            };
            exports.borrow_mut().push(default(local));
            Ok(())
        });
    traverse(&artifact.module, &mut visitors, logger);
    drop(visitors);
    exports.into_inner()
}

/// Enumerate call expressions with their callee and location.
pub fn collect_calls(artifact: &ParsedArtifact, logger: &Logger) -> Vec<CallFact> {
    let calls = RefCell::new(Vec::new());
    let mut visitors = Visitors::new().on(NodeKind::CallExpr, |node| {
        let NodeRef::CallExpr(call) = node else {
            return Ok(());
        };
        let callee = match &call.callee {
            Callee::Expr(expr) => callee_name(expr),
            Callee::Import(_) => Some("import".to_string()),
            Callee::Super(_) => Some("super".to_string()),
        };
        let (line, col) = artifact.line_col(call.span.lo);
        calls.borrow_mut().push(CallFact {
            callee: callee.unwrap_or_else(|| "<computed>".to_string()),
            arg_count: call.args.len(),
            line,
            col,
        });
        Ok(())
    });
    traverse(&artifact.module, &mut visitors, logger);
    drop(visitors);
    calls.into_inner()
}

/// True if the module contains any JSX element or fragment.
pub fn contains_jsx(artifact: &ParsedArtifact, logger: &Logger) -> bool {
    if !artifact.dialect.jsx {
        return false;
    }
    let found = std::cell::Cell::new(false);
    let mut visitors = Visitors::new()
        .on(NodeKind::JsxElement, |_| {
            found.set(true);
            Ok(())
        })
        .on(NodeKind::JsxFragment, |_| {
            found.set(true);
            Ok(())
        });
    traverse(&artifact.module, &mut visitors, logger);
    found.get()
}
