//! Visitor dispatch over parsed modules.
//!
//! Analyzers register callbacks in a [`Visitors`] table keyed by [`NodeKind`]
//! and call [`traverse`]. The walk is pre-order: a node's handler runs before
//! its children are visited. Handler errors and panics are logged and counted, never
//! returned, so one bad node cannot abort an analysis.
//!
//! ## Module Structure
//!
//! - `facts`: generic fact helpers built on `traverse` (imports, exports,
//!   call sites, JSX presence)

pub mod facts;

use std::{
    collections::HashMap,
    panic::{self, AssertUnwindSafe},
};

use anyhow::{Result, anyhow};
use swc_ecma_ast::{
    CallExpr, ClassDecl, ExportAll, ExportDecl, ExportDefaultDecl, ExportDefaultExpr, FnDecl,
    ImportDecl, JSXAttr, JSXElement, JSXFragment, JSXText, KeyValueProp, Module, NamedExport,
    VarDeclarator,
};
use swc_ecma_visit::{Visit, VisitWith};

use crate::{logging::Logger, utils::panic_message};

/// Closed set of node kinds that handlers can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    ImportDecl,
    ExportDecl,
    NamedExport,
    ExportAll,
    ExportDefaultDecl,
    ExportDefaultExpr,
    CallExpr,
    FnDecl,
    ClassDecl,
    VarDeclarator,
    KeyValueProp,
    JsxElement,
    JsxFragment,
    JsxText,
    JsxAttr,
}

/// Borrowed view of a node, tagged with its kind.
#[derive(Debug, Clone, Copy)]
pub enum NodeRef<'a> {
    ImportDecl(&'a ImportDecl),
    ExportDecl(&'a ExportDecl),
    NamedExport(&'a NamedExport),
    ExportAll(&'a ExportAll),
    ExportDefaultDecl(&'a ExportDefaultDecl),
    ExportDefaultExpr(&'a ExportDefaultExpr),
    CallExpr(&'a CallExpr),
    FnDecl(&'a FnDecl),
    ClassDecl(&'a ClassDecl),
    VarDeclarator(&'a VarDeclarator),
    KeyValueProp(&'a KeyValueProp),
    JsxElement(&'a JSXElement),
    JsxFragment(&'a JSXFragment),
    JsxText(&'a JSXText),
    JsxAttr(&'a JSXAttr),
}

impl NodeRef<'_> {
    pub fn kind(&self) -> NodeKind {
        match self {
            NodeRef::ImportDecl(_) => NodeKind::ImportDecl,
            NodeRef::ExportDecl(_) => NodeKind::ExportDecl,
            NodeRef::NamedExport(_) => NodeKind::NamedExport,
            NodeRef::ExportAll(_) => NodeKind::ExportAll,
            NodeRef::ExportDefaultDecl(_) => NodeKind::ExportDefaultDecl,
            NodeRef::ExportDefaultExpr(_) => NodeKind::ExportDefaultExpr,
            NodeRef::CallExpr(_) => NodeKind::CallExpr,
            NodeRef::FnDecl(_) => NodeKind::FnDecl,
            NodeRef::ClassDecl(_) => NodeKind::ClassDecl,
            NodeRef::VarDeclarator(_) => NodeKind::VarDeclarator,
            NodeRef::KeyValueProp(_) => NodeKind::KeyValueProp,
            NodeRef::JsxElement(_) => NodeKind::JsxElement,
            NodeRef::JsxFragment(_) => NodeKind::JsxFragment,
            NodeRef::JsxText(_) => NodeKind::JsxText,
            NodeRef::JsxAttr(_) => NodeKind::JsxAttr,
        }
    }
}

type Handler<'h> = Box<dyn FnMut(NodeRef<'_>) -> Result<()> + 'h>;

/// Handler table: at most one callback per node kind.
#[derive(Default)]
pub struct Visitors<'h> {
    handlers: HashMap<NodeKind, Handler<'h>>,
}

impl<'h> Visitors<'h> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for `kind`, replacing any previous handler.
    pub fn on<F>(mut self, kind: NodeKind, handler: F) -> Self
    where
        F: FnMut(NodeRef<'_>) -> Result<()> + 'h,
    {
        self.handlers.insert(kind, Box::new(handler));
        self
    }

    pub fn handles(&self, kind: NodeKind) -> bool {
        self.handlers.contains_key(&kind)
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

/// Counters returned by [`traverse`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TraversalStats {
    /// Handler invocations.
    pub dispatched: usize,
    /// Handler invocations that returned an error or panicked.
    pub failures: usize,
}

/// Walk `module`, invoking the registered handler for every matching node.
pub fn traverse(module: &Module, visitors: &mut Visitors<'_>, logger: &Logger) -> TraversalStats {
    if visitors.is_empty() {
        return TraversalStats::default();
    }
    let mut dispatcher = Dispatcher {
        visitors,
        logger,
        stats: TraversalStats::default(),
    };
    module.visit_with(&mut dispatcher);
    dispatcher.stats
}

struct Dispatcher<'v, 'h, 'l> {
    visitors: &'v mut Visitors<'h>,
    logger: &'l Logger,
    stats: TraversalStats,
}

impl Dispatcher<'_, '_, '_> {
    fn dispatch(&mut self, node: NodeRef<'_>) {
        let kind = node.kind();
        let Some(handler) = self.visitors.handlers.get_mut(&kind) else {
            return;
        };
        self.stats.dispatched += 1;
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| handler(node)))
            .unwrap_or_else(|payload| Err(anyhow!("panicked: {}", panic_message(&*payload))));
        if let Err(e) = outcome {
            self.stats.failures += 1;
            self.logger
                .warn(format_args!("Visitor for {:?} failed: {:#}", kind, e));
        }
    }
}

impl Visit for Dispatcher<'_, '_, '_> {
    fn visit_import_decl(&mut self, node: &ImportDecl) {
        self.dispatch(NodeRef::ImportDecl(node));
        node.visit_children_with(self);
    }

    fn visit_export_decl(&mut self, node: &ExportDecl) {
        self.dispatch(NodeRef::ExportDecl(node));
        node.visit_children_with(self);
    }

    fn visit_named_export(&mut self, node: &NamedExport) {
        self.dispatch(NodeRef::NamedExport(node));
        node.visit_children_with(self);
    }

    fn visit_export_all(&mut self, node: &ExportAll) {
        self.dispatch(NodeRef::ExportAll(node));
        node.visit_children_with(self);
    }

    fn visit_export_default_decl(&mut self, node: &ExportDefaultDecl) {
        self.dispatch(NodeRef::ExportDefaultDecl(node));
        node.visit_children_with(self);
    }

    fn visit_export_default_expr(&mut self, node: &ExportDefaultExpr) {
        self.dispatch(NodeRef::ExportDefaultExpr(node));
        node.visit_children_with(self);
    }

    fn visit_call_expr(&mut self, node: &CallExpr) {
        self.dispatch(NodeRef::CallExpr(node));
        node.visit_children_with(self);
    }

    fn visit_fn_decl(&mut self, node: &FnDecl) {
        self.dispatch(NodeRef::FnDecl(node));
        node.visit_children_with(self);
    }

    fn visit_class_decl(&mut self, node: &ClassDecl) {
        self.dispatch(NodeRef::ClassDecl(node));
        node.visit_children_with(self);
    }

    fn visit_var_declarator(&mut self, node: &VarDeclarator) {
        self.dispatch(NodeRef::VarDeclarator(node));
        node.visit_children_with(self);
    }

    fn visit_key_value_prop(&mut self, node: &KeyValueProp) {
        self.dispatch(NodeRef::KeyValueProp(node));
        node.visit_children_with(self);
    }

    fn visit_jsx_element(&mut self, node: &JSXElement) {
        self.dispatch(NodeRef::JsxElement(node));
        node.visit_children_with(self);
    }

    fn visit_jsx_fragment(&mut self, node: &JSXFragment) {
        self.dispatch(NodeRef::JsxFragment(node));
        node.visit_children_with(self);
    }

    fn visit_jsx_text(&mut self, node: &JSXText) {
        self.dispatch(NodeRef::JsxText(node));
    }

    fn visit_jsx_attr(&mut self, node: &JSXAttr) {
        self.dispatch(NodeRef::JsxAttr(node));
        node.visit_children_with(self);
    }
}
