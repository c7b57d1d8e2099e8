use std::collections::BTreeSet;

use swc_core::{
    common::{SyntaxContext, DUMMY_SP},
    ecma::{
        ast::*,
        visit::{Visit, VisitWith},
    },
};

use crate::{
    detect::unparen,
    naming::{is_access_control_component, is_request_reference},
};

/// Collects the permission-relevant identifiers of a single initializer.
///
/// Lives for one declarator only; nothing carries over between scans.
#[derive(Default)]
struct DependencyScanner {
    ids: BTreeSet<String>,
}

impl DependencyScanner {
    fn note_component(&mut self, name: &str) {
        if is_access_control_component(name) {
            self.ids.insert(name.to_string());
        }
    }

    fn note_member(&mut self, m: &JSXMemberExpr) {
        match &m.obj {
            JSXObject::Ident(root) => self.note_component(&root.sym),
            JSXObject::JSXMemberExpr(inner) => self.note_member(inner),
        }
        self.note_component(&m.prop.sym);
    }

    fn note_request_arg(&mut self, call: &CallExpr) {
        let Callee::Expr(callee) = &call.callee else {
            return;
        };
        let Expr::Ident(callee) = unparen(callee) else {
            return;
        };
        if !is_request_reference(&callee.sym) {
            return;
        }
        // first argument only, and only when it is a bare identifier
        if let Some(ExprOrSpread { spread: None, expr }) = call.args.first() {
            if let Expr::Ident(arg) = unparen(expr) {
                self.ids.insert(arg.sym.to_string());
            }
        }
    }
}

impl Visit for DependencyScanner {
    fn visit_jsx_element_name(&mut self, n: &JSXElementName) {
        match n {
            JSXElementName::Ident(i) => self.note_component(&i.sym),
            JSXElementName::JSXMemberExpr(m) => self.note_member(m),
            JSXElementName::JSXNamespacedName(ns) => {
                self.note_component(&ns.ns.sym);
                self.note_component(&ns.name.sym);
            }
        }
    }

    fn visit_call_expr(&mut self, n: &CallExpr) {
        n.visit_children_with(self);
        // post-order: nested calls are recorded before their parent
        self.note_request_arg(n);
    }
}

/// Scans the descendants of `init` and returns the dependencies as fresh
/// identifiers, deduplicated and sorted by name. `init` itself (behind any
/// parentheses) is not inspected.
pub fn scan_deps(init: &Expr) -> Vec<Ident> {
    let mut scanner = DependencyScanner::default();
    unparen(init).visit_children_with(&mut scanner);
    scanner
        .ids
        .into_iter()
        .map(|name| Ident::new(name.into(), DUMMY_SP, SyntaxContext::empty()))
        .collect()
}
