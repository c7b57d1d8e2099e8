use std::collections::HashSet;

use swc_core::{
    common::{SyntaxContext, DUMMY_SP},
    ecma::{
        ast::{Id, ImportPhase, *},
        utils::find_pat_ids,
        visit::{Visit, VisitWith},
    },
};

// -----------------------------------------------------------------------------
// Module-scope bindings
// -----------------------------------------------------------------------------

/// Names bound at module scope.
pub fn collect_bindings(module: &Module) -> HashSet<String> {
    let mut out = HashSet::new();
    let mut bc = BindingCollector {
        out: &mut out,
        depth: 0,
    };
    module.visit_with(&mut bc);
    out
}

/// Walks top-level items. `depth` counts enclosing blocks and loop heads,
/// where only `var` still binds at module scope. Function and class bodies
/// are never entered.
struct BindingCollector<'a> {
    out: &'a mut HashSet<String>,
    depth: usize,
}

impl<'a> BindingCollector<'a> {
    fn insert(&mut self, ident: &Ident) {
        self.out.insert(ident.sym.to_string());
    }

    fn nested<F: FnOnce(&mut Self)>(&mut self, f: F) {
        self.depth += 1;
        f(self);
        self.depth -= 1;
    }
}

impl<'a> Visit for BindingCollector<'a> {
    fn visit_import_decl(&mut self, n: &ImportDecl) {
        for s in &n.specifiers {
            match s {
                ImportSpecifier::Named(named) => self.insert(&named.local),
                ImportSpecifier::Default(def) => self.insert(&def.local),
                ImportSpecifier::Namespace(ns) => self.insert(&ns.local),
            }
        }
    }

    fn visit_var_decl(&mut self, n: &VarDecl) {
        if self.depth > 0 && n.kind != VarDeclKind::Var {
            return;
        }
        for d in &n.decls {
            for (sym, _) in find_pat_ids::<_, Id>(&d.name) {
                self.out.insert(sym.to_string());
            }
        }
    }

    fn visit_fn_decl(&mut self, n: &FnDecl) {
        if self.depth == 0 {
            self.insert(&n.ident);
        }
    }

    fn visit_class_decl(&mut self, n: &ClassDecl) {
        if self.depth == 0 {
            self.insert(&n.ident);
        }
    }

    fn visit_export_default_decl(&mut self, n: &ExportDefaultDecl) {
        match &n.decl {
            DefaultDecl::Fn(f) => {
                if let Some(ident) = &f.ident {
                    self.insert(ident);
                }
            }
            DefaultDecl::Class(c) => {
                if let Some(ident) = &c.ident {
                    self.insert(ident);
                }
            }
            DefaultDecl::TsInterfaceDecl(_) => {}
        }
    }

    fn visit_block_stmt(&mut self, n: &BlockStmt) {
        self.nested(|v| n.visit_children_with(v));
    }

    fn visit_for_stmt(&mut self, n: &ForStmt) {
        self.nested(|v| n.visit_children_with(v));
    }

    fn visit_for_in_stmt(&mut self, n: &ForInStmt) {
        self.nested(|v| n.visit_children_with(v));
    }

    fn visit_for_of_stmt(&mut self, n: &ForOfStmt) {
        self.nested(|v| n.visit_children_with(v));
    }

    fn visit_switch_stmt(&mut self, n: &SwitchStmt) {
        self.nested(|v| n.visit_children_with(v));
    }

    fn visit_function(&mut self, _: &Function) {}

    fn visit_arrow_expr(&mut self, _: &ArrowExpr) {}

    fn visit_class(&mut self, _: &Class) {}

    fn visit_getter_prop(&mut self, _: &GetterProp) {}

    fn visit_setter_prop(&mut self, _: &SetterProp) {}
}

// -----------------------------------------------------------------------------
// Import insertion
// -----------------------------------------------------------------------------

fn named_import(method: &str, source: &str) -> ModuleItem {
    ModuleItem::ModuleDecl(ModuleDecl::Import(ImportDecl {
        span: DUMMY_SP,
        specifiers: vec![ImportSpecifier::Named(ImportNamedSpecifier {
            span: DUMMY_SP,
            local: Ident::new(method.into(), DUMMY_SP, SyntaxContext::empty()),
            imported: None,
            is_type_only: false,
        })],
        src: Box::new(Str {
            span: DUMMY_SP,
            value: source.into(),
            raw: None,
        }),
        type_only: false,
        with: None,
        phase: ImportPhase::Evaluation,
    }))
}

/// Inserts `import { method } from "source";` after the last import
/// declaration, or at the top when the module has none.
pub fn inject_guard_import(m: &mut Module, method: &str, source: &str) {
    let at = m
        .body
        .iter()
        .rposition(|item| matches!(item, ModuleItem::ModuleDecl(ModuleDecl::Import(_))))
        .map(|idx| idx + 1)
        .unwrap_or(0);
    m.body.insert(at, named_import(method, source));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::parse_module;

    fn bindings(src: &str) -> Vec<String> {
        let mut names: Vec<_> = collect_bindings(&parse_module(src)).into_iter().collect();
        names.sort();
        names
    }

    fn import_sources(m: &Module) -> Vec<(usize, String)> {
        m.body
            .iter()
            .enumerate()
            .filter_map(|(idx, item)| match item {
                ModuleItem::ModuleDecl(ModuleDecl::Import(i)) => {
                    Some((idx, i.src.value.to_string()))
                }
                _ => None,
            })
            .collect()
    }

    #[test]
    fn collects_import_locals() {
        assert_eq!(
            bindings(
                r#"
import React from "react";
import * as api from "./api";
import { mustAllOfPermissions as guard, useState } from "x";
"#
            ),
            vec!["React", "api", "guard", "useState"]
        );
    }

    #[test]
    fn collects_top_level_declarations() {
        assert_eq!(
            bindings(
                r#"
const { a, b: [c] } = obj;
let d;
export const e = 1;
function f() { const inner = 1; var hoisted = 2; }
class G { method() { var x; } }
export default function H() {}
const arrow = () => { var notModuleScope; };
"#
            ),
            vec!["G", "H", "a", "arrow", "c", "d", "e", "f"]
        );
    }

    #[test]
    fn block_scoped_names_stay_local_but_var_hoists() {
        assert_eq!(
            bindings(
                r#"
if (x) { let blockLet = 1; var blockVar = 2; function blockFn() {} }
for (let i = 0; i < 1; i++) { var loopVar; }
for (var j of list) {}
"#
            ),
            vec!["blockVar", "j", "loopVar"]
        );
    }

    #[test]
    fn inserts_after_last_import() {
        let mut m = parse_module(
            r#"
import a from "a";
const x = 1;
import b from "b";
const y = 2;
"#,
        );
        inject_guard_import(&mut m, "mustAllOfPermissions", "src-core/access");
        assert_eq!(
            import_sources(&m),
            vec![
                (0, "a".to_string()),
                (2, "b".to_string()),
                (3, "src-core/access".to_string())
            ]
        );
    }

    #[test]
    fn inserts_at_top_without_imports() {
        let mut m = parse_module("const x = 1;\nexport const y = 2;");
        inject_guard_import(&mut m, "mustAllOfPermissions", "src-core/access");
        inject_guard_import(&mut m, "mustOneOfPermissions", "src-core/access");
        let locals: Vec<String> = m
            .body
            .iter()
            .filter_map(|item| match item {
                ModuleItem::ModuleDecl(ModuleDecl::Import(i)) => match &i.specifiers[0] {
                    ImportSpecifier::Named(n) => Some(n.local.sym.to_string()),
                    _ => None,
                },
                _ => None,
            })
            .collect();
        assert_eq!(locals, vec!["mustAllOfPermissions", "mustOneOfPermissions"]);
        assert_eq!(
            import_sources(&m)
                .into_iter()
                .map(|(idx, _)| idx)
                .collect::<Vec<_>>(),
            vec![0, 1]
        );
    }
}
