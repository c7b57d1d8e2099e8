//! SWC plugin that marks access-controlled components with permission guards.
//!
//! Top-level declarations named `Ac…` / `AcEvery…` / `AcSome…` get their
//! initializer wrapped as `guard(<deps>)(<init>)`, where `deps` are the
//! access-controlled components rendered and the request APIs referenced in
//! the initializer. The guard is imported once if the module does not bind
//! it already.

use swc_core::{
    common::{SyntaxContext, DUMMY_SP},
    ecma::{
        ast::*,
        visit::{visit_mut_pass, VisitMut, VisitMutWith},
    },
    plugin::{plugin_transform, proxies::TransformPluginProgramMetadata},
};
use tracing::{debug, trace, warn};

pub mod config;
pub mod deps;
pub mod detect;
pub mod imports;
pub mod naming;

#[cfg(test)]
mod test_utils;

pub use config::{Config, ConfigError};
use naming::{classify, Classification};

pub const PLUGIN_NAME: &str = "access-control-autocomplete";

// -----------------------------------------------------------------------------
// Transform state
// -----------------------------------------------------------------------------

/// Guards introduced while rewriting the current program.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct GuardUsage {
    pub every: bool,
    pub some: bool,
}

impl GuardUsage {
    fn any(&self) -> bool {
        self.every || self.some
    }
}

pub struct AccessControlTransform {
    config: Config,
    usage: GuardUsage,
}

impl AccessControlTransform {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            usage: GuardUsage::default(),
        }
    }

    /// Usage recorded by the last visited program.
    pub fn usage(&self) -> GuardUsage {
        self.usage
    }

    fn guard_for(&self, class: Classification) -> Option<&str> {
        match class {
            Classification::Every => Some(self.config.method_access_control_every.as_str()),
            Classification::Some => Some(self.config.method_access_control_some.as_str()),
            Classification::None => None,
        }
    }

    fn mark_used(&mut self, class: Classification) {
        match class {
            Classification::Every => self.usage.every = true,
            Classification::Some => self.usage.some = true,
            Classification::None => {}
        }
    }

    // ---------- declaration rewriting ----------

    fn rewrite_var_decl(&mut self, var: &mut VarDecl) {
        for d in var.decls.iter_mut() {
            self.rewrite_declarator(d);
        }
    }

    fn rewrite_declarator(&mut self, d: &mut VarDeclarator) {
        let Some(name) = d.name.as_ident() else {
            return;
        };
        let class = classify(&name.id.sym);
        let Some(guard) = self.guard_for(class).map(str::to_string) else {
            return;
        };
        let Some(init) = d.init.take() else {
            return;
        };
        if !detect::needs_wrap(&self.config, &init) {
            trace!(name = %name.id.sym, "access-control declaration left as is");
            d.init = Some(init);
            return;
        }

        let deps = deps::scan_deps(&init);
        debug!(
            name = %name.id.sym,
            guard = %guard,
            deps = ?deps.iter().map(|i| i.sym.as_ref()).collect::<Vec<_>>(),
            "wrapping access-control declaration"
        );

        // guard(<deps>)(<init>)
        let guard_call = CallExpr {
            span: DUMMY_SP,
            callee: Callee::Expr(Box::new(Expr::Ident(Ident::new(
                guard.into(),
                DUMMY_SP,
                SyntaxContext::empty(),
            )))),
            args: deps
                .into_iter()
                .map(|id| ExprOrSpread {
                    spread: None,
                    expr: Box::new(Expr::Ident(id)),
                })
                .collect(),
            type_args: None,
            ctxt: SyntaxContext::empty(),
        };
        d.init = Some(Box::new(Expr::Call(CallExpr {
            span: DUMMY_SP,
            callee: Callee::Expr(Box::new(Expr::Call(guard_call))),
            args: vec![ExprOrSpread {
                spread: None,
                expr: init,
            }],
            type_args: None,
            ctxt: SyntaxContext::empty(),
        })));
        self.mark_used(class);
    }

    fn rewrite_stmt(&mut self, stmt: &mut Stmt) {
        if let Stmt::Decl(Decl::Var(var)) = stmt {
            self.rewrite_var_decl(var);
        }
    }

    fn rewrite_module_item(&mut self, item: &mut ModuleItem) {
        match item {
            ModuleItem::Stmt(stmt) => self.rewrite_stmt(stmt),
            ModuleItem::ModuleDecl(ModuleDecl::ExportDecl(ExportDecl {
                decl: Decl::Var(var),
                ..
            })) => self.rewrite_var_decl(var),
            _ => {}
        }
    }

    // ---------- import finalization ----------

    /// Imports each used guard the module does not bind yet, every-guard
    /// first. Returns whether anything was inserted.
    fn finalize_imports(&self, m: &mut Module) -> bool {
        let mut bound = imports::collect_bindings(m);
        let mut inserted = false;
        for (used, method) in [
            (self.usage.every, &self.config.method_access_control_every),
            (self.usage.some, &self.config.method_access_control_some),
        ] {
            if !used || bound.contains(method.as_str()) {
                continue;
            }
            debug!(method = %method, source = %self.config.lib_access_control, "injecting guard import");
            imports::inject_guard_import(m, method, &self.config.lib_access_control);
            bound.insert(method.clone());
            inserted = true;
        }
        inserted
    }
}

impl VisitMut for AccessControlTransform {
    fn visit_mut_program(&mut self, program: &mut Program) {
        self.usage = GuardUsage::default();

        match program {
            Program::Module(m) => m.visit_mut_with(self),
            Program::Script(script) => {
                for stmt in script.body.iter_mut() {
                    self.rewrite_stmt(stmt);
                }
                if !self.usage.any() {
                    return;
                }
                // imports are only legal in modules
                let mut module = Module {
                    span: script.span,
                    body: std::mem::take(&mut script.body)
                        .into_iter()
                        .map(ModuleItem::Stmt)
                        .collect(),
                    shebang: script.shebang.take(),
                };
                if self.finalize_imports(&mut module) {
                    debug!("promoted script to module for guard import");
                    *program = Program::Module(module);
                    return;
                }
                script.body = module
                    .body
                    .into_iter()
                    .filter_map(|item| match item {
                        ModuleItem::Stmt(stmt) => Some(stmt),
                        ModuleItem::ModuleDecl(_) => None,
                    })
                    .collect();
                script.shebang = module.shebang;
            }
        }
    }

    fn visit_mut_module(&mut self, m: &mut Module) {
        self.usage = GuardUsage::default();

        // top-level declarations only, in source order
        for item in m.body.iter_mut() {
            self.rewrite_module_item(item);
        }
        if self.usage.any() {
            self.finalize_imports(m);
        }
    }
}

/// Native entry for hosts composing SWC passes.
pub fn access_control_autocomplete(config: Config) -> impl Pass {
    visit_mut_pass(AccessControlTransform::new(config))
}

// -----------------------------------------------------------------------------
// Entrypoint
// -----------------------------------------------------------------------------

#[plugin_transform]
pub fn process_transform(mut program: Program, metadata: TransformPluginProgramMetadata) -> Program {
    let config = match metadata.get_transform_plugin_config() {
        Some(raw) => Config::from_json(&raw).unwrap_or_else(|err| {
            warn!(plugin = PLUGIN_NAME, error = %err, "invalid plugin config, using defaults");
            Config::default()
        }),
        None => Config::default(),
    };

    let mut transform = AccessControlTransform::new(config);
    program.visit_mut_with(&mut transform);

    program
}
