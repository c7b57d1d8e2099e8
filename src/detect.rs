use swc_core::ecma::ast::*;

use crate::config::Config;

pub(crate) fn unparen(mut expr: &Expr) -> &Expr {
    while let Expr::Paren(p) = expr {
        expr = &p.expr;
    }
    expr
}

fn callee_ident(call: &CallExpr) -> Option<&Ident> {
    match &call.callee {
        Callee::Expr(e) => match unparen(e) {
            Expr::Ident(i) => Some(i),
            _ => None,
        },
        _ => None,
    }
}

/// Whether `init` may be wrapped in a guard.
///
/// Arrow functions are always eligible. Calls are eligible unless the callee,
/// or the callee of a curried callee, is already one of the configured guards.
/// Any other shape is left alone so that unrecognized code is never wrapped
/// twice.
pub fn needs_wrap(config: &Config, init: &Expr) -> bool {
    match unparen(init) {
        Expr::Arrow(_) => true,
        Expr::Call(call) => {
            if let Some(ident) = callee_ident(call) {
                return !config.is_guard_name(&ident.sym);
            }
            if let Callee::Expr(e) = &call.callee {
                if let Expr::Call(inner) = unparen(e) {
                    if let Some(ident) = callee_ident(inner) {
                        return !config.is_guard_name(&ident.sym);
                    }
                }
            }
            false
        }
        _ => false,
    }
}
