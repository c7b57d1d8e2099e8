use swc_core::{
    common::{sync::Lrc, FileName, SourceMap},
    ecma::{
        ast::*,
        parser::{parse_file_as_module, EsSyntax, Syntax},
    },
};

pub(crate) fn parse_module(src: &str) -> Module {
    let cm: Lrc<SourceMap> = Default::default();
    let fm = cm.new_source_file(FileName::Anon.into(), src.to_string());
    let mut recovered = vec![];
    parse_file_as_module(
        &fm,
        Syntax::Es(EsSyntax {
            jsx: true,
            ..Default::default()
        }),
        EsVersion::latest(),
        None,
        &mut recovered,
    )
    .expect("test input should parse")
}

/// Parses `src` as the initializer of a throwaway declaration.
pub(crate) fn parse_expr(src: &str) -> Box<Expr> {
    let module = parse_module(&format!("const __fixture = {src};"));
    match module.body.into_iter().next() {
        Some(ModuleItem::Stmt(Stmt::Decl(Decl::Var(var)))) => var
            .decls
            .into_iter()
            .next()
            .and_then(|d| d.init)
            .expect("fixture declarator has an initializer"),
        other => panic!("unexpected fixture shape: {other:?}"),
    }
}
