mod codegen;
mod translator;

use log::info;
use parser::ast::Ir;

use codegen::{CppHeaderRenderer, Renderer};
pub use codegen::Context;

pub fn code_gen(ctx: &Context, ir: &Ir) -> String {
    let translator = translator::Translator::new(ir);
    let code = CppHeaderRenderer::new(ctx.clone()).render(ir, &translator);
    info!(
        "rendered {} classes, {} structs and {} functions into namespace `{}`",
        ir.classes().len(),
        ir.structs().len(),
        ir.functions().len(),
        ctx.namespace()
    );

    return code;
}
