use getset::Getters;
use indoc::indoc;
use parser::ast::{Field, Function, Ir, Param, Table};
use parser::conventions::{CALLBACK_INFO_SUFFIX, CHAINED_STRUCT_TYPE};

use crate::cpp::translator::{escape_member, Translator};

mod header;
mod implementation;
mod prelude;

/// Turns a sealed IR into output text, spelling names through the translator.
pub trait Renderer {
    fn render(&self, ir: &Ir, translator: &Translator) -> String;
}

#[derive(Constructor, Clone, Getters, Debug, PartialEq)]
#[get = "pub"]
pub struct Context {
    namespace: String,
    include: String,
    guard: String,
}

impl Default for Context {
    fn default() -> Context {
        Context::new(
            String::from("wgpu"),
            String::from("webgpu.h"),
            String::from("WEBGPU_CPP_HPP_"),
        )
    }
}

/// Shape of a struct as far as the wrapper is concerned.
#[derive(Clone, Copy, Debug)]
struct StructInfo<'a> {
    name: &'a str,
    fields: &'a [Field],
    chained: bool,
    manual_free: bool,
}

impl<'a> StructInfo<'a> {
    fn new(ir: &Ir, name: &'a str, fields: &'a [Field]) -> StructInfo<'a> {
        StructInfo {
            name,
            fields,
            chained: fields
                .first()
                .map_or(false, |f| f.ctype() == CHAINED_STRUCT_TYPE),
            manual_free: ir.has_free_members(name),
        }
    }

    /// Fields declared by the wrapper itself; the chain lives in the `ChainedStruct` base.
    fn own_fields(&self) -> &'a [Field] {
        let fields = self.fields;
        if self.chained {
            &fields[1..]
        } else {
            fields
        }
    }
}

/// Structs the prelude spells by hand or that carry callbacks are not generated.
fn is_wrapped_struct(name: &str) -> bool {
    name != "StringView" && name != "ChainedStruct" && !name.ends_with(CALLBACK_INFO_SUFFIX)
}

fn wrapped_structs(ir: &Ir) -> Vec<StructInfo> {
    ir.structs()
        .iter()
        .filter(|(name, _)| is_wrapped_struct(name))
        .map(|(name, fields)| StructInfo::new(ir, name, fields))
        .collect()
}

fn is_refcount_method(name: &str) -> bool {
    name == "AddRef" || name == "Release"
}

fn codegen_section_banner(title: &str) -> String {
    indoc!("
        ///
        /// #TITLE
        ///
    ")
    .replace("#TITLE", title)
}

fn codegen_params_declaration(translator: &Translator, params: &[Param]) -> String {
    params
        .iter()
        .map(|p| format!("{} {}", translator.type_of(p.ctype(), false), p.name()))
        .collect::<Vec<String>>()
        .join(", ")
}

fn codegen_call_args(translator: &Translator, receiver: Option<&str>, params: &[Param]) -> String {
    receiver
        .map(String::from)
        .into_iter()
        .chain(params.iter().map(|p| translator.arg_of(p)))
        .collect::<Vec<String>>()
        .join(", ")
}

/// Body forwarding to the C function `callee` and converting its result.
fn codegen_forwarding_body(translator: &Translator, callee: &str, args: &str, f: &Function) -> String {
    if f.return_type() == "void" {
        format!("  {}({});", callee, args)
    } else {
        format!(
            "  auto result = {}({});\n  return {};",
            callee,
            args,
            translator.result_of(f.return_type())
        )
    }
}

fn codegen_enum_class(name: &str, members: &[String], repr: &str) -> String {
    indoc!("
        enum class #NAME : #REPR {
          #ENUMERANTS
        };
        static_assert(sizeof(#NAME) == sizeof(WGPU#NAME), \"sizeof mismatch for #NAME\");
        static_assert(alignof(#NAME) == alignof(WGPU#NAME), \"alignof mismatch for #NAME\");
    ")
    .replace(
        "#ENUMERANTS",
        &members
            .iter()
            .map(|m| format!("{} = WGPU{}_{},", escape_member(m), name, m))
            .collect::<Vec<String>>()
            .join("\n  "),
    )
    .replace("#REPR", repr)
    .replace("#NAME", name)
}

pub struct CppHeaderRenderer {
    ctx: Context,
}

impl CppHeaderRenderer {
    pub fn new(ctx: Context) -> CppHeaderRenderer {
        CppHeaderRenderer { ctx }
    }

    fn codegen_prologue(&self) -> String {
        indoc!("
            #ifndef #GUARD
            #define #GUARD

            #include <cassert>
            #include <cmath>
            #include <cstddef>
            #include <cstdint>
            #include <functional>
            #include <memory>
            #include <optional>
            #include <string_view>
            #include <type_traits>
            #include <utility>

            #include \"#HEADER\"

            namespace #NS {
        ")
        .replace("#GUARD", self.ctx.guard())
        .replace("#HEADER", self.ctx.include())
        .replace("#NS", self.ctx.namespace())
    }

    fn codegen_epilogue(&self) -> String {
        indoc!("
            }  // namespace #NS

            #endif  // #GUARD
        ")
        .replace("#NS", self.ctx.namespace())
        .replace("#GUARD", self.ctx.guard())
    }
}

impl Renderer for CppHeaderRenderer {
    fn render(&self, ir: &Ir, translator: &Translator) -> String {
        let structs = wrapped_structs(ir);

        let sections = vec![
            self.codegen_prologue(),
            codegen_section_banner("Enums"),
            header::codegen_enums(ir),
            codegen_section_banner("Bitmasks"),
            header::codegen_bitmasks(ir),
            codegen_section_banner("Core Types"),
            prelude::CORE_TYPES.to_string(),
            codegen_section_banner("Forward Declarations"),
            header::codegen_forward_declarations(ir),
            codegen_section_banner("Utility"),
            prelude::UTILITY.to_string(),
            codegen_section_banner("Classes"),
            header::codegen_classes(ir, translator),
            codegen_section_banner("Structs"),
            prelude::CHAINED_STRUCT.to_string(),
            header::codegen_structs(&structs, translator),
            codegen_section_banner("Struct Implementations"),
            implementation::codegen_structs(&structs),
            codegen_section_banner("Class Implementations"),
            implementation::codegen_classes(ir, translator),
            codegen_section_banner("Global Functions"),
            implementation::codegen_functions(ir, translator),
            self.codegen_epilogue(),
        ];

        sections.join("\n")
    }
}

#[cfg(test)]
fn sample_ir() -> Ir {
    parser::parse(include_str!("../../../tests/data/excerpt.h")).unwrap()
}
