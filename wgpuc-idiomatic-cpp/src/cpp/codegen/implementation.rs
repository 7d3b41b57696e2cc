use indoc::indoc;
use parser::conventions::FREE_MEMBERS_SUFFIX;

use super::*;

fn codegen_layout_asserts(name: &str) -> String {
    indoc!("
        static_assert(sizeof(#NAME) == sizeof(WGPU#NAME), \"sizeof mismatch for #NAME\");
        static_assert(alignof(#NAME) == alignof(WGPU#NAME), \"alignof mismatch for #NAME\");"
    )
    .replace("#NAME", name)
}

fn codegen_offset_assert(struct_name: &str, f: &Field) -> String {
    format!(
        "static_assert(offsetof({0}, {1}) == offsetof(WGPU{0}, {1}), \"offsetof mismatch for {0}::{1}\");",
        struct_name,
        f.name()
    )
}

fn codegen_chained_constructor(s: &StructInfo) -> String {
    indoc!("
        #NAME::#NAME()
            : ChainedStruct{nullptr, SType::#NAME} {}"
    )
    .replace("#NAME", s.name)
}

/// Move-only plumbing for structs whose members are released by `wgpu<Struct>FreeMembers`.
fn codegen_manual_free(s: &StructInfo) -> Vec<String> {
    let fields = s.own_fields();
    let mut defs = vec![];

    if !s.chained {
        defs.push(String::from("#NAME::#NAME() = default;"));
    }
    defs.push(String::from(indoc!("
        #NAME::~#NAME() {
          FreeMembers();
        }"
    )));
    defs.push(
        indoc!("
            #NAME::#NAME(#NAME&& rhs)
                : #MOVED {
              Reset(rhs);
            }"
        )
        .replace(
            "#MOVED",
            &fields
                .iter()
                .map(|f| format!("{0}(rhs.{0})", f.name()))
                .collect::<Vec<String>>()
                .join(", "),
        ),
    );
    defs.push(
        indoc!("
            #NAME& #NAME::operator=(#NAME&& rhs) {
              if (&rhs == this)
                return *this;
              FreeMembers();
              #ASSIGNMENTS
              Reset(rhs);
              return *this;
            }"
        )
        .replace(
            "#ASSIGNMENTS",
            &fields
                .iter()
                .map(|f| format!("detail::AsNonConstReference(this->{0}) = std::move(rhs.{0});", f.name()))
                .collect::<Vec<String>>()
                .join("\n  "),
        ),
    );
    defs.push(String::from(indoc!("
        void #NAME::FreeMembers() {
          wgpu#NAMEFreeMembers(*reinterpret_cast<WGPU#NAME*>(this));
        }"
    )));
    defs.push(
        indoc!("
            // static
            void #NAME::Reset(#NAME& value) {
              #NAME defaultValue = {};
              #RESETS
            }"
        )
        .replace(
            "#RESETS",
            &fields
                .iter()
                .map(|f| format!("detail::AsNonConstReference(value.{0}) = defaultValue.{0};", f.name()))
                .collect::<Vec<String>>()
                .join("\n  "),
        ),
    );

    defs.into_iter().map(|d| d.replace("#NAME", s.name)).collect()
}

fn codegen_struct(s: &StructInfo) -> String {
    let mut defs = vec![format!("// {} implementation", s.name)];
    if s.chained {
        defs.push(codegen_chained_constructor(s));
    }
    if s.manual_free {
        defs.extend(codegen_manual_free(s));
    }
    defs.push(
        indoc!("
            #NAME::operator const WGPU#NAME&() const noexcept {
              return *reinterpret_cast<const WGPU#NAME*>(this);
            }"
        )
        .replace("#NAME", s.name),
    );

    let mut asserts = vec![codegen_layout_asserts(s.name)];
    asserts.extend(s.own_fields().iter().map(|f| codegen_offset_assert(s.name, f)));
    defs.push(asserts.join("\n"));

    defs.join("\n\n") + "\n"
}

pub fn codegen_structs(structs: &[StructInfo]) -> String {
    structs
        .iter()
        .map(codegen_struct)
        .collect::<Vec<String>>()
        .join("\n")
}

fn codegen_method(translator: &Translator, class_name: &str, method: &str, f: &Function) -> String {
    indoc!("
        #RETURN #CLASS::#METHOD(#PARAMS) const {
        #BODY
        }"
    )
    .replace(
        "#BODY",
        &codegen_forwarding_body(
            translator,
            &format!("wgpu{}{}", class_name, method),
            &codegen_call_args(translator, Some("Get()"), f.params()),
            f,
        ),
    )
    .replace("#RETURN", &translator.type_of(f.return_type(), true))
    .replace("#PARAMS", &codegen_params_declaration(translator, f.params()))
    .replace("#CLASS", class_name)
    .replace("#METHOD", method)
}

fn codegen_class(translator: &Translator, name: &str, methods: &Table<Function>) -> String {
    let mut defs = vec![format!("// {} implementation", name)];
    defs.extend(
        methods
            .iter()
            .filter(|(method, _)| !is_refcount_method(method))
            .map(|(method, f)| codegen_method(translator, name, method, f)),
    );
    defs.push(
        indoc!("
            void #NAME::WGPUAddRef(WGPU#NAME handle) {
              if (handle != nullptr)
                wgpu#NAMEAddRef(handle);
            }
            void #NAME::WGPURelease(WGPU#NAME handle) {
              if (handle != nullptr)
                wgpu#NAMERelease(handle);
            }"
        )
        .replace("#NAME", name),
    );
    defs.push(codegen_layout_asserts(name));

    defs.join("\n") + "\n"
}

pub fn codegen_classes(ir: &Ir, translator: &Translator) -> String {
    ir.classes()
        .iter()
        .map(|(name, methods)| codegen_class(translator, name, methods))
        .collect::<Vec<String>>()
        .join("\n")
}

fn codegen_function(translator: &Translator, name: &str, f: &Function) -> String {
    indoc!("
        static inline #RETURN #NAME(#PARAMS) {
        #BODY
        }"
    )
    .replace(
        "#BODY",
        &codegen_forwarding_body(
            translator,
            &format!("wgpu{}", name),
            &codegen_call_args(translator, None, f.params()),
            f,
        ),
    )
    .replace("#RETURN", &translator.type_of(f.return_type(), true))
    .replace("#PARAMS", &codegen_params_declaration(translator, f.params()))
    .replace("#NAME", name)
}

pub fn codegen_functions(ir: &Ir, translator: &Translator) -> String {
    let functions = ir
        .functions()
        .iter()
        .filter(|(name, _)| !name.ends_with(FREE_MEMBERS_SUFFIX))
        .map(|(name, f)| codegen_function(translator, name, f))
        .collect::<Vec<String>>();

    if functions.is_empty() {
        String::new()
    } else {
        functions.join("\n") + "\n"
    }
}
