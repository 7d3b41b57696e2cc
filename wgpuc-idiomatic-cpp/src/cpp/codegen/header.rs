use super::*;

fn codegen_member(translator: &Translator, f: &Field) -> String {
    let declaration = format!("{} {}", translator.type_of(f.ctype(), true), f.name());
    match f.default() {
        Some(default) => format!("{} = {};", declaration, translator.default_of(default)),
        None => format!("{};", declaration),
    }
}

/// The first own member of a chained struct must not be packed into the base's tail padding.
fn codegen_aligned_member(translator: &Translator, f: &Field) -> String {
    indoc!("
        static constexpr size_t kFirstMemberAlignment =
            detail::ConstexprMax(alignof(ChainedStruct), alignof(#TYPE));
        alignas(kFirstMemberAlignment) #MEMBER"
    )
    .replace("#TYPE", &translator.type_of(f.ctype(), true))
    .replace("#MEMBER", &codegen_member(translator, f))
}

pub fn codegen_enums(ir: &Ir) -> String {
    ir.enums()
        .iter()
        .filter(|(name, _)| name.as_str() != "OptionalBool")
        .map(|(name, members)| codegen_enum_class(name, members, "uint32_t"))
        .collect::<Vec<String>>()
        .join("\n")
}

pub fn codegen_bitmasks(ir: &Ir) -> String {
    ir.bitmasks()
        .iter()
        .map(|(name, flags)| codegen_enum_class(name, flags, "uint64_t"))
        .collect::<Vec<String>>()
        .join("\n")
}

pub fn codegen_forward_declarations(ir: &Ir) -> String {
    let classes = ir.classes().keys().map(|name| format!("class {};", name));
    let structs = ir
        .structs()
        .keys()
        .filter(|name| !name.ends_with(CALLBACK_INFO_SUFFIX))
        .map(|name| format!("struct {};", name));

    let mut lines: Vec<String> = classes.collect();
    lines.push(String::new());
    lines.extend(structs);
    lines.join("\n") + "\n"
}

fn codegen_class(translator: &Translator, name: &str, methods: &Table<Function>) -> String {
    let method_prototypes = methods
        .iter()
        .filter(|(method, _)| !is_refcount_method(method))
        .map(|(method, f)| {
            format!(
                "  inline {} {}({}) const;",
                translator.type_of(f.return_type(), true),
                method,
                codegen_params_declaration(translator, f.params())
            )
        })
        .collect::<Vec<String>>();

    let mut blocks = vec![String::from(
        " public:\n  using ObjectBase::ObjectBase;\n  using ObjectBase::operator=;",
    )];
    if !method_prototypes.is_empty() {
        blocks.push(method_prototypes.join("\n"));
    }
    blocks.push(String::from(
        " private:\n  friend ObjectBase<#NAME, WGPU#NAME>;\n  static inline void WGPUAddRef(WGPU#NAME handle);\n  static inline void WGPURelease(WGPU#NAME handle);",
    ));

    indoc!("
        class #NAME : public ObjectBase<#NAME, WGPU#NAME> {
        #BODY
        };
    ")
    .replace("#BODY", &blocks.join("\n\n"))
    .replace("#NAME", name)
}

pub fn codegen_classes(ir: &Ir, translator: &Translator) -> String {
    ir.classes()
        .iter()
        .map(|(name, methods)| codegen_class(translator, name, methods))
        .collect::<Vec<String>>()
        .join("\n")
}

fn codegen_struct(translator: &Translator, s: &StructInfo) -> String {
    let mut prototypes = vec![];
    if s.chained {
        prototypes.push("inline #NAME();");
    }
    prototypes.push("inline operator const WGPU#NAME&() const noexcept;");
    if s.manual_free {
        if !s.chained {
            prototypes.push("inline #NAME();");
        }
        prototypes.push("inline ~#NAME();");
        prototypes.push("#NAME(const #NAME&) = delete;");
        prototypes.push("#NAME& operator=(const #NAME&) = delete;");
        prototypes.push("inline #NAME(#NAME&&);");
        prototypes.push("inline #NAME& operator=(#NAME&&);");
    }

    let members = s
        .own_fields()
        .iter()
        .enumerate()
        .map(|(i, f)| {
            if s.chained && i == 0 {
                codegen_aligned_member(translator, f)
            } else {
                codegen_member(translator, f)
            }
        })
        .collect::<Vec<String>>();

    let mut blocks = vec![format!("  {}", prototypes.join("\n  "))];
    if !members.is_empty() {
        blocks.push(format!("  {}", members.join("\n").replace("\n", "\n  ")));
    }
    if s.manual_free {
        blocks.push(String::from(
            " private:\n  inline void FreeMembers();\n  static inline void Reset(#NAME& value);",
        ));
    }

    indoc!("
        struct #NAME#BASE {
        #BODY
        };
    ")
    .replace("#BODY", &blocks.join("\n\n"))
    .replace("#BASE", if s.chained { " : ChainedStruct" } else { "" })
    .replace("#NAME", s.name)
}

pub fn codegen_structs(structs: &[StructInfo], translator: &Translator) -> String {
    structs
        .iter()
        .map(|s| codegen_struct(translator, s))
        .collect::<Vec<String>>()
        .join("\n")
}
