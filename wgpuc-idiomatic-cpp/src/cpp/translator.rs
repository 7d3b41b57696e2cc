//! Spelling of C types and values in the C++ wrapper.
//!
//! Every lookup reads the sealed [`Ir`], so a name is only treated as a
//! class, enum or bitmask once the whole header has been parsed.

use parser::ast::{Category, FieldDefault, Ir, Param};
use parser::conventions::{
    split_group, strip_type_prefix, CALLBACK_INFO_SUFFIX, CONSTANT_PREFIX, ENUM_ZERO_INIT,
    FALSE_VALUE, FUTURE_TYPE, INIT_SENTINEL_SUFFIX, NULLABLE_MARKER, NULL_VALUE, PROC_TYPE,
    STATUS_TYPE, STRING_VIEW_TYPE, TRUE_VALUE, TYPE_PREFIX,
};

const STATUS_WRAPPER: &str = "ConvertibleStatus";
const EMPTY_AGGREGATE: &str = "{}";

/// Enumerators can't start with a digit in C++: `1D` -> `e1D`.
pub fn escape_member(member: &str) -> String {
    if member.starts_with(|c: char| c.is_ascii_digit()) {
        format!("e{}", member)
    } else {
        member.to_string()
    }
}

fn strip_nullable(ctype: &str) -> &str {
    ctype.trim_start_matches(NULLABLE_MARKER).trim()
}

#[derive(Clone, Copy, Debug)]
pub struct Translator<'ir> {
    ir: &'ir Ir,
}

impl<'ir> Translator<'ir> {
    pub fn new(ir: &'ir Ir) -> Translator<'ir> {
        Translator { ir }
    }

    /// Whether an unprefixed-or-prefixed type names an entry of `category`.
    /// Types without the prefix never do.
    fn is_a(&self, ctype: &str, category: Category) -> bool {
        ctype.starts_with(TYPE_PREFIX) && self.ir.is_a(ctype, category)
    }

    fn is_enum_like(&self, ctype: &str) -> bool {
        self.is_a(ctype, Category::Enum) || self.is_a(ctype, Category::Bitmask)
    }

    /// C++ spelling of a C type. Struct fields hold class handles by value;
    /// everywhere else they are passed as `const&`.
    pub fn type_of(&self, ctype: &str, in_struct: bool) -> String {
        let ctype = ctype.replace(NULLABLE_MARKER, "");
        let ctype = ctype.trim();

        if ctype == PROC_TYPE {
            return ctype.to_string();
        }
        if ctype == STATUS_TYPE {
            return STATUS_WRAPPER.to_string();
        }
        if !ctype.starts_with(TYPE_PREFIX) {
            return ctype.to_string();
        }
        if ctype.ends_with(CALLBACK_INFO_SUFFIX) {
            return ctype.to_string();
        }
        if self.is_a(ctype, Category::Class) && !in_struct {
            return format!("{} const&", strip_type_prefix(ctype));
        }
        strip_type_prefix(ctype).to_string()
    }

    /// C++ spelling of a default value or constant.
    pub fn value_of(&self, cvalue: &str) -> String {
        match cvalue {
            NULL_VALUE => return String::from("nullptr"),
            TRUE_VALUE => return String::from("true"),
            FALSE_VALUE => return String::from("false"),
            _ => {}
        }
        if cvalue.starts_with(ENUM_ZERO_INIT) {
            return EMPTY_AGGREGATE.to_string();
        }
        if !cvalue.starts_with(TYPE_PREFIX) {
            return cvalue.to_string();
        }
        if cvalue.ends_with(INIT_SENTINEL_SUFFIX) {
            return EMPTY_AGGREGATE.to_string();
        }
        // Predefined macro constants such as WGPU_STRLEN.
        if cvalue.starts_with(CONSTANT_PREFIX) {
            return cvalue.to_string();
        }
        if self.is_a(cvalue, Category::Class) {
            return strip_type_prefix(cvalue).to_string();
        }

        match split_group(cvalue) {
            Some((group, member)) => format!("{}::{}", strip_type_prefix(group), escape_member(member)),
            None => strip_type_prefix(cvalue).to_string(),
        }
    }

    /// Field default as written in a member initializer.
    pub fn default_of(&self, default: &FieldDefault) -> String {
        match default {
            FieldDefault::Literal(value) => self.value_of(value),
            FieldDefault::Nested(_) => EMPTY_AGGREGATE.to_string(),
        }
    }

    /// Expression passing a wrapper argument on to the C function.
    pub fn arg_of(&self, param: &Param) -> String {
        let ctype = strip_nullable(param.ctype());
        let name = param.name();

        if ctype.ends_with('*') {
            format!("reinterpret_cast<{}>({})", ctype, name)
        } else if self.is_enum_like(ctype) {
            format!("static_cast<{}>({})", ctype, name)
        } else if self.is_a(ctype, Category::Class) {
            format!("{}.Get()", name)
        } else if ctype == STRING_VIEW_TYPE {
            format!("*reinterpret_cast<{} const*>(&{})", STRING_VIEW_TYPE, name)
        } else {
            name.to_string()
        }
    }

    /// Expression turning the C function's `result` into the wrapper return type.
    pub fn result_of(&self, ctype: &str) -> String {
        let ctype = strip_nullable(ctype);

        if ctype == FUTURE_TYPE {
            String::from("Future{result.id}")
        } else if self.is_enum_like(ctype) {
            format!("static_cast<{}>(result)", strip_type_prefix(ctype))
        } else if self.is_a(ctype, Category::Class) {
            format!("{}::Acquire(result)", strip_type_prefix(ctype))
        } else {
            String::from("result")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ir() -> Ir {
        parser::parse(
            "typedef enum WGPUBackendType { WGPUBackendType_Null = 0, WGPUBackendType_WebGPU = 1, } WGPUBackendType;\n\
             typedef enum WGPUTextureDimension { WGPUTextureDimension_1D = 1, } WGPUTextureDimension;\n\
             static const WGPUMapMode WGPUMapMode_Read = 0x1;\n\
             WGPU_EXPORT void wgpuBufferDestroy(WGPUBuffer buffer);\n\
             WGPU_EXPORT WGPUBuffer wgpuDeviceCreateBuffer(WGPUDevice device, WGPUBufferDescriptor const * descriptor);\n",
        )
        .unwrap()
    }

    fn param(ctype: &str, name: &str) -> Param {
        Param::new(ctype.to_string(), name.to_string())
    }

    #[test]
    fn test_type_of() {
        let ir = ir();
        let t = Translator::new(&ir);

        assert_eq!(t.type_of("WGPUBuffer", false), "Buffer const&");
        assert_eq!(t.type_of("WGPUBuffer", true), "Buffer");
        assert_eq!(t.type_of("WGPU_NULLABLE WGPUBuffer", false), "Buffer const&");
        assert_eq!(t.type_of("WGPUBufferDescriptor const *", false), "BufferDescriptor const *");
        assert_eq!(t.type_of("WGPUBufferMapCallbackInfo", false), "WGPUBufferMapCallbackInfo");
        assert_eq!(t.type_of("WGPUProc", false), "WGPUProc");
        assert_eq!(t.type_of("WGPUStatus", true), "ConvertibleStatus");
        assert_eq!(t.type_of("WGPUBackendType", false), "BackendType");
    }

    #[test]
    fn test_type_of_is_identity_without_prefix() {
        let ir = ir();
        let t = Translator::new(&ir);

        for ctype in ["uint32_t", "void const *", "double", "size_t", "char const *"].iter() {
            assert_eq!(t.type_of(ctype, false), *ctype);
            assert_eq!(t.type_of(ctype, true), *ctype);
        }
    }

    #[test]
    fn test_value_of() {
        let ir = ir();
        let t = Translator::new(&ir);

        assert_eq!(t.value_of("WGPUBackendType_WebGPU"), "BackendType::WebGPU");
        assert_eq!(t.value_of("WGPU_TRUE"), "true");
        assert_eq!(t.value_of("WGPU_FALSE"), "false");
        assert_eq!(t.value_of("NULL"), "nullptr");
        assert_eq!(t.value_of("_wgpu_ENUM_ZERO_INIT(WGPUMapMode)"), "{}");
        assert_eq!(t.value_of("WGPU_COLOR_INIT"), "{}");
        assert_eq!(t.value_of("WGPU_STRLEN"), "WGPU_STRLEN");
        assert_eq!(t.value_of("WGPUBuffer"), "Buffer");
        assert_eq!(t.value_of("WGPUTextureDimension_2D"), "TextureDimension::e2D");
        assert_eq!(t.value_of("WGPUOrphan"), "Orphan");
        assert_eq!(t.value_of("0."), "0.");
    }

    #[test]
    fn test_default_of() {
        let ir = ir();
        let t = Translator::new(&ir);

        assert_eq!(t.default_of(&FieldDefault::Literal(String::from("NULL"))), "nullptr");
        assert_eq!(t.default_of(&FieldDefault::Nested(Default::default())), "{}");
    }

    #[test]
    fn test_arg_of() {
        let ir = ir();
        let t = Translator::new(&ir);

        assert_eq!(
            t.arg_of(&param("WGPUBufferDescriptor const *", "descriptor")),
            "reinterpret_cast<WGPUBufferDescriptor const *>(descriptor)"
        );
        assert_eq!(t.arg_of(&param("WGPUMapMode", "mode")), "static_cast<WGPUMapMode>(mode)");
        assert_eq!(
            t.arg_of(&param("WGPUBackendType", "backend")),
            "static_cast<WGPUBackendType>(backend)"
        );
        assert_eq!(t.arg_of(&param("WGPU_NULLABLE WGPUBuffer", "buffer")), "buffer.Get()");
        assert_eq!(
            t.arg_of(&param("WGPUStringView", "label")),
            "*reinterpret_cast<WGPUStringView const*>(&label)"
        );
        assert_eq!(t.arg_of(&param("uint64_t", "size")), "size");
    }

    #[test]
    fn test_result_of() {
        let ir = ir();
        let t = Translator::new(&ir);

        assert_eq!(t.result_of("WGPUFuture"), "Future{result.id}");
        assert_eq!(t.result_of("WGPUMapMode"), "static_cast<MapMode>(result)");
        assert_eq!(t.result_of("WGPUBuffer"), "Buffer::Acquire(result)");
        assert_eq!(t.result_of("uint64_t"), "result");
    }

    #[test]
    fn test_escape_member() {
        assert_eq!(escape_member("1D"), "e1D");
        assert_eq!(escape_member("Undefined"), "Undefined");
    }
}
