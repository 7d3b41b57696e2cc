//! Fixed tokens of the `webgpu.h` declaration dialect.

pub const TYPE_PREFIX: &str = "WGPU";
pub const FUNCTION_PREFIX: &str = "wgpu";
pub const CONSTANT_PREFIX: &str = "WGPU_";
pub const GROUP_SEPARATOR: char = '_';

pub const EXPORT_MARKER: &str = "WGPU_EXPORT";
pub const NULLABLE_MARKER: &str = "WGPU_NULLABLE";

pub const FREE_MEMBERS_SUFFIX: &str = "FreeMembers";
pub const CALLBACK_INFO_SUFFIX: &str = "CallbackInfo";

pub const INIT_MACRO: &str = "MAKE_INIT_STRUCT";
pub const NESTED_INIT_MACRO: &str = "_wgpu_MAKE_INIT_STRUCT";
pub const INIT_FIELD_MARKER: &str = "/*.";
pub const INIT_TERMINATOR: &str = "})";
pub const COMMA_PLACEHOLDER: &str = "_wgpu_COMMA";
pub const ENUM_ZERO_INIT: &str = "_wgpu_ENUM_ZERO_INIT";
pub const INIT_SENTINEL_SUFFIX: &str = "_INIT";

pub const PROC_TYPE: &str = "WGPUProc";
pub const STATUS_TYPE: &str = "WGPUStatus";
pub const STRING_VIEW_TYPE: &str = "WGPUStringView";
pub const CHAINED_STRUCT_TYPE: &str = "WGPUChainedStruct";
pub const FUTURE_TYPE: &str = "WGPUFuture";

pub const NULL_VALUE: &str = "NULL";
pub const TRUE_VALUE: &str = "WGPU_TRUE";
pub const FALSE_VALUE: &str = "WGPU_FALSE";

/// `WGPUBuffer` -> `Buffer`. Names without the prefix are returned as-is.
pub fn strip_type_prefix(name: &str) -> &str {
    name.strip_prefix(TYPE_PREFIX).unwrap_or(name)
}

/// `wgpuBufferDestroy` -> `BufferDestroy`. Names without the prefix are returned as-is.
pub fn strip_function_prefix(name: &str) -> &str {
    name.strip_prefix(FUNCTION_PREFIX).unwrap_or(name)
}

/// Splits `WGPUMapMode_Read` into `("WGPUMapMode", "Read")` at the first separator.
pub fn split_group(constant: &str) -> Option<(&str, &str)> {
    constant.split_once(GROUP_SEPARATOR)
}
