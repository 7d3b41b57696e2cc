//! Function -> method promotion.
//!
//! A function becomes a method of the class named by its first parameter's
//! type when that (prefix-stripped) type is a literal prefix of the
//! (prefix-stripped) function name. The match is a plain string prefix, not
//! a word boundary: `wgpuColorSpaceFoo(WGPUColor c)` lands on `Color` as
//! method `SpaceFoo`. `...FreeMembers` helpers are never promoted.

use crate::ast::{Function, Param};
use crate::conventions::{strip_type_prefix, FREE_MEMBERS_SUFFIX, TYPE_PREFIX};

/// Where a parsed function ends up in the IR.
#[derive(Clone, Debug, PartialEq)]
pub enum Placement {
    Method {
        class: String,
        key: String,
        function: Function,
    },
    Free {
        name: String,
        function: Function,
    },
}

pub fn is_free_members(function_name: &str) -> bool {
    function_name.ends_with(FREE_MEMBERS_SUFFIX)
}

/// The class owning `function_name` (prefix-stripped), if any.
pub fn method_owner<'a>(function_name: &str, first_param_type: &'a str) -> Option<&'a str> {
    if is_free_members(function_name) || !first_param_type.starts_with(TYPE_PREFIX) {
        return None;
    }

    let class = strip_type_prefix(first_param_type);
    if class.is_empty() || !function_name.starts_with(class) {
        return None;
    }
    Some(class)
}

pub fn place(name: String, mut params: Vec<Param>, return_type: String) -> Placement {
    let owner = params
        .first()
        .and_then(|first| method_owner(&name, first.ctype()))
        .map(String::from);

    match owner {
        Some(class) => {
            params.remove(0);
            Placement::Method {
                key: name[class.len()..].to_string(),
                class,
                function: Function::new(params, return_type),
            }
        }
        None => Placement::Free {
            name,
            function: Function::new(params, return_type),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn param(ctype: &str, name: &str) -> Param {
        Param::new(ctype.to_string(), name.to_string())
    }

    #[test]
    fn test_method_owner() {
        assert_eq!(method_owner("BufferDestroy", "WGPUBuffer"), Some("Buffer"));
        assert_eq!(method_owner("DeviceCreateBuffer", "WGPUBuffer"), None);
        assert_eq!(method_owner("AdapterInfoFreeMembers", "WGPUAdapterInfo"), None);
        assert_eq!(method_owner("BufferDestroy", "Buffer"), None);
        assert_eq!(method_owner("BufferDestroy", "WGPU"), None);
    }

    #[test]
    fn test_promotion_drops_receiver() {
        let placement = place(
            String::from("BufferMapAsync"),
            vec![param("WGPUBuffer", "buffer"), param("WGPUMapMode", "mode")],
            String::from("WGPUFuture"),
        );

        assert_eq!(
            placement,
            Placement::Method {
                class: String::from("Buffer"),
                key: String::from("MapAsync"),
                function: Function::new(vec![param("WGPUMapMode", "mode")], String::from("WGPUFuture")),
            }
        );
    }

    #[test]
    fn test_free_members_stay_functions() {
        let placement = place(
            String::from("AdapterInfoFreeMembers"),
            vec![param("WGPUAdapterInfo", "adapterInfo")],
            String::from("void"),
        );

        match placement {
            Placement::Free { name, function } => {
                assert_eq!(name, "AdapterInfoFreeMembers");
                assert_eq!(function.params().len(), 1);
            }
            other => panic!("Expected free function, got {:?}", other),
        }
    }

    #[test]
    fn test_no_params_stays_function() {
        match place(String::from("CreateInstance"), vec![], String::from("WGPUInstance")) {
            Placement::Free { name, .. } => assert_eq!(name, "CreateInstance"),
            other => panic!("Expected free function, got {:?}", other),
        }
    }

    #[test]
    fn test_prefix_match_is_not_word_bounded() {
        let placement = place(
            String::from("ColorSpaceConvert"),
            vec![param("WGPUColor", "color")],
            String::from("void"),
        );

        match placement {
            Placement::Method { class, key, .. } => {
                assert_eq!(class, "Color");
                assert_eq!(key, "SpaceConvert");
            }
            other => panic!("Expected method, got {:?}", other),
        }
    }
}
