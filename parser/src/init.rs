//! Designated-initializer macros.
//!
//! ```c
//! #define WGPU_COLOR_INIT _wgpu_MAKE_INIT_STRUCT(WGPUColor, { \
//!     /*.r=*/0. _wgpu_COMMA \
//!     /*.g=*/0. _wgpu_COMMA \
//! })
//! ```
//!
//! Every `/*.field=*/` marker is followed either by a nested
//! `_wgpu_MAKE_INIT_STRUCT(Type, { ... })` whose body is parsed recursively,
//! or by a plain value running up to the next comma.

use nom::bytes::complete::{tag, take_till, take_till1, take_until};
use nom::character::complete::char;
use nom::error::{ErrorKind, ParseError};
use nom::sequence::delimited;
use nom::Parser;
use nom_language::error::VerboseError;

use crate::ast::{Defaults, FieldDefault};
use crate::conventions::{COMMA_PLACEHOLDER, INIT_FIELD_MARKER, INIT_MACRO, NESTED_INIT_MACRO};
use crate::lex::{identifier, sp, sp1, Res};

#[derive(Debug, PartialEq)]
pub struct StructInitDecl<'a> {
    pub name: &'a str,
    pub defaults: Defaults,
}

/// Drops line continuations and turns comma placeholders into real separators.
pub fn normalize(block: &str) -> String {
    block.replace('\\', "").replace(COMMA_PLACEHOLDER, ",")
}

/// `{ ... }` with balanced nesting; yields the text between the outer braces.
fn braced(input: &str) -> Res<'_, &str> {
    let (body, _) = char::<_, VerboseError<&str>>('{').parse(input)?;

    let mut depth = 1;
    for (i, c) in body.char_indices() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Ok((&body[i + 1..], &body[..i]));
                }
            }
            _ => {}
        }
    }

    Err(nom::Err::Error(VerboseError::from_error_kind(input, ErrorKind::Char)))
}

/// `/*.name=*/`
fn designator(input: &str) -> Res<'_, &str> {
    delimited(
        tag(INIT_FIELD_MARKER),
        identifier,
        (sp, char('='), sp, tag("*/")),
    )
    .parse(input)
}

/// `_wgpu_MAKE_INIT_STRUCT(WGPUType, { ... })`, yielding the braced body.
fn nested_init(input: &str) -> Res<'_, &str> {
    let (input, _) = (tag(NESTED_INIT_MACRO), sp, char('('), take_till(|c| c == ','), char(','), sp)
        .parse(input)?;
    let (input, body) = braced(input)?;
    let (input, _) = (sp, char(')')).parse(input)?;

    Ok((input, body))
}

fn literal(input: &str) -> Res<'_, &str> {
    take_till1(|c| c == ',' || c == '\n').parse(input)
}

fn field_init(input: &str) -> Res<'_, (&str, FieldDefault)> {
    let (input, name) = designator(input)?;
    let (input, _) = sp(input)?;

    if let Ok((input, body)) = nested_init(input) {
        return Ok((input, (name, FieldDefault::Nested(init_fields(body)))));
    }

    let (input, value) = literal(input)?;
    Ok((input, (name, FieldDefault::Literal(value.trim().to_string()))))
}

/// Collects every designated field in `input`; text between fields is skipped.
pub fn init_fields(mut input: &str) -> Defaults {
    let mut defaults = Defaults::new();

    loop {
        let at_marker = match take_until::<_, _, VerboseError<&str>>(INIT_FIELD_MARKER).parse(input) {
            Ok((at_marker, _)) => at_marker,
            Err(_) => break,
        };

        match field_init(at_marker) {
            Ok((rest, (name, value))) => {
                defaults.insert(name.to_string(), value);
                input = rest;
            }
            Err(_) => input = &at_marker[INIT_FIELD_MARKER.len()..],
        }
    }

    defaults
}

/// Parses a normalized initializer block (see [`normalize`]).
pub fn struct_init_decl(input: &str) -> Res<'_, StructInitDecl<'_>> {
    let (input, _) = (tag("#define"), sp1, identifier, sp1).parse(input)?;
    let (input, _) = (take_until(INIT_MACRO), tag(INIT_MACRO), sp, char('('), sp).parse(input)?;
    let (input, name) = identifier(input)?;
    let (input, _) = (sp, char(','), sp).parse(input)?;
    let (input, body) = braced(input)?;
    let (input, _) = (sp, char(')')).parse(input)?;

    Ok((
        input,
        StructInitDecl {
            name,
            defaults: init_fields(body),
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn literal_default(value: &str) -> FieldDefault {
        FieldDefault::Literal(value.to_string())
    }

    #[test]
    fn test_normalize() {
        assert_eq!(
            normalize("/*.r=*/0. _wgpu_COMMA \\\n})"),
            "/*.r=*/0. , \n})"
        );
    }

    #[test]
    fn test_braced() {
        assert_eq!(braced("{ a { b } c } tail"), Ok((" tail", " a { b } c ")));
        assert!(braced("{ never closed").is_err());
    }

    #[test]
    fn test_designator() {
        assert_eq!(designator("/*.nextInChain=*/NULL"), Ok(("NULL", "nextInChain")));
        assert!(designator("/* plain comment */").is_err());
    }

    #[test]
    fn test_flat_fields() {
        let defaults = init_fields("/*.r=*/0. ,\n/*.g=*/WGPU_TRUE ,\n/*.mode=*/_wgpu_ENUM_ZERO_INIT(WGPUMapMode) ,\n");

        assert_eq!(defaults.len(), 3);
        assert_eq!(defaults["r"], literal_default("0."));
        assert_eq!(defaults["g"], literal_default("WGPU_TRUE"));
        assert_eq!(defaults["mode"], literal_default("_wgpu_ENUM_ZERO_INIT(WGPUMapMode)"));
    }

    #[test]
    fn test_nested_fields() {
        let block = normalize(
            "/*.chain=*/_wgpu_MAKE_INIT_STRUCT(WGPUChainedStruct, { \\\n\
             /*.next=*/NULL _wgpu_COMMA \\\n\
             /*.sType=*/WGPUSType_ShaderSourceSPIRV _wgpu_COMMA \\\n\
             }) _wgpu_COMMA \\\n\
             /*.codeSize=*/0 _wgpu_COMMA \\\n",
        );
        let defaults = init_fields(&block);

        let mut chain = Defaults::new();
        chain.insert(String::from("next"), literal_default("NULL"));
        chain.insert(String::from("sType"), literal_default("WGPUSType_ShaderSourceSPIRV"));

        assert_eq!(defaults["chain"], FieldDefault::Nested(chain));
        assert_eq!(defaults["codeSize"], literal_default("0"));
    }

    #[test]
    fn test_marker_without_value_is_skipped() {
        let defaults = init_fields("/*.a=*/,\n/*.b=*/1 ,");

        assert_eq!(defaults.len(), 1);
        assert_eq!(defaults["b"], literal_default("1"));
    }

    #[test]
    fn test_struct_init_decl() {
        let block = normalize(
            "#define WGPU_COLOR_INIT _wgpu_MAKE_INIT_STRUCT(WGPUColor, { \\\n\
             /*.r=*/0 _wgpu_COMMA \\\n\
             })\n",
        );

        let (_, decl) = struct_init_decl(&block).unwrap();
        assert_eq!(decl.name, "WGPUColor");
        assert_eq!(decl.defaults.len(), 1);
        assert_eq!(decl.defaults["r"], literal_default("0"));
    }
}
