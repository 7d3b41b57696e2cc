//! Per-block recursive-descent parsers.
//!
//! Each scanner block kind has one nom parser here producing borrowed pieces
//! of the block text; [`Declaration`] is the owned, prefix-stripped result
//! handed to the IR builder.

use nom::bytes::complete::{tag, take_until};
use nom::character::complete::char;
use nom::combinator::{map_opt, opt};
use nom::sequence::{delimited, terminated};
use nom::Parser;
use nom_language::error::{convert_error, VerboseError};

use crate::ast::{Defaults, Field, Param};
use crate::conventions::{split_group, strip_function_prefix, strip_type_prefix, EXPORT_MARKER};
use crate::error::{Error, Result};
use crate::init;
use crate::lex::{identifier, sp, sp1, strip_comments, Res};
use crate::scanner::{Block, BlockKind, SourceBlock};

/// One fully parsed declaration, names already stripped of their prefix.
#[derive(Clone, Debug, PartialEq)]
pub enum Declaration {
    Enum {
        name: String,
        members: Vec<String>,
    },
    Bitmask {
        group: String,
        flag: String,
    },
    Struct {
        name: String,
        fields: Vec<Field>,
    },
    Function {
        name: String,
        params: Vec<Param>,
        return_type: String,
    },
    StructInit {
        name: String,
        defaults: Defaults,
    },
}

/// Everything up to and including the next `}`, yielding the text before it.
fn until_brace(input: &str) -> Res<'_, &str> {
    terminated(take_until("}"), char('}')).parse(input)
}

/// Everything up to the call parentheses.
fn head(input: &str) -> Res<'_, &str> {
    take_until("(").parse(input)
}

fn parenthesized(input: &str) -> Res<'_, &str> {
    delimited(char('('), take_until(")"), char(')')).parse(input)
}

/// `double r` -> `("double", "r")`; `WGPUChainedStruct const * nextInChain`
/// -> `("WGPUChainedStruct const *", "nextInChain")`.
fn declarator(text: &str) -> Option<(&str, &str)> {
    let (ctype, name) = text.trim().rsplit_once(char::is_whitespace)?;
    let ctype = ctype.trim();
    if ctype.is_empty() || name.is_empty() {
        return None;
    }
    Some((ctype, name))
}

/// `typedef enum WGPUName { ... }`, yielding the name and the member constants.
/// Every non-empty entry must be `WGPUName_Member = value`; comments are stripped beforehand.
fn enum_decl(input: &str) -> Res<'_, (&str, Vec<&str>)> {
    let (input, _) = (tag("typedef"), sp1, tag("enum"), sp1).parse(input)?;
    let (input, name) = identifier(input)?;
    let (input, _) = (sp, char('{')).parse(input)?;
    let (input, body) = until_brace(input)?;

    let mut members = vec![];
    for entry in body.split(',').map(str::trim).filter(|entry| !entry.is_empty()) {
        let (_, member) = terminated(identifier, (sp, char('='))).parse(entry)?;
        members.push(member);
    }

    Ok((input, (name, members)))
}

/// `static const WGPUType WGPUType_Flag = value;`, yielding the constant name.
fn bitmask_decl(input: &str) -> Res<'_, &str> {
    let (input, _) = (tag("static"), sp1, tag("const"), sp1, identifier, sp1).parse(input)?;
    terminated(identifier, (sp, char('='))).parse(input)
}

/// `typedef struct WGPUName { type name; ... }`, yielding the name and the raw body.
fn struct_decl(input: &str) -> Res<'_, (&str, &str)> {
    let (input, _) = (tag("typedef"), sp1, tag("struct"), sp1).parse(input)?;
    let (input, name) = identifier(input)?;
    let (input, _) = (sp, char('{')).parse(input)?;
    let (input, body) = until_brace(input)?;

    Ok((input, (name, body)))
}

/// `[WGPU_EXPORT] ret wgpuName(params)`, yielding return type, name and raw parameters.
fn function_decl(input: &str) -> Res<'_, (&str, &str, &str)> {
    let (input, _) = (sp, opt((tag(EXPORT_MARKER), sp1))).parse(input)?;
    let (input, (return_type, name)) = map_opt(head, declarator).parse(input)?;
    let (input, params) = parenthesized(input)?;

    Ok((input, (return_type, name, params)))
}

fn fields(body: &str) -> Vec<Field> {
    body.split(';')
        .filter_map(declarator)
        .map(|(ctype, name)| Field::new(ctype.to_string(), name.to_string(), None))
        .collect()
}

fn params(raw: &str) -> Vec<Param> {
    raw.split(',')
        .filter_map(declarator)
        .map(|(ctype, name)| Param::new(ctype.to_string(), name.to_string()))
        .collect()
}

fn mismatch(line: usize, kind: BlockKind, text: &str, detail: String) -> Error {
    Error::PatternMismatch {
        line,
        kind,
        text: text.trim().to_string(),
        detail,
    }
}

fn nom_detail(input: &str, err: nom::Err<VerboseError<&str>>) -> String {
    match err {
        nom::Err::Error(e) | nom::Err::Failure(e) => convert_error(input, e),
        nom::Err::Incomplete(_) => String::from("incomplete input"),
    }
}

/// `WGPUMapMode_Read` -> `("MapMode", "Read")`.
fn grouped<'a>(line: usize, kind: BlockKind, text: &str, constant: &'a str) -> Result<(&'a str, &'a str)> {
    match split_group(constant) {
        Some((group, member)) if !member.is_empty() => Ok((strip_type_prefix(group), member)),
        _ => Err(mismatch(
            line,
            kind,
            text,
            format!("`{}` has no group separator", constant),
        )),
    }
}

impl Declaration {
    pub fn from_block(source: &SourceBlock) -> Result<Declaration> {
        let line = source.line();
        let kind = source.block().kind();

        match source.block() {
            Block::Enum(text) => {
                let stripped = strip_comments(text);
                let (_, (name, constants)) = enum_decl(&stripped)
                    .map_err(|e| mismatch(line, kind, text, nom_detail(&stripped, e)))?;

                let mut members = vec![];
                for constant in constants {
                    let (_, member) = grouped(line, kind, text, constant)?;
                    members.push(member.to_string());
                }

                Ok(Declaration::Enum {
                    name: strip_type_prefix(name).to_string(),
                    members,
                })
            }
            Block::Bitmask(text) => {
                let (_, constant) =
                    bitmask_decl(text).map_err(|e| mismatch(line, kind, text, nom_detail(text, e)))?;
                let (group, flag) = grouped(line, kind, text, constant)?;

                Ok(Declaration::Bitmask {
                    group: group.to_string(),
                    flag: flag.to_string(),
                })
            }
            Block::Struct(text) => {
                let flat = strip_comments(text).replace('\n', "");
                let (_, (name, body)) =
                    struct_decl(&flat).map_err(|e| mismatch(line, kind, text, nom_detail(&flat, e)))?;

                Ok(Declaration::Struct {
                    name: strip_type_prefix(name).to_string(),
                    fields: fields(body),
                })
            }
            Block::Function(text) => {
                let (_, (return_type, name, raw_params)) =
                    function_decl(text).map_err(|e| mismatch(line, kind, text, nom_detail(text, e)))?;

                Ok(Declaration::Function {
                    name: strip_function_prefix(name).to_string(),
                    params: params(raw_params),
                    return_type: return_type.replace(EXPORT_MARKER, "").trim().to_string(),
                })
            }
            Block::StructInit(text) => {
                let normalized = init::normalize(text);
                let (_, decl) = init::struct_init_decl(&normalized)
                    .map_err(|e| mismatch(line, kind, text, nom_detail(&normalized, e)))?;

                Ok(Declaration::StructInit {
                    name: strip_type_prefix(decl.name).to_string(),
                    defaults: decl.defaults,
                })
            }
        }
    }
}
