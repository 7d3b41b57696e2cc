//! Token-level parsers shared by the scanner and the declaration parsers.

use nom::branch::alt;
use nom::bytes::complete::{tag, take_till, take_till1, take_until};
use nom::character::complete::{multispace0, multispace1};
use nom::sequence::{delimited, preceded};
use nom::{IResult, Parser};
use nom_language::error::VerboseError;

pub type Res<'a, O> = IResult<&'a str, O, VerboseError<&'a str>>;

pub fn sp(input: &str) -> Res<'_, &str> {
    multispace0(input)
}

pub fn sp1(input: &str) -> Res<'_, &str> {
    multispace1(input)
}

pub fn identifier(input: &str) -> Res<'_, &str> {
    take_till1(|c: char| !(c.is_ascii_alphanumeric() || c == '_')).parse(input)
}

/// `// ...` up to the end of the line, or a closed `/* ... */`.
fn comment(input: &str) -> Res<'_, &str> {
    alt((
        preceded(tag("//"), take_till(|c| c == '\n')),
        delimited(tag("/*"), take_until("*/"), tag("*/")),
    ))
    .parse(input)
}

/// Removes C comments, keeping line breaks. An unclosed `/*` is left as is.
pub fn strip_comments(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find('/') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        match comment(tail) {
            Ok((after, _)) => rest = after,
            Err(_) => {
                out.push('/');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}
