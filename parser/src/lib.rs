#[macro_use] extern crate derive_more;
extern crate getset;

pub mod ast;
pub mod conventions;
mod builder;
mod classify;
mod decl;
mod error;
mod init;
mod lex;
mod scanner;

pub use error::{Error, Result};
pub use scanner::BlockKind;

trait ParseFrom<R> : Sized {
    fn parse(reader: R) -> Result<Self>;
}

impl ParseFrom<&scanner::SourceBlock> for decl::Declaration {
    fn parse(reader: &scanner::SourceBlock) -> Result<decl::Declaration> {
        decl::Declaration::from_block(reader)
    }
}

impl ParseFrom<&str> for ast::Ir {
    fn parse(reader: &str) -> Result<ast::Ir> {
        let mut builder = builder::IrBuilder::new();
        for block in scanner::Scanner::scan(reader)? {
            let declaration = decl::Declaration::parse(&block)?;
            builder.apply(block.line(), declaration)?;
        }
        return Ok(builder.seal());
    }
}

/// Parses header text into the sealed IR.
pub fn parse(text: &str) -> Result<ast::Ir> {
    return ast::Ir::parse(text);
}

pub fn read_header(reader: &mut dyn std::io::Read) -> Result<ast::Ir> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    return parse(&text);
}
