extern crate parser;

use anyhow::{Context, Result};
use log::info;

fn main() -> Result<()> {
    env_logger::init();

    let ir = parser::read_header(&mut std::io::stdin()).context("failed to parse header from stdin")?;
    info!(
        "{} enums, {} bitmasks, {} classes, {} functions, {} structs",
        ir.enums().len(),
        ir.bitmasks().len(),
        ir.classes().len(),
        ir.functions().len(),
        ir.structs().len()
    );
    println!("{}", ir.to_json()?);

    return Ok(());
}
