#[macro_use] extern crate derive_more;
extern crate getset;
extern crate indoc;
extern crate parser;

mod cpp;

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use clap::{ArgGroup, Parser};
use log::{info, warn};

/// Generate an idiomatic C++ wrapper header from webgpu.h.
#[derive(Parser, Debug)]
#[command(group(ArgGroup::new("input").required(true).args(["header", "ir"])))]
struct Cli {
    /// The C header to parse.
    #[arg(long)]
    header: Option<PathBuf>,
    /// A previously dumped JSON IR to render instead of a header.
    #[arg(long)]
    ir: Option<PathBuf>,
    /// Path of the generated C++ header; the IR is written next to it as `<output>.json`.
    #[arg(long)]
    output: PathBuf,
    #[arg(long, default_value = "wgpu")]
    namespace: String,
    /// Header included by the wrapper.
    #[arg(long, default_value = "webgpu.h")]
    include: String,
    #[arg(long, default_value = "WEBGPU_CPP_HPP_")]
    guard: String,
}

fn load_ir(cli: &Cli) -> Result<parser::ast::Ir> {
    if let Some(path) = &cli.ir {
        let json = fs::read_to_string(path)
            .with_context(|| format!("failed to read IR {}", path.display()))?;
        return parser::ast::Ir::from_json(&json)
            .with_context(|| format!("failed to load IR {}", path.display()));
    }

    let path = cli.header.as_ref().context("no input given")?;
    let mut file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let ir = parser::read_header(&mut file)
        .with_context(|| format!("failed to parse {}", path.display()))?;
    return Ok(ir);
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    info!("Writing file: {}", path.display());
    let mut file = File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    write!(file, "{}", contents).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

/// Writes `<output>.json` and `<output>`; a failure leaves neither behind.
fn write_outputs(output: &Path, json: &str, code: &str) -> Result<()> {
    let mut json_path = output.as_os_str().to_owned();
    json_path.push(".json");
    let json_path = PathBuf::from(json_path);

    write_file(&json_path, json)?;
    if let Err(e) = write_file(output, code) {
        if let Err(cleanup) = fs::remove_file(&json_path) {
            warn!("failed to remove {}: {}", json_path.display(), cleanup);
        }
        return Err(e);
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let ir = load_ir(&cli)?;
    let json = ir.to_json().context("failed to serialize IR")?;
    let ctx = cpp::Context::new(cli.namespace.clone(), cli.include.clone(), cli.guard.clone());
    let code = cpp::code_gen(&ctx, &ir);

    write_outputs(&cli.output, &json, &code)
}
