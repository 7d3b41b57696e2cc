//! Line scanner: assembles declaration blocks from header text.
//!
//! Every trimmed line is classified by [`trigger`]; multi-line constructs
//! (enums, structs, initializer macros) are buffered until their terminator,
//! single-line ones (bitmask constants, functions) are emitted right away.

use getset::{CopyGetters, Getters};
use nom::branch::alt;
use nom::bytes::complete::{tag, take_till1, take_until};
use nom::character::complete::char;
use nom::combinator::{eof, value};
use nom::Parser;

use crate::conventions::{EXPORT_MARKER, FUNCTION_PREFIX, INIT_MACRO, INIT_TERMINATOR};
use crate::error::{Error, Result};
use crate::lex::{sp, sp1, Res};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Display)]
pub enum BlockKind {
    #[display(fmt = "enum")]
    Enum,
    #[display(fmt = "bitmask")]
    Bitmask,
    #[display(fmt = "struct")]
    Struct,
    #[display(fmt = "function")]
    Function,
    #[display(fmt = "struct initializer")]
    StructInit,
}

/// Raw text of one complete declaration, tagged by what opened it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Block {
    Enum(String),
    Bitmask(String),
    Struct(String),
    Function(String),
    StructInit(String),
}

impl Block {
    pub fn kind(&self) -> BlockKind {
        match self {
            Block::Enum(_) => BlockKind::Enum,
            Block::Bitmask(_) => BlockKind::Bitmask,
            Block::Struct(_) => BlockKind::Struct,
            Block::Function(_) => BlockKind::Function,
            Block::StructInit(_) => BlockKind::StructInit,
        }
    }

    #[cfg(test)]
    pub fn text(&self) -> &str {
        match self {
            Block::Enum(t)
            | Block::Bitmask(t)
            | Block::Struct(t)
            | Block::Function(t)
            | Block::StructInit(t) => t,
        }
    }

    fn new(kind: BlockKind, text: String) -> Block {
        match kind {
            BlockKind::Enum => Block::Enum(text),
            BlockKind::Bitmask => Block::Bitmask(text),
            BlockKind::Struct => Block::Struct(text),
            BlockKind::Function => Block::Function(text),
            BlockKind::StructInit => Block::StructInit(text),
        }
    }
}

/// A block together with the 1-based line it starts on.
#[derive(Clone, Constructor, Getters, CopyGetters, Debug, PartialEq, Eq)]
pub struct SourceBlock {
    #[get_copy = "pub"]
    line: usize,

    #[get = "pub"]
    block: Block,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Trigger {
    Comment,
    Bitmask,
    EnumOpen,
    StructOpen,
    Function,
    StructInitOpen,
    InitTerminator,
    Terminator,
}

fn word(input: &str) -> Res<'_, &str> {
    take_till1(char::is_whitespace).parse(input)
}

fn type_name(input: &str) -> Res<'_, &str> {
    take_till1(|c: char| c.is_whitespace() || c == '{').parse(input)
}

fn comment_start(input: &str) -> Res<'_, &str> {
    alt((tag("//"), tag("/*"), tag("*"))).parse(input)
}

fn trigger(line: &str) -> Option<Trigger> {
    let recognized: Res<Trigger> = alt((
        value(Trigger::Comment, comment_start),
        value(Trigger::Bitmask, (tag("static"), sp1, tag("const"), sp1)),
        value(Trigger::EnumOpen, (tag("typedef"), sp1, tag("enum"), sp1)),
        value(
            Trigger::StructOpen,
            (tag("typedef"), sp1, tag("struct"), sp1, type_name, sp, char('{')),
        ),
        value(Trigger::Function, (tag(EXPORT_MARKER), sp1)),
        value(Trigger::Function, (word, sp1, tag(FUNCTION_PREFIX))),
        value(Trigger::StructInitOpen, (tag("#define"), sp1, take_until(INIT_MACRO))),
        value(Trigger::InitTerminator, (tag(INIT_TERMINATOR), eof)),
        value(Trigger::Terminator, char('}')),
    ))
    .parse(line);

    recognized.ok().map(|(_, t)| t)
}

/// `}` closing `extern "C" {` is legal outside of any block; `} Name;` and `})` are not.
fn is_orphan_terminator(line: &str) -> bool {
    if line == INIT_TERMINATOR {
        return true;
    }
    line.trim_start_matches('}')
        .trim_start()
        .starts_with(|c: char| c.is_ascii_alphabetic() || c == '_')
}

/// Whether an opening line already carries its own closing brace.
fn closes_on_same_line(kind: BlockKind, line: &str) -> bool {
    match kind {
        BlockKind::StructInit => line.ends_with(INIT_TERMINATOR),
        _ => match line.find('{') {
            Some(open) => line[open..].contains('}'),
            None => false,
        },
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    None,
    InEnum,
    InStruct,
    InStructInit,
}

impl State {
    fn kind(self) -> Option<BlockKind> {
        match self {
            State::None => None,
            State::InEnum => Some(BlockKind::Enum),
            State::InStruct => Some(BlockKind::Struct),
            State::InStructInit => Some(BlockKind::StructInit),
        }
    }
}

pub struct Scanner {
    state: State,
    opened_at: usize,
    buffer: String,
    blocks: Vec<SourceBlock>,
}

impl Scanner {
    fn new() -> Scanner {
        Scanner {
            state: State::None,
            opened_at: 0,
            buffer: String::new(),
            blocks: vec![],
        }
    }

    pub fn scan(text: &str) -> Result<Vec<SourceBlock>> {
        let mut scanner = Scanner::new();
        for (index, line) in text.lines().enumerate() {
            scanner.feed(index + 1, line.trim())?;
        }
        scanner.finish()
    }

    fn emit(&mut self, line: usize, kind: BlockKind, text: String) {
        self.blocks.push(SourceBlock::new(line, Block::new(kind, text)));
    }

    fn open(&mut self, line_no: usize, line: &str, state: State) {
        let kind = match state.kind() {
            Some(kind) => kind,
            None => return,
        };

        if closes_on_same_line(kind, line) {
            self.emit(line_no, kind, format!("{}\n", line));
            return;
        }

        self.state = state;
        self.opened_at = line_no;
        self.buffer = format!("{}\n", line);
    }

    fn close(&mut self, line: &str) {
        self.buffer.push_str(line);
        self.buffer.push('\n');

        let text = std::mem::take(&mut self.buffer);
        if let Some(kind) = self.state.kind() {
            let opened_at = self.opened_at;
            self.emit(opened_at, kind, text);
        }
        self.state = State::None;
    }

    fn unterminated(&self, kind: BlockKind, until: &str) -> Error {
        Error::StructuralMismatch {
            line: self.opened_at,
            message: format!("{} block is not terminated before {}", kind, until),
        }
    }

    fn feed(&mut self, line_no: usize, line: &str) -> Result<()> {
        let trigger = trigger(line);

        if trigger == Some(Trigger::Bitmask) {
            self.emit(line_no, BlockKind::Bitmask, line.to_string());
            return Ok(());
        }

        match self.state.kind() {
            None => self.feed_idle(line_no, line, trigger),
            Some(kind) => self.feed_open(line_no, line, trigger, kind),
        }
    }

    fn feed_idle(&mut self, line_no: usize, line: &str, trigger: Option<Trigger>) -> Result<()> {
        match trigger {
            Some(Trigger::EnumOpen) => self.open(line_no, line, State::InEnum),
            Some(Trigger::StructOpen) => self.open(line_no, line, State::InStruct),
            Some(Trigger::StructInitOpen) => self.open(line_no, line, State::InStructInit),
            Some(Trigger::Function) => self.emit(line_no, BlockKind::Function, line.to_string()),
            Some(Trigger::InitTerminator) | Some(Trigger::Terminator) => {
                if is_orphan_terminator(line) {
                    return Err(Error::StructuralMismatch {
                        line: line_no,
                        message: format!("`{}` closes a block that was never opened", line),
                    });
                }
            }
            Some(Trigger::Comment) | Some(Trigger::Bitmask) | None => {}
        }
        Ok(())
    }

    fn feed_open(
        &mut self,
        line_no: usize,
        line: &str,
        trigger: Option<Trigger>,
        kind: BlockKind,
    ) -> Result<()> {
        match (self.state, trigger) {
            (_, Some(Trigger::EnumOpen))
            | (_, Some(Trigger::StructOpen))
            | (_, Some(Trigger::StructInitOpen)) => {
                return Err(self.unterminated(kind, &format!("line {}", line_no)));
            }
            (State::InStructInit, Some(Trigger::InitTerminator)) => self.close(line),
            // Nested initializers and field markers live in comments.
            (State::InStructInit, _) => {
                self.buffer.push_str(line);
                self.buffer.push('\n');
            }
            (_, Some(Trigger::Terminator)) | (_, Some(Trigger::InitTerminator)) => self.close(line),
            (_, Some(Trigger::Comment)) => {}
            _ => {
                self.buffer.push_str(line);
                self.buffer.push('\n');
            }
        }
        Ok(())
    }

    fn finish(self) -> Result<Vec<SourceBlock>> {
        match self.state.kind() {
            Some(kind) => Err(self.unterminated(kind, "end of input")),
            None => Ok(self.blocks),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(blocks: &[SourceBlock]) -> Vec<(usize, BlockKind)> {
        blocks.iter().map(|b| (b.line(), b.block().kind())).collect()
    }

    #[test]
    fn test_trigger() {
        assert_eq!(trigger("typedef enum WGPUBackendType {"), Some(Trigger::EnumOpen));
        assert_eq!(trigger("typedef struct WGPUColor {"), Some(Trigger::StructOpen));
        assert_eq!(trigger("typedef struct WGPUBufferImpl* WGPUBuffer WGPU_OBJECT_ATTRIBUTE;"), None);
        assert_eq!(trigger("static const WGPUMapMode WGPUMapMode_Read = 0x1;"), Some(Trigger::Bitmask));
        assert_eq!(trigger("WGPU_EXPORT void wgpuBufferDestroy(WGPUBuffer buffer);"), Some(Trigger::Function));
        assert_eq!(trigger("void wgpuBufferDestroy(WGPUBuffer buffer);"), Some(Trigger::Function));
        assert_eq!(
            trigger("#define WGPU_COLOR_INIT _wgpu_MAKE_INIT_STRUCT(WGPUColor, { \\"),
            Some(Trigger::StructInitOpen)
        );
        assert_eq!(trigger("#define WGPU_ARRAY_LAYER_COUNT_UNDEFINED (UINT32_MAX)"), None);
        assert_eq!(trigger("})"), Some(Trigger::InitTerminator));
        assert_eq!(trigger("}) _wgpu_COMMA \\"), Some(Trigger::Terminator));
        assert_eq!(trigger("} WGPUColor;"), Some(Trigger::Terminator));
        assert_eq!(trigger("/**"), Some(Trigger::Comment));
        assert_eq!(trigger("* wgpuInstanceProcessEvents is called"), Some(Trigger::Comment));
        assert_eq!(trigger(""), None);
    }

    #[test]
    fn test_multi_line_blocks() {
        let input = r#"
            typedef enum WGPUBackendType {
                /** Null backend */
                WGPUBackendType_Null = 0x00000001,
                WGPUBackendType_WebGPU = 0x00000002,
            } WGPUBackendType WGPU_ENUM_ATTRIBUTE;

            typedef struct WGPUColor {
                double r;
                double g;
            } WGPUColor;
        "#;

        let blocks = Scanner::scan(input).unwrap();
        assert_eq!(kinds(&blocks), vec![(2, BlockKind::Enum), (8, BlockKind::Struct)]);
        assert_eq!(
            blocks[0].block().text(),
            "typedef enum WGPUBackendType {\nWGPUBackendType_Null = 0x00000001,\nWGPUBackendType_WebGPU = 0x00000002,\n} WGPUBackendType WGPU_ENUM_ATTRIBUTE;\n"
        );
    }

    #[test]
    fn test_single_line_blocks() {
        let input = "typedef enum WGPUBackendType { WGPUBackendType_Null = 0, } WGPUBackendType;\n\
                     typedef struct WGPUColor { double r; double g; } WGPUColor;\n\
                     #define WGPU_COLOR_INIT _wgpu_MAKE_INIT_STRUCT(WGPUColor, { /*.r=*/0 _wgpu_COMMA })";

        let blocks = Scanner::scan(input).unwrap();
        assert_eq!(
            kinds(&blocks),
            vec![(1, BlockKind::Enum), (2, BlockKind::Struct), (3, BlockKind::StructInit)]
        );
    }

    #[test]
    fn test_struct_init_keeps_comment_lines() {
        let input = "#define WGPU_COLOR_INIT _wgpu_MAKE_INIT_STRUCT(WGPUColor, { \\\n\
                     /*.r=*/0. _wgpu_COMMA \\\n\
                     /*.g=*/0. _wgpu_COMMA \\\n\
                     })";

        let blocks = Scanner::scan(input).unwrap();
        assert_eq!(kinds(&blocks), vec![(1, BlockKind::StructInit)]);
        assert!(blocks[0].block().text().contains("/*.g=*/0. _wgpu_COMMA"));
    }

    #[test]
    fn test_bitmask_lines_are_immediate() {
        let input = "static const WGPUMapMode WGPUMapMode_Read = 0x1;\n\
                     static const WGPUMapMode WGPUMapMode_Write = 0x2;";

        let blocks = Scanner::scan(input).unwrap();
        assert_eq!(kinds(&blocks), vec![(1, BlockKind::Bitmask), (2, BlockKind::Bitmask)]);
    }

    #[test]
    fn test_extern_c_brace_is_ignored() {
        let input = "extern \"C\" {\nWGPU_EXPORT void wgpuBufferDestroy(WGPUBuffer buffer);\n}";

        let blocks = Scanner::scan(input).unwrap();
        assert_eq!(kinds(&blocks), vec![(2, BlockKind::Function)]);
    }

    #[test]
    fn test_orphan_terminator_detection() {
        assert!(is_orphan_terminator("} WGPUColor;"));
        assert!(is_orphan_terminator("})"));
        assert!(!is_orphan_terminator("}"));
        assert!(!is_orphan_terminator("} // extern \"C\""));
        assert!(!is_orphan_terminator("};"));
    }

    #[test]
    fn test_unterminated_block() {
        let input = "typedef struct WGPUColor {\ndouble r;";

        match Scanner::scan(input) {
            Err(Error::StructuralMismatch { line, .. }) => assert_eq!(line, 1),
            other => panic!("Expected structural mismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_block_opened_inside_block() {
        let input = "typedef struct WGPUColor {\ndouble r;\ntypedef enum WGPUFoo {\n} WGPUFoo;";

        match Scanner::scan(input) {
            Err(Error::StructuralMismatch { line, .. }) => assert_eq!(line, 1),
            other => panic!("Expected structural mismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_orphan_terminator() {
        for input in ["} WGPUColor;", "})"].iter() {
            match Scanner::scan(input) {
                Err(Error::StructuralMismatch { line, .. }) => assert_eq!(line, 1),
                other => panic!("Expected structural mismatch, got {:?}", other),
            }
        }
    }
}
