use thiserror::Error;

use crate::scanner::BlockKind;

#[derive(Debug, Error)]
pub enum Error {
    /// A block was opened and never closed, or closed without being opened.
    #[error("line {line}: {message}")]
    StructuralMismatch { line: usize, message: String },

    #[error("line {line}: malformed {kind} declaration `{text}`\n{detail}")]
    PatternMismatch {
        line: usize,
        kind: BlockKind,
        text: String,
        detail: String,
    },

    #[error("line {line}: initializer references unknown struct `{name}`")]
    UnknownCrossReference { line: usize, name: String },

    #[error("unknown IR category `{0}`")]
    UnknownCategory(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
