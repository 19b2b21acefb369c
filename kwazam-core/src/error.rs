//! Error types for persistence.
//!
//! Rule violations are not errors: illegal moves are rejected with `false`
//! or `None`. Only reading and writing saved games can fail.

use crate::Pos;

/// Errors that can occur while saving or loading a game.
#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("save data truncated: {lines} lines")]
    Truncated { lines: usize },

    #[error("line {line}: expected {expected}, found {found:?}")]
    Malformed {
        line: usize,
        expected: &'static str,
        found: String,
    },

    #[error("line {line}: unknown piece kind {token:?}")]
    UnknownKind { line: usize, token: String },

    #[error("line {line}: unknown piece color {r},{g},{b}")]
    UnknownColor { line: usize, r: u8, g: u8, b: u8 },

    #[error("line {line}: square {pos} is off the board")]
    OffBoard { line: usize, pos: Pos },

    #[error("line {line}: square {pos} is occupied twice")]
    DuplicateCell { line: usize, pos: Pos },

    #[error("invalid turn index {0}")]
    InvalidTurn(usize),

    #[error("play counts {counts:?} exceed the swap interval of {limit}")]
    InvalidPlayCount { counts: [u32; 2], limit: u32 },

    #[error("last moved piece at {pos} does not match the board")]
    LastMovedMismatch { pos: Pos },
}

/// Result type alias for persistence operations.
pub type SaveResult<T> = Result<T, SaveError>;
