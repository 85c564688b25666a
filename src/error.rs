use std::fmt;

use thiserror::Error;

use crate::tree::Kind;

/// A 0-based position in the source text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    /// 0-based line number
    pub line: usize,
    /// 0-based column (character offset within the line)
    pub column: usize,
    /// 0-based absolute byte offset from the start of input
    pub offset: usize,
}

/// A parse error with span information (begin..end).
#[derive(Debug, Clone, PartialEq)]
pub struct BLError {
    pub code: String,
    pub message: String,
    /// Start of the offending region
    pub begin: Position,
    /// End of the offending region (exclusive)
    pub end: Position,
}

impl BLError {
    pub fn syntax_error(message: String, begin: Position, end: Position) -> Self {
        Self::with_code("bl-parse-syntax-error", message, begin, end)
    }

    pub fn with_code(code: &str, message: String, begin: Position, end: Position) -> Self {
        BLError {
            code: code.to_string(),
            message,
            begin,
            end,
        }
    }
}

impl fmt::Display for BLError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.begin == self.end {
            write!(
                f,
                "{}:{}: {} ({})",
                self.begin.line, self.begin.column, self.message, self.code
            )
        } else {
            write!(
                f,
                "{}:{}-{}:{}: {} ({})",
                self.begin.line,
                self.begin.column,
                self.end.line,
                self.end.column,
                self.message,
                self.code
            )
        }
    }
}

impl std::error::Error for BLError {}

/// A broken precondition on one of the tree or program operations.
///
/// These are programmer errors. Every operation that can raise one checks
/// before touching the tree, so the value it was called on is unchanged.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RefactorError {
    #[error("instruction '{name}' is not defined in the program")]
    UnknownInstruction { name: String },

    #[error("instruction '{name}' is already defined in the program")]
    NameCollision { name: String },

    #[error("'{name}' is a primitive instruction and cannot be user-defined")]
    PrimitiveName { name: String },

    #[error("'{name}' is not a valid instruction identifier")]
    InvalidIdentifier { name: String },

    #[error("instruction '{name}' is defined more than once")]
    DuplicateInstruction { name: String },

    #[error("cannot decompose CALL '{name}': calls are leaves")]
    DecomposeCall { name: String },

    #[error("cannot reassemble a CALL from parts")]
    ReassembleCall,

    #[error("{kind} expects {expected} child statement(s), got {found}")]
    ArityMismatch {
        kind: Kind,
        expected: usize,
        found: usize,
    },

    #[error("{kind} parts have the wrong condition slot (condition required: {expects_condition})")]
    ConditionMismatch { kind: Kind, expects_condition: bool },
}

impl RefactorError {
    pub fn unknown_instruction(name: &str) -> Self {
        Self::UnknownInstruction {
            name: name.to_string(),
        }
    }

    pub fn name_collision(name: &str) -> Self {
        Self::NameCollision {
            name: name.to_string(),
        }
    }

    pub fn primitive_name(name: &str) -> Self {
        Self::PrimitiveName {
            name: name.to_string(),
        }
    }

    pub fn invalid_identifier(name: &str) -> Self {
        Self::InvalidIdentifier {
            name: name.to_string(),
        }
    }
}
