use thiserror::Error;

use crate::script::lexer::Span;
use crate::script::parser::ParserState;

/// Failures of the expression lexer, parser and built-ins.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScriptError {
    /// A quoted literal runs to the end of the program.
    #[error("unterminated literal at {span} near `{near}`")]
    UnterminatedLiteral { span: Span, near: String },
    /// A character that starts no token.
    #[error("unexpected character {ch:?} at {span} near `{near}`")]
    UnexpectedChar { ch: char, span: Span, near: String },
    /// A token the parser cannot accept in its current state.
    #[error("token `{token}` not allowed in state {state:?} near `{context}`")]
    InvalidState {
        token: String,
        state: ParserState,
        context: String,
    },
    /// The program stops in the middle of a statement.
    #[error("program ended in state {state:?}")]
    UnexpectedEnd { state: ParserState },
    /// A value, name or table outgrew its configured limit.
    #[error("{what} needs {required} bytes, limit {limit}")]
    BufferOverflow {
        what: &'static str,
        required: usize,
        limit: usize,
    },
    /// A built-in got the wrong number of operands.
    #[error("`{function}` takes {expected} operands, got {found}")]
    WrongArity {
        function: &'static str,
        expected: usize,
        found: usize,
    },
}

impl ScriptError {
    /// Stable identifier for programmatic matching.
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnterminatedLiteral { .. } => "script.unterminated_literal",
            Self::UnexpectedChar { .. } => "script.unexpected_char",
            Self::InvalidState { .. } => "script.invalid_state",
            Self::UnexpectedEnd { .. } => "script.unexpected_end",
            Self::BufferOverflow { .. } => "script.buffer_overflow",
            Self::WrongArity { .. } => "script.wrong_arity",
        }
    }

    pub(crate) fn overflow(what: &'static str, required: usize, limit: usize) -> Self {
        Self::BufferOverflow {
            what,
            required,
            limit,
        }
    }
}
