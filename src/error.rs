//! Crate-level error.

use thiserror::Error;

use crate::graph::GraphError;
use crate::matcher::MatchError;
use crate::script::ScriptError;
use crate::wordmap::WordMapError;

#[derive(Debug, Error)]
pub enum SemanticError {
    #[error(transparent)]
    WordMap(#[from] WordMapError),
    #[error(transparent)]
    Graph(#[from] GraphError),
    #[error(transparent)]
    Match(#[from] MatchError),
    #[error(transparent)]
    Script(#[from] ScriptError),
    #[error("result has no key `{key}`")]
    KeyNotFound { key: String },
    #[error("value of `{key}` needs {required} bytes, buffer holds {available}")]
    BufferOverflow {
        key: String,
        required: usize,
        available: usize,
    },
}

impl SemanticError {
    /// Stable identifier of the failure class.
    pub fn code(&self) -> &'static str {
        match self {
            Self::WordMap(err) => err.code(),
            Self::Graph(err) => err.code(),
            Self::Match(err) => err.code(),
            Self::Script(err) => err.code(),
            Self::KeyNotFound { .. } => "result.key_not_found",
            Self::BufferOverflow { .. } => "result.buffer_overflow",
        }
    }

    /// Size that would have satisfied the request, for overflow errors.
    pub fn required_len(&self) -> Option<usize> {
        match self {
            Self::BufferOverflow { required, .. }
            | Self::Script(ScriptError::BufferOverflow { required, .. })
            | Self::Match(MatchError::ProgramOverflow { required, .. })
            | Self::Graph(GraphError::OutOfMemory { required, .. }) => Some(*required),
            _ => None,
        }
    }
}
