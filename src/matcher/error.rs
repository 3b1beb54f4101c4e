use thiserror::Error;

use crate::wordmap::WordId;

/// Failures that abort a path search or script accumulation.
///
/// Running out of matching paths is not an error; see
/// [`crate::matcher::MatchOutcome::NoMatch`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatchError {
    #[error("partial-path pool exhausted (capacity {capacity})")]
    PoolExhausted { capacity: usize },
    #[error("word {word} belongs to slot {slot} but the slot has no arc for it")]
    SlotWordMissing { slot: WordId, word: WordId },
    #[error("scope `{label}` closed with no open scope")]
    ScopeUnderflow { label: String },
    #[error("more than {limit} scripts on one path")]
    TooManyScripts { limit: usize },
    #[error("rewritten program needs {required} bytes, limit {limit}")]
    ProgramOverflow { required: usize, limit: usize },
}

impl MatchError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::PoolExhausted { .. } => "match.pool_exhausted",
            Self::SlotWordMissing { .. } => "match.invalid_state",
            Self::ScopeUnderflow { .. } => "match.scope_underflow",
            Self::TooManyScripts { .. } => "match.too_many_scripts",
            Self::ProgramOverflow { .. } => "match.buffer_overflow",
        }
    }
}
