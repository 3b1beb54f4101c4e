use thiserror::Error;

use super::WordId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WordMapError {
    #[error("line {line}: expected `word id`, found `{text}`")]
    MalformedLine { line: usize, text: String },
    #[error("line {line}: expected word id {expected}, found {found}")]
    IdMismatch {
        line: usize,
        expected: usize,
        found: usize,
    },
    #[error("word map is frozen; cannot add `{word}`")]
    Frozen { word: String },
    #[error("word map is full (limit {limit})")]
    Full { limit: WordId },
    #[error("slot {rule} cannot tag words")]
    SlotOutOfRange { rule: WordId },
    #[error("inconsistent word map: {words} words, {base} base words, {slots} slots")]
    InconsistentParts {
        words: usize,
        base: usize,
        slots: usize,
    },
}

impl WordMapError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::MalformedLine { .. } => "wordmap.malformed_line",
            Self::IdMismatch { .. } => "wordmap.id_mismatch",
            Self::Frozen { .. } => "wordmap.frozen",
            Self::Full { .. } => "wordmap.full",
            Self::SlotOutOfRange { .. } => "wordmap.slot_out_of_range",
            Self::InconsistentParts { .. } => "wordmap.inconsistent_parts",
        }
    }
}
