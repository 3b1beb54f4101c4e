//! Arc records and output-label classification.

use crate::wordmap::{EPSILON_LABEL, MAX_WORD_ID, WordId};

/// Index of an arc inside the graph arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ArcId(u32);

impl ArcId {
    /// Sentinel for "no arc". Also the on-disk encoding of an absent index.
    pub const NONE: Self = Self(u32::MAX);

    /// Creates an identifier from a raw value.
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Returns the raw identifier value.
    pub const fn value(self) -> u32 {
        self.0
    }

    /// Returns `true` for [`ArcId::NONE`].
    pub const fn is_none(self) -> bool {
        self.0 == u32::MAX
    }

    /// Returns the arena position, or `None` for [`ArcId::NONE`].
    pub fn index(self) -> Option<usize> {
        if self.is_none() {
            None
        } else {
            Some(self.0 as usize)
        }
    }

    pub(crate) fn from_index(index: usize) -> Self {
        match u32::try_from(index) {
            Ok(value) if value != u32::MAX => Self(value),
            _ => Self::NONE,
        }
    }
}

/// One labeled edge of the semantic graph.
///
/// `first_next_arc` heads the list of arcs leaving this arc's destination
/// node; `next_token` continues the list of arcs leaving its source node.
/// Vacant arena entries reuse `next_token` as the freelist link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ArcToken {
    /// Input word, slot ID or [`EPSILON_LABEL`].
    pub ilabel: WordId,
    /// Output label; see [`LabelKind`].
    pub olabel: WordId,
    /// First arc leaving the destination node.
    pub first_next_arc: ArcId,
    /// Next arc leaving the same source node.
    pub next_token: ArcId,
}

impl ArcToken {
    pub(crate) const fn vacant(next_free: ArcId) -> Self {
        Self {
            ilabel: EPSILON_LABEL,
            olabel: EPSILON_LABEL,
            first_next_arc: ArcId::NONE,
            next_token: next_free,
        }
    }

    pub(crate) const fn final_marker() -> Self {
        Self {
            ilabel: MAX_WORD_ID,
            olabel: MAX_WORD_ID,
            first_next_arc: ArcId::NONE,
            next_token: ArcId::NONE,
        }
    }

    /// Returns `true` when the arc marks its source node as accepting.
    pub const fn is_final(&self) -> bool {
        self.ilabel == MAX_WORD_ID && self.olabel == MAX_WORD_ID
    }
}

/// Meaning of an arc output label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LabelKind {
    Epsilon,
    /// Vocabulary word ID.
    Word(WordId),
    /// Index into the scope-label table.
    Scope(WordId),
    /// Index into the script table.
    Script(WordId),
    /// Final-state sentinel.
    Final,
}
