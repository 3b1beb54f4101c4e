use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::wordmap::WordMapError;

/// Failures while loading, saving or mutating a semantic graph.
#[derive(Debug, Error)]
pub enum GraphError {
    /// A text or image file could not be read.
    #[error("cannot read `{path}`: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// The image could not be written.
    #[error("cannot write graph image: {0}")]
    Write(#[source] io::Error),
    /// An arc line has neither one nor four fields, or a node is not a number.
    #[error("arc line {line}: malformed `{text}`")]
    MalformedArcLine { line: usize, text: String },
    /// An input label is missing from the vocabulary.
    #[error("arc line {line}: input word `{word}` is not in the vocabulary")]
    UnknownInputWord { line: usize, word: String },
    /// A `_N` output label names a script past the end of the table.
    #[error("arc line {line}: script `_{index}` out of range ({count} scripts)")]
    ScriptOutOfRange {
        line: usize,
        index: usize,
        count: usize,
    },
    /// A label does not fit below its range offset.
    #[error("label `{label}` does not fit the {range} label range")]
    LabelOverflow { label: String, range: &'static str },
    /// The image does not start with the expected magic.
    #[error("image: bad magic {found:?}")]
    BadMagic { found: [u8; 4] },
    /// The image holds a section other than the semantic graph.
    #[error("image: unsupported section kind {kind}")]
    UnsupportedSection { kind: u32 },
    /// The image ends inside a field.
    #[error("image: unexpected end of data reading {context}")]
    UnexpectedEof { context: String },
    /// A stored word is not valid UTF-8.
    #[error("image: invalid UTF-8 in {context}")]
    InvalidUtf8 { context: String },
    /// Bytes remain after the last section.
    #[error("image: {count} trailing bytes")]
    TrailingBytes { count: usize },
    /// A stored arc link points outside the arena.
    #[error("image: {context} index {index} out of range (arc count {count})")]
    IndexOutOfRange {
        context: String,
        index: u32,
        count: usize,
    },
    /// The arena is too large to encode.
    #[error("graph of {arcs} arcs exceeds the image limit {limit}")]
    Overflow { arcs: usize, limit: usize },
    /// A slot or slot word is not in the vocabulary.
    #[error("{kind} `{name}` not found in vocabulary")]
    NotFound { kind: &'static str, name: String },
    /// The slot index has no head in the slot table.
    #[error("slot {slot} exceeds the slot table")]
    SlotOutOfRange { slot: u16 },
    /// The arena is full and cannot grow past `max_arcs`.
    #[error("arc arena exhausted: {required} arcs required, limit {limit}")]
    OutOfMemory { required: usize, limit: usize },
    /// The freelist head points outside the arena.
    #[error("freelist entry {arc} is outside the arena")]
    CorruptFreelist { arc: u32 },
    /// Two scripts of one slot word cannot be joined.
    #[error("cannot merge `{added}` into `{existing}`: {reason}")]
    ScriptUnion {
        existing: String,
        added: String,
        reason: &'static str,
    },
    /// A label table refused a word.
    #[error(transparent)]
    WordMap(#[from] WordMapError),
}

impl GraphError {
    /// Stable identifier for programmatic matching.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Io { .. } | Self::Write(_) => "graph.io",
            Self::MalformedArcLine { .. } => "graph.malformed_arc_line",
            Self::UnknownInputWord { .. } => "graph.unknown_input_word",
            Self::ScriptOutOfRange { .. } => "graph.script_out_of_range",
            Self::LabelOverflow { .. } => "graph.label_overflow",
            Self::BadMagic { .. } => "graph.bad_magic",
            Self::UnsupportedSection { .. } => "graph.unsupported_section",
            Self::UnexpectedEof { .. } => "graph.unexpected_eof",
            Self::InvalidUtf8 { .. } => "graph.invalid_utf8",
            Self::TrailingBytes { .. } => "graph.trailing_bytes",
            Self::IndexOutOfRange { .. } => "graph.index_out_of_range",
            Self::Overflow { .. } => "graph.overflow",
            Self::NotFound { .. } => "graph.not_found",
            Self::SlotOutOfRange { .. } => "graph.slot_out_of_range",
            Self::OutOfMemory { .. } => "graph.out_of_memory",
            Self::CorruptFreelist { .. } => "graph.corrupt_freelist",
            Self::ScriptUnion { .. } => "graph.script_union",
            Self::WordMap(err) => err.code(),
        }
    }
}
