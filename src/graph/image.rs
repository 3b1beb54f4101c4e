//! V2 binary image codec.
//!
//! Layout, little-endian throughout:
//!
//! ```text
//! header   magic "SGV2" | u32 section kind | u32 section offset
//! section  u16 arc count | u32 free head | u32 insertion start | u32 reserved
//!          arc count x { u16 ilabel | u16 olabel | u32 first next | u32 next }
//!          MAX_NUM_SLOTS x u32 slot head
//!          scope word map | script word map
//! wordmap  u32 words | u32 slots | u32 base words | u32 ceiling
//!          words x { u32 len | utf-8 bytes }
//! ```

use std::io::Write;

use crate::graph::arc::{ArcId, ArcToken};
use crate::graph::arena::ArcArena;
use crate::graph::error::GraphError;
use crate::graph::SemanticGraph;
use crate::options::{GraphOptions, MAX_NUM_SLOTS};
use crate::wordmap::{Vocabulary, WordId, WordMap};

pub const IMAGE_MAGIC: [u8; 4] = *b"SGV2";
pub const SECTION_SEMANTIC_GRAPH: u32 = 1;

const HEADER_LEN: u32 = 12;
const RESERVED_INDEX: u32 = 0;
// The on-disk arc count is 16 bits and u16::MAX stays unused.
const MAX_IMAGE_ARCS: usize = u16::MAX as usize - 1;

/// Supported image revisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ImageVersion {
    #[default]
    V2,
}

impl SemanticGraph {
    /// Serializes the graph into a new buffer.
    pub fn to_image(&self, version: ImageVersion) -> Result<Vec<u8>, GraphError> {
        match version {
            ImageVersion::V2 => encode(self),
        }
    }

    /// Serializes the graph into `writer`.
    pub fn save<W: Write>(&self, writer: &mut W, version: ImageVersion) -> Result<(), GraphError> {
        let bytes = self.to_image(version)?;
        writer.write_all(&bytes).map_err(GraphError::Write)?;
        writer.flush().map_err(GraphError::Write)
    }
}

fn encode(graph: &SemanticGraph) -> Result<Vec<u8>, GraphError> {
    let arcs = graph.arena.arcs();
    if arcs.len() > MAX_IMAGE_ARCS {
        return Err(GraphError::Overflow {
            arcs: arcs.len(),
            limit: MAX_IMAGE_ARCS,
        });
    }

    let mut out = Vec::with_capacity(HEADER_LEN as usize + 16 + arcs.len() * 12);
    out.extend_from_slice(&IMAGE_MAGIC);
    write_u32(&mut out, SECTION_SEMANTIC_GRAPH);
    write_u32(&mut out, HEADER_LEN);

    write_u16(&mut out, arcs.len() as u16);
    write_u32(&mut out, graph.arena.free_head().value());
    write_u32(&mut out, graph.insertion_start.value());
    write_u32(&mut out, RESERVED_INDEX);
    for arc in arcs {
        write_u16(&mut out, arc.ilabel);
        write_u16(&mut out, arc.olabel);
        write_u32(&mut out, arc.first_next_arc.value());
        write_u32(&mut out, arc.next_token.value());
    }
    for head in &graph.slot_heads {
        write_u32(&mut out, head.value());
    }
    write_wordmap(&mut out, &graph.scope_labels)?;
    write_wordmap(&mut out, &graph.scripts)?;
    Ok(out)
}

pub(crate) fn decode(bytes: &[u8], options: GraphOptions) -> Result<SemanticGraph, GraphError> {
    let mut header = Decoder::new(bytes, "header");
    let magic = header.read_exact(4, "magic")?;
    if magic != IMAGE_MAGIC {
        return Err(GraphError::BadMagic {
            found: [magic[0], magic[1], magic[2], magic[3]],
        });
    }
    let kind = header.read_u32()?;
    if kind != SECTION_SEMANTIC_GRAPH {
        return Err(GraphError::UnsupportedSection { kind });
    }
    let offset = header.read_u32()? as usize;
    if offset < HEADER_LEN as usize || offset > bytes.len() {
        return Err(GraphError::UnexpectedEof {
            context: format!("section at offset {offset}"),
        });
    }

    let mut section = Decoder::new(&bytes[offset..], "semantic graph");
    let count = usize::from(section.read_u16()?);
    let free_head = section.read_index("free head", count)?;
    let insertion_start = ArcId::new(section.read_u32()?);
    if insertion_start.value() as usize > count {
        return Err(GraphError::IndexOutOfRange {
            context: "insertion start".to_string(),
            index: insertion_start.value(),
            count,
        });
    }
    let _reserved = section.read_u32()?;

    let mut arcs = Vec::with_capacity(count);
    for _ in 0..count {
        let ilabel = section.read_u16()?;
        let olabel = section.read_u16()?;
        let first_next_arc = section.read_index("first next arc", count)?;
        let next_token = section.read_index("next token", count)?;
        arcs.push(ArcToken {
            ilabel,
            olabel,
            first_next_arc,
            next_token,
        });
    }
    let mut slot_heads = [ArcId::NONE; MAX_NUM_SLOTS];
    for head in &mut slot_heads {
        *head = section.read_index("slot head", count)?;
    }
    let scope_labels = section.read_wordmap()?;
    let scripts = section.read_wordmap()?;
    section.finish()?;

    Ok(SemanticGraph {
        arena: ArcArena::from_parts(arcs, free_head),
        insertion_start,
        slot_heads,
        scope_labels,
        scripts,
        options,
    })
}

fn write_u32(out: &mut Vec<u8>, value: u32) {
    out.extend_from_slice(&value.to_le_bytes());
}

fn write_u16(out: &mut Vec<u8>, value: u16) {
    out.extend_from_slice(&value.to_le_bytes());
}

fn write_len(out: &mut Vec<u8>, len: usize, what: &'static str) -> Result<(), GraphError> {
    let len = u32::try_from(len).map_err(|_| GraphError::LabelOverflow {
        label: format!("{what} of length {len}"),
        range: "u32 length",
    })?;
    write_u32(out, len);
    Ok(())
}

fn write_wordmap(out: &mut Vec<u8>, map: &WordMap) -> Result<(), GraphError> {
    write_len(out, map.len(), "word map")?;
    write_u32(out, u32::from(map.num_slots()));
    write_len(out, map.num_base_words(), "word map base")?;
    write_u32(out, u32::from(map.is_frozen()));
    for word in map.iter() {
        write_len(out, word.len(), "word")?;
        out.extend_from_slice(word.as_bytes());
    }
    Ok(())
}

struct Decoder<'a> {
    bytes: &'a [u8],
    pos: usize,
    section: &'static str,
}

impl<'a> Decoder<'a> {
    fn new(bytes: &'a [u8], section: &'static str) -> Self {
        Self {
            bytes,
            pos: 0,
            section,
        }
    }

    fn read_u16(&mut self) -> Result<u16, GraphError> {
        let slice = self.read_exact(2, "u16")?;
        Ok(u16::from_le_bytes([slice[0], slice[1]]))
    }

    fn read_u32(&mut self) -> Result<u32, GraphError> {
        let slice = self.read_exact(4, "u32")?;
        Ok(u32::from_le_bytes([slice[0], slice[1], slice[2], slice[3]]))
    }

    fn read_index(&mut self, context: &str, count: usize) -> Result<ArcId, GraphError> {
        let raw = self.read_u32()?;
        let id = ArcId::new(raw);
        if !id.is_none() && raw as usize >= count {
            return Err(GraphError::IndexOutOfRange {
                context: context.to_string(),
                index: raw,
                count,
            });
        }
        Ok(id)
    }

    fn read_string(&mut self) -> Result<String, GraphError> {
        let len = self.read_u32()? as usize;
        let bytes = self.read_exact(len, "string bytes")?;
        String::from_utf8(bytes.to_vec()).map_err(|_| GraphError::InvalidUtf8 {
            context: format!("{} at byte {}", self.section, self.pos - len),
        })
    }

    fn read_wordmap(&mut self) -> Result<WordMap, GraphError> {
        let num_words = self.read_u32()? as usize;
        let num_slots = self.read_u32()?;
        let num_base_words = self.read_u32()? as usize;
        let frozen = self.read_u32()? != 0;
        // Each word needs at least its length prefix.
        if num_words > self.remaining_len() / 4 {
            return Err(GraphError::UnexpectedEof {
                context: format!("{} word map of {num_words} words", self.section),
            });
        }
        let mut words = Vec::with_capacity(num_words);
        for _ in 0..num_words {
            words.push(self.read_string()?);
        }
        let num_slots = WordId::try_from(num_slots).map_err(|_| GraphError::IndexOutOfRange {
            context: "word map slot count".to_string(),
            index: num_slots,
            count: num_words,
        })?;
        Ok(WordMap::from_parts(
            words,
            num_slots,
            num_base_words,
            frozen,
        )?)
    }

    fn remaining_len(&self) -> usize {
        self.bytes.len().saturating_sub(self.pos)
    }

    fn read_exact(&mut self, len: usize, detail: &str) -> Result<&'a [u8], GraphError> {
        let end = self
            .pos
            .checked_add(len)
            .filter(|end| *end <= self.bytes.len())
            .ok_or_else(|| GraphError::UnexpectedEof {
                context: format!("{} {detail} at byte {}", self.section, self.pos),
            })?;
        let out = &self.bytes[self.pos..end];
        self.pos = end;
        Ok(out)
    }

    fn finish(&self) -> Result<(), GraphError> {
        match self.remaining_len() {
            0 => Ok(()),
            count => Err(GraphError::TrailingBytes { count }),
        }
    }
}
