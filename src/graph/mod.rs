//! Word-lattice semantic graph.
//!
//! Arcs live in one arena and refer to each other by [`ArcId`]. Output labels
//! address three spaces (vocabulary words, scope markers, scripts) split by
//! the two offsets in [`GraphOptions`]. Slot words added at runtime are
//! linked into per-slot lists and discarded again by [`SemanticGraph::reset`].

mod arc;
mod arena;
mod error;
mod image;
mod slots;
mod text;

use std::fs;
use std::path::{Path, PathBuf};

pub use arc::{ArcId, ArcToken, LabelKind};
pub use error::GraphError;
pub use image::{IMAGE_MAGIC, ImageVersion, SECTION_SEMANTIC_GRAPH};
pub use slots::{SlotInsertion, union_of_scripts};

use crate::options::{GraphOptions, MAX_NUM_SLOTS};
use crate::wordmap::{EPSILON_LABEL, MAX_WORD_ID, Vocabulary, WordId, WordMap};
use arena::ArcArena;

/// Input accepted by [`SemanticGraph::load`].
#[derive(Debug, Clone, Copy)]
pub enum GraphSource<'a> {
    /// A V2 binary image.
    Image(&'a [u8]),
    /// In-memory script table and arc table.
    Text { scripts: &'a str, arcs: &'a str },
    /// `<basename>.script` and `<basename>.P.txt` on disk.
    TextFiles(&'a Path),
}

/// Arc arena plus slot index and label tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SemanticGraph {
    arena: ArcArena,
    insertion_start: ArcId,
    slot_heads: [ArcId; MAX_NUM_SLOTS],
    scope_labels: WordMap,
    scripts: WordMap,
    options: GraphOptions,
}

impl SemanticGraph {
    /// Loads a graph from `source`.
    ///
    /// The vocabulary resolves words of the text format; images carry
    /// resolved labels and ignore it.
    pub fn load<V>(
        vocab: &V,
        source: GraphSource<'_>,
        options: GraphOptions,
    ) -> Result<Self, GraphError>
    where
        V: Vocabulary + ?Sized,
    {
        let graph = match source {
            GraphSource::Image(bytes) => image::decode(bytes, options)?,
            GraphSource::Text { scripts, arcs } => text::build(vocab, scripts, arcs, options)?,
            GraphSource::TextFiles(basename) => {
                let scripts = read_sibling(basename, "script")?;
                let arcs = read_sibling(basename, "P.txt")?;
                text::build(vocab, &scripts, &arcs, options)?
            }
        };
        tracing::debug!(
            arcs = graph.arc_count(),
            static_arcs = graph.insertion_start.value(),
            scripts = graph.scripts.len(),
            scopes = graph.scope_labels.len(),
            "loaded semantic graph"
        );
        Ok(graph)
    }

    /// Number of arena entries, free ones included.
    pub fn arc_count(&self) -> usize {
        self.arena.len()
    }

    pub fn arc(&self, id: ArcId) -> Option<&ArcToken> {
        self.arena.get(id)
    }

    /// Every arena entry in index order.
    pub fn arcs(&self) -> &[ArcToken] {
        self.arena.arcs()
    }

    /// First arc leaving the start node, if the graph has any arcs.
    pub fn start_arc(&self) -> Option<ArcId> {
        (self.insertion_start.value() > 0).then_some(ArcId::new(0))
    }

    /// Index of the first arena entry not loaded from the grammar.
    pub fn insertion_start(&self) -> ArcId {
        self.insertion_start
    }

    pub fn free_head(&self) -> ArcId {
        self.arena.free_head()
    }

    pub fn free_count(&self) -> usize {
        self.arena.free_count()
    }

    /// Head of the word list of `slot`, or [`ArcId::NONE`].
    pub fn slot_head(&self, slot: WordId) -> ArcId {
        self.slot_heads
            .get(usize::from(slot))
            .copied()
            .unwrap_or(ArcId::NONE)
    }

    pub fn slot_heads(&self) -> &[ArcId; MAX_NUM_SLOTS] {
        &self.slot_heads
    }

    /// Arcs of the word list of `slot`, head first.
    pub fn slot_arcs(&self, slot: WordId) -> Vec<ArcId> {
        self.siblings(self.slot_head(slot)).collect()
    }

    /// Walks a `next_token` chain starting at `first`.
    pub fn siblings(&self, first: ArcId) -> Siblings<'_> {
        Siblings {
            graph: self,
            cursor: first,
            remaining: self.arena.len(),
        }
    }

    pub fn scope_labels(&self) -> &WordMap {
        &self.scope_labels
    }

    pub fn scripts(&self) -> &WordMap {
        &self.scripts
    }

    pub fn options(&self) -> &GraphOptions {
        &self.options
    }

    /// Classifies an output label.
    pub fn label_kind(&self, olabel: WordId) -> LabelKind {
        if olabel == EPSILON_LABEL {
            return LabelKind::Epsilon;
        }
        if olabel == MAX_WORD_ID {
            return LabelKind::Final;
        }
        let script = self.options.script_olabel_offset;
        let scope = self.options.scope_olabel_offset;
        let (low, high) = (script.min(scope), script.max(scope));
        let kind_at = |offset: WordId, index: WordId| {
            if offset == script {
                LabelKind::Script(index)
            } else {
                LabelKind::Scope(index)
            }
        };
        if olabel < low {
            LabelKind::Word(olabel)
        } else if olabel < high {
            kind_at(low, olabel - low)
        } else {
            kind_at(high, olabel - high)
        }
    }

    /// Resolves an output label to its text.
    pub fn label_text<'a, V>(&'a self, vocab: &'a V, olabel: WordId) -> Option<&'a str>
    where
        V: Vocabulary + ?Sized,
    {
        match self.label_kind(olabel) {
            LabelKind::Word(id) => vocab.word(id),
            LabelKind::Scope(index) => self.scope_labels.word(index),
            LabelKind::Script(index) => self.scripts.word(index),
            LabelKind::Epsilon | LabelKind::Final => None,
        }
    }

    /// Returns the script text carried by `olabel`, if it is a script label.
    pub fn script_text(&self, olabel: WordId) -> Option<&str> {
        match self.label_kind(olabel) {
            LabelKind::Script(index) => self.scripts.word(index),
            _ => None,
        }
    }

    /// Returns the scope label carried by `olabel`, if any.
    pub fn scope_text(&self, olabel: WordId) -> Option<&str> {
        match self.label_kind(olabel) {
            LabelKind::Scope(index) => self.scope_labels.word(index),
            _ => None,
        }
    }

    pub(crate) fn script_label(&self, index: WordId) -> Result<WordId, GraphError> {
        label_in_range(&self.options, self.options.script_olabel_offset, index, "script")
    }

    pub(crate) fn scope_label(&self, index: WordId) -> Result<WordId, GraphError> {
        label_in_range(&self.options, self.options.scope_olabel_offset, index, "scope")
    }
}

/// Iterator over a sibling chain.
#[derive(Debug, Clone)]
pub struct Siblings<'a> {
    graph: &'a SemanticGraph,
    cursor: ArcId,
    remaining: usize,
}

impl Iterator for Siblings<'_> {
    type Item = ArcId;

    fn next(&mut self) -> Option<ArcId> {
        // At most one step per arena entry.
        if self.remaining == 0 {
            return None;
        }
        let id = self.cursor;
        let arc = self.graph.arc(id)?;
        self.cursor = arc.next_token;
        self.remaining -= 1;
        Some(id)
    }
}

// Upper bound of a range is the next offset above it, or MAX_WORD_ID.
fn label_in_range(
    options: &GraphOptions,
    offset: WordId,
    index: WordId,
    range: &'static str,
) -> Result<WordId, GraphError> {
    let other = if offset == options.script_olabel_offset {
        options.scope_olabel_offset
    } else {
        options.script_olabel_offset
    };
    let limit = if other > offset { other } else { MAX_WORD_ID };
    offset
        .checked_add(index)
        .filter(|label| *label < limit)
        .ok_or_else(|| GraphError::LabelOverflow {
            label: format!("{range} #{index}"),
            range,
        })
}

fn read_sibling(basename: &Path, extension: &str) -> Result<String, GraphError> {
    let mut name = basename.as_os_str().to_owned();
    name.push(".");
    name.push(extension);
    let path = PathBuf::from(name);
    fs::read_to_string(&path).map_err(|source| GraphError::Io { path, source })
}
