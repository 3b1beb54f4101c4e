//! Depth-first path search over an explicit frame stack.

use crate::graph::{ArcId, ArcToken, SemanticGraph};
use crate::matcher::error::MatchError;
use crate::matcher::pool::{PathId, PathPool};
use crate::options::ProcessorOptions;
use crate::wordmap::{EPSILON_LABEL, MAX_WORD_ID, Vocabulary, WordId};

/// Arcs taken by a successful search, in path order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MatchedPath {
    pub arcs: Vec<ArcId>,
}

impl MatchedPath {
    /// Arcs in traversal order, with slot-word arcs in place of slot arcs.
    pub fn arcs(&self) -> &[ArcId] {
        &self.arcs
    }

    /// Number of arcs on the path.
    pub fn len(&self) -> usize {
        self.arcs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arcs.is_empty()
    }
}

/// Result of a path search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchOutcome {
    /// The input reached a final node.
    Matched(MatchedPath),
    /// No path consumes the whole input.
    NoMatch,
}

impl MatchOutcome {
    pub fn is_match(&self) -> bool {
        matches!(self, Self::Matched(_))
    }

    /// Returns the path of a match.
    pub fn into_path(self) -> Option<MatchedPath> {
        match self {
            Self::Matched(path) => Some(path),
            Self::NoMatch => None,
        }
    }
}

// One recognized word. Text input keeps the spelling so slot membership
// can be looked up per slot.
#[derive(Debug, Clone, Copy)]
enum InputWord<'t> {
    Text { id: WordId, text: &'t str },
    Id(WordId),
}

impl InputWord<'_> {
    fn id(self) -> WordId {
        match self {
            Self::Text { id, .. } | Self::Id(id) => id,
        }
    }

    fn in_slot<V>(self, vocab: &V, slot: WordId) -> Option<WordId>
    where
        V: Vocabulary + ?Sized,
    {
        let id = self.id();
        if id != MAX_WORD_ID && vocab.whether_in_rule(id, slot) {
            return Some(id);
        }
        match self {
            Self::Text { text, .. } => vocab.find_index_in_rule(text, slot),
            Self::Id(_) => None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Frame {
    node: PathId,
    candidate: ArcId,
    pos: usize,
}

/// Backtracking matcher owning its partial-path pool.
#[derive(Debug, Clone)]
pub struct PathMatcher {
    pool: PathPool,
}

impl PathMatcher {
    pub fn new(options: &ProcessorOptions) -> Self {
        Self {
            pool: PathPool::new(options.max_partial_paths),
        }
    }

    pub fn pool(&self) -> &PathPool {
        &self.pool
    }

    /// Matches a space-separated transcription.
    ///
    /// Words unknown to the vocabulary never match a literal arc but may
    /// still be found in a slot.
    pub fn match_transcription<V>(
        &mut self,
        graph: &SemanticGraph,
        vocab: &V,
        transcription: &str,
    ) -> Result<MatchOutcome, MatchError>
    where
        V: Vocabulary + ?Sized,
    {
        let input: Vec<InputWord<'_>> = transcription
            .split_whitespace()
            .map(|text| InputWord::Text {
                id: vocab.find_index(text).unwrap_or(MAX_WORD_ID),
                text,
            })
            .collect();
        self.search(graph, vocab, &input)
    }

    /// Matches word IDs up to the first [`MAX_WORD_ID`].
    pub fn match_word_ids<V>(
        &mut self,
        graph: &SemanticGraph,
        vocab: &V,
        word_ids: &[WordId],
    ) -> Result<MatchOutcome, MatchError>
    where
        V: Vocabulary + ?Sized,
    {
        let input: Vec<InputWord<'_>> = word_ids
            .iter()
            .take_while(|id| **id != MAX_WORD_ID)
            .map(|id| InputWord::Id(*id))
            .collect();
        self.search(graph, vocab, &input)
    }

    fn search<V>(
        &mut self,
        graph: &SemanticGraph,
        vocab: &V,
        input: &[InputWord<'_>],
    ) -> Result<MatchOutcome, MatchError>
    where
        V: Vocabulary + ?Sized,
    {
        let Some(start) = graph.start_arc() else {
            return Ok(MatchOutcome::NoMatch);
        };
        let root = self.alloc_node()?;
        let found = self.walk(graph, vocab, input, root, start);
        let outcome = match found {
            Ok(true) => MatchOutcome::Matched(MatchedPath {
                arcs: self.pool.arcs_from(root),
            }),
            Ok(false) => MatchOutcome::NoMatch,
            Err(err) => {
                self.pool.free_chain(root);
                return Err(err);
            }
        };
        self.pool.free_chain(root);
        Ok(outcome)
    }

    fn walk<V>(
        &mut self,
        graph: &SemanticGraph,
        vocab: &V,
        input: &[InputWord<'_>],
        root: PathId,
        start: ArcId,
    ) -> Result<bool, MatchError>
    where
        V: Vocabulary + ?Sized,
    {
        let mut frames = vec![Frame {
            node: root,
            candidate: start,
            pos: 0,
        }];
        while let Some(frame) = frames.last_mut() {
            let arc_id = frame.candidate;
            let Some(arc) = graph.arc(arc_id).copied() else {
                // Every candidate at this node failed: drop the branch that
                // led here and resume with the parent's next sibling.
                frames.pop();
                if let Some(parent) = frames.last() {
                    self.pool.unlink(parent.node);
                }
                continue;
            };
            frame.candidate = arc.next_token;
            let (node, pos) = (frame.node, frame.pos);

            let Some((used, next_pos)) = step(graph, vocab, &arc, arc_id, input, pos)? else {
                continue;
            };
            let branch = self.alloc_node()?;
            self.pool.link(node, used, branch);

            if next_pos == input.len() && ends_path(graph, &arc) {
                return Ok(true);
            }
            frames.push(Frame {
                node: branch,
                candidate: arc.first_next_arc,
                pos: next_pos,
            });
        }
        Ok(false)
    }

    fn alloc_node(&mut self) -> Result<PathId, MatchError> {
        self.pool.alloc().ok_or_else(|| {
            let capacity = self.pool.capacity();
            tracing::error!(capacity, "partial-path pool exhausted");
            MatchError::PoolExhausted { capacity }
        })
    }
}

// Decides whether `arc` accepts the word at `pos`. Returns the arc to record
// and the input position after it.
fn step<V>(
    graph: &SemanticGraph,
    vocab: &V,
    arc: &ArcToken,
    arc_id: ArcId,
    input: &[InputWord<'_>],
    pos: usize,
) -> Result<Option<(ArcId, usize)>, MatchError>
where
    V: Vocabulary + ?Sized,
{
    let current = input.get(pos).copied();
    let is_slot = arc.ilabel != EPSILON_LABEL && arc.ilabel < vocab.num_slots();
    if is_slot {
        if let Some(word) = current.and_then(|word| word.in_slot(vocab, arc.ilabel)) {
            let Some(used) = graph.find_in_slot(arc.ilabel, word) else {
                tracing::error!(slot = arc.ilabel, word, "slot word has no arc");
                return Err(MatchError::SlotWordMissing {
                    slot: arc.ilabel,
                    word,
                });
            };
            return Ok(Some((used, pos + 1)));
        }
    }
    if let Some(word) = current {
        if word.id() != MAX_WORD_ID && arc.ilabel == word.id() {
            return Ok(Some((arc_id, pos + 1)));
        }
    }
    if arc.ilabel == EPSILON_LABEL {
        return Ok(Some((arc_id, pos)));
    }
    Ok(None)
}

fn ends_path(graph: &SemanticGraph, arc: &ArcToken) -> bool {
    arc.first_next_arc.is_none()
        || graph
            .arc(arc.first_next_arc)
            .is_some_and(ArcToken::is_final)
}
