//! Arc arena with a freelist threaded through `next_token`.

use crate::graph::arc::{ArcId, ArcToken};
use crate::graph::error::GraphError;
use crate::options::GraphOptions;

/// Contiguous arc storage.
///
/// Every entry is either reachable from the graph (static arc or slot word)
/// or on the freelist, never both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ArcArena {
    arcs: Vec<ArcToken>,
    free_head: ArcId,
}

impl ArcArena {
    /// Builds an arena holding `arcs` followed by `reserve` free entries.
    pub(crate) fn with_reserve(mut arcs: Vec<ArcToken>, reserve: usize) -> Self {
        let start = arcs.len();
        arcs.resize(start + reserve, ArcToken::vacant(ArcId::NONE));
        let mut arena = Self {
            arcs,
            free_head: ArcId::NONE,
        };
        arena.rebuild_freelist(start);
        arena
    }

    /// Restores an arena from serialized parts without touching links.
    pub(crate) fn from_parts(arcs: Vec<ArcToken>, free_head: ArcId) -> Self {
        Self { arcs, free_head }
    }

    pub(crate) fn len(&self) -> usize {
        self.arcs.len()
    }

    pub(crate) fn free_head(&self) -> ArcId {
        self.free_head
    }

    pub(crate) fn arcs(&self) -> &[ArcToken] {
        &self.arcs
    }

    pub(crate) fn get(&self, id: ArcId) -> Option<&ArcToken> {
        id.index().and_then(|index| self.arcs.get(index))
    }

    pub(crate) fn get_mut(&mut self, id: ArcId) -> Option<&mut ArcToken> {
        id.index().and_then(|index| self.arcs.get_mut(index))
    }

    /// Counts entries on the freelist.
    pub(crate) fn free_count(&self) -> usize {
        let mut count = 0;
        let mut cursor = self.free_head;
        while let Some(arc) = self.get(cursor) {
            count += 1;
            cursor = arc.next_token;
            if count > self.arcs.len() {
                break;
            }
        }
        count
    }

    /// Takes one entry off the freelist, growing the arena when it is empty.
    pub(crate) fn alloc(&mut self, options: &GraphOptions) -> Result<ArcId, GraphError> {
        if self.free_head.is_none() {
            self.grow(options)?;
        }
        let id = self.free_head;
        let Some(arc) = self.get_mut(id) else {
            return Err(GraphError::CorruptFreelist { arc: id.value() });
        };
        let next_free = arc.next_token;
        *arc = ArcToken::vacant(ArcId::NONE);
        self.free_head = next_free;
        Ok(id)
    }

    /// Returns `id` to the head of the freelist.
    pub(crate) fn release(&mut self, id: ArcId) {
        let next_free = self.free_head;
        if let Some(arc) = self.get_mut(id) {
            *arc = ArcToken::vacant(next_free);
            self.free_head = id;
        }
    }

    /// Resizes the arena to `start + reserve` entries and frees everything
    /// from `start` on, in ascending order.
    pub(crate) fn compact(&mut self, start: usize, reserve: usize) {
        let start = start.min(self.arcs.len());
        self.arcs
            .resize(start + reserve, ArcToken::vacant(ArcId::NONE));
        self.rebuild_freelist(start);
    }

    fn grow(&mut self, options: &GraphOptions) -> Result<(), GraphError> {
        let current = self.arcs.len();
        let scaled = current.saturating_mul(options.growth_percent) / 100;
        let target = scaled
            .max(current.saturating_add(options.min_growth))
            .min(options.max_arcs);
        if target <= current {
            return Err(GraphError::OutOfMemory {
                required: current + 1,
                limit: options.max_arcs,
            });
        }
        self.arcs.resize(target, ArcToken::vacant(ArcId::NONE));
        self.rebuild_freelist(current);
        tracing::debug!(from = current, to = target, "grew arc arena");
        Ok(())
    }

    // Links [start, len) ascending. Callers guarantee those entries are unused.
    fn rebuild_freelist(&mut self, start: usize) {
        let len = self.arcs.len();
        for index in start..len {
            let next = if index + 1 < len {
                ArcId::from_index(index + 1)
            } else {
                ArcId::NONE
            };
            self.arcs[index] = ArcToken::vacant(next);
        }
        self.free_head = if start < len {
            ArcId::from_index(start)
        } else {
            ArcId::NONE
        };
    }
}
