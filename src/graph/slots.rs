//! Dynamic slot vocabulary: insertion, script merging and reset.

use crate::graph::arc::{ArcId, ArcToken};
use crate::graph::error::GraphError;
use crate::graph::SemanticGraph;
use crate::options::MAX_NUM_SLOTS;
use crate::wordmap::{Vocabulary, WordId};

/// What [`SemanticGraph::add_word_to_slot`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotInsertion {
    /// A new arc was linked at the head of the slot list.
    Inserted(ArcId),
    /// The word was present; its script was replaced by the union.
    Merged(ArcId),
    /// The word was present with an equivalent script.
    Unchanged(ArcId),
}

impl SlotInsertion {
    pub fn arc(self) -> ArcId {
        match self {
            Self::Inserted(id) | Self::Merged(id) | Self::Unchanged(id) => id,
        }
    }
}

impl SemanticGraph {
    /// Adds `word` to `slot_name` carrying `script`.
    ///
    /// With `is_new` set the caller guarantees the word is not yet in the
    /// slot and the list is not scanned.
    pub fn add_word_to_slot<V>(
        &mut self,
        vocab: &V,
        slot_name: &str,
        word: &str,
        script: &str,
        is_new: bool,
    ) -> Result<SlotInsertion, GraphError>
    where
        V: Vocabulary + ?Sized,
    {
        let slot = vocab
            .find_rule_index(slot_name)
            .ok_or_else(|| GraphError::NotFound {
                kind: "slot",
                name: slot_name.to_string(),
            })?;
        if usize::from(slot) >= MAX_NUM_SLOTS {
            return Err(GraphError::SlotOutOfRange { slot });
        }
        let word_id = vocab
            .find_index_in_rule(word, slot)
            .ok_or_else(|| GraphError::NotFound {
                kind: "word",
                name: word.to_string(),
            })?;

        if !is_new {
            if let Some(existing) = self.find_in_slot(slot, word_id) {
                return self.merge_script(existing, script);
            }
        }

        // Nothing else changes until the arc is secured.
        let id = self.arena.alloc(&self.options)?;
        let olabel = match self.intern_script(script) {
            Ok(olabel) => olabel,
            Err(err) => {
                self.arena.release(id);
                return Err(err);
            }
        };
        if !self.scope_labels.is_frozen() {
            self.scope_labels.ceiling();
        }
        let head = &mut self.slot_heads[usize::from(slot)];
        if let Some(arc) = self.arena.get_mut(id) {
            *arc = ArcToken {
                ilabel: word_id,
                olabel,
                first_next_arc: ArcId::NONE,
                next_token: *head,
            };
        }
        *head = id;
        tracing::debug!(slot, word, arc = id.value(), "added word to slot");
        Ok(SlotInsertion::Inserted(id))
    }

    /// Returns every dynamic word to the freelist and restores the label
    /// tables and arena size recorded at load time.
    pub fn reset(&mut self) {
        self.slot_heads = [ArcId::NONE; MAX_NUM_SLOTS];
        self.scope_labels.reset();
        self.scripts.reset();
        // Dynamic arcs all sit at or after the insertion start, so rebuilding
        // the tail frees them in one sweep.
        self.arena
            .compact(self.insertion_start.value() as usize, self.options.arc_reserve);
    }

    /// Finds the arc for `word` in the list of `slot`.
    pub fn find_in_slot(&self, slot: WordId, word: WordId) -> Option<ArcId> {
        self.siblings(self.slot_head(slot))
            .find(|id| self.arc(*id).is_some_and(|arc| arc.ilabel == word))
    }

    fn merge_script(&mut self, id: ArcId, script: &str) -> Result<SlotInsertion, GraphError> {
        let Some(current) = self.arc(id).and_then(|arc| self.script_text(arc.olabel)) else {
            // A slot arc without a script takes the new one as is.
            let olabel = self.intern_script(script)?;
            self.relabel(id, olabel);
            return Ok(SlotInsertion::Merged(id));
        };
        if current == script {
            return Ok(SlotInsertion::Unchanged(id));
        }
        let union = union_of_scripts(current, script, self.options.join_char)?;
        if union == current {
            return Ok(SlotInsertion::Unchanged(id));
        }
        let olabel = self.intern_script(&union)?;
        self.relabel(id, olabel);
        Ok(SlotInsertion::Merged(id))
    }

    fn relabel(&mut self, id: ArcId, olabel: WordId) {
        if let Some(arc) = self.arena.get_mut(id) {
            arc.olabel = olabel;
        }
    }

    fn intern_script(&mut self, script: &str) -> Result<WordId, GraphError> {
        let index = match self.scripts.find_index(script) {
            Some(index) => index,
            None => self.scripts.add_word(script)?,
        };
        self.script_label(index)
    }
}

/// Merges two scripts that differ only in their single quoted literal.
///
/// `v='a';` and `v='b';` become `v='a#b';` with `#` as `join`. When the
/// added literal is already one of the joined parts, `existing` is returned
/// unchanged.
pub fn union_of_scripts(existing: &str, added: &str, join: char) -> Result<String, GraphError> {
    let fail = |reason| GraphError::ScriptUnion {
        existing: existing.to_string(),
        added: added.to_string(),
        reason,
    };
    let (old_prefix, old_literal, old_suffix) = split_literal(existing).map_err(fail)?;
    let (new_prefix, new_literal, new_suffix) = split_literal(added).map_err(fail)?;
    if old_prefix != new_prefix || old_suffix != new_suffix {
        return Err(fail("scripts differ outside their literals"));
    }
    if old_literal.split(join).any(|part| part == new_literal) {
        return Ok(existing.to_string());
    }
    let mut union = String::with_capacity(existing.len() + new_literal.len() + 1);
    union.push_str(old_prefix);
    union.push('\'');
    union.push_str(old_literal);
    union.push(join);
    union.push_str(new_literal);
    union.push('\'');
    union.push_str(old_suffix);
    Ok(union)
}

// Splits `script` around its only single-quoted literal. The literal is
// returned without quotes; escapes stay verbatim.
fn split_literal(script: &str) -> Result<(&str, &str, &str), &'static str> {
    let mut literal: Option<(usize, usize)> = None;
    let mut open: Option<usize> = None;
    let mut escaped = false;
    for (at, ch) in script.char_indices() {
        match (open, ch) {
            (Some(_), _) if escaped => escaped = false,
            (Some(_), '\\') => escaped = true,
            (Some(start), '\'') => {
                if literal.is_some() {
                    return Err("script has more than one quoted literal");
                }
                literal = Some((start, at));
                open = None;
            }
            (None, '\'') => open = Some(at),
            _ => {}
        }
    }
    if open.is_some() {
        return Err("script has an unterminated literal");
    }
    let (start, end) = literal.ok_or("script has no quoted literal")?;
    Ok((&script[..start], &script[start + 1..end], &script[end + 1..]))
}
