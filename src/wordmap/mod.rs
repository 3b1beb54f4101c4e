//! Integer/string word tables.
//!
//! A [`WordMap`] backs the recognizer vocabulary as well as the graph's own
//! label tables (scope markers and script texts). The graph and matcher only
//! read the vocabulary through the [`Vocabulary`] trait so callers can plug in
//! their own word service.

mod error;

use std::collections::HashMap;

pub use error::WordMapError;

/// Word identifier as stored in arc labels.
pub type WordId = u16;

/// Sentinel meaning "no word"; also the label of final-state arcs.
pub const MAX_WORD_ID: WordId = WordId::MAX;

/// Label of epsilon transitions. The vocabulary reserves ID `0` for it.
pub const EPSILON_LABEL: WordId = 0;

/// Marker found inside every slot name, e.g. `__city__`.
pub const SLOTNAME_INDICATOR: &str = "__";

/// Delimiter between a slot word and its slot digit, e.g. `boston.1`.
pub const IMPORTED_RULES_DELIM: char = '.';

/// Read-only vocabulary service consumed by the graph and the matcher.
pub trait Vocabulary {
    /// Returns the ID of `word`, if known.
    fn find_index(&self, word: &str) -> Option<WordId>;

    /// Returns the text of `id`, if assigned.
    fn word(&self, id: WordId) -> Option<&str>;

    /// Returns one past the last slot ID; slot IDs start at `1`.
    fn num_slots(&self) -> WordId;

    /// Resolves a slot name (`__city` or `__city__`) to its slot ID.
    fn find_rule_index(&self, rule: &str) -> Option<WordId>;

    /// Returns the ID under which `word` was added to slot `rule`.
    fn find_index_in_rule(&self, word: &str, rule: WordId) -> Option<WordId>;

    /// Returns `true` when word `word` belongs to slot `rule`.
    fn whether_in_rule(&self, word: WordId, rule: WordId) -> bool;
}

/// Ordered word table with a hash index.
///
/// IDs are positions in insertion order. The table remembers a *base*
/// (words present at load time) so dynamic additions can be discarded by
/// [`WordMap::reset`], and can be frozen so no further words are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WordMap {
    words: Vec<String>,
    index: HashMap<String, WordId>,
    num_slots: WordId,
    num_base_words: usize,
    frozen: bool,
}

impl WordMap {
    /// Creates an empty word map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a map from words in ID order and marks them all as base words.
    ///
    /// Slot words are the leading words after ID `0` that contain
    /// [`SLOTNAME_INDICATOR`].
    pub fn from_words<I, S>(words: I) -> Result<Self, WordMapError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut map = Self::new();
        for word in words {
            map.add_word(word)?;
        }
        map.num_slots = map.count_leading_slots();
        map.set_base();
        Ok(map)
    }

    /// Parses a `word id` list, one entry per line, IDs in ascending order.
    pub fn load_text(text: &str) -> Result<Self, WordMapError> {
        let mut words = Vec::new();
        for (line_index, line) in text.lines().enumerate() {
            let mut fields = line.split_whitespace();
            let Some(word) = fields.next() else {
                continue;
            };
            let line_number = line_index + 1;
            let id = fields
                .next()
                .and_then(|raw| raw.parse::<usize>().ok())
                .ok_or_else(|| WordMapError::MalformedLine {
                    line: line_number,
                    text: line.to_string(),
                })?;
            if id != words.len() {
                return Err(WordMapError::IdMismatch {
                    line: line_number,
                    expected: words.len(),
                    found: id,
                });
            }
            words.push(word.to_string());
        }
        Self::from_words(words)
    }

    /// Rebuilds a map from serialized parts.
    pub fn from_parts(
        words: Vec<String>,
        num_slots: WordId,
        num_base_words: usize,
        frozen: bool,
    ) -> Result<Self, WordMapError> {
        if num_base_words > words.len() || usize::from(num_slots) > words.len().max(1) {
            return Err(WordMapError::InconsistentParts {
                words: words.len(),
                base: num_base_words,
                slots: usize::from(num_slots),
            });
        }
        if words.len() >= usize::from(MAX_WORD_ID) {
            return Err(WordMapError::Full { limit: MAX_WORD_ID });
        }
        let mut map = Self {
            words,
            index: HashMap::new(),
            num_slots,
            num_base_words,
            frozen,
        };
        map.rebuild_index();
        Ok(map)
    }

    /// Appends `word` and returns its ID.
    pub fn add_word(&mut self, word: impl Into<String>) -> Result<WordId, WordMapError> {
        let word = word.into();
        if self.frozen {
            return Err(WordMapError::Frozen { word });
        }
        let id = WordId::try_from(self.words.len())
            .ok()
            .filter(|id| *id < MAX_WORD_ID)
            .ok_or(WordMapError::Full { limit: MAX_WORD_ID })?;
        self.index.entry(word.clone()).or_insert(id);
        self.words.push(word);
        Ok(id)
    }

    /// Appends `word` tagged as a member of slot `rule`.
    pub fn add_word_in_rule(&mut self, word: &str, rule: WordId) -> Result<WordId, WordMapError> {
        let tagged = word_in_rule(word, rule).ok_or(WordMapError::SlotOutOfRange { rule })?;
        self.add_word(tagged)
    }

    /// Returns the number of words.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Returns `true` when the map holds no words.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Returns the number of words recorded as base.
    pub fn num_base_words(&self) -> usize {
        self.num_base_words
    }

    /// Returns `true` when further additions are refused.
    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Iterates words in ID order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(String::as_str)
    }

    /// Records the current contents as the base restored by [`Self::reset`].
    pub fn set_base(&mut self) {
        self.num_base_words = self.words.len();
    }

    /// Refuses any further additions until the next reset.
    pub fn ceiling(&mut self) {
        self.frozen = true;
    }

    /// Drops every word added after the base and lifts the ceiling.
    pub fn reset(&mut self) {
        if self.words.len() > self.num_base_words {
            self.words.truncate(self.num_base_words);
            self.rebuild_index();
        }
        self.frozen = false;
    }

    fn rebuild_index(&mut self) {
        self.index.clear();
        for (position, word) in self.words.iter().enumerate() {
            // from_parts and add_word keep the length below MAX_WORD_ID.
            let id = position as WordId;
            self.index.entry(word.clone()).or_insert(id);
        }
    }

    fn count_leading_slots(&self) -> WordId {
        if self.words.is_empty() {
            return 0;
        }
        let slots = self.words[1..]
            .iter()
            .take_while(|word| word.contains(SLOTNAME_INDICATOR))
            .count();
        (slots + 1) as WordId
    }
}

impl Vocabulary for WordMap {
    fn find_index(&self, word: &str) -> Option<WordId> {
        self.index.get(word).copied()
    }

    fn word(&self, id: WordId) -> Option<&str> {
        self.words.get(usize::from(id)).map(String::as_str)
    }

    fn num_slots(&self) -> WordId {
        self.num_slots
    }

    fn find_rule_index(&self, rule: &str) -> Option<WordId> {
        // Slot 0 is epsilon and never a rule.
        (1..self.num_slots).rev().find(|slot| {
            let word = &self.words[usize::from(*slot)];
            match word.find(SLOTNAME_INDICATOR) {
                Some(at) => {
                    let tail = &word[at..];
                    tail == rule
                        || tail
                            .strip_prefix(rule)
                            .is_some_and(|rest| rest == SLOTNAME_INDICATOR)
                }
                None => false,
            }
        })
    }

    fn find_index_in_rule(&self, word: &str, rule: WordId) -> Option<WordId> {
        self.find_index(&word_in_rule(word, rule)?)
    }

    fn whether_in_rule(&self, word: WordId, rule: WordId) -> bool {
        let Some(text) = self.word(word) else {
            return false;
        };
        let Some(digit) = rule_digit(rule) else {
            return false;
        };
        let mut tail = text.chars().rev();
        tail.next() == Some(digit) && tail.next() == Some(IMPORTED_RULES_DELIM)
    }
}

fn rule_digit(rule: WordId) -> Option<char> {
    u8::try_from(rule)
        .ok()
        .and_then(|rule| b'0'.checked_add(rule))
        .filter(u8::is_ascii_graphic)
        .map(char::from)
}

fn word_in_rule(word: &str, rule: WordId) -> Option<String> {
    let digit = rule_digit(rule)?;
    let mut tagged = String::with_capacity(word.len() + 2);
    tagged.push_str(word);
    tagged.push(IMPORTED_RULES_DELIM);
    tagged.push(digit);
    Some(tagged)
}
