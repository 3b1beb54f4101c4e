//! Bounded key/value store for one program run.

use std::collections::HashMap;

use crate::options::ProcessorOptions;
use crate::script::error::ScriptError;

#[derive(Debug, Clone, Default)]
struct Entries {
    slots: Vec<(String, String)>,
    index: HashMap<String, usize>,
}

impl Entries {
    fn get(&self, key: &str) -> Option<&str> {
        self.index
            .get(key)
            .and_then(|slot| self.slots.get(*slot))
            .map(|(_, value)| value.as_str())
    }

    fn put(&mut self, key: &str, value: &str, capacity: usize) -> Result<(), ScriptError> {
        if let Some(slot) = self.index.get(key) {
            self.slots[*slot].1 = value.to_string();
            return Ok(());
        }
        if self.slots.len() >= capacity {
            return Err(ScriptError::overflow(
                "symbol table",
                self.slots.len() + 1,
                capacity,
            ));
        }
        self.index.insert(key.to_string(), self.slots.len());
        self.slots.push((key.to_string(), value.to_string()));
        Ok(())
    }

    fn clear(&mut self) {
        self.slots.clear();
        self.index.clear();
    }
}

/// Regular symbols plus a small set of special symbols seeded by the
/// caller.
///
/// Lookups that miss the regular symbols fall back to the specials, first
/// by full key and then with the leading `rule.` qualifier removed.
#[derive(Debug, Clone)]
pub struct SymbolTable {
    symbols: Entries,
    specials: Entries,
    max_symbols: usize,
    max_special_symbols: usize,
    max_key_len: usize,
    max_value_len: usize,
}

impl SymbolTable {
    pub fn new(options: &ProcessorOptions) -> Self {
        Self {
            symbols: Entries::default(),
            specials: Entries::default(),
            max_symbols: options.max_symbols,
            max_special_symbols: options.max_special_symbols,
            max_key_len: options.max_key_len,
            max_value_len: options.max_value_len,
        }
    }

    pub fn put(&mut self, key: &str, value: &str) -> Result<(), ScriptError> {
        self.check_lengths(key, value)?;
        self.symbols.put(key, value, self.max_symbols)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.symbols.get(key).or_else(|| self.get_special(key))
    }

    pub fn put_special(&mut self, key: &str, value: &str) -> Result<(), ScriptError> {
        self.check_lengths(key, value)?;
        self.specials.put(key, value, self.max_special_symbols)
    }

    pub fn get_special(&self, key: &str) -> Option<&str> {
        self.specials.get(key).or_else(|| {
            key.split_once('.')
                .and_then(|(_, unqualified)| self.specials.get(unqualified))
        })
    }

    /// Clears regular symbols; specials survive.
    pub fn reset(&mut self) {
        self.symbols.clear();
    }

    pub fn reset_all(&mut self) {
        self.symbols.clear();
        self.specials.clear();
    }

    /// Regular symbols in first-assignment order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.symbols
            .slots
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.symbols.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.slots.is_empty()
    }

    fn check_lengths(&self, key: &str, value: &str) -> Result<(), ScriptError> {
        if key.len() > self.max_key_len {
            return Err(ScriptError::overflow("symbol key", key.len(), self.max_key_len));
        }
        if value.len() > self.max_value_len {
            return Err(ScriptError::overflow(
                "symbol value",
                value.len(),
                self.max_value_len,
            ));
        }
        Ok(())
    }
}
