use std::collections::HashMap;

use crate::error::SemanticError;

/// Key/value pairs produced by one interpretation, in assignment order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SemanticResult {
    entries: Vec<(String, String)>,
    index: HashMap<String, usize>,
}

impl SemanticResult {
    pub(crate) fn from_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut result = Self::default();
        for (key, value) in pairs {
            result.insert(key, value);
        }
        result
    }

    pub(crate) fn insert(&mut self, key: &str, value: &str) {
        match self.index.get(key) {
            Some(slot) => self.entries[*slot].1 = value.to_string(),
            None => {
                self.index.insert(key.to_string(), self.entries.len());
                self.entries.push((key.to_string(), value.to_string()));
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.index
            .get(key)
            .map(|slot| self.entries[*slot].1.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_map(self) -> HashMap<String, String> {
        self.entries.into_iter().collect()
    }

    /// Copies the value of `key` into `out` and returns its length.
    ///
    /// A buffer that is too small yields [`SemanticError::BufferOverflow`]
    /// with the required length. Probing with an empty buffer is the normal
    /// way to size one and is not logged.
    pub fn read_value(&self, key: &str, out: &mut [u8]) -> Result<usize, SemanticError> {
        let value = self.get(key).ok_or_else(|| SemanticError::KeyNotFound {
            key: key.to_string(),
        })?;
        let required = value.len();
        if required > out.len() {
            if !out.is_empty() {
                tracing::warn!(key, required, available = out.len(), "result buffer too small");
            }
            return Err(SemanticError::BufferOverflow {
                key: key.to_string(),
                required,
                available: out.len(),
            });
        }
        out[..required].copy_from_slice(value.as_bytes());
        Ok(required)
    }
}
