//! Keyword knowledge index.
//!
//! Maps a lower-case keyword (a surname, a product slug) to the full text of
//! one document. A free-text query is reduced to alphabetic lower-case tokens
//! and every token that is a key pulls in its document, in query order.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use super::loader::{load_sources, KnowledgeSource};
use crate::core::errors::KnowledgeError;

/// In-memory keyword → document map.
///
/// Built once from a loaded corpus and read-only afterwards. Every stored key
/// is non-empty and already lower-case.
#[derive(Debug, Clone, Default)]
pub struct KnowledgeIndex {
    entries: HashMap<String, String>,
}

impl KnowledgeIndex {
    /// Build an index from a mapping whose keys are already normalized.
    ///
    /// Keys are not re-normalized. Entries with an empty or non-lower-case key
    /// could never match a query token, so they are dropped with a warning.
    pub fn new(entries: HashMap<String, String>) -> Self {
        let mut index = Self::default();
        index.extend(entries);
        index
    }

    /// Load every source and build the index from the merged mapping.
    pub fn load(sources: &[KnowledgeSource]) -> Result<Self, KnowledgeError> {
        let entries = load_sources(sources)?;
        Ok(Self::new(entries))
    }

    /// Insert or replace one document. Returns `false` if the key was rejected.
    pub fn insert(&mut self, key: impl Into<String>, text: impl Into<String>) -> bool {
        let key = key.into();
        if !is_valid_key(&key) {
            tracing::warn!("Skipping knowledge entry with non-normalized key {:?}", key);
            return false;
        }
        if self.entries.insert(key.clone(), text.into()).is_some() {
            tracing::debug!("Knowledge entry '{}' replaced", key);
        }
        true
    }

    /// Merge entries into the index, last write wins.
    pub fn extend<I, K, V>(&mut self, entries: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (key, text) in entries {
            self.insert(key, text);
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All keys, sorted.
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    /// Documents whose key appears in `query`, one per matching token, in
    /// token order. Repeated tokens repeat their document.
    pub fn relevant_documents(&self, query: &str) -> Vec<&str> {
        tokenize(query)
            .iter()
            .filter_map(|token| self.get(token))
            .collect()
    }
}

/// Reduce a query to lookup tokens.
///
/// Keeps letters and separators only, lower-cases, and splits on separator
/// runs. Separators are Unicode white space plus the ASCII information
/// separators `\x1c`..=`\x1f`. Letters are `char::is_alphabetic`, which also
/// admits letter-numbers such as `Ⅻ` and combining marks; those stay inside
/// the token they appear in.
pub fn tokenize(query: &str) -> Vec<String> {
    let cleaned: String = query
        .chars()
        .filter(|ch| ch.is_alphabetic() || is_separator(*ch))
        .collect();

    cleaned
        .to_lowercase()
        .split(is_separator)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

fn is_separator(ch: char) -> bool {
    ch.is_whitespace() || ('\u{1c}'..='\u{1f}').contains(&ch)
}

fn is_valid_key(key: &str) -> bool {
    !key.is_empty() && key.to_lowercase() == key
}

/// Index shared between one writer and many concurrent readers.
#[derive(Debug, Clone, Default)]
pub struct SharedKnowledgeIndex {
    inner: Arc<RwLock<KnowledgeIndex>>,
}

impl SharedKnowledgeIndex {
    pub fn new(index: KnowledgeIndex) -> Self {
        Self {
            inner: Arc::new(RwLock::new(index)),
        }
    }

    pub fn insert(&self, key: impl Into<String>, text: impl Into<String>) -> bool {
        let mut guard = self
            .inner
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        guard.insert(key, text)
    }

    pub fn len(&self) -> usize {
        self.read(|index| index.len())
    }

    pub fn is_empty(&self) -> bool {
        self.read(|index| index.is_empty())
    }

    pub fn keys(&self) -> Vec<String> {
        self.read(|index| index.keys().into_iter().map(str::to_string).collect())
    }

    pub fn relevant_documents(&self, query: &str) -> Vec<String> {
        self.read(|index| {
            index
                .relevant_documents(query)
                .into_iter()
                .map(str::to_string)
                .collect()
        })
    }

    /// Run `f` against the index under the read lock.
    pub fn read<T>(&self, f: impl FnOnce(&KnowledgeIndex) -> T) -> T {
        let guard = self
            .inner
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&guard)
    }
}

impl From<KnowledgeIndex> for SharedKnowledgeIndex {
    fn from(index: KnowledgeIndex) -> Self {
        Self::new(index)
    }
}
