//! Insertion-ordered, first-write-wins caches.
//!
//! Each generated artefact (an import, an error variant, a parser function)
//! has a stable identity string. Registering the same identity twice keeps
//! the first value, so a type used by many fields yields one declaration.

mod errors;
mod imports;

use indexmap::IndexMap;
use indexmap::map::Entry;

pub use errors::{
    BUILD, ErrorCache, ErrorDef, INVALID_BOOL, INVALID_CHOICE, INVALID_DURATION, INVALID_FLOAT,
    INVALID_INT, KEY_NOT_FOUND, NOT_UNICODE,
};
pub use imports::ImportCache;

/// Deduplicating store keyed by identity string.
#[derive(Debug, Clone)]
pub struct Cache<T> {
    entries: IndexMap<String, T>,
}

impl<T> Default for Cache<T> {
    fn default() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }
}

impl<T> Cache<T> {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `value` under `key` unless the key is already present.
    ///
    /// Returns `true` when the value was stored.
    pub fn add(&mut self, key: &str, value: T) -> bool {
        match self.entries.entry(key.to_owned()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(value);
                true
            }
        }
    }

    /// Looks up a stored value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&T> {
        self.entries.get(key)
    }

    /// Whether `key` has been registered.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of distinct entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }

    /// Keys in registration order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}
