//! Client-local key/value persistence (browser `localStorage` in production).

use std::{cell::RefCell, collections::HashMap};

/// String key/value store that survives a page reload.
///
/// Writes are best effort: a store that cannot persist (quota, private mode)
/// is expected to log and carry on rather than fail the calling action.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// In-memory store for headless hosts and tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with `entries`.
    pub fn with_entries<'a>(entries: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let store = Self::new();
        for (key, value) in entries {
            store.set(key, value);
        }
        store
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.entries.borrow_mut().remove(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_remove() {
        let store = MemoryStore::new();
        assert!(store.is_empty());

        store.set("theme", "light");
        assert_eq!(store.get("theme").as_deref(), Some("light"));

        store.set("theme", "dark");
        assert_eq!(store.get("theme").as_deref(), Some("dark"));
        assert_eq!(store.len(), 1);

        store.remove("theme");
        assert_eq!(store.get("theme"), None);
    }

    #[test]
    fn test_with_entries() {
        let store = MemoryStore::with_entries([("conversation_id", "c1"), ("theme", "dark")]);
        assert_eq!(store.get("conversation_id").as_deref(), Some("c1"));
        assert_eq!(store.len(), 2);
    }
}
