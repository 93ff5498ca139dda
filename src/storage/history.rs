//! Watch history management

use crate::error::Result;
use crate::storage::kv::KeyValueStore;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, warn};

/// Namespace of the persisted front-end state
pub const NAMESPACE: &str = "streamvista-storage";

/// Key of the history record inside [`NAMESPACE`]
pub const HISTORY_KEY: &str = "watchHistory";

/// Recency-ordered, duplicate-free list of watched video IDs
pub struct History {
    store: Arc<dyn KeyValueStore>,
    /// 0 means unbounded
    max_entries: usize,
    ids: Vec<String>,
}

impl History {
    pub fn new(store: Arc<dyn KeyValueStore>, max_entries: usize) -> Self {
        Self {
            store,
            max_entries,
            ids: Vec::new(),
        }
    }

    /// Create and load in one step; an unreadable record starts an empty history
    pub fn open(store: Arc<dyn KeyValueStore>, max_entries: usize) -> Self {
        let mut history = Self::new(store, max_entries);
        if let Err(e) = history.load() {
            warn!(error = %e, "failed to read watch history, starting empty");
        }
        history
    }

    /// Load history from the store
    pub fn load(&mut self) -> Result<()> {
        let Some(content) = self.store.get(HISTORY_KEY)? else {
            self.ids = Vec::new();
            return Ok(());
        };

        let ids: Vec<String> = serde_json::from_str(&content).unwrap_or_default();

        // Hand-edited records may repeat IDs; keep the most recent occurrence
        let mut seen = HashSet::new();
        self.ids = ids.into_iter().filter(|id| seen.insert(id.clone())).collect();
        self.trim();
        debug!(entries = self.ids.len(), "loaded watch history");
        Ok(())
    }

    /// Save history to the store
    pub fn save(&self) -> Result<()> {
        let content = serde_json::to_string(&self.ids)?;
        self.store.set(HISTORY_KEY, &content)
    }

    /// Move `id` to the front and persist
    ///
    /// The in-memory list is updated before the write; a failed write is
    /// returned but not rolled back.
    pub fn add(&mut self, id: &str) -> Result<()> {
        // Remove any existing entry with the same ID
        self.ids.retain(|e| e != id);

        // Add new entry at the beginning
        self.ids.insert(0, id.to_string());

        self.trim();
        self.save()
    }

    /// Get all history entries, most recent first
    pub fn get_all(&self) -> &[String] {
        &self.ids
    }

    /// Clear all history and persist the empty list
    pub fn clear(&mut self) -> Result<()> {
        self.ids.clear();
        self.save()
    }

    fn trim(&mut self) {
        if self.max_entries > 0 && self.ids.len() > self.max_entries {
            self.ids.truncate(self.max_entries);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::kv::MemoryStore;

    fn history_with(store: &Arc<MemoryStore>, max: usize) -> History {
        History::open(store.clone(), max)
    }

    #[test]
    fn test_add_moves_to_front() {
        let store = Arc::new(MemoryStore::new());
        let mut history = history_with(&store, 100);

        history.add("a").unwrap();
        history.add("b").unwrap();
        history.add("a").unwrap();
        assert_eq!(history.get_all(), ["a", "b"]);

        history.add("a").unwrap();
        assert_eq!(history.get_all(), ["a", "b"]);
    }

    #[test]
    fn test_persisted_as_json_array() {
        let store = Arc::new(MemoryStore::new());
        let mut history = history_with(&store, 100);
        history.add("a").unwrap();
        history.add("b").unwrap();

        assert_eq!(store.get(HISTORY_KEY).unwrap().as_deref(), Some(r#"["b","a"]"#));
        assert_eq!(history_with(&store, 100).get_all(), ["b", "a"]);
    }

    #[test]
    fn test_cap_drops_oldest() {
        let store = Arc::new(MemoryStore::new());
        let mut history = history_with(&store, 2);
        for id in ["a", "b", "c"] {
            history.add(id).unwrap();
        }
        assert_eq!(history.get_all(), ["c", "b"]);
    }

    #[test]
    fn test_load_dedupes_and_ignores_garbage() {
        let store = Arc::new(MemoryStore::new());
        store.set(HISTORY_KEY, r#"["x","y","x"]"#).unwrap();
        assert_eq!(history_with(&store, 0).get_all(), ["x", "y"]);

        store.set(HISTORY_KEY, "not json").unwrap();
        assert!(history_with(&store, 0).get_all().is_empty());
    }

    #[test]
    fn test_failed_write_keeps_memory_state() {
        let store = Arc::new(MemoryStore::new());
        let mut history = history_with(&store, 100);
        history.add("a").unwrap();

        store.set_fail_writes(true);
        assert!(history.add("b").is_err());
        assert_eq!(history.get_all(), ["b", "a"]);
        assert!(history.clear().is_err());
        assert!(history.get_all().is_empty());
    }
}
