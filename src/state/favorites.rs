//! The user's favorite recipes, persisted on every change.

use crate::storage::FavoritesStore;
use log::debug;

/// Unique recipe ids in the order they were added.
pub struct FavoriteSet {
    ids: Vec<String>,
    store: FavoritesStore,
}

impl FavoriteSet {
    /// Loads the set from storage, dropping duplicate ids.
    pub fn load(store: FavoritesStore) -> Self {
        let mut ids: Vec<String> = Vec::new();
        for id in store.load() {
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
        Self { ids, store }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|fav| fav == id)
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Adds `id`; returns `false` if it was already a favorite.
    pub fn add(&mut self, id: &str) -> bool {
        if self.contains(id) {
            return false;
        }
        self.ids.push(id.to_string());
        debug!("Added favorite {}", id);
        self.persist();
        true
    }

    /// Removes `id`; returns `false` if it was not a favorite.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.ids.len();
        self.ids.retain(|fav| fav != id);
        if self.ids.len() == before {
            return false;
        }
        debug!("Removed favorite {}", id);
        self.persist();
        true
    }

    /// Flips membership of `id` and returns whether it is now a favorite.
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.contains(id) {
            self.remove(id);
            false
        } else {
            self.add(id);
            true
        }
    }

    /// Writes the current list back to storage.
    pub fn persist(&self) {
        self.store.save(&self.ids);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FAVORITES_STORAGE_KEY;
    use crate::storage::{KeyValueStore, MemoryStore};
    use std::sync::Arc;

    fn stored(backend: &MemoryStore) -> Vec<String> {
        let raw = backend.get_item(FAVORITES_STORAGE_KEY).unwrap().unwrap();
        serde_json::from_str(&raw).unwrap()
    }

    #[test]
    fn add_and_remove_are_idempotent() {
        let backend = Arc::new(MemoryStore::new());
        let mut favorites = FavoriteSet::load(FavoritesStore::new(backend.clone()));

        assert!(favorites.add("1"));
        assert!(!favorites.add("1"));
        assert_eq!(favorites.ids(), ["1"]);
        assert_eq!(stored(&backend), vec!["1"]);

        assert!(favorites.remove("1"));
        assert!(!favorites.remove("1"));
        assert!(favorites.is_empty());
        assert!(stored(&backend).is_empty());
    }

    #[test]
    fn toggle_flips_membership_and_persists() {
        let backend = Arc::new(MemoryStore::new());
        let mut favorites = FavoriteSet::load(FavoritesStore::new(backend.clone()));

        assert!(favorites.toggle("7"));
        assert!(favorites.contains("7"));
        assert_eq!(stored(&backend), vec!["7"]);

        assert!(!favorites.toggle("7"));
        assert!(!favorites.contains("7"));
        assert!(stored(&backend).is_empty());
    }

    #[test]
    fn load_drops_duplicates_and_keeps_order() {
        let backend = Arc::new(MemoryStore::new());
        backend
            .set_item(FAVORITES_STORAGE_KEY, r#"["3","1","3","2"]"#)
            .unwrap();
        let favorites = FavoriteSet::load(FavoritesStore::new(backend));
        assert_eq!(favorites.ids(), ["3", "1", "2"]);
    }
}
