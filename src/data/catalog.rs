//! Read-only lookup tables keyed by id, iterated in load order.

use crate::core::{GameError, GameResult};
use crate::items::Item;
use crate::quest::Quest;
use std::collections::HashMap;

/// A record that can live in a [`Catalog`].
pub trait CatalogEntry {
    fn id(&self) -> &str;
}

impl CatalogEntry for Quest {
    fn id(&self) -> &str {
        &self.id
    }
}

impl CatalogEntry for Item {
    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone)]
pub struct Catalog<T> {
    entries: Vec<T>,
    index: HashMap<String, usize>,
}

pub type QuestCatalog = Catalog<Quest>;
pub type ItemCatalog = Catalog<Item>;

impl<T: CatalogEntry> Catalog<T> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Builds a catalog, rejecting duplicate ids.
    pub fn from_entries(entries: impl IntoIterator<Item = T>) -> GameResult<Self> {
        let mut catalog = Self::new();
        for entry in entries {
            catalog.insert(entry)?;
        }
        Ok(catalog)
    }

    pub fn insert(&mut self, entry: T) -> GameResult<()> {
        if self.index.contains_key(entry.id()) {
            return Err(GameError::InvalidDataFormat(format!(
                "duplicate id: {}",
                entry.id()
            )));
        }
        self.index.insert(entry.id().to_string(), self.entries.len());
        self.entries.push(entry);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.index.get(id).map(|&i| &self.entries[i])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.iter()
    }
}

impl<T: CatalogEntry> Default for Catalog<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quest(id: &str) -> Quest {
        Quest {
            id: id.to_string(),
            title: id.to_uppercase(),
            description: String::new(),
            reward_xp: 10,
            reward_gold: 5,
            required_level: 1,
            prerequisite: None,
        }
    }

    #[test]
    fn test_preserves_insertion_order() {
        let catalog =
            QuestCatalog::from_entries(vec![quest("zeta"), quest("alpha"), quest("mid")]).unwrap();
        let ids: Vec<&str> = catalog.iter().map(|q| q.id.as_str()).collect();
        assert_eq!(ids, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_lookup() {
        let catalog = QuestCatalog::from_entries(vec![quest("a")]).unwrap();
        assert_eq!(catalog.get("a").map(|q| q.title.as_str()), Some("A"));
        assert!(catalog.get("b").is_none());
        assert!(catalog.contains("a"));
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn test_rejects_duplicates() {
        let result = QuestCatalog::from_entries(vec![quest("a"), quest("a")]);
        assert!(matches!(result, Err(GameError::InvalidDataFormat(_))));
    }

    #[test]
    fn test_empty() {
        let catalog = ItemCatalog::default();
        assert!(catalog.is_empty());
    }
}
