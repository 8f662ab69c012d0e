use std::sync::Arc;

use chrono::{
    DateTime,
    Utc,
};

use crate::{
    core::{
        Card,
        MemoError,
    },
    persistence::KeyValueStore,
};

pub const REMEMBERED_CARDS_KEY: &str = "rememberedCards";
pub const REMEMBERED_AT_KEY: &str = "rememberedCardsAt";

/// Offline snapshot of the whole collection. Never the source of truth; only
/// read when the backend can't be reached.
#[derive(Clone)]
pub struct LocalCardCache {
    store: Arc<dyn KeyValueStore>,
}

impl LocalCardCache {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Cached cards, empty when nothing was saved or the snapshot is unreadable.
    pub fn load(&self) -> Vec<Card> {
        match self.try_load() {
            Ok(cards) => cards,
            Err(e) => {
                tracing::warn!("Ignoring cached cards: {}", e);
                Vec::new()
            }
        }
    }

    pub fn saved_at(&self) -> Option<DateTime<Utc>> {
        let raw = self.store.get(REMEMBERED_AT_KEY).ok()??;
        DateTime::parse_from_rfc3339(&raw).ok().map(|t| t.with_timezone(&Utc))
    }

    pub fn save(&self, cards: &[Card]) -> Result<(), MemoError> {
        let json = serde_json::to_string(cards)?;
        let now = Utc::now().to_rfc3339();
        self.store.set_entries(&[
            (REMEMBERED_CARDS_KEY, json.as_str()),
            (REMEMBERED_AT_KEY, now.as_str()),
        ])?;
        tracing::debug!(count = cards.len(), "cached card snapshot");
        Ok(())
    }

    pub fn clear(&self) -> Result<(), MemoError> {
        self.store.remove_entries(&[REMEMBERED_CARDS_KEY, REMEMBERED_AT_KEY])
    }

    fn try_load(&self) -> Result<Vec<Card>, MemoError> {
        match self.store.get(REMEMBERED_CARDS_KEY)? {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => Ok(Vec::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    #[test]
    fn test_snapshot_roundtrip() {
        let cache = LocalCardCache::new(Arc::new(MemoryStore::new()));
        assert!(cache.load().is_empty());
        assert!(cache.saved_at().is_none());

        let mut hund = Card::new("Hund", "dog");
        hund.is_checked = true;
        cache.save(&[hund.clone(), Card::new("Katze", "cat")]).unwrap();

        assert_eq!(cache.load(), vec![hund, Card::new("Katze", "cat")]);
        assert!(cache.saved_at().is_some());

        cache.clear().unwrap();
        assert!(cache.load().is_empty());
    }

    #[test]
    fn test_garbage_snapshot_reads_empty() {
        let store = Arc::new(MemoryStore::new());
        store.set(REMEMBERED_CARDS_KEY, "not json").unwrap();
        assert!(LocalCardCache::new(store).load().is_empty());
    }

    #[test]
    fn test_snapshot_accepts_cards_without_flag() {
        let store = Arc::new(MemoryStore::new());
        store.set(REMEMBERED_CARDS_KEY, r#"[{"front":"Hund","back":"dog"}]"#).unwrap();
        let cards = LocalCardCache::new(store).load();
        assert_eq!(cards, vec![Card::new("Hund", "dog")]);
    }
}
