use std::sync::{
    Arc,
    Mutex,
    MutexGuard,
    PoisonError,
    Weak,
};

use tokio::task::JoinHandle;

use super::{
    api::CardRepository,
    cache::LocalCardCache,
    state::CardCollection,
};
use crate::core::MemoError;

/// What happened to a result once its request completed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery<T> {
    Applied(T),
    /// The owning view was dropped while the request was in flight.
    Discarded,
}

impl<T> Delivery<T> {
    pub fn applied(self) -> Option<T> {
        match self {
            Delivery::Applied(value) => Some(value),
            Delivery::Discarded => None,
        }
    }
}

/// Owns the collection of one memo view and runs backend operations against it.
///
/// In-flight work only keeps a weak reference to the collection, so dropping
/// the controller (leaving the view) makes late results fall on the floor
/// instead of mutating torn-down state.
pub struct MemoController {
    collection: Arc<Mutex<CardCollection>>,
    repository: CardRepository,
    cache: Option<LocalCardCache>,
}

impl MemoController {
    pub fn new(repository: CardRepository, cache: Option<LocalCardCache>) -> Self {
        Self { collection: Arc::new(Mutex::new(CardCollection::new())), repository, cache }
    }

    pub fn snapshot(&self) -> CardCollection {
        lock(&self.collection).clone()
    }

    pub fn with_collection<R>(&self, f: impl FnOnce(&mut CardCollection) -> R) -> R {
        f(&mut lock(&self.collection))
    }

    pub fn toggle_checked(&self, index: usize) -> Option<bool> {
        self.with_collection(|c| c.toggle_checked(index))
    }

    /// Loads (or reloads) the collection. Yields the number of cards applied.
    pub async fn load_initial(&self) -> Result<Delivery<usize>, MemoError> {
        load_into(self.weak(), self.repository.clone(), self.cache.clone()).await
    }

    pub fn spawn_load_initial(&self) -> JoinHandle<Result<Delivery<usize>, MemoError>> {
        tokio::spawn(load_into(self.weak(), self.repository.clone(), self.cache.clone()))
    }

    /// Creates a card and appends it. Yields the index it landed at.
    pub async fn add_card(&self, front: &str, back: &str) -> Result<Delivery<usize>, MemoError> {
        add_into(self.weak(), self.repository.clone(), front.to_string(), back.to_string()).await
    }

    /// Like `add_card` but runs detached, so several adds can be in flight at
    /// once. Each append only depends on its own response.
    pub fn spawn_add_card(
        &self,
        front: impl Into<String>,
        back: impl Into<String>,
    ) -> JoinHandle<Result<Delivery<usize>, MemoError>> {
        tokio::spawn(add_into(self.weak(), self.repository.clone(), front.into(), back.into()))
    }

    /// Persists the checked subset to the backend; with the offline cache
    /// enabled, also snapshots the whole collection locally.
    pub async fn remember(&self) -> Result<String, MemoError> {
        let cards = self.snapshot().cards().to_vec();

        match self.repository.save_checked(&cards).await {
            Ok(message) => {
                if let Some(cache) = &self.cache {
                    if let Err(e) = cache.save(&cards) {
                        tracing::warn!("Failed to cache card snapshot: {}", e);
                    }
                }
                self.with_collection(CardCollection::clear_error);
                Ok(message)
            }
            Err(e) => {
                self.with_collection(|c| record_failure(c, &e));
                Err(e)
            }
        }
    }

    fn weak(&self) -> Weak<Mutex<CardCollection>> {
        Arc::downgrade(&self.collection)
    }
}

fn lock(collection: &Mutex<CardCollection>) -> MutexGuard<'_, CardCollection> {
    collection.lock().unwrap_or_else(PoisonError::into_inner)
}

fn apply<R>(
    collection: &Weak<Mutex<CardCollection>>,
    f: impl FnOnce(&mut CardCollection) -> R,
) -> Option<R> {
    let collection = collection.upgrade()?;
    let mut guard = lock(&collection);
    Some(f(&mut guard))
}

fn record_failure(collection: &mut CardCollection, error: &MemoError) {
    if error.is_unauthenticated() {
        collection.discard();
    }
    collection.record_error(error.clone());
}

async fn load_into(
    collection: Weak<Mutex<CardCollection>>,
    repository: CardRepository,
    cache: Option<LocalCardCache>,
) -> Result<Delivery<usize>, MemoError> {
    if apply(&collection, CardCollection::begin_loading).is_none() {
        return Ok(Delivery::Discarded);
    }

    match repository.list().await {
        Ok(cards) => {
            if let Some(cache) = &cache {
                if let Err(e) = cache.save(&cards) {
                    tracing::warn!("Failed to cache card snapshot: {}", e);
                }
            }
            let count = cards.len();
            let applied = apply(&collection, |c| c.finish_loading(Ok(cards)));
            Ok(applied.map_or(Delivery::Discarded, |_| Delivery::Applied(count)))
        }
        Err(e @ MemoError::RequestFailed { .. }) => {
            let cached = cache.as_ref().map(LocalCardCache::load).unwrap_or_default();
            if cached.is_empty() {
                apply(&collection, |c| c.finish_loading(Err(e.clone())));
                return Err(e);
            }

            tracing::warn!(
                saved_at = ?cache.as_ref().and_then(LocalCardCache::saved_at),
                "Backend unavailable ({}), using cached cards",
                e
            );
            let count = cached.len();
            let applied = apply(&collection, |c| c.load_from_cache(cached));
            Ok(applied.map_or(Delivery::Discarded, |_| Delivery::Applied(count)))
        }
        Err(e) => {
            apply(&collection, |c| {
                if e.is_unauthenticated() {
                    c.discard();
                }
                c.finish_loading(Err(e.clone()));
            });
            Err(e)
        }
    }
}

async fn add_into(
    collection: Weak<Mutex<CardCollection>>,
    repository: CardRepository,
    front: String,
    back: String,
) -> Result<Delivery<usize>, MemoError> {
    match repository.create(&front, &back).await {
        Ok(card) => {
            let index = apply(&collection, |c| c.append_created(card));
            if index.is_none() {
                tracing::debug!("view gone, dropping created card");
            }
            Ok(index.map_or(Delivery::Discarded, Delivery::Applied))
        }
        Err(e) => {
            apply(&collection, |c| record_failure(c, &e));
            Err(e)
        }
    }
}
