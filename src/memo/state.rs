use super::card_view::CheckListener;
use crate::core::{
    Card,
    MemoError,
};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Loaded,
    Errored(MemoError),
}

/// Ordered cards of the memo view. Insertion order is display order.
#[derive(Debug, Clone, Default)]
pub struct CardCollection {
    cards: Vec<Card>,
    state: LoadState,
    last_error: Option<MemoError>,
    from_cache: bool,
}

impl CardCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cards(cards: Vec<Card>) -> Self {
        let mut collection = Self::new();
        collection.replace_cards(cards);
        collection.state = LoadState::Loaded;
        collection
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state == LoadState::Loading
    }

    pub fn last_error(&self) -> Option<&MemoError> {
        self.last_error.as_ref()
    }

    /// True when the current cards came from the offline snapshot.
    pub fn from_cache(&self) -> bool {
        self.from_cache
    }

    pub fn begin_loading(&mut self) {
        self.state = LoadState::Loading;
        self.last_error = None;
    }

    pub fn finish_loading(&mut self, result: Result<Vec<Card>, MemoError>) {
        match result {
            Ok(cards) => {
                self.replace_cards(cards);
                self.from_cache = false;
                self.state = LoadState::Loaded;
            }
            Err(e) => {
                self.last_error = Some(e.clone());
                self.state = LoadState::Errored(e);
            }
        }
    }

    pub fn load_from_cache(&mut self, cards: Vec<Card>) {
        self.replace_cards(cards);
        self.from_cache = true;
        self.state = LoadState::Loaded;
    }

    /// Flips the flag at `index`. Stale indices are ignored.
    pub fn toggle_checked(&mut self, index: usize) -> Option<bool> {
        let card = self.cards.get_mut(index)?;
        card.is_checked = !card.is_checked;
        Some(card.is_checked)
    }

    pub fn set_checked(&mut self, index: usize, value: bool) -> bool {
        match self.cards.get_mut(index) {
            Some(card) => {
                card.is_checked = value;
                true
            }
            None => false,
        }
    }

    /// Appends a server-created card unchecked and returns its position.
    pub fn append_created(&mut self, mut card: Card) -> usize {
        card.is_checked = false;
        self.cards.push(card);
        self.last_error = None;
        self.cards.len() - 1
    }

    pub fn record_error(&mut self, error: MemoError) {
        self.last_error = Some(error);
    }

    pub fn clear_error(&mut self) {
        self.last_error = None;
    }

    pub fn checked_cards(&self) -> Vec<Card> {
        self.cards.iter().filter(|c| c.is_checked).cloned().collect()
    }

    /// Drops everything tied to the authenticated view.
    pub fn discard(&mut self) {
        *self = Self::new();
    }

    fn replace_cards(&mut self, cards: Vec<Card>) {
        self.cards = cards;
    }
}

impl CheckListener for CardCollection {
    fn notify_checked(&mut self, index: usize, value: bool) {
        if !self.set_checked(index, value) {
            tracing::debug!(index, "check change for unknown card ignored");
        }
    }
}
