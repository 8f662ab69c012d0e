use serde::Serialize;

use crate::core::{
    models::MessageResponse,
    AuthenticatedClient,
    Card,
    MemoError,
    NewCard,
};

const CARDS_PATH: &str = "/cards/";
const SAVE_CHECKED_PATH: &str = "/cards/save-checked/";

/// Card endpoints of the backend. Every call is authenticated; failures from
/// the client come back unchanged.
#[derive(Clone)]
pub struct CardRepository {
    client: AuthenticatedClient,
}

impl CardRepository {
    pub fn new(client: AuthenticatedClient) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> Result<Vec<Card>, MemoError> {
        let cards: Vec<Card> = self.client.get(CARDS_PATH).await?;
        tracing::debug!(count = cards.len(), "fetched cards");
        Ok(cards)
    }

    pub async fn create(&self, front: &str, back: &str) -> Result<Card, MemoError> {
        validate_new_card(front, back)?;

        let body = encode_body(&NewCard { front, back, is_checked: false })?;
        let card: Card = self.client.post(CARDS_PATH, body).await?;
        tracing::debug!(id = ?card.id, "created card");
        Ok(card)
    }

    /// Sends only the checked cards, in collection order, and returns the
    /// server's confirmation message.
    pub async fn save_checked(&self, cards: &[Card]) -> Result<String, MemoError> {
        let checked = checked_subset(cards);
        let body = encode_body(&checked)?;

        let response: MessageResponse = self.client.post(SAVE_CHECKED_PATH, body).await?;
        tracing::info!(count = checked.len(), "saved checked cards");
        Ok(response.message)
    }
}

/// Request bodies that fail to encode never reach the wire; that is a failed
/// request, not bad user input.
fn encode_body<T: Serialize>(body: &T) -> Result<serde_json::Value, MemoError> {
    serde_json::to_value(body)
        .map_err(|e| MemoError::request_failed(format!("Failed to encode request body: {e}")))
}

pub fn validate_new_card(front: &str, back: &str) -> Result<(), MemoError> {
    if front.trim().is_empty() {
        return Err(MemoError::Validation("front is required".to_string()));
    }
    if back.trim().is_empty() {
        return Err(MemoError::Validation("back is required".to_string()));
    }
    Ok(())
}

pub fn checked_subset(cards: &[Card]) -> Vec<&Card> {
    cards.iter().filter(|c| c.is_checked).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_rejects_blank_sides() {
        assert!(validate_new_card("Hund", "dog").is_ok());
        for (front, back) in [("", "dog"), ("Hund", ""), ("   ", "dog"), ("Hund", "\t\n")] {
            assert!(matches!(validate_new_card(front, back), Err(MemoError::Validation(_))));
        }
    }

    struct Unencodable;

    impl Serialize for Unencodable {
        fn serialize<S: serde::Serializer>(&self, _: S) -> Result<S::Ok, S::Error> {
            Err(serde::ser::Error::custom("unsupported"))
        }
    }

    #[test]
    fn test_encode_failure_is_request_failed() {
        let err = encode_body(&Unencodable).unwrap_err();
        assert!(matches!(err, MemoError::RequestFailed { status: None, .. }), "got {err:?}");
    }

    #[test]
    fn test_checked_subset_serializes_exactly() {
        let mut hund = Card::new("Hund", "dog");
        hund.is_checked = true;
        let cards = vec![Card::new("Katze", "cat"), hund];

        let body = serde_json::to_value(checked_subset(&cards)).unwrap();
        assert_eq!(body, serde_json::json!([{"front": "Hund", "back": "dog", "isChecked": true}]));
    }
}
