use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use async_trait::async_trait;
use crate::cards::domain::model::CardEntity;
use crate::cards::repository::CardRepository;
use crate::core::circulation::{CirculationError, CirculationResult};

// MemoryCardRepository keeps cards in process memory. It backs local
// development and the test suite, the role the local DynamoDB instance
// plays for deployments.
#[derive(Debug, Default)]
pub struct MemoryCardRepository {
    cards: Arc<RwLock<HashMap<String, CardEntity>>>,
}

impl MemoryCardRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CardRepository for MemoryCardRepository {
    async fn create(&self, card: &CardEntity) -> CirculationResult<usize> {
        let mut cards = self.cards.write()
            .map_err(|_| CirculationError::runtime("card directory lock poisoned", None))?;
        if cards.contains_key(card.card_id.as_str()) {
            return Err(CirculationError::duplicate_key(
                format!("card {} already exists", card.card_id).as_str()));
        }
        cards.insert(card.card_id.to_string(), card.clone());
        Ok(1)
    }

    async fn get(&self, id: &str) -> CirculationResult<Option<CardEntity>> {
        let cards = self.cards.read()
            .map_err(|_| CirculationError::runtime("card directory lock poisoned", None))?;
        Ok(cards.get(id).cloned())
    }
}
