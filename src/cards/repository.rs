pub mod ddb_card_repository;
pub mod memory_card_repository;

use async_trait::async_trait;
use crate::cards::domain::model::CardEntity;
use crate::core::circulation::CirculationResult;

// CardRepository is the patron-directory seam. A missing card resolves to
// None, never an error; name resolution for an unknown card is an empty
// string so display surfaces need no special case.
#[async_trait]
pub trait CardRepository: Sync + Send {
    async fn create(&self, card: &CardEntity) -> CirculationResult<usize>;

    async fn get(&self, id: &str) -> CirculationResult<Option<CardEntity>>;

    async fn patron_name(&self, id: &str) -> CirculationResult<String> {
        Ok(self.get(id).await?.map(|card| card.patron_name()).unwrap_or_default())
    }
}
