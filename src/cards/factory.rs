use std::sync::Arc;
use lazy_static::lazy_static;
use crate::cards::repository::CardRepository;
use crate::cards::repository::ddb_card_repository::DDBCardRepository;
use crate::cards::repository::memory_card_repository::MemoryCardRepository;
use crate::core::repository::RepositoryStore;
use crate::utils::ddb::{build_db_client, create_table};

lazy_static! {
    // one shared in-process directory, so every handle built against the
    // Memory backend observes the same cards
    static ref MEMORY_CARDS: Arc<MemoryCardRepository> = Arc::new(MemoryCardRepository::new());
}

pub async fn create_card_repository(store: RepositoryStore) -> Arc<dyn CardRepository> {
    match store {
        RepositoryStore::DynamoDB => {
            let client = build_db_client(store).await;
            Arc::new(DDBCardRepository::new(client, "cards"))
        }
        RepositoryStore::LocalDynamoDB => {
            let client = build_db_client(store).await;
            let _ = create_table(&client, "cards", "card_id", "email", "last_name").await;
            Arc::new(DDBCardRepository::new(client, "cards"))
        }
        RepositoryStore::Memory => {
            MEMORY_CARDS.clone()
        }
    }
}
