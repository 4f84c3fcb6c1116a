use std::sync::Arc;
use lazy_static::lazy_static;
use crate::core::repository::RepositoryStore;
use crate::ledger::ddb_ledger_store::{DDBLedgerStore, ASSETS_TABLE, CHECKOUTS_TABLE, HISTORY_TABLE, HOLDS_TABLE};
use crate::ledger::memory_ledger_store::MemoryLedgerStore;
use crate::ledger::LedgerStore;
use crate::utils::ddb::{build_db_client, create_table};

lazy_static! {
    // one shared in-process ledger, so every handle built against the Memory
    // backend observes the same rows
    static ref MEMORY_LEDGER: Arc<MemoryLedgerStore> = Arc::new(MemoryLedgerStore::new());
}

pub async fn create_ledger_store(store: RepositoryStore) -> Arc<dyn LedgerStore> {
    match store {
        RepositoryStore::DynamoDB => {
            let client = build_db_client(store).await;
            Arc::new(DDBLedgerStore::new(client))
        }
        RepositoryStore::LocalDynamoDB => {
            let client = build_db_client(store).await;
            let _ = create_table(&client, ASSETS_TABLE, "asset_id", "asset_status", "title").await;
            let _ = create_table(&client, CHECKOUTS_TABLE, "asset_id", "card_id", "since").await;
            let _ = create_table(&client, HISTORY_TABLE, "history_id", "asset_id", "checked_out").await;
            let _ = create_table(&client, HOLDS_TABLE, "hold_id", "asset_id", "hold_placed").await;
            Arc::new(DDBLedgerStore::new(client))
        }
        RepositoryStore::Memory => {
            MEMORY_LEDGER.clone()
        }
    }
}
