pub mod ddb_ledger_store;
pub mod factory;
pub mod memory_ledger_store;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use crate::assets::domain::model::AssetEntity;
use crate::checkouts::domain::model::{CheckoutEntity, CheckoutHistoryEntity};
use crate::core::circulation::{CirculationResult, PaginatedResult};
use crate::holds::domain::model::HoldEntity;

// LedgerOp is one row mutation inside an atomic write-set. Each op carries
// its own precondition; if any precondition fails at commit time the whole
// write-set is rejected with a retryable Conflict and nothing is applied.
//
// Update ops carry the entity as it was read: the store persists it with
// version + 1, conditioned on the stored version still matching.
#[derive(Debug, Clone)]
pub enum LedgerOp {
    // insert; rejected if the asset id already exists
    PutAsset(AssetEntity),
    // replace with version check-and-set
    UpdateAsset(AssetEntity),
    // insert; rejected if any checkout row exists for the asset
    InsertCheckout(CheckoutEntity),
    // swap the active checkout for a new one in a single op, conditioned on
    // the previous row still being current; a transaction cannot delete and
    // re-insert the same row, and the hold hand-off must never leave a gap
    // where the asset is observably available
    ReplaceCheckout { checkout: CheckoutEntity, previous_version: i64 },
    // rejected if no checkout row exists for the asset
    DeleteCheckout { asset_id: String },
    // append a history row
    InsertHistory(CheckoutHistoryEntity),
    // replace with version check-and-set (closes an open entry)
    UpdateHistory(CheckoutHistoryEntity),
    // append a hold
    InsertHold(HoldEntity),
    // rejected if the hold was already consumed by another writer
    RemoveHold { hold_id: String },
}

// LedgerStore is the single source of truth for assets, checkouts, the
// checkout-history log and holds, and the unit of atomicity for every
// lifecycle transition. Reads return None/empty for missing rows; only
// storage failures are errors.
#[async_trait]
pub trait LedgerStore: Sync + Send {
    async fn get_asset(&self, asset_id: &str) -> CirculationResult<Option<AssetEntity>>;

    async fn active_checkout(&self, asset_id: &str) -> CirculationResult<Option<CheckoutEntity>>;

    async fn open_history(&self, asset_id: &str) -> CirculationResult<Option<CheckoutHistoryEntity>>;

    // full audit log for an asset, ordered by checked_out descending
    async fn history(&self, asset_id: &str,
                     page: Option<&str>, page_size: usize) -> CirculationResult<PaginatedResult<CheckoutHistoryEntity>>;

    // pending holds for an asset, ordered ascending by (hold_placed, hold_id)
    async fn holds(&self, asset_id: &str) -> CirculationResult<Vec<HoldEntity>>;

    async fn get_hold(&self, hold_id: &str) -> CirculationResult<Option<HoldEntity>>;

    // applies the write-set atomically, or nothing at all
    async fn transact(&self, ops: Vec<LedgerOp>) -> CirculationResult<()>;
}

// the total order holds are served in
pub(crate) fn hold_order(hold: &HoldEntity) -> (NaiveDateTime, String) {
    (hold.hold_placed, hold.hold_id.to_string())
}
