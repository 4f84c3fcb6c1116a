use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use async_trait::async_trait;
use crate::assets::domain::model::AssetEntity;
use crate::checkouts::domain::model::{CheckoutEntity, CheckoutHistoryEntity};
use crate::core::circulation::{CirculationError, CirculationResult, PaginatedResult};
use crate::holds::domain::model::HoldEntity;
use crate::ledger::{hold_order, LedgerOp, LedgerStore};

#[derive(Debug, Default)]
struct LedgerState {
    assets: HashMap<String, AssetEntity>,
    // keyed by asset_id: the store itself cannot hold two active checkouts
    checkouts: HashMap<String, CheckoutEntity>,
    history: HashMap<String, CheckoutHistoryEntity>,
    holds: HashMap<String, HoldEntity>,
}

// MemoryLedgerStore is the in-process ledger backend for local development
// and tests. A single lock over the whole state gives transact() the same
// all-or-nothing contract the DynamoDB backend gets from TransactWriteItems:
// every precondition is validated under the write lock before any op is
// applied.
#[derive(Debug, Default)]
pub struct MemoryLedgerStore {
    state: Arc<RwLock<LedgerState>>,
}

impl MemoryLedgerStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn check(state: &LedgerState, op: &LedgerOp) -> CirculationResult<()> {
        match op {
            LedgerOp::PutAsset(asset) => {
                if state.assets.contains_key(asset.asset_id.as_str()) {
                    return Err(CirculationError::duplicate_key(
                        format!("asset {} already exists", asset.asset_id).as_str()));
                }
            }
            LedgerOp::UpdateAsset(asset) => {
                match state.assets.get(asset.asset_id.as_str()) {
                    Some(existing) if existing.version == asset.version => {}
                    _ => {
                        return Err(CirculationError::conflict(
                            format!("asset {} version {} no longer current",
                                    asset.asset_id, asset.version).as_str(), None));
                    }
                }
            }
            LedgerOp::InsertCheckout(checkout) => {
                if state.checkouts.contains_key(checkout.asset_id.as_str()) {
                    return Err(CirculationError::conflict(
                        format!("asset {} already has an active checkout",
                                checkout.asset_id).as_str(), None));
                }
            }
            LedgerOp::ReplaceCheckout { checkout, previous_version } => {
                match state.checkouts.get(checkout.asset_id.as_str()) {
                    Some(existing) if existing.version == *previous_version => {}
                    _ => {
                        return Err(CirculationError::conflict(
                            format!("active checkout for asset {} no longer current",
                                    checkout.asset_id).as_str(), None));
                    }
                }
            }
            LedgerOp::DeleteCheckout { asset_id } => {
                if !state.checkouts.contains_key(asset_id.as_str()) {
                    return Err(CirculationError::conflict(
                        format!("no active checkout left for asset {}", asset_id).as_str(), None));
                }
            }
            LedgerOp::InsertHistory(entry) => {
                if state.history.contains_key(entry.history_id.as_str()) {
                    return Err(CirculationError::duplicate_key(
                        format!("history entry {} already exists", entry.history_id).as_str()));
                }
            }
            LedgerOp::UpdateHistory(entry) => {
                match state.history.get(entry.history_id.as_str()) {
                    Some(existing) if existing.version == entry.version => {}
                    _ => {
                        return Err(CirculationError::conflict(
                            format!("history entry {} version {} no longer current",
                                    entry.history_id, entry.version).as_str(), None));
                    }
                }
            }
            LedgerOp::InsertHold(hold) => {
                if state.holds.contains_key(hold.hold_id.as_str()) {
                    return Err(CirculationError::duplicate_key(
                        format!("hold {} already exists", hold.hold_id).as_str()));
                }
            }
            LedgerOp::RemoveHold { hold_id } => {
                if !state.holds.contains_key(hold_id.as_str()) {
                    return Err(CirculationError::conflict(
                        format!("hold {} was already consumed", hold_id).as_str(), None));
                }
            }
        }
        Ok(())
    }

    fn apply(state: &mut LedgerState, op: LedgerOp) {
        match op {
            LedgerOp::PutAsset(asset) => {
                state.assets.insert(asset.asset_id.to_string(), asset);
            }
            LedgerOp::UpdateAsset(mut asset) => {
                asset.version += 1;
                state.assets.insert(asset.asset_id.to_string(), asset);
            }
            LedgerOp::InsertCheckout(checkout) => {
                state.checkouts.insert(checkout.asset_id.to_string(), checkout);
            }
            LedgerOp::ReplaceCheckout { checkout, .. } => {
                state.checkouts.insert(checkout.asset_id.to_string(), checkout);
            }
            LedgerOp::DeleteCheckout { asset_id } => {
                state.checkouts.remove(asset_id.as_str());
            }
            LedgerOp::InsertHistory(entry) => {
                state.history.insert(entry.history_id.to_string(), entry);
            }
            LedgerOp::UpdateHistory(mut entry) => {
                entry.version += 1;
                state.history.insert(entry.history_id.to_string(), entry);
            }
            LedgerOp::InsertHold(hold) => {
                state.holds.insert(hold.hold_id.to_string(), hold);
            }
            LedgerOp::RemoveHold { hold_id } => {
                state.holds.remove(hold_id.as_str());
            }
        }
    }
}

fn lock_error() -> CirculationError {
    CirculationError::runtime("ledger state lock poisoned", None)
}

#[async_trait]
impl LedgerStore for MemoryLedgerStore {
    async fn get_asset(&self, asset_id: &str) -> CirculationResult<Option<AssetEntity>> {
        let state = self.state.read().map_err(|_| lock_error())?;
        Ok(state.assets.get(asset_id).cloned())
    }

    async fn active_checkout(&self, asset_id: &str) -> CirculationResult<Option<CheckoutEntity>> {
        let state = self.state.read().map_err(|_| lock_error())?;
        Ok(state.checkouts.get(asset_id).cloned())
    }

    async fn open_history(&self, asset_id: &str) -> CirculationResult<Option<CheckoutHistoryEntity>> {
        let state = self.state.read().map_err(|_| lock_error())?;
        Ok(state.history.values()
            .find(|entry| entry.asset_id == asset_id && entry.is_open())
            .cloned())
    }

    async fn history(&self, asset_id: &str,
                     page: Option<&str>, page_size: usize) -> CirculationResult<PaginatedResult<CheckoutHistoryEntity>> {
        let state = self.state.read().map_err(|_| lock_error())?;
        let mut records: Vec<CheckoutHistoryEntity> = state.history.values()
            .filter(|entry| entry.asset_id == asset_id)
            .cloned()
            .collect();
        records.sort_by(|a, b| b.checked_out.cmp(&a.checked_out)
            .then_with(|| b.history_id.cmp(&a.history_id)));
        let offset = page.and_then(|p| p.parse::<usize>().ok()).unwrap_or(0);
        let remaining = records.len().saturating_sub(offset);
        let records: Vec<CheckoutHistoryEntity> = records.into_iter()
            .skip(offset).take(page_size).collect();
        let next_page = if remaining > page_size {
            Some((offset + page_size).to_string())
        } else {
            None
        };
        Ok(PaginatedResult::new(page, page_size, next_page, records))
    }

    async fn holds(&self, asset_id: &str) -> CirculationResult<Vec<HoldEntity>> {
        let state = self.state.read().map_err(|_| lock_error())?;
        let mut holds: Vec<HoldEntity> = state.holds.values()
            .filter(|hold| hold.asset_id == asset_id)
            .cloned()
            .collect();
        holds.sort_by_key(hold_order);
        Ok(holds)
    }

    async fn get_hold(&self, hold_id: &str) -> CirculationResult<Option<HoldEntity>> {
        let state = self.state.read().map_err(|_| lock_error())?;
        Ok(state.holds.get(hold_id).cloned())
    }

    async fn transact(&self, ops: Vec<LedgerOp>) -> CirculationResult<()> {
        let mut state = self.state.write().map_err(|_| lock_error())?;
        for op in &ops {
            MemoryLedgerStore::check(&state, op)?;
        }
        for op in ops {
            MemoryLedgerStore::apply(&mut state, op);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, NaiveDateTime};
    use crate::assets::domain::model::AssetEntity;
    use crate::checkouts::domain::model::{CheckoutEntity, CheckoutHistoryEntity};
    use crate::core::circulation::{AssetStatus, CirculationError};
    use crate::holds::domain::model::HoldEntity;
    use crate::ledger::{LedgerOp, LedgerStore};
    use crate::ledger::memory_ledger_store::MemoryLedgerStore;
    use crate::utils::date::DATE_FMT;

    fn now() -> NaiveDateTime {
        NaiveDateTime::parse_from_str("2023-04-11T11:11:11.0", DATE_FMT).unwrap()
    }

    #[tokio::test]
    async fn test_should_put_get_asset() {
        let store = MemoryLedgerStore::new();
        let asset = AssetEntity::new("title", "author", AssetStatus::Available);
        store.transact(vec![LedgerOp::PutAsset(asset.clone())]).await.expect("should put asset");
        let loaded = store.get_asset(asset.asset_id.as_str()).await.expect("should get asset");
        assert_eq!(Some(asset), loaded);
        let missing = store.get_asset("no-such-asset").await.expect("should get asset");
        assert_eq!(None, missing);
    }

    #[tokio::test]
    async fn test_should_bump_version_on_update() {
        let store = MemoryLedgerStore::new();
        let mut asset = AssetEntity::new("title", "author", AssetStatus::Available);
        store.transact(vec![LedgerOp::PutAsset(asset.clone())]).await.expect("should put asset");
        asset.asset_status = AssetStatus::CheckedOut;
        store.transact(vec![LedgerOp::UpdateAsset(asset.clone())]).await.expect("should update asset");
        let loaded = store.get_asset(asset.asset_id.as_str()).await.expect("should get asset").unwrap();
        assert_eq!(AssetStatus::CheckedOut, loaded.asset_status);
        assert_eq!(1, loaded.version);
    }

    #[tokio::test]
    async fn test_should_reject_stale_asset_update() {
        let store = MemoryLedgerStore::new();
        let mut asset = AssetEntity::new("title", "author", AssetStatus::Available);
        store.transact(vec![LedgerOp::PutAsset(asset.clone())]).await.expect("should put asset");
        asset.asset_status = AssetStatus::CheckedOut;
        store.transact(vec![LedgerOp::UpdateAsset(asset.clone())]).await.expect("should update asset");
        // same stale version again
        let res = store.transact(vec![LedgerOp::UpdateAsset(asset.clone())]).await;
        assert!(matches!(res, Err(CirculationError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_should_keep_single_active_checkout() {
        let store = MemoryLedgerStore::new();
        let first = CheckoutEntity::open("branch1", "asset1", "card1", now(), 30);
        let second = CheckoutEntity::open("branch1", "asset1", "card2", now(), 30);
        store.transact(vec![LedgerOp::InsertCheckout(first)]).await.expect("should insert checkout");
        let res = store.transact(vec![LedgerOp::InsertCheckout(second)]).await;
        assert!(matches!(res, Err(CirculationError::Conflict { .. })));
        let active = store.active_checkout("asset1").await.expect("should query checkout").unwrap();
        assert_eq!("card1", active.card_id.as_str());
    }

    #[tokio::test]
    async fn test_should_reject_whole_write_set_on_failed_precondition() {
        let store = MemoryLedgerStore::new();
        let checkout = CheckoutEntity::open("branch1", "asset1", "card1", now(), 30);
        let entry = CheckoutHistoryEntity::open("branch1", "asset1", "card1", now());
        store.transact(vec![LedgerOp::InsertCheckout(checkout)]).await.expect("should insert checkout");
        // history insert rides with a conflicting checkout insert; neither lands
        let other = CheckoutEntity::open("branch1", "asset1", "card2", now(), 30);
        let res = store.transact(vec![
            LedgerOp::InsertHistory(entry.clone()),
            LedgerOp::InsertCheckout(other),
        ]).await;
        assert!(res.is_err());
        let open = store.open_history("asset1").await.expect("should query history");
        assert_eq!(None, open);
    }

    #[tokio::test]
    async fn test_should_order_holds_by_placement() {
        let store = MemoryLedgerStore::new();
        let late = HoldEntity::placed("branch1", "asset1", "cardB", now() + Duration::minutes(10));
        let early = HoldEntity::placed("branch1", "asset1", "cardA", now());
        let other_asset = HoldEntity::placed("branch1", "asset2", "cardC", now());
        store.transact(vec![
            LedgerOp::InsertHold(late),
            LedgerOp::InsertHold(early),
            LedgerOp::InsertHold(other_asset),
        ]).await.expect("should insert holds");
        let holds = store.holds("asset1").await.expect("should list holds");
        assert_eq!(2, holds.len());
        assert_eq!("cardA", holds[0].card_id.as_str());
        assert_eq!("cardB", holds[1].card_id.as_str());
    }

    #[tokio::test]
    async fn test_should_reject_removing_consumed_hold() {
        let store = MemoryLedgerStore::new();
        let hold = HoldEntity::placed("branch1", "asset1", "cardA", now());
        store.transact(vec![LedgerOp::InsertHold(hold.clone())]).await.expect("should insert hold");
        store.transact(vec![LedgerOp::RemoveHold { hold_id: hold.hold_id.to_string() }])
            .await.expect("should remove hold");
        let res = store.transact(vec![LedgerOp::RemoveHold { hold_id: hold.hold_id.to_string() }]).await;
        assert!(matches!(res, Err(CirculationError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_should_page_history_newest_first() {
        let store = MemoryLedgerStore::new();
        for i in 0..5 {
            let entry = CheckoutHistoryEntity::open(
                "branch1", "asset1", format!("card{}", i).as_str(), now() + Duration::days(i));
            store.transact(vec![LedgerOp::InsertHistory(entry)]).await.expect("should insert history");
        }
        let first = store.history("asset1", None, 2).await.expect("should page history");
        assert_eq!(2, first.records.len());
        assert_eq!("card4", first.records[0].card_id.as_str());
        assert_eq!("card3", first.records[1].card_id.as_str());
        let next_page = first.next_page.expect("should have next page");
        let second = store.history("asset1", Some(next_page.as_str()), 2).await.expect("should page history");
        assert_eq!(2, second.records.len());
        assert_eq!("card2", second.records[0].card_id.as_str());
        let last_page = second.next_page.expect("should have next page");
        let third = store.history("asset1", Some(last_page.as_str()), 2).await.expect("should page history");
        assert_eq!(1, third.records.len());
        assert_eq!(None, third.next_page);
    }
}
