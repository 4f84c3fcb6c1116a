use std::sync::Arc;
use chrono::NaiveDateTime;
use crate::core::circulation::CirculationResult;
use crate::holds::domain::model::HoldEntity;
use crate::ledger::{LedgerOp, LedgerStore};

// HoldQueue owns the per-asset ordering of pending holds: earliest placed
// wins, hold id as tie-break. It only reads on its own; enqueue/remove are
// op builders so a consumer commits them inside its own transaction, and a
// hold read outside a transaction may already be consumed by the time the
// write-set lands (the RemoveHold precondition catches that).
pub struct HoldQueue {
    ledger: Arc<dyn LedgerStore>,
}

impl HoldQueue {
    pub fn new(ledger: Arc<dyn LedgerStore>) -> Self {
        Self { ledger }
    }

    pub async fn list(&self, asset_id: &str) -> CirculationResult<Vec<HoldEntity>> {
        self.ledger.holds(asset_id).await
    }

    pub async fn count(&self, asset_id: &str) -> CirculationResult<usize> {
        Ok(self.ledger.holds(asset_id).await?.len())
    }

    // the globally earliest hold for the asset
    pub async fn peek_earliest(&self, asset_id: &str) -> CirculationResult<Option<HoldEntity>> {
        Ok(self.ledger.holds(asset_id).await?.into_iter().next())
    }

    // the named card's earliest hold for the asset
    pub async fn earliest_for_card(&self, asset_id: &str,
                                   card_id: &str) -> CirculationResult<Option<HoldEntity>> {
        Ok(self.ledger.holds(asset_id).await?.into_iter()
            .find(|hold| hold.card_id == card_id))
    }

    pub async fn get(&self, hold_id: &str) -> CirculationResult<Option<HoldEntity>> {
        self.ledger.get_hold(hold_id).await
    }

    pub fn enqueue(hold: &HoldEntity) -> LedgerOp {
        LedgerOp::InsertHold(hold.clone())
    }

    pub fn remove(hold: &HoldEntity) -> LedgerOp {
        LedgerOp::RemoveHold { hold_id: hold.hold_id.to_string() }
    }

    pub fn placed(&self, branch_id: &str, asset_id: &str, card_id: &str,
                  now: NaiveDateTime) -> HoldEntity {
        HoldEntity::placed(branch_id, asset_id, card_id, now)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use chrono::{Duration, NaiveDateTime};
    use crate::core::circulation::CirculationError;
    use crate::holds::domain::service::HoldQueue;
    use crate::ledger::memory_ledger_store::MemoryLedgerStore;
    use crate::ledger::LedgerStore;
    use crate::utils::date::DATE_FMT;

    fn now() -> NaiveDateTime {
        NaiveDateTime::parse_from_str("2023-04-11T11:11:11.0", DATE_FMT).unwrap()
    }

    async fn queue_with_holds() -> (HoldQueue, Arc<MemoryLedgerStore>) {
        let store = Arc::new(MemoryLedgerStore::new());
        let queue = HoldQueue::new(store.clone());
        let first = queue.placed("branch1", "asset1", "cardA", now());
        let second = queue.placed("branch1", "asset1", "cardB", now() + Duration::minutes(5));
        let third = queue.placed("branch1", "asset1", "cardA", now() + Duration::minutes(9));
        store.transact(vec![
            HoldQueue::enqueue(&second),
            HoldQueue::enqueue(&first),
            HoldQueue::enqueue(&third),
        ]).await.expect("should enqueue holds");
        (queue, store)
    }

    #[tokio::test]
    async fn test_should_list_in_placement_order() {
        let (queue, _store) = queue_with_holds().await;
        let holds = queue.list("asset1").await.expect("should list holds");
        assert_eq!(3, holds.len());
        assert_eq!("cardA", holds[0].card_id.as_str());
        assert_eq!("cardB", holds[1].card_id.as_str());
        assert_eq!("cardA", holds[2].card_id.as_str());
        assert_eq!(3, queue.count("asset1").await.expect("should count holds"));
        assert_eq!(0, queue.count("asset2").await.expect("should count holds"));
    }

    #[tokio::test]
    async fn test_should_peek_earliest_and_by_card() {
        let (queue, _store) = queue_with_holds().await;
        let earliest = queue.peek_earliest("asset1").await.expect("should peek").unwrap();
        assert_eq!("cardA", earliest.card_id.as_str());
        assert_eq!(now(), earliest.hold_placed);
        let by_card = queue.earliest_for_card("asset1", "cardB").await.expect("should peek").unwrap();
        assert_eq!(now() + chrono::Duration::minutes(5), by_card.hold_placed);
        let missing = queue.earliest_for_card("asset1", "cardZ").await.expect("should peek");
        assert_eq!(None, missing);
    }

    #[tokio::test]
    async fn test_should_revalidate_consumed_hold_on_remove() {
        let (queue, store) = queue_with_holds().await;
        let earliest = queue.peek_earliest("asset1").await.expect("should peek").unwrap();
        store.transact(vec![HoldQueue::remove(&earliest)]).await.expect("should remove hold");
        // a stale peek now points at a consumed hold; the transaction rejects it
        let res = store.transact(vec![HoldQueue::remove(&earliest)]).await;
        assert!(matches!(res, Err(CirculationError::Conflict { .. })));
        assert_eq!(2, queue.count("asset1").await.expect("should count holds"));
    }
}
