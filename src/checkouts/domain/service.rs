use std::sync::Arc;
use chrono::NaiveDateTime;
use crate::checkouts::domain::model::{CheckoutEntity, CheckoutHistoryEntity};
use crate::core::circulation::{CirculationResult, PaginatedResult};
use crate::ledger::{LedgerOp, LedgerStore};

// CheckoutLedger pairs the active-checkout row with the append-only history
// log. Opening a loan inserts both rows; closing one deletes the checkout
// and stamps checked_in on the open entry. The pairing keeps the open-entry
// invariant: an open history row exists iff the asset is checked out, so the
// two ops always travel in the same transaction.
pub struct CheckoutLedger {
    ledger: Arc<dyn LedgerStore>,
}

impl CheckoutLedger {
    pub fn new(ledger: Arc<dyn LedgerStore>) -> Self {
        Self { ledger }
    }

    pub async fn current(&self, asset_id: &str) -> CirculationResult<Option<CheckoutEntity>> {
        self.ledger.active_checkout(asset_id).await
    }

    pub async fn open_entry(&self, asset_id: &str) -> CirculationResult<Option<CheckoutHistoryEntity>> {
        self.ledger.open_history(asset_id).await
    }

    pub async fn history(&self, asset_id: &str, page: Option<&str>,
                         page_size: usize) -> CirculationResult<PaginatedResult<CheckoutHistoryEntity>> {
        self.ledger.history(asset_id, page, page_size).await
    }

    pub fn open(branch_id: &str, asset_id: &str, card_id: &str, now: NaiveDateTime,
                loan_days: i64) -> (CheckoutEntity, CheckoutHistoryEntity, Vec<LedgerOp>) {
        let checkout = CheckoutEntity::open(branch_id, asset_id, card_id, now, loan_days);
        let entry = CheckoutHistoryEntity::open(branch_id, asset_id, card_id, now);
        let ops = vec![
            LedgerOp::InsertCheckout(checkout.clone()),
            LedgerOp::InsertHistory(entry.clone()),
        ];
        (checkout, entry, ops)
    }

    // hand-off: swap the active checkout for a fresh one, atomically with the
    // new open history row; the asset is never observably without a loan
    pub fn reopen(previous: &CheckoutEntity, card_id: &str, now: NaiveDateTime,
                  loan_days: i64) -> (CheckoutEntity, CheckoutHistoryEntity, Vec<LedgerOp>) {
        let checkout = CheckoutEntity::open(previous.branch_id.as_str(), previous.asset_id.as_str(),
                                            card_id, now, loan_days);
        let entry = CheckoutHistoryEntity::open(previous.branch_id.as_str(), previous.asset_id.as_str(),
                                                card_id, now);
        let ops = vec![
            LedgerOp::ReplaceCheckout { checkout: checkout.clone(), previous_version: previous.version },
            LedgerOp::InsertHistory(entry.clone()),
        ];
        (checkout, entry, ops)
    }

    pub fn close(checkout: Option<&CheckoutEntity>, entry: Option<&CheckoutHistoryEntity>,
                 when: NaiveDateTime) -> Vec<LedgerOp> {
        let mut ops = vec![];
        if let Some(checkout) = checkout {
            ops.push(LedgerOp::DeleteCheckout { asset_id: checkout.asset_id.to_string() });
        }
        if let Some(entry) = entry {
            ops.push(LedgerOp::UpdateHistory(entry.close(when)));
        }
        ops
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use chrono::{Duration, NaiveDateTime};
    use crate::checkouts::domain::service::CheckoutLedger;
    use crate::ledger::memory_ledger_store::MemoryLedgerStore;
    use crate::ledger::LedgerStore;
    use crate::utils::date::DATE_FMT;

    fn now() -> NaiveDateTime {
        NaiveDateTime::parse_from_str("2023-04-11T11:11:11.0", DATE_FMT).unwrap()
    }

    #[tokio::test]
    async fn test_should_open_and_close_loan() {
        let store = Arc::new(MemoryLedgerStore::new());
        let ledger = CheckoutLedger::new(store.clone());
        let (checkout, entry, ops) = CheckoutLedger::open("branch1", "asset1", "card1", now(), 30);
        store.transact(ops).await.expect("should open loan");

        let current = ledger.current("asset1").await.expect("should query checkout").unwrap();
        assert_eq!(checkout.checkout_id, current.checkout_id);
        assert_eq!(now() + Duration::days(30), current.until);
        let open = ledger.open_entry("asset1").await.expect("should query history").unwrap();
        assert_eq!(entry.history_id, open.history_id);

        let when = now() + Duration::days(3);
        store.transact(CheckoutLedger::close(Some(&current), Some(&open), when))
            .await.expect("should close loan");
        assert_eq!(None, ledger.current("asset1").await.expect("should query checkout"));
        assert_eq!(None, ledger.open_entry("asset1").await.expect("should query history"));
        let history = ledger.history("asset1", None, 10).await.expect("should query history");
        assert_eq!(1, history.records.len());
        assert_eq!(Some(when), history.records[0].checked_in);
    }

    #[tokio::test]
    async fn test_should_close_nothing_when_no_loan() {
        let ops = CheckoutLedger::close(None, None, now());
        assert!(ops.is_empty());
    }

    #[tokio::test]
    async fn test_should_reopen_loan_for_next_card() {
        let store = Arc::new(MemoryLedgerStore::new());
        let ledger = CheckoutLedger::new(store.clone());
        let (_checkout, entry, ops) = CheckoutLedger::open("branch1", "asset1", "card1", now(), 30);
        store.transact(ops).await.expect("should open loan");
        let current = ledger.current("asset1").await.expect("should query checkout").unwrap();

        let when = now() + Duration::days(3);
        let mut ops = CheckoutLedger::close(None, Some(&entry), when);
        let (next, _next_entry, reopen_ops) = CheckoutLedger::reopen(&current, "card2", when, 30);
        ops.extend(reopen_ops);
        store.transact(ops).await.expect("should hand off loan");

        let current = ledger.current("asset1").await.expect("should query checkout").unwrap();
        assert_eq!(next.checkout_id, current.checkout_id);
        assert_eq!("card2", current.card_id.as_str());
        let open = ledger.open_entry("asset1").await.expect("should query history").unwrap();
        assert_eq!("card2", open.card_id.as_str());
        let history = ledger.history("asset1", None, 10).await.expect("should query history");
        assert_eq!(2, history.records.len());
    }
}
