use std::collections::HashMap;
use std::sync::Arc;
use async_trait::async_trait;
use chrono::NaiveDateTime;
use tracing::log::warn;
use crate::assets::domain::model::AssetEntity;
use crate::assets::dto::AssetDto;
use crate::cards::repository::CardRepository;
use crate::checkouts::domain::service::CheckoutLedger;
use crate::checkouts::dto::{CheckoutDto, CheckoutHistoryDto};
use crate::core::circulation::{AssetStatus, CirculationResult, Disposition, PaginatedResult};
use crate::core::domain::{Clock, Configuration};
use crate::core::events::DomainEvent;
use crate::gateway::events::EventPublisher;
use crate::holds::domain::service::HoldQueue;
use crate::holds::dto::HoldDto;
use crate::ledger::{LedgerOp, LedgerStore};
use crate::lifecycle::domain::LifecycleService;

pub struct LifecycleServiceImpl {
    branch_id: String,
    loan_days: i64,
    max_page_size: usize,
    hold_queue: HoldQueue,
    checkout_ledger: CheckoutLedger,
    ledger: Arc<dyn LedgerStore>,
    card_repository: Arc<dyn CardRepository>,
    clock: Arc<dyn Clock>,
    events_publisher: Box<dyn EventPublisher>,
}

impl LifecycleServiceImpl {
    pub fn new(config: &Configuration, ledger: Arc<dyn LedgerStore>,
               card_repository: Arc<dyn CardRepository>, clock: Arc<dyn Clock>,
               events_publisher: Box<dyn EventPublisher>) -> Self {
        Self {
            branch_id: config.branch_id.to_string(),
            loan_days: config.loan_days,
            max_page_size: config.max_page_size,
            hold_queue: HoldQueue::new(ledger.clone()),
            checkout_ledger: CheckoutLedger::new(ledger.clone()),
            ledger,
            card_repository,
            clock,
            events_publisher,
        }
    }

    fn status_op(&self, asset: &AssetEntity, status: AssetStatus, now: NaiveDateTime) -> (AssetEntity, LedgerOp) {
        let mut updated = asset.clone();
        updated.asset_status = status;
        updated.updated_at = now;
        (updated.clone(), LedgerOp::UpdateAsset(updated))
    }

    // a committed transition must never fail because a notification did
    async fn publish(&self, event: serde_json::Result<DomainEvent>) {
        match event {
            Ok(event) => {
                if let Err(err) = self.events_publisher.publish(&event).await {
                    warn!("failed to publish {} event for {}: {}", event.name, event.key, err);
                }
            }
            Err(err) => {
                warn!("failed to build lifecycle event: {}", err);
            }
        }
    }

    // loans the asset out and consumes the named card's earliest hold when
    // asked to; the shared path behind check_out and its operator variant
    async fn check_out_internal(&self, asset_id: &str, card_id: &str,
                                consume_hold: bool) -> CirculationResult<Disposition> {
        let asset = match self.ledger.get_asset(asset_id).await? {
            Some(asset) => asset,
            None => {
                return Ok(Disposition::InvalidReference);
            }
        };
        if self.checkout_ledger.current(asset_id).await?.is_some() {
            return Ok(Disposition::AlreadyCheckedOut);
        }
        let now = self.clock.now();
        let (checkout, _entry, mut ops) = CheckoutLedger::open(
            self.branch_id.as_str(), asset_id, card_id, now, self.loan_days);
        if consume_hold {
            if let Some(hold) = self.hold_queue.earliest_for_card(asset_id, card_id).await? {
                ops.push(HoldQueue::remove(&hold));
            }
        }
        let (_updated, status_op) = self.status_op(&asset, AssetStatus::CheckedOut, now);
        ops.push(status_op);
        self.ledger.transact(ops).await?;
        self.publish(DomainEvent::added(
            "asset_checked_out", "lifecycle", asset_id, self.clock.as_ref(),
            &HashMap::new(), &CheckoutDto::from(&checkout))).await;
        Ok(Disposition::Applied)
    }
}

#[async_trait]
impl LifecycleService for LifecycleServiceImpl {
    async fn check_out(&self, asset_id: &str, card_id: &str) -> CirculationResult<Disposition> {
        self.check_out_internal(asset_id, card_id, false).await
    }

    async fn check_in(&self, asset_id: &str) -> CirculationResult<Disposition> {
        let asset = match self.ledger.get_asset(asset_id).await? {
            Some(asset) => asset,
            None => {
                return Ok(Disposition::InvalidReference);
            }
        };
        let now = self.clock.now();
        let checkout = self.checkout_ledger.current(asset_id).await?;
        let entry = self.checkout_ledger.open_entry(asset_id).await?;
        let mut ops = vec![];

        // serving the earliest hold is part of the same transition: the asset
        // moves straight to the next patron, never transiently Available
        let next = self.hold_queue.peek_earliest(asset_id).await?;
        let fulfilled = match (&next, &checkout) {
            (Some(hold), Some(previous)) => {
                // the reopen swaps the checkout row in place, so the close
                // only stamps the history entry
                ops.extend(CheckoutLedger::close(None, entry.as_ref(), now));
                ops.push(HoldQueue::remove(hold));
                let (next_checkout, _next_entry, reopen_ops) = CheckoutLedger::reopen(
                    previous, hold.card_id.as_str(), now, self.loan_days);
                ops.extend(reopen_ops);
                let (_updated, status_op) = self.status_op(&asset, AssetStatus::CheckedOut, now);
                ops.push(status_op);
                Some(next_checkout)
            }
            (Some(hold), None) => {
                ops.extend(CheckoutLedger::close(None, entry.as_ref(), now));
                ops.push(HoldQueue::remove(hold));
                let (next_checkout, _next_entry, open_ops) = CheckoutLedger::open(
                    self.branch_id.as_str(), asset_id, hold.card_id.as_str(), now, self.loan_days);
                ops.extend(open_ops);
                let (_updated, status_op) = self.status_op(&asset, AssetStatus::CheckedOut, now);
                ops.push(status_op);
                Some(next_checkout)
            }
            (None, _) => {
                ops.extend(CheckoutLedger::close(checkout.as_ref(), entry.as_ref(), now));
                let (_updated, status_op) = self.status_op(&asset, AssetStatus::Available, now);
                ops.push(status_op);
                None
            }
        };
        self.ledger.transact(ops).await?;
        if let Some(closed) = &checkout {
            self.publish(DomainEvent::deleted(
                "asset_checked_in", "lifecycle", asset_id, self.clock.as_ref(),
                &HashMap::new(), &CheckoutDto::from(closed))).await;
        }
        if let Some(next_checkout) = &fulfilled {
            self.publish(DomainEvent::added(
                "hold_fulfilled", "lifecycle", asset_id, self.clock.as_ref(),
                &HashMap::new(), &CheckoutDto::from(next_checkout))).await;
        }
        Ok(Disposition::Applied)
    }

    async fn check_out_to_first_reserve(&self, asset_id: &str, card_id: &str) -> CirculationResult<Disposition> {
        self.check_out_internal(asset_id, card_id, true).await
    }

    async fn place_hold(&self, asset_id: &str, card_id: &str) -> CirculationResult<Disposition> {
        if self.card_repository.get(card_id).await?.is_none() {
            return Ok(Disposition::InvalidReference);
        }
        let asset = match self.ledger.get_asset(asset_id).await? {
            Some(asset) => asset,
            None => {
                return Ok(Disposition::InvalidReference);
            }
        };
        let now = self.clock.now();
        let hold = self.hold_queue.placed(self.branch_id.as_str(), asset_id, card_id, now);
        let mut ops = vec![HoldQueue::enqueue(&hold)];
        if asset.asset_status == AssetStatus::Available {
            let (_updated, status_op) = self.status_op(&asset, AssetStatus::OnHold, now);
            ops.push(status_op);
        }
        self.ledger.transact(ops).await?;
        self.publish(DomainEvent::added(
            "hold_placed", "lifecycle", asset_id, self.clock.as_ref(),
            &HashMap::new(), &HoldDto::from(&hold))).await;
        Ok(Disposition::Applied)
    }

    async fn mark_lost(&self, asset_id: &str) -> CirculationResult<Disposition> {
        let asset = match self.ledger.get_asset(asset_id).await? {
            Some(asset) => asset,
            None => {
                return Ok(Disposition::InvalidReference);
            }
        };
        let now = self.clock.now();
        // a lost asset carries no active loan: close the checkout and stamp
        // the history row in the same transition
        let checkout = self.checkout_ledger.current(asset_id).await?;
        let entry = self.checkout_ledger.open_entry(asset_id).await?;
        let mut ops = CheckoutLedger::close(checkout.as_ref(), entry.as_ref(), now);
        let (updated, status_op) = self.status_op(&asset, AssetStatus::Lost, now);
        ops.push(status_op);
        self.ledger.transact(ops).await?;
        self.publish(DomainEvent::updated(
            "asset_marked_lost", "lifecycle", asset_id, self.clock.as_ref(),
            &HashMap::new(), &AssetDto::from(&updated))).await;
        Ok(Disposition::Applied)
    }

    async fn mark_found(&self, asset_id: &str) -> CirculationResult<Disposition> {
        let asset = match self.ledger.get_asset(asset_id).await? {
            Some(asset) => asset,
            None => {
                return Ok(Disposition::InvalidReference);
            }
        };
        let now = self.clock.now();
        // operator override: the asset goes back on the shelf; pending holds
        // wait for the next regular check-in
        let checkout = self.checkout_ledger.current(asset_id).await?;
        let entry = self.checkout_ledger.open_entry(asset_id).await?;
        let mut ops = CheckoutLedger::close(checkout.as_ref(), entry.as_ref(), now);
        let (updated, status_op) = self.status_op(&asset, AssetStatus::Available, now);
        ops.push(status_op);
        self.ledger.transact(ops).await?;
        self.publish(DomainEvent::updated(
            "asset_marked_found", "lifecycle", asset_id, self.clock.as_ref(),
            &HashMap::new(), &AssetDto::from(&updated))).await;
        Ok(Disposition::Applied)
    }

    async fn find_asset(&self, asset_id: &str) -> CirculationResult<Option<AssetDto>> {
        Ok(self.ledger.get_asset(asset_id).await?.as_ref().map(AssetDto::from))
    }

    async fn is_checked_out(&self, asset_id: &str) -> CirculationResult<bool> {
        Ok(self.checkout_ledger.current(asset_id).await?.is_some())
    }

    async fn current_checkout(&self, asset_id: &str) -> CirculationResult<Option<CheckoutDto>> {
        Ok(self.checkout_ledger.current(asset_id).await?.as_ref().map(CheckoutDto::from))
    }

    async fn checkout_history(&self, asset_id: &str, page: Option<&str>,
                              page_size: usize) -> CirculationResult<PaginatedResult<CheckoutHistoryDto>> {
        let page_size = std::cmp::min(page_size, self.max_page_size);
        let res = self.checkout_ledger.history(asset_id, page, page_size).await?;
        let records = res.records.iter().map(CheckoutHistoryDto::from).collect();
        Ok(PaginatedResult::new(page, page_size, res.next_page, records))
    }

    async fn current_holds(&self, asset_id: &str) -> CirculationResult<Vec<HoldDto>> {
        Ok(self.hold_queue.list(asset_id).await?.iter().map(HoldDto::from).collect())
    }

    async fn next_hold(&self, asset_id: &str) -> CirculationResult<Option<HoldDto>> {
        Ok(self.hold_queue.peek_earliest(asset_id).await?.as_ref().map(HoldDto::from))
    }

    async fn hold_count(&self, asset_id: &str) -> CirculationResult<usize> {
        self.hold_queue.count(asset_id).await
    }

    async fn hold_placed(&self, hold_id: &str) -> CirculationResult<Option<NaiveDateTime>> {
        Ok(self.hold_queue.get(hold_id).await?.map(|hold| hold.hold_placed))
    }

    async fn current_checkout_patron(&self, asset_id: &str) -> CirculationResult<String> {
        match self.checkout_ledger.current(asset_id).await? {
            Some(checkout) => {
                self.card_repository.patron_name(checkout.card_id.as_str()).await
            }
            None => {
                Ok(String::new())
            }
        }
    }

    async fn hold_patron_name(&self, hold_id: &str) -> CirculationResult<String> {
        match self.hold_queue.get(hold_id).await? {
            Some(hold) => {
                self.card_repository.patron_name(hold.card_id.as_str()).await
            }
            None => {
                Ok(String::new())
            }
        }
    }
}
