use async_trait::async_trait;
use chrono::NaiveDateTime;
use crate::assets::dto::AssetDto;
use crate::checkouts::dto::{CheckoutDto, CheckoutHistoryDto};
use crate::core::circulation::{CirculationResult, Disposition, PaginatedResult};
use crate::holds::dto::HoldDto;

pub mod service;

// LifecycleService is the asset lifecycle controller: it owns every status
// transition and runs each one as a single atomic write-set against the
// ledger store. Mutations report their outcome as a Disposition; callers
// must branch on it, since a missing reference or a checkout collision is a
// quiet no-op rather than an error.
#[async_trait]
pub trait LifecycleService: Sync + Send {
    // loans the asset to the card for the configured loan window
    async fn check_out(&self, asset_id: &str, card_id: &str) -> CirculationResult<Disposition>;

    // returns the asset; serves the globally earliest hold in the same
    // transaction, or shelves the asset as Available when none is queued
    async fn check_in(&self, asset_id: &str) -> CirculationResult<Disposition>;

    // operator override: loans the asset to the named card and consumes that
    // card's earliest hold for the asset, if one exists
    async fn check_out_to_first_reserve(&self, asset_id: &str, card_id: &str) -> CirculationResult<Disposition>;

    // queues a hold; holds accumulate regardless of the current status
    async fn place_hold(&self, asset_id: &str, card_id: &str) -> CirculationResult<Disposition>;

    async fn mark_lost(&self, asset_id: &str) -> CirculationResult<Disposition>;

    async fn mark_found(&self, asset_id: &str) -> CirculationResult<Disposition>;

    async fn find_asset(&self, asset_id: &str) -> CirculationResult<Option<AssetDto>>;

    async fn is_checked_out(&self, asset_id: &str) -> CirculationResult<bool>;

    async fn current_checkout(&self, asset_id: &str) -> CirculationResult<Option<CheckoutDto>>;

    async fn checkout_history(&self, asset_id: &str, page: Option<&str>,
                              page_size: usize) -> CirculationResult<PaginatedResult<CheckoutHistoryDto>>;

    async fn current_holds(&self, asset_id: &str) -> CirculationResult<Vec<HoldDto>>;

    async fn next_hold(&self, asset_id: &str) -> CirculationResult<Option<HoldDto>>;

    async fn hold_count(&self, asset_id: &str) -> CirculationResult<usize>;

    async fn hold_placed(&self, hold_id: &str) -> CirculationResult<Option<NaiveDateTime>>;

    // display name of the patron holding the asset, empty when none
    async fn current_checkout_patron(&self, asset_id: &str) -> CirculationResult<String>;

    // display name of the patron behind a hold, empty when unresolvable
    async fn hold_patron_name(&self, hold_id: &str) -> CirculationResult<String>;
}
