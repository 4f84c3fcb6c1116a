use std::sync::Arc;
use crate::cards::factory::create_card_repository;
use crate::core::domain::{Configuration, SystemClock};
use crate::core::repository::RepositoryStore;
use crate::gateway::factory::create_publisher;
use crate::ledger::factory::create_ledger_store;
use crate::lifecycle::domain::LifecycleService;
use crate::lifecycle::domain::service::LifecycleServiceImpl;

pub async fn create_lifecycle_service(config: &Configuration,
                                      store: RepositoryStore) -> Box<dyn LifecycleService> {
    let ledger = create_ledger_store(store).await;
    let cards = create_card_repository(store).await;
    let publisher = create_publisher(store.gateway_publisher()).await;
    Box::new(LifecycleServiceImpl::new(config, ledger, cards,
                                       Arc::new(SystemClock::default()), publisher))
}

#[cfg(test)]
mod tests {
    use async_once::AsyncOnce;
    use lazy_static::lazy_static;
    use crate::assets::domain::model::AssetEntity;
    use crate::cards::domain::model::CardEntity;
    use crate::cards::factory::create_card_repository;
    use crate::cards::repository::CardRepository;
    use crate::core::circulation::{AssetStatus, Disposition};
    use crate::core::domain::Configuration;
    use crate::core::repository::RepositoryStore;
    use crate::ledger::factory::create_ledger_store;
    use crate::ledger::{LedgerOp, LedgerStore};
    use crate::lifecycle::domain::LifecycleService;
    use crate::lifecycle::factory;

    lazy_static! {
        static ref SUT_SVC: AsyncOnce<Box<dyn LifecycleService>> = AsyncOnce::new(async {
                factory::create_lifecycle_service(&Configuration::new("test"), RepositoryStore::Memory).await
            });
    }

    #[tokio::test]
    async fn test_should_run_loan_cycle_through_factory_service() {
        let svc = SUT_SVC.get().await;

        let ledger = create_ledger_store(RepositoryStore::Memory).await;
        let cards = create_card_repository(RepositoryStore::Memory).await;
        let asset = AssetEntity::new("factory lifecycle title", "author", AssetStatus::Available);
        ledger.transact(vec![LedgerOp::PutAsset(asset.clone())]).await.expect("should put asset");
        let card = CardEntity::new("Ada", "Lovelace", "ada-lifecycle@example.org");
        cards.create(&card).await.expect("should create card");

        let res = svc.check_out(asset.asset_id.as_str(), card.card_id.as_str())
            .await.expect("should check out");
        assert_eq!(Disposition::Applied, res);
        assert!(svc.is_checked_out(asset.asset_id.as_str()).await.expect("should query"));
        let res = svc.check_in(asset.asset_id.as_str()).await.expect("should check in");
        assert_eq!(Disposition::Applied, res);
        assert!(!svc.is_checked_out(asset.asset_id.as_str()).await.expect("should query"));
    }
}
