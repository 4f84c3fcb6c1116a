use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use crate::core::domain::Identifiable;
use crate::utils::date::serializer;

// CheckoutEntity is the currently active loan for an asset. The ledger store
// keys it by asset_id, so at most one row can exist per asset.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct CheckoutEntity {
    pub checkout_id: String,
    pub version: i64,
    pub branch_id: String,
    pub asset_id: String,
    pub card_id: String,
    #[serde(with = "serializer")]
    pub since: NaiveDateTime,
    #[serde(with = "serializer")]
    pub until: NaiveDateTime,
    #[serde(with = "serializer")]
    pub created_at: NaiveDateTime,
    #[serde(with = "serializer")]
    pub updated_at: NaiveDateTime,
}

impl CheckoutEntity {
    pub fn open(branch_id: &str, asset_id: &str, card_id: &str,
                now: NaiveDateTime, loan_days: i64) -> Self {
        Self {
            checkout_id: Uuid::new_v4().to_string(),
            version: 0,
            branch_id: branch_id.to_string(),
            asset_id: asset_id.to_string(),
            card_id: card_id.to_string(),
            since: now,
            until: now + Duration::days(loan_days),
            created_at: now,
            updated_at: now,
        }
    }
}

impl Identifiable for CheckoutEntity {
    fn id(&self) -> String {
        self.checkout_id.to_string()
    }

    fn version(&self) -> i64 {
        self.version
    }
}

// CheckoutHistoryEntity is one row of the append-only loan audit log. An
// open row (checked_in = None) exists iff the asset is currently checked out.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct CheckoutHistoryEntity {
    pub history_id: String,
    pub version: i64,
    pub branch_id: String,
    pub asset_id: String,
    pub card_id: String,
    #[serde(with = "serializer")]
    pub checked_out: NaiveDateTime,
    pub checked_in: Option<NaiveDateTime>,
    #[serde(with = "serializer")]
    pub created_at: NaiveDateTime,
    #[serde(with = "serializer")]
    pub updated_at: NaiveDateTime,
}

impl CheckoutHistoryEntity {
    pub fn open(branch_id: &str, asset_id: &str, card_id: &str, now: NaiveDateTime) -> Self {
        Self {
            history_id: Uuid::new_v4().to_string(),
            version: 0,
            branch_id: branch_id.to_string(),
            asset_id: asset_id.to_string(),
            card_id: card_id.to_string(),
            checked_out: now,
            checked_in: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn close(&self, when: NaiveDateTime) -> Self {
        let mut closed = self.clone();
        closed.checked_in = Some(when);
        closed.updated_at = when;
        closed
    }

    pub fn is_open(&self) -> bool {
        self.checked_in.is_none()
    }
}

impl Identifiable for CheckoutHistoryEntity {
    fn id(&self) -> String {
        self.history_id.to_string()
    }

    fn version(&self) -> i64 {
        self.version
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, NaiveDateTime};
    use crate::checkouts::domain::model::{CheckoutEntity, CheckoutHistoryEntity};
    use crate::utils::date::DATE_FMT;

    fn now() -> NaiveDateTime {
        NaiveDateTime::parse_from_str("2023-04-11T11:11:11.0", DATE_FMT).unwrap()
    }

    #[tokio::test]
    async fn test_should_open_checkout_with_loan_window() {
        let checkout = CheckoutEntity::open("branch1", "asset1", "card1", now(), 30);
        assert_eq!("asset1", checkout.asset_id.as_str());
        assert_eq!("card1", checkout.card_id.as_str());
        assert_eq!(now(), checkout.since);
        assert_eq!(now() + Duration::days(30), checkout.until);
    }

    #[tokio::test]
    async fn test_should_open_and_close_history() {
        let entry = CheckoutHistoryEntity::open("branch1", "asset1", "card1", now());
        assert!(entry.is_open());
        let closed = entry.close(now() + Duration::days(3));
        assert!(!closed.is_open());
        assert_eq!(Some(now() + Duration::days(3)), closed.checked_in);
        assert_eq!(entry.history_id, closed.history_id);
    }
}
