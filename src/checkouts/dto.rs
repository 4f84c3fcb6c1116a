use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use crate::checkouts::domain::model::{CheckoutEntity, CheckoutHistoryEntity};
use crate::utils::date::serializer;

// CheckoutDto is a data transfer object for the active loan on an asset
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct CheckoutDto {
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

impl From<&CheckoutEntity> for CheckoutDto {
    fn from(other: &CheckoutEntity) -> CheckoutDto {
        CheckoutDto {
            checkout_id: other.checkout_id.to_string(),
            version: other.version,
            branch_id: other.branch_id.to_string(),
            asset_id: other.asset_id.to_string(),
            card_id: other.card_id.to_string(),
            since: other.since,
            until: other.until,
            created_at: other.created_at,
            updated_at: other.updated_at,
        }
    }
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct CheckoutHistoryDto {
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

impl From<&CheckoutHistoryEntity> for CheckoutHistoryDto {
    fn from(other: &CheckoutHistoryEntity) -> CheckoutHistoryDto {
        CheckoutHistoryDto {
            history_id: other.history_id.to_string(),
            version: other.version,
            branch_id: other.branch_id.to_string(),
            asset_id: other.asset_id.to_string(),
            card_id: other.card_id.to_string(),
            checked_out: other.checked_out,
            checked_in: other.checked_in,
            created_at: other.created_at,
            updated_at: other.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDateTime};
    use crate::checkouts::domain::model::{CheckoutEntity, CheckoutHistoryEntity};
    use crate::checkouts::dto::{CheckoutDto, CheckoutHistoryDto};
    use crate::utils::date::DATE_FMT;

    #[tokio::test]
    async fn test_should_convert_checkout_to_dto() {
        let now = NaiveDateTime::parse_from_str("2023-04-11T11:11:11.0", DATE_FMT).unwrap();
        let checkout = CheckoutEntity::open("branch1", "asset1", "card1", now, 30);
        let dto = CheckoutDto::from(&checkout);
        assert_eq!(checkout.checkout_id, dto.checkout_id);
        assert_eq!(checkout.until, dto.until);
    }

    #[tokio::test]
    async fn test_should_convert_history_to_dto() {
        let now = NaiveDateTime::parse_from_str("2023-04-11T11:11:11.0", DATE_FMT).unwrap();
        let entry = CheckoutHistoryEntity::open("branch1", "asset1", "card1", now);
        let dto = CheckoutHistoryDto::from(&entry);
        assert_eq!(entry.history_id, dto.history_id);
        assert_eq!(None, dto.checked_in);
    }
}
