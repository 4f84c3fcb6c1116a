use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use crate::core::domain::Identifiable;
use crate::utils::date::serializer;

// HoldEntity is one patron's queued claim on an asset. Holds for an asset
// are served ascending by (hold_placed, hold_id); the id tie-break keeps the
// order total when two holds land on the same timestamp.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct HoldEntity {
    pub hold_id: String,
    pub version: i64,
    pub branch_id: String,
    pub asset_id: String,
    pub card_id: String,
    #[serde(with = "serializer")]
    pub hold_placed: NaiveDateTime,
    #[serde(with = "serializer")]
    pub created_at: NaiveDateTime,
    #[serde(with = "serializer")]
    pub updated_at: NaiveDateTime,
}

impl HoldEntity {
    pub fn placed(branch_id: &str, asset_id: &str, card_id: &str, now: NaiveDateTime) -> Self {
        Self {
            hold_id: Uuid::new_v4().to_string(),
            version: 0,
            branch_id: branch_id.to_string(),
            asset_id: asset_id.to_string(),
            card_id: card_id.to_string(),
            hold_placed: now,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Identifiable for HoldEntity {
    fn id(&self) -> String {
        self.hold_id.to_string()
    }

    fn version(&self) -> i64 {
        self.version
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDateTime;
    use crate::holds::domain::model::HoldEntity;
    use crate::utils::date::DATE_FMT;

    #[tokio::test]
    async fn test_should_build_hold() {
        let now = NaiveDateTime::parse_from_str("2023-04-11T11:11:11.0", DATE_FMT).unwrap();
        let hold = HoldEntity::placed("branch1", "asset1", "card1", now);
        assert_eq!("asset1", hold.asset_id.as_str());
        assert_eq!("card1", hold.card_id.as_str());
        assert_eq!(now, hold.hold_placed);
    }
}
