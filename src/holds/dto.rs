use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use crate::holds::domain::model::HoldEntity;
use crate::utils::date::{serializer, short_date};

// HoldDto is a data transfer object for a queued hold
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct HoldDto {
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

impl HoldDto {
    // the rendering operator surfaces show next to a queued hold
    pub fn placed_on(&self) -> String {
        short_date(self.hold_placed)
    }
}

impl From<&HoldEntity> for HoldDto {
    fn from(other: &HoldEntity) -> HoldDto {
        HoldDto {
            hold_id: other.hold_id.to_string(),
            version: other.version,
            branch_id: other.branch_id.to_string(),
            asset_id: other.asset_id.to_string(),
            card_id: other.card_id.to_string(),
            hold_placed: other.hold_placed,
            created_at: other.created_at,
            updated_at: other.updated_at,
        }
    }
}
