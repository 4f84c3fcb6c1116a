use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use crate::assets::domain::model::AssetEntity;
use crate::core::circulation::AssetStatus;
use crate::utils::date::serializer;

// AssetDto is a data transfer object for asset detail surfaces
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct AssetDto {
    pub asset_id: String,
    pub version: i64,
    pub title: String,
    pub author_or_director: String,
    pub dewey_call_number: String,
    pub year: i32,
    pub cost: f64,
    pub image_url: String,
    pub location: String,
    pub asset_status: AssetStatus,
    #[serde(with = "serializer")]
    pub created_at: NaiveDateTime,
    #[serde(with = "serializer")]
    pub updated_at: NaiveDateTime,
}

impl From<&AssetEntity> for AssetDto {
    fn from(other: &AssetEntity) -> AssetDto {
        AssetDto {
            asset_id: other.asset_id.to_string(),
            version: other.version,
            title: other.title.to_string(),
            author_or_director: other.author_or_director.to_string(),
            dewey_call_number: other.dewey_call_number.to_string(),
            year: other.year,
            cost: other.cost,
            image_url: other.image_url.to_string(),
            location: other.location.to_string(),
            asset_status: other.asset_status,
            created_at: other.created_at,
            updated_at: other.updated_at,
        }
    }
}
