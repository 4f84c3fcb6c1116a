use chrono::{NaiveDateTime, Utc};
use rand::Rng;
use uuid::Uuid;
use serde::{Deserialize, Serialize};
use crate::core::circulation::AssetStatus;
use crate::core::domain::Identifiable;
use crate::utils::date::serializer;

// AssetEntity abstracts a single physical lendable item (book, media item).
// One copy, one record; its status is mutated only by lifecycle transactions.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct AssetEntity {
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

impl AssetEntity {
    pub fn new(title: &str, author_or_director: &str, status: AssetStatus) -> Self {
        // dewey_call_number:
        // 000–099: general works
        // 100–199: philosophy and psychology
        // 200–299: religion
        // 300–399: social sciences
        // 400–499: language
        // 500–599: natural sciences and mathematics
        // 600–699: technology
        // 700–799: the arts
        // 800–899: literature and rhetoric
        // 900–999: history, biography, and geography
        Self {
            asset_id: Uuid::new_v4().to_string(),
            version: 0,
            title: title.to_string(),
            author_or_director: author_or_director.to_string(),
            dewey_call_number: format!("{}", rand::thread_rng().gen_range(0..1000)),
            year: 2020, // for testing purpose
            cost: 25.0, // for testing purpose
            image_url: "".to_string(),
            location: "main".to_string(),
            asset_status: status,
            created_at: Utc::now().naive_utc(),
            updated_at: Utc::now().naive_utc(),
        }
    }
}

impl Identifiable for AssetEntity {
    fn id(&self) -> String {
        self.asset_id.to_string()
    }

    fn version(&self) -> i64 {
        self.version
    }
}
