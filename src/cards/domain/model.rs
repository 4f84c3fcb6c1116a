use chrono::{NaiveDateTime, Utc};
use uuid::Uuid;
use serde::{Deserialize, Serialize};
use crate::core::domain::Identifiable;
use crate::utils::date::serializer;

// CardEntity abstracts a library card. Cards are owned by the surrounding
// patron system; the circulation core only reads them by id.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct CardEntity {
    pub card_id: String,
    pub version: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(with = "serializer")]
    pub created_at: NaiveDateTime,
    #[serde(with = "serializer")]
    pub updated_at: NaiveDateTime,
}

impl CardEntity {
    pub fn new(first_name: &str, last_name: &str, email: &str) -> Self {
        Self {
            card_id: Uuid::new_v4().to_string(),
            version: 0,
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            email: email.to_string(),
            created_at: Utc::now().naive_utc(),
            updated_at: Utc::now().naive_utc(),
        }
    }

    pub fn patron_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

impl Identifiable for CardEntity {
    fn id(&self) -> String {
        self.card_id.to_string()
    }

    fn version(&self) -> i64 {
        self.version
    }
}
