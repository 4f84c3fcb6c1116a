use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use crate::cards::domain::model::CardEntity;
use crate::utils::date::serializer;

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct CardDto {
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

impl CardDto {
    pub fn patron_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

impl From<&CardEntity> for CardDto {
    fn from(other: &CardEntity) -> CardDto {
        CardDto {
            card_id: other.card_id.to_string(),
            version: other.version,
            first_name: other.first_name.to_string(),
            last_name: other.last_name.to_string(),
            email: other.email.to_string(),
            created_at: other.created_at,
            updated_at: other.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::cards::domain::model::CardEntity;
    use crate::cards::dto::CardDto;

    #[tokio::test]
    async fn test_should_convert_card_to_dto() {
        let card = CardEntity::new("Ada", "Lovelace", "ada@example.org");
        let dto = CardDto::from(&card);
        assert_eq!(card.card_id, dto.card_id);
        assert_eq!("Ada Lovelace", dto.patron_name().as_str());
    }
}
