use std::collections::HashMap;
use async_trait::async_trait;
use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::types::AttributeValue;
use chrono::Utc;
use crate::cards::domain::model::CardEntity;
use crate::cards::repository::CardRepository;
use crate::core::circulation::{CirculationError, CirculationResult};
use crate::utils::ddb::{parse_date_attribute, parse_item, parse_number_attribute, parse_string_attribute};

#[derive(Debug)]
pub struct DDBCardRepository {
    client: Client,
    table_name: String,
}

impl DDBCardRepository {
    pub(crate) fn new(client: Client, table_name: &str) -> Self {
        Self {
            client,
            table_name: table_name.to_string(),
        }
    }
}

#[async_trait]
impl CardRepository for DDBCardRepository {
    async fn create(&self, card: &CardEntity) -> CirculationResult<usize> {
        let table_name: &str = self.table_name.as_ref();
        let val = serde_json::to_value(card)?;
        self.client
            .put_item()
            .table_name(table_name)
            .condition_expression("attribute_not_exists(card_id)")
            .set_item(Some(parse_item(val)?))
            .send()
            .await.map(|_| 1).map_err(CirculationError::from)
    }

    async fn get(&self, id: &str) -> CirculationResult<Option<CardEntity>> {
        let table_name: &str = self.table_name.as_ref();
        self.client
            .query()
            .table_name(table_name)
            .limit(2)
            .consistent_read(true)
            .key_condition_expression(
                "card_id = :card_id",
            )
            .expression_attribute_values(
                ":card_id",
                AttributeValue::S(id.to_string()),
            )
            .send()
            .await.map_err(CirculationError::from).and_then(|req| {
            if let Some(items) = req.items {
                if items.len() > 1 {
                    return Err(CirculationError::database(format!("too many cards for {}", id).as_str(), None, false));
                }
                Ok(items.first().map(CardEntity::from))
            } else {
                Ok(None)
            }
        })
    }
}

impl From<&HashMap<String, AttributeValue>> for CardEntity {
    fn from(map: &HashMap<String, AttributeValue>) -> Self {
        CardEntity {
            card_id: parse_string_attribute("card_id", map).unwrap_or_else(|| String::from("")),
            version: parse_number_attribute("version", map),
            first_name: parse_string_attribute("first_name", map).unwrap_or_else(|| String::from("")),
            last_name: parse_string_attribute("last_name", map).unwrap_or_else(|| String::from("")),
            email: parse_string_attribute("email", map).unwrap_or_else(|| String::from("")),
            created_at: parse_date_attribute("created_at", map).unwrap_or_else(|| Utc::now().naive_utc()),
            updated_at: parse_date_attribute("updated_at", map).unwrap_or_else(|| Utc::now().naive_utc()),
        }
    }
}
