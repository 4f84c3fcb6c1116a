use std::cmp;
use std::collections::HashMap;
use async_trait::async_trait;
use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::types::{AttributeValue, Delete, Put, TransactWriteItem};
use chrono::Utc;
use serde::Serialize;
use crate::assets::domain::model::AssetEntity;
use crate::checkouts::domain::model::{CheckoutEntity, CheckoutHistoryEntity};
use crate::core::circulation::{AssetStatus, CirculationError, CirculationResult, PaginatedResult};
use crate::holds::domain::model::HoldEntity;
use crate::ledger::{LedgerOp, LedgerStore};
use crate::utils::ddb::{from_ddb, parse_date_attribute, parse_float_attribute, parse_item, parse_number_attribute, parse_string_attribute, to_ddb_page};

pub(crate) const ASSETS_TABLE: &str = "assets";
pub(crate) const CHECKOUTS_TABLE: &str = "checkouts";
pub(crate) const HISTORY_TABLE: &str = "checkout_history";
pub(crate) const HOLDS_TABLE: &str = "holds";

// DDBLedgerStore keeps every circulation row in DynamoDB. Single-row reads
// query the table keys; per-asset listings go through the (asset_id, time)
// secondary indexes; transact() maps the write-set onto one
// TransactWriteItems call so a lifecycle transition commits or cancels as a
// unit. The checkouts table is keyed by asset_id, so the table itself cannot
// hold two active checkouts for one asset.
#[derive(Debug)]
pub struct DDBLedgerStore {
    client: Client,
}

impl DDBLedgerStore {
    pub(crate) fn new(client: Client) -> Self {
        Self { client }
    }

    fn item_for<T: Serialize>(entity: &T) -> CirculationResult<HashMap<String, AttributeValue>> {
        let val = serde_json::to_value(entity)?;
        Ok(parse_item(val)?)
    }

    fn insert(table_name: &str, key: &str,
              item: HashMap<String, AttributeValue>) -> TransactWriteItem {
        TransactWriteItem::builder()
            .put(Put::builder()
                .table_name(table_name)
                .condition_expression(format!("attribute_not_exists({})", key))
                .set_item(Some(item))
                .build())
            .build()
    }

    fn replace(table_name: &str, old_version: i64,
               item: HashMap<String, AttributeValue>) -> TransactWriteItem {
        TransactWriteItem::builder()
            .put(Put::builder()
                .table_name(table_name)
                .condition_expression("attribute_exists(version) AND version = :old_version")
                .expression_attribute_values(":old_version", AttributeValue::N(old_version.to_string()))
                .set_item(Some(item))
                .build())
            .build()
    }

    fn remove(table_name: &str, key: &str, id: &str) -> TransactWriteItem {
        TransactWriteItem::builder()
            .delete(Delete::builder()
                .table_name(table_name)
                .key(key, AttributeValue::S(id.to_string()))
                .condition_expression(format!("attribute_exists({})", key))
                .build())
            .build()
    }

    fn to_write_item(op: &LedgerOp) -> CirculationResult<TransactWriteItem> {
        match op {
            LedgerOp::PutAsset(asset) => {
                Ok(Self::insert(ASSETS_TABLE, "asset_id", Self::item_for(asset)?))
            }
            LedgerOp::UpdateAsset(asset) => {
                let mut bumped = asset.clone();
                bumped.version += 1;
                Ok(Self::replace(ASSETS_TABLE, asset.version, Self::item_for(&bumped)?))
            }
            LedgerOp::InsertCheckout(checkout) => {
                Ok(Self::insert(CHECKOUTS_TABLE, "asset_id", Self::item_for(checkout)?))
            }
            LedgerOp::ReplaceCheckout { checkout, previous_version } => {
                Ok(Self::replace(CHECKOUTS_TABLE, *previous_version, Self::item_for(checkout)?))
            }
            LedgerOp::DeleteCheckout { asset_id } => {
                Ok(Self::remove(CHECKOUTS_TABLE, "asset_id", asset_id.as_str()))
            }
            LedgerOp::InsertHistory(entry) => {
                Ok(Self::insert(HISTORY_TABLE, "history_id", Self::item_for(entry)?))
            }
            LedgerOp::UpdateHistory(entry) => {
                let mut bumped = entry.clone();
                bumped.version += 1;
                Ok(Self::replace(HISTORY_TABLE, entry.version, Self::item_for(&bumped)?))
            }
            LedgerOp::InsertHold(hold) => {
                Ok(Self::insert(HOLDS_TABLE, "hold_id", Self::item_for(hold)?))
            }
            LedgerOp::RemoveHold { hold_id } => {
                Ok(Self::remove(HOLDS_TABLE, "hold_id", hold_id.as_str()))
            }
        }
    }

    async fn get_by_key(&self, table_name: &str, key: &str,
                        id: &str) -> CirculationResult<Option<HashMap<String, AttributeValue>>> {
        self.client
            .query()
            .table_name(table_name)
            .limit(2)
            .consistent_read(true)
            .key_condition_expression(format!("{} = :id", key))
            .expression_attribute_values(":id", AttributeValue::S(id.to_string()))
            .send()
            .await.map_err(CirculationError::from).and_then(|req| {
            if let Some(items) = req.items {
                if items.len() > 1 {
                    return Err(CirculationError::database(
                        format!("too many {} rows for {}", table_name, id).as_str(), None, false));
                }
                Ok(items.into_iter().next())
            } else {
                Ok(None)
            }
        })
    }
}

#[async_trait]
impl LedgerStore for DDBLedgerStore {
    async fn get_asset(&self, asset_id: &str) -> CirculationResult<Option<AssetEntity>> {
        let item = self.get_by_key(ASSETS_TABLE, "asset_id", asset_id).await?;
        Ok(item.as_ref().map(AssetEntity::from))
    }

    async fn active_checkout(&self, asset_id: &str) -> CirculationResult<Option<CheckoutEntity>> {
        let item = self.get_by_key(CHECKOUTS_TABLE, "asset_id", asset_id).await?;
        Ok(item.as_ref().map(CheckoutEntity::from))
    }

    async fn open_history(&self, asset_id: &str) -> CirculationResult<Option<CheckoutHistoryEntity>> {
        // the open row, when it exists, is the newest entry for the asset
        self.client
            .query()
            .table_name(HISTORY_TABLE)
            .index_name(format!("{}_ndx", HISTORY_TABLE))
            .limit(1)
            .scan_index_forward(false)
            .key_condition_expression("asset_id = :asset_id")
            .expression_attribute_values(":asset_id", AttributeValue::S(asset_id.to_string()))
            .send()
            .await.map_err(CirculationError::from).map(|req| {
            req.items.as_ref().unwrap_or(&vec![]).iter()
                .map(CheckoutHistoryEntity::from)
                .find(CheckoutHistoryEntity::is_open)
        })
    }

    async fn history(&self, asset_id: &str,
                     page: Option<&str>, page_size: usize) -> CirculationResult<PaginatedResult<CheckoutHistoryEntity>> {
        let predicate = HashMap::from([("asset_id".to_string(), asset_id.to_string())]);
        let exclusive_start_key = to_ddb_page(page, &predicate);
        self.client
            .query()
            .table_name(HISTORY_TABLE)
            .index_name(format!("{}_ndx", HISTORY_TABLE))
            .limit(cmp::min(page_size, 500) as i32)
            .scan_index_forward(false)
            .set_exclusive_start_key(exclusive_start_key)
            .key_condition_expression("asset_id = :asset_id")
            .expression_attribute_values(":asset_id", AttributeValue::S(asset_id.to_string()))
            .send()
            .await.map_err(CirculationError::from).map(|req| {
            let records = req.items.as_ref().unwrap_or(&vec![]).iter()
                .map(CheckoutHistoryEntity::from).collect();
            from_ddb(page, page_size, req.last_evaluated_key(), records)
        })
    }

    async fn holds(&self, asset_id: &str) -> CirculationResult<Vec<HoldEntity>> {
        self.client
            .query()
            .table_name(HOLDS_TABLE)
            .index_name(format!("{}_ndx", HOLDS_TABLE))
            .limit(500)
            .scan_index_forward(true)
            .key_condition_expression("asset_id = :asset_id")
            .expression_attribute_values(":asset_id", AttributeValue::S(asset_id.to_string()))
            .send()
            .await.map_err(CirculationError::from).map(|req| {
            req.items.as_ref().unwrap_or(&vec![]).iter()
                .map(HoldEntity::from).collect()
        })
    }

    async fn get_hold(&self, hold_id: &str) -> CirculationResult<Option<HoldEntity>> {
        let item = self.get_by_key(HOLDS_TABLE, "hold_id", hold_id).await?;
        Ok(item.as_ref().map(HoldEntity::from))
    }

    async fn transact(&self, ops: Vec<LedgerOp>) -> CirculationResult<()> {
        let mut request = self.client.transact_write_items();
        for op in &ops {
            request = request.transact_items(Self::to_write_item(op)?);
        }
        request.send().await.map(|_| ()).map_err(CirculationError::from)
    }
}

impl From<&HashMap<String, AttributeValue>> for AssetEntity {
    fn from(map: &HashMap<String, AttributeValue>) -> Self {
        AssetEntity {
            asset_id: parse_string_attribute("asset_id", map).unwrap_or_else(|| String::from("")),
            version: parse_number_attribute("version", map),
            title: parse_string_attribute("title", map).unwrap_or_else(|| String::from("")),
            author_or_director: parse_string_attribute("author_or_director", map).unwrap_or_else(|| String::from("")),
            dewey_call_number: parse_string_attribute("dewey_call_number", map).unwrap_or_else(|| String::from("")),
            year: parse_number_attribute("year", map) as i32,
            cost: parse_float_attribute("cost", map),
            image_url: parse_string_attribute("image_url", map).unwrap_or_else(|| String::from("")),
            location: parse_string_attribute("location", map).unwrap_or_else(|| String::from("")),
            asset_status: AssetStatus::from(parse_string_attribute("asset_status", map).unwrap_or_else(|| AssetStatus::Unknown.to_string())),
            created_at: parse_date_attribute("created_at", map).unwrap_or_else(|| Utc::now().naive_utc()),
            updated_at: parse_date_attribute("updated_at", map).unwrap_or_else(|| Utc::now().naive_utc()),
        }
    }
}

impl From<&HashMap<String, AttributeValue>> for CheckoutEntity {
    fn from(map: &HashMap<String, AttributeValue>) -> Self {
        CheckoutEntity {
            checkout_id: parse_string_attribute("checkout_id", map).unwrap_or_else(|| String::from("")),
            version: parse_number_attribute("version", map),
            branch_id: parse_string_attribute("branch_id", map).unwrap_or_else(|| String::from("")),
            asset_id: parse_string_attribute("asset_id", map).unwrap_or_else(|| String::from("")),
            card_id: parse_string_attribute("card_id", map).unwrap_or_else(|| String::from("")),
            since: parse_date_attribute("since", map).unwrap_or_else(|| Utc::now().naive_utc()),
            until: parse_date_attribute("until", map).unwrap_or_else(|| Utc::now().naive_utc()),
            created_at: parse_date_attribute("created_at", map).unwrap_or_else(|| Utc::now().naive_utc()),
            updated_at: parse_date_attribute("updated_at", map).unwrap_or_else(|| Utc::now().naive_utc()),
        }
    }
}

impl From<&HashMap<String, AttributeValue>> for CheckoutHistoryEntity {
    fn from(map: &HashMap<String, AttributeValue>) -> Self {
        CheckoutHistoryEntity {
            history_id: parse_string_attribute("history_id", map).unwrap_or_else(|| String::from("")),
            version: parse_number_attribute("version", map),
            branch_id: parse_string_attribute("branch_id", map).unwrap_or_else(|| String::from("")),
            asset_id: parse_string_attribute("asset_id", map).unwrap_or_else(|| String::from("")),
            card_id: parse_string_attribute("card_id", map).unwrap_or_else(|| String::from("")),
            checked_out: parse_date_attribute("checked_out", map).unwrap_or_else(|| Utc::now().naive_utc()),
            checked_in: parse_date_attribute("checked_in", map),
            created_at: parse_date_attribute("created_at", map).unwrap_or_else(|| Utc::now().naive_utc()),
            updated_at: parse_date_attribute("updated_at", map).unwrap_or_else(|| Utc::now().naive_utc()),
        }
    }
}

impl From<&HashMap<String, AttributeValue>> for HoldEntity {
    fn from(map: &HashMap<String, AttributeValue>) -> Self {
        HoldEntity {
            hold_id: parse_string_attribute("hold_id", map).unwrap_or_else(|| String::from("")),
            version: parse_number_attribute("version", map),
            branch_id: parse_string_attribute("branch_id", map).unwrap_or_else(|| String::from("")),
            asset_id: parse_string_attribute("asset_id", map).unwrap_or_else(|| String::from("")),
            card_id: parse_string_attribute("card_id", map).unwrap_or_else(|| String::from("")),
            hold_placed: parse_date_attribute("hold_placed", map).unwrap_or_else(|| Utc::now().naive_utc()),
            created_at: parse_date_attribute("created_at", map).unwrap_or_else(|| Utc::now().naive_utc()),
            updated_at: parse_date_attribute("updated_at", map).unwrap_or_else(|| Utc::now().naive_utc()),
        }
    }
}
