//! Registry item entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use cradle_core::quantity;
use cradle_core::store::ItemSnapshot;
use cradle_core::types::{DbId, Timestamp};

/// A row from the `items` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Item {
    pub id: DbId,
    pub registry_id: DbId,
    pub name: String,
    pub category: String,
    pub price_cents: Option<i64>,
    pub product_url: Option<String>,
    pub quantity: i32,
    pub quantity_received: i32,
    pub received_override: bool,
    pub is_most_wanted: bool,
    pub is_private: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Item {
    pub fn remaining(&self) -> i32 {
        quantity::remaining(self.quantity, self.quantity_received)
    }

    pub fn is_fulfilled(&self) -> bool {
        quantity::is_fulfilled(self.quantity, self.quantity_received)
    }

    pub fn snapshot(&self) -> ItemSnapshot {
        ItemSnapshot {
            id: self.id,
            registry_id: self.registry_id,
            name: self.name.clone(),
            quantity: self.quantity,
            quantity_received: self.quantity_received,
            is_private: self.is_private,
        }
    }
}

/// Item plus derived progress fields, as returned by the API.
#[derive(Debug, Clone, Serialize)]
pub struct ItemWithProgress {
    #[serde(flatten)]
    pub item: Item,
    pub remaining: i32,
    pub fulfilled: bool,
}

impl From<Item> for ItemWithProgress {
    fn from(item: Item) -> Self {
        Self {
            remaining: item.remaining(),
            fulfilled: item.is_fulfilled(),
            item,
        }
    }
}

/// DTO for creating a new item.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateItem {
    pub name: String,
    /// Defaults to `other` if omitted.
    pub category: Option<String>,
    pub price_cents: Option<i64>,
    pub product_url: Option<String>,
    /// Defaults to 1 if omitted.
    pub quantity: Option<i32>,
    pub is_most_wanted: Option<bool>,
    pub is_private: Option<bool>,
}

/// DTO for an owner edit. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateItem {
    pub name: Option<String>,
    pub category: Option<String>,
    pub price_cents: Option<i64>,
    pub product_url: Option<String>,
    pub quantity: Option<i32>,
    pub is_most_wanted: Option<bool>,
    pub is_private: Option<bool>,
}

/// Body for `PUT /items/{id}/received`.
#[derive(Debug, Clone, Deserialize)]
pub struct SetReceivedRequest {
    pub quantity_received: i32,
}
