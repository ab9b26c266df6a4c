//! Purchase ledger entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use cradle_core::buyer::BuyerInfo;
use cradle_core::types::{DbId, Timestamp};

use crate::models::status::StatusId;

/// A row from the `purchases` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Purchase {
    pub id: DbId,
    pub item_id: DbId,
    pub buyer_name: String,
    pub buyer_email: String,
    pub buyer_phone: Option<String>,
    pub gift_message: Option<String>,
    pub is_surprise: bool,
    pub quantity_purchased: i32,
    pub status_id: StatusId,
    pub confirmed_at: Option<Timestamp>,
    pub is_seen: bool,
    pub is_received: bool,
    pub thanked_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Body for `POST /items/{id}/purchases`.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitPurchaseRequest {
    #[serde(flatten)]
    pub buyer: BuyerInfo,
    pub quantity: i32,
}

/// Owner bookkeeping patch. `thanked = true` stamps `thanked_at`,
/// `thanked = false` clears it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdatePurchaseFlags {
    pub is_seen: Option<bool>,
    pub is_received: Option<bool>,
    pub thanked: Option<bool>,
}

/// Owner-side badge counts for a registry.
#[derive(Debug, Clone, Default, FromRow, Serialize)]
pub struct GiftSummary {
    pub confirmed_purchases: i64,
    pub unseen: i64,
    pub surprises: i64,
    pub awaiting_thanks: i64,
    pub fulfilled_items: i64,
}
