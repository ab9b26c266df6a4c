//! Guest view of a registry.
//!
//! Guests see only what they need to pick a gift: the owner's email and
//! private items are never exposed, and fulfilled items are left out.

use axum::extract::{Path, State};
use axum::Json;
use chrono::NaiveDate;
use cradle_core::error::CoreError;
use cradle_core::types::DbId;
use cradle_db::models::item::Item;
use cradle_db::repositories::{ItemRepo, RegistryRepo};
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct PublicRegistry {
    pub title: String,
    pub owner_name: String,
    pub arrival_date: Option<NaiveDate>,
    pub items: Vec<PublicItem>,
}

#[derive(Debug, Serialize)]
pub struct PublicItem {
    pub id: DbId,
    pub name: String,
    pub category: String,
    pub price_cents: Option<i64>,
    pub product_url: Option<String>,
    pub quantity: i32,
    pub remaining: i32,
    pub is_most_wanted: bool,
}

impl From<Item> for PublicItem {
    fn from(item: Item) -> Self {
        Self {
            remaining: item.remaining(),
            id: item.id,
            name: item.name,
            category: item.category,
            price_cents: item.price_cents,
            product_url: item.product_url,
            quantity: item.quantity,
            is_most_wanted: item.is_most_wanted,
        }
    }
}

/// GET /api/v1/public/{slug}
pub async fn get_registry(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<Json<DataResponse<PublicRegistry>>> {
    // Slugs are not ids; a miss reports id 0.
    let registry = RegistryRepo::find_by_slug(&state.pool, &slug)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Registry",
            id: 0,
        }))?;

    let items = ItemRepo::list_available(&state.pool, registry.id).await?;

    Ok(Json(DataResponse {
        data: PublicRegistry {
            title: registry.title,
            owner_name: registry.owner_name,
            arrival_date: registry.arrival_date,
            items: items.into_iter().map(PublicItem::from).collect(),
        },
    }))
}
