//! Handlers for registry items and the owner's counter operations.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use cradle_core::category::ItemCategory;
use cradle_core::error::CoreError;
use cradle_core::quantity;
use cradle_core::reconciliation::ReconcileOutcome;
use cradle_core::types::DbId;
use cradle_db::models::item::{CreateItem, Item, ItemWithProgress, SetReceivedRequest, UpdateItem};
use cradle_db::repositories::ItemRepo;

use crate::error::{AppError, AppResult};
use crate::handlers::registries::find_registry;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/registries/{id}/items
pub async fn list_by_registry(
    State(state): State<AppState>,
    Path(registry_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<ItemWithProgress>>>> {
    find_registry(&state, registry_id).await?;
    let items = ItemRepo::list_for_registry(&state.pool, registry_id).await?;
    Ok(Json(DataResponse {
        data: items.into_iter().map(ItemWithProgress::from).collect(),
    }))
}

/// POST /api/v1/registries/{id}/items
pub async fn create(
    State(state): State<AppState>,
    Path(registry_id): Path<DbId>,
    Json(input): Json<CreateItem>,
) -> AppResult<(StatusCode, Json<DataResponse<ItemWithProgress>>)> {
    find_registry(&state, registry_id).await?;

    let name = required_name(&input.name)?;
    let category = normalize_category(input.category.as_deref())?;
    if let Some(q) = input.quantity {
        quantity::validate_target_quantity(q)?;
    }
    validate_price(input.price_cents)?;

    let input = CreateItem {
        name,
        category,
        ..input
    };
    let item = ItemRepo::create(&state.pool, registry_id, &input).await?;
    tracing::info!(item_id = item.id, registry_id, quantity = item.quantity, "Item created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: item.into() })))
}

/// GET /api/v1/items/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<ItemWithProgress>>> {
    let item = find_item(&state, id).await?;
    Ok(Json(DataResponse { data: item.into() }))
}

/// PUT /api/v1/items/{id}
///
/// A new `quantity` may not drop below what was already received. The
/// check here gives a readable error; the table constraint still guards
/// against a purchase landing between the read and the write.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateItem>,
) -> AppResult<Json<DataResponse<ItemWithProgress>>> {
    let existing = find_item(&state, id).await?;

    let name = input.name.as_deref().map(required_name).transpose()?;
    let category = normalize_category(input.category.as_deref())?;
    if let Some(q) = input.quantity {
        quantity::validate_quantity_change(q, existing.quantity_received)?;
    }
    validate_price(input.price_cents)?;

    let input = UpdateItem {
        name,
        category,
        ..input
    };
    let item = ItemRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Item", id }))?;
    Ok(Json(DataResponse { data: item.into() }))
}

/// DELETE /api/v1/items/{id}
///
/// Removes the item's purchase records in the same transaction.
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    let deleted = ItemRepo::delete_with_purchases(&state.pool, id).await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound { entity: "Item", id }))
    }
}

/// POST /api/v1/items/{id}/toggle-fulfilled
pub async fn toggle_fulfilled(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<ItemWithProgress>>> {
    state.reconciler.toggle_fulfilled(id).await?;
    let item = find_item(&state, id).await?;
    Ok(Json(DataResponse { data: item.into() }))
}

/// PUT /api/v1/items/{id}/received
pub async fn set_received(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<SetReceivedRequest>,
) -> AppResult<Json<DataResponse<ItemWithProgress>>> {
    state
        .reconciler
        .set_received_quantity(id, input.quantity_received)
        .await?;
    let item = find_item(&state, id).await?;
    Ok(Json(DataResponse { data: item.into() }))
}

/// POST /api/v1/items/{id}/reconcile
pub async fn reconcile(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<ReconcileOutcome>>> {
    let outcome = state.reconciler.reconcile_item(id).await?;
    Ok(Json(DataResponse { data: outcome }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn find_item(state: &AppState, id: DbId) -> AppResult<Item> {
    ItemRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Item", id }))
}

fn required_name(name: &str) -> Result<String, CoreError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(CoreError::Validation("item name is required".into()));
    }
    Ok(name.to_string())
}

/// Parse an optional category, returning its canonical stored name.
fn normalize_category(category: Option<&str>) -> Result<Option<String>, CoreError> {
    category
        .map(|c| ItemCategory::parse(&c.trim().to_ascii_lowercase()).map(|c| c.as_str().to_string()))
        .transpose()
}

fn validate_price(price_cents: Option<i64>) -> Result<(), CoreError> {
    match price_cents {
        Some(p) if p < 0 => Err(CoreError::Validation(format!(
            "price_cents must not be negative, got {p}"
        ))),
        _ => Ok(()),
    }
}
