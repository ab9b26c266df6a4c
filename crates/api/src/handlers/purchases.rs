//! Handlers for guest purchases and owner purchase bookkeeping.

use axum::extract::{Path, State};
use axum::http::header::ACCEPT_LANGUAGE;
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use cradle_core::error::CoreError;
use cradle_core::messages::Locale;
use cradle_core::reconciliation::PurchaseReceipt;
use cradle_core::types::DbId;
use cradle_db::models::purchase::{GiftSummary, Purchase, SubmitPurchaseRequest, UpdatePurchaseFlags};
use cradle_db::repositories::{ItemRepo, PurchaseRepo};
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::handlers::registries::find_registry;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/items/{id}/purchases
///
/// Guest-facing: errors carry a message in the caller's `Accept-Language`.
pub async fn submit(
    State(state): State<AppState>,
    Path(item_id): Path<DbId>,
    headers: HeaderMap,
    Json(input): Json<SubmitPurchaseRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<PurchaseReceipt>>)> {
    let locale = request_locale(&headers);
    let receipt = state
        .reconciler
        .submit_purchase(item_id, input.buyer, input.quantity)
        .await
        .map_err(|e| AppError::from(e).for_guest(locale))?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: receipt })))
}

/// GET /api/v1/items/{id}/purchases
pub async fn list_by_item(
    State(state): State<AppState>,
    Path(item_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<Purchase>>>> {
    ItemRepo::find_by_id(&state.pool, item_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Item",
            id: item_id,
        }))?;
    let purchases = PurchaseRepo::list_for_item(&state.pool, item_id).await?;
    Ok(Json(DataResponse { data: purchases }))
}

/// PATCH /api/v1/purchases/{id}
pub async fn update_flags(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdatePurchaseFlags>,
) -> AppResult<Json<DataResponse<Purchase>>> {
    let purchase = PurchaseRepo::update_flags(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Purchase",
            id,
        }))?;
    Ok(Json(DataResponse { data: purchase }))
}

/// GET /api/v1/registries/{id}/gift-summary
pub async fn gift_summary(
    State(state): State<AppState>,
    Path(registry_id): Path<DbId>,
) -> AppResult<Json<DataResponse<GiftSummary>>> {
    find_registry(&state, registry_id).await?;
    let summary = PurchaseRepo::gift_summary(&state.pool, registry_id).await?;
    Ok(Json(DataResponse { data: summary }))
}

#[derive(Debug, Serialize)]
pub struct MarkSeenResponse {
    pub updated: u64,
}

/// POST /api/v1/registries/{id}/purchases/mark-seen
pub async fn mark_all_seen(
    State(state): State<AppState>,
    Path(registry_id): Path<DbId>,
) -> AppResult<Json<DataResponse<MarkSeenResponse>>> {
    find_registry(&state, registry_id).await?;
    let updated = PurchaseRepo::mark_all_seen(&state.pool, registry_id).await?;
    Ok(Json(DataResponse {
        data: MarkSeenResponse { updated },
    }))
}

fn request_locale(headers: &HeaderMap) -> Locale {
    headers
        .get(ACCEPT_LANGUAGE)
        .and_then(|v| v.to_str().ok())
        .map(Locale::from_accept_language)
        .unwrap_or_default()
}
