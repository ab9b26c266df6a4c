//! Route definitions for the `/registries` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{items, purchases, registries};
use crate::state::AppState;

/// Routes mounted at `/registries`.
///
/// ```text
/// POST   /                                  -> create
/// GET    /{id}                              -> get_by_id
/// DELETE /{id}                              -> delete
/// GET    /{id}/items                        -> items::list_by_registry
/// POST   /{id}/items                        -> items::create
/// GET    /{id}/gift-summary                 -> purchases::gift_summary
/// POST   /{id}/purchases/mark-seen          -> purchases::mark_all_seen
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(registries::create))
        .route(
            "/{id}",
            get(registries::get_by_id).delete(registries::delete),
        )
        .route(
            "/{id}/items",
            get(items::list_by_registry).post(items::create),
        )
        .route("/{id}/gift-summary", get(purchases::gift_summary))
        .route("/{id}/purchases/mark-seen", post(purchases::mark_all_seen))
}
