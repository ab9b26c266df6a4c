//! Route definitions for the `/items` resource.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::{items, purchases};
use crate::state::AppState;

/// Routes mounted at `/items`.
///
/// ```text
/// GET    /{id}                              -> get_by_id
/// PUT    /{id}                              -> update
/// DELETE /{id}                              -> delete
/// GET    /{id}/purchases                    -> purchases::list_by_item
/// POST   /{id}/purchases                    -> purchases::submit
/// POST   /{id}/toggle-fulfilled             -> toggle_fulfilled
/// PUT    /{id}/received                     -> set_received
/// POST   /{id}/reconcile                    -> reconcile
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/{id}",
            get(items::get_by_id)
                .put(items::update)
                .delete(items::delete),
        )
        .route(
            "/{id}/purchases",
            get(purchases::list_by_item).post(purchases::submit),
        )
        .route("/{id}/toggle-fulfilled", post(items::toggle_fulfilled))
        .route("/{id}/received", put(items::set_received))
        .route("/{id}/reconcile", post(items::reconcile))
}
