pub mod health;
pub mod items;
pub mod public;
pub mod purchases;
pub mod registries;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /registries                                 create (owner)
/// /registries/{id}                            get, delete
/// /registries/{id}/items                      list, create
/// /registries/{id}/gift-summary               owner badge counts
/// /registries/{id}/purchases/mark-seen        mark every purchase seen (POST)
///
/// /public/{slug}                              guest view of a registry
///
/// /items/{id}                                 get, update, delete
/// /items/{id}/purchases                       submit (guest), list (owner)
/// /items/{id}/toggle-fulfilled                owner mark / undo (POST)
/// /items/{id}/received                        owner set received count (PUT)
/// /items/{id}/reconcile                       rebuild counter from ledger (POST)
///
/// /purchases/{id}                             seen / received / thanked (PATCH)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/registries", registries::router())
        .nest("/public", public::router())
        .nest("/items", items::router())
        .nest("/purchases", purchases::router())
}
