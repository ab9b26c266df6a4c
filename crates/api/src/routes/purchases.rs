//! Route definitions for the `/purchases` resource.

use axum::routing::patch;
use axum::Router;

use crate::handlers::purchases;
use crate::state::AppState;

/// Routes mounted at `/purchases`.
///
/// ```text
/// PATCH  /{id}                              -> update_flags
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/{id}", patch(purchases::update_flags))
}
