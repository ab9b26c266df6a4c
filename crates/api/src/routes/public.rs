//! Guest-facing registry view, addressed by share slug.

use axum::routing::get;
use axum::Router;

use crate::handlers::public;
use crate::state::AppState;

/// Routes mounted at `/public`.
///
/// ```text
/// GET    /{slug}                            -> get_registry
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/{slug}", get(public::get_registry))
}
