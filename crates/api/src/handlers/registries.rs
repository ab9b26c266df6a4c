//! Handlers for the `/registries` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use cradle_core::error::CoreError;
use cradle_core::registry::validate_new_registry;
use cradle_core::types::DbId;
use cradle_db::models::registry::{CreateRegistry, Registry};
use cradle_db::repositories::RegistryRepo;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/registries
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateRegistry>,
) -> AppResult<(StatusCode, Json<DataResponse<Registry>>)> {
    validate_new_registry(
        &input.title,
        &input.owner_name,
        &input.owner_email,
        input.slug.as_deref(),
    )?;
    let input = CreateRegistry {
        title: input.title.trim().to_string(),
        owner_name: input.owner_name.trim().to_string(),
        owner_email: input.owner_email.trim().to_string(),
        ..input
    };

    let registry = RegistryRepo::create(&state.pool, &input).await?;
    tracing::info!(registry_id = registry.id, "Registry created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: registry })))
}

/// GET /api/v1/registries/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Registry>>> {
    let registry = find_registry(&state, id).await?;
    Ok(Json(DataResponse { data: registry }))
}

/// DELETE /api/v1/registries/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    let deleted = RegistryRepo::delete(&state.pool, id).await?;
    if deleted {
        tracing::info!(registry_id = id, "Registry deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Registry",
            id,
        }))
    }
}

/// Load a registry or fail with 404.
pub(crate) async fn find_registry(state: &AppState, id: DbId) -> AppResult<Registry> {
    RegistryRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Registry",
            id,
        }))
}
