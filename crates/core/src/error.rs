use crate::store::StoreError;
use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    /// The item has no remaining quantity left to claim.
    #[error("Item {item_id} is already fulfilled")]
    AlreadyFulfilled { item_id: DbId },

    /// Fewer units remain than the guest asked for.
    #[error("Item {item_id} has only {remaining} remaining, {requested} requested")]
    InsufficientRemaining {
        item_id: DbId,
        requested: i32,
        remaining: i32,
    },

    #[error("Conflict: {0}")]
    Conflict(String),

    /// Transient failure of the shared store. Safe to retry.
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),
}

impl CoreError {
    /// Whether the caller can retry the same request unchanged.
    pub fn is_retryable(&self) -> bool {
        matches!(self, CoreError::StoreUnavailable(_))
    }
}

impl From<StoreError> for CoreError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Missing { entity, id } => CoreError::NotFound { entity, id },
            StoreError::Unavailable(msg) => CoreError::StoreUnavailable(msg),
        }
    }
}
