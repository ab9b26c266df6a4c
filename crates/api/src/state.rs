use std::sync::Arc;

use cradle_core::reconciliation::Reconciler;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: cradle_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Event bus that purchase notices are published on.
    pub event_bus: Arc<cradle_events::EventBus>,
    /// Purchase protocol over the database store, notifying via `event_bus`.
    pub reconciler: Reconciler,
}

impl AppState {
    /// Wire the reconciler to the PostgreSQL store and the event bus.
    pub fn new(
        pool: cradle_db::DbPool,
        config: Arc<ServerConfig>,
        event_bus: Arc<cradle_events::EventBus>,
    ) -> Self {
        let store = Arc::new(cradle_db::PgRegistryStore::new(pool.clone()));
        let reconciler = Reconciler::new(store, event_bus.clone());
        Self {
            pool,
            config,
            event_bus,
            reconciler,
        }
    }
}
