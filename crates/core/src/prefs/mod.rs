//! Schema-versioned local preference cache.
//!
//! Small UI caches (checked/hidden suggestion sets, quantity overrides,
//! revealed surprise ids) are persisted as JSON strings in a key-value store.
//! [`VersionGuard`] runs once at startup and wipes every known key when any
//! of them is unreadable, has the wrong container shape, or the stored schema
//! version is missing or stale. [`safe_get`] / [`safe_set`] repair or report
//! individual keys on later access without ever failing the caller.
//!
//! The server never reads this cache. It is meant for the registry's client
//! app, which calls the guard from its startup hook before any other cache
//! read and wires [`emergency_reset`] to its "reset local data" action:
//!
//! ```
//! use std::collections::BTreeMap;
//!
//! use cradle_core::prefs::schema::QUANTITY_OVERRIDES;
//! use cradle_core::prefs::{safe_get, MemoryStore, VersionGuard, CURRENT_SCHEMA};
//!
//! let store = MemoryStore::new();
//! let mut guard = VersionGuard::new(&store, &CURRENT_SCHEMA);
//! guard.run();
//!
//! let overrides: BTreeMap<String, i32> = safe_get(&store, QUANTITY_OVERRIDES, BTreeMap::new());
//! assert!(overrides.is_empty());
//! ```

pub mod access;
pub mod guard;
pub mod schema;
pub mod store;

pub use access::{emergency_reset, safe_get, safe_set, Reload};
pub use guard::{GuardOutcome, GuardState, VersionGuard, WipeReason};
pub use schema::{CacheKey, CacheSchema, Shape, CURRENT_SCHEMA};
pub use store::{FileStore, KeyValueStore, MemoryStore};

/// Failure inside the preference cache. Never surfaced to users.
#[derive(Debug, thiserror::Error)]
pub enum PrefsError {
    /// The backing store refused the operation (disabled, full, poisoned).
    #[error("Preference store unavailable: {0}")]
    Unavailable(String),

    /// A stored value failed to parse or had the wrong shape.
    #[error("Preference key '{key}' is corrupted: {reason}")]
    Corrupted { key: String, reason: String },

    #[error("Preference file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Preference serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}
