//! Per-key access that never fails the caller.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use super::guard::wipe;
use super::schema::{CacheSchema, Shape};
use super::store::KeyValueStore;
use super::PrefsError;

/// Hook that restarts the application after an emergency reset.
pub trait Reload {
    fn reload(&self);
}

/// Read `key`, falling back to `default` on any problem.
///
/// If the stored value does not parse, does not have the default's container
/// shape (array vs object), or does not decode into `T`, only that key is
/// removed and `default` is returned.
pub fn safe_get<S, T>(store: &S, key: &str, default: T) -> T
where
    S: KeyValueStore + ?Sized,
    T: Serialize + DeserializeOwned,
{
    let raw = match store.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return default,
        Err(e) => {
            tracing::warn!(key, error = %e, "Preference read failed, using default");
            return default;
        }
    };

    let expected = serde_json::to_value(&default)
        .ok()
        .as_ref()
        .and_then(Shape::of);

    match decode::<T>(key, &raw, expected) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(error = %e, "Discarding corrupted preference key");
            if let Err(remove_err) = store.remove(key) {
                tracing::warn!(key, error = %remove_err, "Failed to remove corrupted preference key");
            }
            default
        }
    }
}

fn decode<T: DeserializeOwned>(
    key: &str,
    raw: &str,
    expected: Option<Shape>,
) -> Result<T, PrefsError> {
    let corrupted = |reason: String| PrefsError::Corrupted {
        key: key.to_string(),
        reason,
    };

    let value: Value = serde_json::from_str(raw).map_err(|e| corrupted(e.to_string()))?;
    if let Some(shape) = expected {
        if !shape.matches(&value) {
            return Err(corrupted(format!("expected {}", shape.name())));
        }
    }
    serde_json::from_value(value).map_err(|e| corrupted(e.to_string()))
}

/// Serialize and store `value`. Returns `false` instead of failing.
pub fn safe_set<S, T>(store: &S, key: &str, value: &T) -> bool
where
    S: KeyValueStore + ?Sized,
    T: Serialize + ?Sized,
{
    let serialized = match serde_json::to_string(value) {
        Ok(s) => s,
        Err(e) => {
            tracing::warn!(key, error = %e, "Failed to serialize preference");
            return false;
        }
    };

    match store.set(key, &serialized) {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(key, error = %e, "Failed to save preference");
            false
        }
    }
}

/// Last-resort recovery after the UI itself has failed.
///
/// Wipes every known key, rewrites the version marker, then reloads. The
/// reload happens even if the wipe fails.
pub fn emergency_reset<S>(store: &S, schema: &CacheSchema, reloader: &dyn Reload)
where
    S: KeyValueStore + ?Sized,
{
    tracing::warn!("Emergency preference reset requested");
    if let Err(e) = wipe(store, schema) {
        tracing::error!(error = %e, "Emergency reset could not wipe preferences");
    }
    reloader.reload();
}
