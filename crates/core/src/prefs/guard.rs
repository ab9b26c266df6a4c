//! Startup validation of the preference cache.
//!
//! ```text
//! Unchecked -> Validating -> Clean -> Done
//!                         \-> Wiped -> Done
//! ```
//!
//! Any unreadable, unparsable or wrongly shaped key, or a missing, invalid or
//! stale version marker, sends the guard to `Wiped`: every known key is removed
//! uniformly and the current version is written. There is no per-field
//! migration. A failure while wiping is logged and swallowed.

use serde_json::Value;

use super::schema::{CacheSchema, Shape};
use super::store::KeyValueStore;
use super::PrefsError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardState {
    Unchecked,
    Validating,
    Clean,
    Wiped,
    Done,
}

/// Why the cache was wiped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WipeReason {
    UnreadableKey { key: String },
    MalformedJson { key: String },
    WrongShape { key: String, expected: Shape },
    MissingVersion,
    InvalidVersion(String),
    StaleVersion { found: i64, expected: i64 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardOutcome {
    /// Everything matched; nothing was touched.
    Clean,
    /// The cache was wiped and the version rewritten.
    Wiped(WipeReason),
    /// The cache needed wiping but the store refused. The app still starts.
    WipeFailed(WipeReason),
}

/// One-shot validator for a [`CacheSchema`] over a [`KeyValueStore`].
pub struct VersionGuard<'a, S: KeyValueStore + ?Sized> {
    store: &'a S,
    schema: &'a CacheSchema,
    state: GuardState,
    outcome: Option<GuardOutcome>,
}

impl<'a, S: KeyValueStore + ?Sized> VersionGuard<'a, S> {
    pub fn new(store: &'a S, schema: &'a CacheSchema) -> Self {
        Self {
            store,
            schema,
            state: GuardState::Unchecked,
            outcome: None,
        }
    }

    pub fn state(&self) -> GuardState {
        self.state
    }

    /// Validate the cache, wiping it if needed.
    ///
    /// Runs at most once; later calls return the first outcome without
    /// touching storage.
    pub fn run(&mut self) -> GuardOutcome {
        if let Some(outcome) = &self.outcome {
            tracing::debug!("Preference guard already ran");
            return outcome.clone();
        }

        self.state = GuardState::Validating;
        let outcome = match self.validate() {
            Ok(()) => {
                self.state = GuardState::Clean;
                GuardOutcome::Clean
            }
            Err(reason) => {
                self.state = GuardState::Wiped;
                tracing::info!(?reason, "Preference cache invalid, wiping");
                match wipe(self.store, self.schema) {
                    Ok(()) => GuardOutcome::Wiped(reason),
                    Err(e) => {
                        tracing::error!(error = %e, "Failed to wipe preference cache");
                        GuardOutcome::WipeFailed(reason)
                    }
                }
            }
        };

        self.state = GuardState::Done;
        self.outcome = Some(outcome.clone());
        outcome
    }

    fn validate(&self) -> Result<(), WipeReason> {
        for key in self.schema.keys {
            let raw = match self.store.get(key.name) {
                Ok(Some(raw)) => raw,
                Ok(None) => continue,
                Err(e) => {
                    tracing::warn!(key = key.name, error = %e, "Unreadable preference key");
                    return Err(WipeReason::UnreadableKey {
                        key: key.name.to_string(),
                    });
                }
            };

            let value: Value = serde_json::from_str(&raw).map_err(|_| WipeReason::MalformedJson {
                key: key.name.to_string(),
            })?;

            if !key.shape.matches(&value) {
                return Err(WipeReason::WrongShape {
                    key: key.name.to_string(),
                    expected: key.shape,
                });
            }
        }

        let raw_version = match self.store.get(self.schema.version_key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Err(WipeReason::MissingVersion),
            Err(_) => {
                return Err(WipeReason::UnreadableKey {
                    key: self.schema.version_key.to_string(),
                })
            }
        };

        let found: i64 = raw_version
            .trim()
            .parse()
            .map_err(|_| WipeReason::InvalidVersion(raw_version.clone()))?;
        if found < 0 {
            return Err(WipeReason::InvalidVersion(raw_version));
        }
        if found < self.schema.version {
            return Err(WipeReason::StaleVersion {
                found,
                expected: self.schema.version,
            });
        }

        Ok(())
    }
}

/// Remove every known key and write the current version marker.
///
/// Attempts every removal even if one fails; the first error is returned.
pub(crate) fn wipe<S: KeyValueStore + ?Sized>(
    store: &S,
    schema: &CacheSchema,
) -> Result<(), PrefsError> {
    let mut first_err = None;

    for key in schema.keys {
        if let Err(e) = store.remove(key.name) {
            tracing::warn!(key = key.name, error = %e, "Failed to remove preference key");
            first_err.get_or_insert(e);
        }
    }

    if let Err(e) = store.set(schema.version_key, &schema.version.to_string()) {
        first_err.get_or_insert(e);
    }

    match first_err {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
