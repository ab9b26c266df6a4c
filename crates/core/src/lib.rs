//! Cradle domain core.
//!
//! Pure domain logic with no database dependencies:
//!
//! - [`quantity`]: remaining/fulfilled arithmetic and claim checks.
//! - [`reconciliation`]: the guest purchase protocol and owner counter
//!   operations, written against the [`store::RegistryStore`] and
//!   [`notify::PurchaseNotifier`] seams.
//! - [`registry`]: owner input checks for new registries.
//! - [`prefs`]: the schema-versioned local preference cache and its guard.

pub mod buyer;
pub mod category;
pub mod error;
pub mod messages;
pub mod notify;
pub mod prefs;
pub mod quantity;
pub mod reconciliation;
pub mod registry;
pub mod store;
pub mod types;
