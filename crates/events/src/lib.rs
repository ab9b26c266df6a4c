//! Cradle event bus and notification delivery.
//!
//! - [`EventBus`]: in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`. It is also the production
//!   [`PurchaseNotifier`](cradle_core::notify::PurchaseNotifier).
//! - [`RegistryEvent`]: the event envelope carried on the bus.
//! - [`compose`]: plain-text bodies for owner and buyer emails.
//! - [`delivery`]: the SMTP email channel.

pub mod bus;
pub mod compose;
pub mod delivery;

pub use bus::{EventBus, RegistryEvent, EVENT_GIFT_PURCHASED, EVENT_GIFT_THANK_YOU};
pub use compose::EmailContent;
pub use delivery::email::{EmailConfig, EmailDelivery, EmailError};
