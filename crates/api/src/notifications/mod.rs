//! Notification dispatch.
//!
//! The [`NotificationDispatcher`] subscribes to the event bus and emails the
//! registry owner and the buyer after each confirmed purchase.

pub mod dispatcher;

pub use dispatcher::NotificationDispatcher;
