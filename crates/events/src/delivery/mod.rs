//! External delivery channels for registry notifications.
//!
//! Used by the notification dispatcher to push purchase events
//! outside the service.

pub mod email;
