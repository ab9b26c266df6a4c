//! In-process event bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`EventBus`] is shared via `Arc<EventBus>` across the application. Purchase
//! notices enter through its [`PurchaseNotifier`] impl, so the guest request
//! returns as soon as the events are queued.

use chrono::{DateTime, Utc};
use cradle_core::notify::{PurchaseNotice, PurchaseNotifier};
use cradle_core::types::DbId;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Owner-facing "a guest bought something" event.
pub const EVENT_GIFT_PURCHASED: &str = "gift.purchased";

/// Buyer-facing thank-you event.
pub const EVENT_GIFT_THANK_YOU: &str = "gift.thank_you";

// ---------------------------------------------------------------------------
// RegistryEvent
// ---------------------------------------------------------------------------

/// A domain event that occurred in a registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryEvent {
    /// Dot-separated event name, e.g. `"gift.purchased"`.
    pub event_type: String,

    /// Optional source entity kind (e.g. `"purchase"`).
    pub source_entity_type: Option<String>,

    /// Optional source entity database id.
    pub source_entity_id: Option<DbId>,

    /// Free-form JSON payload carrying event-specific data.
    pub payload: serde_json::Value,

    /// When the event was created (UTC).
    pub timestamp: DateTime<Utc>,
}

impl RegistryEvent {
    /// Create a new event with only the required `event_type`.
    pub fn new(event_type: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
            source_entity_type: None,
            source_entity_id: None,
            payload: serde_json::Value::Object(Default::default()),
            timestamp: Utc::now(),
        }
    }

    /// Attach a source entity to the event.
    pub fn with_source(mut self, entity_type: impl Into<String>, entity_id: DbId) -> Self {
        self.source_entity_type = Some(entity_type.into());
        self.source_entity_id = Some(entity_id);
        self
    }

    /// Set the JSON payload for the event.
    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }

    /// Decode the payload of a `gift.*` event back into its notice.
    pub fn purchase_notice(&self) -> Option<PurchaseNotice> {
        serde_json::from_value(self.payload.clone()).ok()
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 1024;

/// In-process fan-out event bus.
///
/// # Usage
///
/// ```rust
/// use cradle_events::bus::{EventBus, RegistryEvent};
///
/// let bus = EventBus::default();
/// let mut rx = bus.subscribe();
///
/// bus.publish(RegistryEvent::new("gift.purchased"));
/// ```
pub struct EventBus {
    sender: broadcast::Sender<RegistryEvent>,
}

impl EventBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full, the oldest un-consumed messages are dropped
    /// and slow receivers will observe a `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers.
    ///
    /// If there are no active subscribers the event is silently dropped.
    pub fn publish(&self, event: RegistryEvent) {
        // Ignore the SendError: it only means there are zero receivers.
        let _ = self.sender.send(event);
    }

    /// Subscribe to all events published on this bus.
    pub fn subscribe(&self) -> broadcast::Receiver<RegistryEvent> {
        self.sender.subscribe()
    }

    /// Number of live receivers. Zero means purchase notices are being dropped.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl PurchaseNotifier for EventBus {
    fn purchase_confirmed(&self, notice: &PurchaseNotice) {
        let payload = match serde_json::to_value(notice) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    purchase_id = notice.purchase_id,
                    "Failed to encode purchase notice"
                );
                return;
            }
        };

        for event_type in [EVENT_GIFT_PURCHASED, EVENT_GIFT_THANK_YOU] {
            self.publish(
                RegistryEvent::new(event_type)
                    .with_source("purchase", notice.purchase_id)
                    .with_payload(payload.clone()),
            );
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
