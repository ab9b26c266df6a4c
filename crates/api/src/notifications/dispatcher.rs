//! Event-to-email dispatch.
//!
//! [`NotificationDispatcher`] consumes `gift.*` events from the bus, resolves
//! the registry owner, and sends the matching email. Every failure is logged
//! and dropped; a purchase is never affected by its notifications.

use std::sync::Arc;

use cradle_core::notify::PurchaseNotice;
use cradle_db::repositories::RegistryRepo;
use cradle_db::DbPool;
use cradle_events::compose::{self, EmailContent};
use cradle_events::{EmailDelivery, RegistryEvent, EVENT_GIFT_PURCHASED, EVENT_GIFT_THANK_YOU};
use tokio::sync::broadcast;

/// Recipient and content of one email, decided from an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outgoing {
    pub to: String,
    pub content: EmailContent,
}

/// Routes purchase events to email.
pub struct NotificationDispatcher {
    pool: DbPool,
    email: Option<Arc<EmailDelivery>>,
}

impl NotificationDispatcher {
    /// `email` is `None` when SMTP is not configured; events are then
    /// resolved and logged but nothing is sent.
    pub fn new(pool: DbPool, email: Option<Arc<EmailDelivery>>) -> Self {
        Self { pool, email }
    }

    /// Run the main dispatch loop.
    ///
    /// The loop exits when the channel is closed (i.e. the
    /// [`EventBus`](cradle_events::EventBus) is dropped).
    pub async fn run(self, mut receiver: broadcast::Receiver<RegistryEvent>) {
        loop {
            match receiver.recv().await {
                Ok(event) => {
                    if let Err(e) = self.dispatch(&event).await {
                        tracing::error!(
                            error = %e,
                            event_type = %event.event_type,
                            "Failed to dispatch notification"
                        );
                    }
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "Notification dispatcher lagged");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Event bus closed, notification dispatcher shutting down");
                    break;
                }
            }
        }
    }

    /// Handle a single event.
    async fn dispatch(
        &self,
        event: &RegistryEvent,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        if !is_gift_event(&event.event_type) {
            return Ok(());
        }
        let Some(notice) = event.purchase_notice() else {
            tracing::warn!(event_type = %event.event_type, "Event payload is not a purchase notice");
            return Ok(());
        };

        let Some(registry) = RegistryRepo::find_by_id(&self.pool, notice.registry_id).await? else {
            tracing::warn!(
                registry_id = notice.registry_id,
                purchase_id = notice.purchase_id,
                "Registry gone before notification, skipping"
            );
            return Ok(());
        };

        let Some(outgoing) = compose_for(
            &event.event_type,
            &notice,
            &registry.title,
            &registry.owner_name,
            &registry.owner_email,
        ) else {
            return Ok(());
        };

        match &self.email {
            Some(email) => email.send(&outgoing.to, &outgoing.content).await?,
            None => tracing::debug!(
                to = %outgoing.to,
                subject = %outgoing.content.subject,
                "Email delivery not configured, skipping"
            ),
        }
        Ok(())
    }
}

fn is_gift_event(event_type: &str) -> bool {
    event_type == EVENT_GIFT_PURCHASED || event_type == EVENT_GIFT_THANK_YOU
}

/// Pick recipient and body for a `gift.*` event.
pub fn compose_for(
    event_type: &str,
    notice: &PurchaseNotice,
    registry_title: &str,
    owner_name: &str,
    owner_email: &str,
) -> Option<Outgoing> {
    match event_type {
        EVENT_GIFT_PURCHASED => Some(Outgoing {
            to: owner_email.to_string(),
            content: compose::owner_gift_purchased(notice, registry_title),
        }),
        EVENT_GIFT_THANK_YOU => Some(Outgoing {
            to: notice.buyer_email.clone(),
            content: compose::buyer_thank_you(notice, owner_name, registry_title),
        }),
        _ => None,
    }
}
