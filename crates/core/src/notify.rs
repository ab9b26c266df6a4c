//! Best-effort side effects of a confirmed purchase.

use serde::{Deserialize, Serialize};

use crate::types::DbId;

/// Everything a notification channel needs to tell the owner and thank the
/// buyer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseNotice {
    pub purchase_id: DbId,
    pub item_id: DbId,
    pub registry_id: DbId,
    pub item_name: String,
    pub buyer_name: String,
    pub buyer_email: String,
    pub quantity_purchased: i32,
    pub gift_message: Option<String>,
    pub is_surprise: bool,
}

/// Fire-and-forget sink for purchase notifications.
///
/// Implementations must return without waiting on delivery and must never
/// fail the caller; delivery errors are their own to log.
pub trait PurchaseNotifier: Send + Sync {
    fn purchase_confirmed(&self, notice: &PurchaseNotice);
}

/// Notifier that drops everything. Used when no channel is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopNotifier;

impl PurchaseNotifier for NoopNotifier {
    fn purchase_confirmed(&self, notice: &PurchaseNotice) {
        tracing::debug!(
            purchase_id = notice.purchase_id,
            "No notifier configured, dropping purchase notice"
        );
    }
}
