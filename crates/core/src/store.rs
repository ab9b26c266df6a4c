//! Shared-store boundary consumed by the purchase protocol.
//!
//! [`RegistryStore`] is the narrow set of reads and writes the protocol needs
//! against the item counters and the purchase ledger. The PostgreSQL
//! implementation lives in `cradle-db`; tests substitute in-memory fakes.

use async_trait::async_trait;
use serde::Serialize;

use crate::buyer::BuyerInfo;
use crate::quantity;
use crate::types::{DbId, Timestamp};

/// Failure talking to the shared store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The row the operation targeted is gone, e.g. deleted mid-request.
    #[error("{entity} {id} no longer exists")]
    Missing { entity: &'static str, id: DbId },

    /// Transient failure. Safe to retry.
    #[error("{0}")]
    Unavailable(String),
}

/// The parts of an item row the protocol reasons about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemSnapshot {
    pub id: DbId,
    pub registry_id: DbId,
    pub name: String,
    pub quantity: i32,
    pub quantity_received: i32,
    /// Hidden from guests; only the owner may touch it.
    pub is_private: bool,
}

impl ItemSnapshot {
    pub fn remaining(&self) -> i32 {
        quantity::remaining(self.quantity, self.quantity_received)
    }

    pub fn is_fulfilled(&self) -> bool {
        quantity::is_fulfilled(self.quantity, self.quantity_received)
    }
}

/// A confirmed purchase about to be written to the ledger.
#[derive(Debug, Clone)]
pub struct NewPurchase {
    pub item_id: DbId,
    pub buyer: BuyerInfo,
    pub quantity_purchased: i32,
    pub confirmed_at: Timestamp,
}

/// A claim and its ledger row, committed together.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordedClaim {
    pub purchase_id: DbId,
    /// Received counter after the claim.
    pub quantity_received: i32,
}

/// Result of writing the ledger total back onto an item counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedgerSync {
    pub quantity: i32,
    /// Counter before the sync.
    pub previous: i32,
    /// Uncapped sum of confirmed purchases.
    pub ledger_total: i32,
    /// Counter after the sync: `ledger_total` capped at `quantity`.
    pub quantity_received: i32,
}

#[async_trait]
pub trait RegistryStore: Send + Sync {
    /// Fetch authoritative item state. `None` if the item does not exist.
    async fn read_item(&self, item_id: DbId) -> Result<Option<ItemSnapshot>, StoreError>;

    /// Add `purchase.quantity_purchased` to the received counter, but only
    /// while at least that many units remain, and insert the confirmed
    /// purchase row in the same atomic step.
    ///
    /// Returns `None` (and writes nothing) if the claim did not fit or the
    /// item is gone. A failed insert leaves the counter untouched.
    async fn claim_and_record(
        &self,
        purchase: &NewPurchase,
    ) -> Result<Option<RecordedClaim>, StoreError>;

    /// Owner override of the received counter. Overridden counters are
    /// skipped by drift repair until the next ledger sync.
    async fn override_received(
        &self,
        item_id: DbId,
        quantity_received: i32,
    ) -> Result<(), StoreError>;

    /// Set the counter to the confirmed ledger total capped at the item's
    /// quantity, and clear any owner override.
    ///
    /// Serialized against [`RegistryStore::claim_and_record`] on the same
    /// item, so a claim is either fully counted in the total or applied on
    /// top of the synced counter. `None` if the item does not exist.
    async fn sync_with_ledger(&self, item_id: DbId) -> Result<Option<LedgerSync>, StoreError>;
}
