//! Purchase reconciliation protocol.
//!
//! [`Reconciler`] lets many unauthenticated guests claim units of a shared
//! item without the total ever exceeding the item's target, and gives the
//! owner counter operations that treat the purchase ledger as the source of
//! truth.
//!
//! Guest flow ([`Reconciler::submit_purchase`]):
//!
//! 1. Validate buyer details and the requested quantity.
//! 2. Re-read the item from the store; the page the guest loaded may be stale.
//!    Private items read as missing.
//! 3. Reject with `AlreadyFulfilled` / `InsufficientRemaining` against the
//!    fresh values.
//! 4. Claim the units with a conditional increment and insert the confirmed
//!    purchase row as one atomic store step. A lost race re-reads the item
//!    and reports what is actually left; a failed commit records nothing.
//! 5. Hand the notice to the notifier without waiting on delivery.
//!
//! Owner undo and reconcile go through [`RegistryStore::sync_with_ledger`],
//! which the store serializes against in-flight claims.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;

use crate::buyer::BuyerInfo;
use crate::error::CoreError;
use crate::notify::{PurchaseNotice, PurchaseNotifier};
use crate::quantity;
use crate::store::{ItemSnapshot, LedgerSync, NewPurchase, RecordedClaim, RegistryStore};
use crate::types::DbId;

/// Result of a successful guest purchase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PurchaseReceipt {
    pub purchase_id: DbId,
    pub item_id: DbId,
    pub quantity_purchased: i32,
    pub quantity_received: i32,
    pub remaining: i32,
    pub fulfilled: bool,
}

/// Result of re-deriving an item counter from its ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReconcileOutcome {
    pub item_id: DbId,
    pub previous: i32,
    pub reconciled: i32,
}

impl ReconcileOutcome {
    pub fn changed(&self) -> bool {
        self.previous != self.reconciled
    }
}

/// Coordinates guest purchases and owner counter edits over a shared store.
#[derive(Clone)]
pub struct Reconciler {
    store: Arc<dyn RegistryStore>,
    notifier: Arc<dyn PurchaseNotifier>,
}

impl Reconciler {
    pub fn new(store: Arc<dyn RegistryStore>, notifier: Arc<dyn PurchaseNotifier>) -> Self {
        Self { store, notifier }
    }

    /// Record a guest's purchase of `requested` units of `item_id`.
    pub async fn submit_purchase(
        &self,
        item_id: DbId,
        buyer: BuyerInfo,
        requested: i32,
    ) -> Result<PurchaseReceipt, CoreError> {
        let buyer = buyer.validated()?;
        if requested < 1 {
            return Err(CoreError::Validation(format!(
                "quantity must be at least 1, got {requested}"
            )));
        }

        let item = self.fetch(item_id).await?;
        if item.is_private {
            // Private items are invisible to guests.
            return Err(CoreError::NotFound {
                entity: "Item",
                id: item_id,
            });
        }
        quantity::check_claim(item.id, item.quantity, item.quantity_received, requested)?;

        let record = NewPurchase {
            item_id,
            buyer: buyer.clone(),
            quantity_purchased: requested,
            confirmed_at: Utc::now(),
        };

        let claim = match self.store.claim_and_record(&record).await {
            Ok(Some(claim)) => claim,
            Ok(None) => {
                // Someone else claimed between our read and our claim.
                let fresh = self.fetch(item_id).await?;
                tracing::info!(
                    item_id,
                    requested,
                    remaining = fresh.remaining(),
                    "Purchase claim lost a race"
                );
                quantity::check_claim(fresh.id, fresh.quantity, fresh.quantity_received, requested)?;
                return Err(CoreError::Conflict(
                    "item changed while purchasing, please try again".into(),
                ));
            }
            Err(err) => {
                tracing::error!(error = %err, item_id, requested, "Purchase commit failed");
                return Err(err.into());
            }
        };
        let RecordedClaim {
            purchase_id,
            quantity_received,
        } = claim;

        tracing::info!(
            purchase_id,
            item_id,
            quantity = requested,
            quantity_received,
            "Purchase confirmed"
        );

        self.notifier.purchase_confirmed(&PurchaseNotice {
            purchase_id,
            item_id,
            registry_id: item.registry_id,
            item_name: item.name.clone(),
            buyer_name: buyer.name,
            buyer_email: buyer.email,
            quantity_purchased: requested,
            gift_message: buyer.gift_message,
            is_surprise: buyer.is_surprise,
        });

        Ok(PurchaseReceipt {
            purchase_id,
            item_id,
            quantity_purchased: requested,
            quantity_received,
            remaining: quantity::remaining(item.quantity, quantity_received),
            fulfilled: quantity::is_fulfilled(item.quantity, quantity_received),
        })
    }

    /// Owner's "mark as purchased" / "undo".
    ///
    /// Marking sets the counter to the target. Undoing restores the ledger
    /// total instead of zero, so real guest purchases survive the toggle.
    pub async fn toggle_fulfilled(&self, item_id: DbId) -> Result<ItemSnapshot, CoreError> {
        let item = self.fetch(item_id).await?;

        let target = if item.is_fulfilled() {
            self.sync(item_id).await?.quantity_received
        } else {
            self.store.override_received(item_id, item.quantity).await?;
            item.quantity
        };

        tracing::info!(
            item_id,
            previous = item.quantity_received,
            quantity_received = target,
            "Fulfilled flag toggled"
        );

        Ok(ItemSnapshot {
            quantity_received: target,
            ..item
        })
    }

    /// Owner override of the received count, clamped to `[0, quantity]`.
    pub async fn set_received_quantity(
        &self,
        item_id: DbId,
        value: i32,
    ) -> Result<ItemSnapshot, CoreError> {
        let item = self.fetch(item_id).await?;
        let target = quantity::clamp_received(value, item.quantity);

        self.store.override_received(item_id, target).await?;
        tracing::info!(item_id, requested = value, quantity_received = target, "Received quantity set");

        Ok(ItemSnapshot {
            quantity_received: target,
            ..item
        })
    }

    /// Re-derive the item counter from its confirmed purchases.
    ///
    /// The store writes only when the counter or its override flag differs
    /// from the ledger.
    pub async fn reconcile_item(&self, item_id: DbId) -> Result<ReconcileOutcome, CoreError> {
        let sync = self.sync(item_id).await?;

        let outcome = ReconcileOutcome {
            item_id,
            previous: sync.previous,
            reconciled: sync.quantity_received,
        };

        if outcome.changed() {
            tracing::info!(
                item_id,
                previous = outcome.previous,
                reconciled = outcome.reconciled,
                "Reconciled item counter from ledger"
            );
        } else {
            tracing::debug!(item_id, "Item counter already matches ledger");
        }

        Ok(outcome)
    }

    async fn fetch(&self, item_id: DbId) -> Result<ItemSnapshot, CoreError> {
        self.store
            .read_item(item_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Item",
                id: item_id,
            })
    }

    async fn sync(&self, item_id: DbId) -> Result<LedgerSync, CoreError> {
        let sync = self
            .store
            .sync_with_ledger(item_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Item",
                id: item_id,
            })?;
        if sync.ledger_total > sync.quantity {
            tracing::warn!(
                item_id,
                ledger_total = sync.ledger_total,
                quantity = sync.quantity,
                "Ledger exceeds item quantity, capping counter"
            );
        }
        Ok(sync)
    }
}
