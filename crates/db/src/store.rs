//! PostgreSQL implementation of the purchase protocol's store boundary.

use async_trait::async_trait;
use cradle_core::store::{
    ItemSnapshot, LedgerSync, NewPurchase, RecordedClaim, RegistryStore, StoreError,
};
use cradle_core::types::DbId;

use crate::repositories::{ItemRepo, PurchaseRepo};
use crate::DbPool;

/// [`RegistryStore`] backed by the `items` and `purchases` tables.
#[derive(Clone)]
pub struct PgRegistryStore {
    pool: DbPool,
}

impl PgRegistryStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Map a sqlx error raised while working on `item_id`.
///
/// A vanished row (`RowNotFound`, or a foreign key violation from the item
/// being deleted mid-request) is [`StoreError::Missing`]; everything else is
/// reported as a transient outage.
pub(crate) fn classify(err: sqlx::Error, item_id: DbId) -> StoreError {
    let missing = match &err {
        sqlx::Error::RowNotFound => true,
        sqlx::Error::Database(db_err) => db_err.code().as_deref() == Some("23503"),
        _ => false,
    };
    if missing {
        tracing::debug!(error = %err, item_id, "Item vanished during store operation");
        StoreError::Missing {
            entity: "Item",
            id: item_id,
        }
    } else {
        StoreError::Unavailable(err.to_string())
    }
}

#[async_trait]
impl RegistryStore for PgRegistryStore {
    async fn read_item(&self, item_id: DbId) -> Result<Option<ItemSnapshot>, StoreError> {
        let item = ItemRepo::find_by_id(&self.pool, item_id)
            .await
            .map_err(|e| classify(e, item_id))?;
        Ok(item.map(|i| i.snapshot()))
    }

    async fn claim_and_record(
        &self,
        purchase: &NewPurchase,
    ) -> Result<Option<RecordedClaim>, StoreError> {
        let created = PurchaseRepo::create_with_claim(&self.pool, purchase)
            .await
            .map_err(|e| classify(e, purchase.item_id))?;
        Ok(created.map(|(row, quantity_received)| RecordedClaim {
            purchase_id: row.id,
            quantity_received,
        }))
    }

    async fn override_received(
        &self,
        item_id: DbId,
        quantity_received: i32,
    ) -> Result<(), StoreError> {
        let updated = ItemRepo::set_received(&self.pool, item_id, quantity_received, true)
            .await
            .map_err(|e| classify(e, item_id))?;
        if updated {
            Ok(())
        } else {
            Err(StoreError::Missing {
                entity: "Item",
                id: item_id,
            })
        }
    }

    async fn sync_with_ledger(&self, item_id: DbId) -> Result<Option<LedgerSync>, StoreError> {
        ItemRepo::sync_with_ledger(&self.pool, item_id)
            .await
            .map_err(|e| classify(e, item_id))
    }
}
