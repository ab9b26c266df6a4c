//! Repository for the `items` table.
//!
//! Besides plain CRUD this holds the counter primitives the purchase
//! protocol relies on: the conditional claim, the locked ledger sync, and
//! drift detection against the purchase ledger.

use sqlx::{PgPool, Postgres, Transaction};
use cradle_core::quantity;
use cradle_core::store::LedgerSync;
use cradle_core::types::DbId;

use crate::models::item::{CreateItem, Item, UpdateItem};
use crate::models::status::PurchaseStatus;
use crate::repositories::PurchaseRepo;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, registry_id, name, category, price_cents, product_url, \
    quantity, quantity_received, received_override, is_most_wanted, is_private, \
    created_at, updated_at";

/// Provides CRUD and counter operations for registry items.
pub struct ItemRepo;

impl ItemRepo {
    /// Insert a new item, returning the created row.
    ///
    /// Missing `category` defaults to `other`, missing `quantity` to 1.
    pub async fn create(
        pool: &PgPool,
        registry_id: DbId,
        input: &CreateItem,
    ) -> Result<Item, sqlx::Error> {
        let query = format!(
            "INSERT INTO items
                (registry_id, name, category, price_cents, product_url, quantity,
                 is_most_wanted, is_private)
             VALUES ($1, $2, COALESCE($3, 'other'), $4, $5, COALESCE($6, 1),
                     COALESCE($7, FALSE), COALESCE($8, FALSE))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Item>(&query)
            .bind(registry_id)
            .bind(&input.name)
            .bind(&input.category)
            .bind(input.price_cents)
            .bind(&input.product_url)
            .bind(input.quantity)
            .bind(input.is_most_wanted)
            .bind(input.is_private)
            .fetch_one(pool)
            .await
    }

    /// Find an item by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Item>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM items WHERE id = $1");
        sqlx::query_as::<_, Item>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// All items of a registry, most-wanted first, then oldest first.
    pub async fn list_for_registry(
        pool: &PgPool,
        registry_id: DbId,
    ) -> Result<Vec<Item>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM items
             WHERE registry_id = $1
             ORDER BY is_most_wanted DESC, created_at ASC, id ASC"
        );
        sqlx::query_as::<_, Item>(&query)
            .bind(registry_id)
            .fetch_all(pool)
            .await
    }

    /// Items a guest can still buy: public and not yet fulfilled.
    pub async fn list_available(
        pool: &PgPool,
        registry_id: DbId,
    ) -> Result<Vec<Item>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM items
             WHERE registry_id = $1
               AND is_private = FALSE
               AND quantity - quantity_received > 0
             ORDER BY is_most_wanted DESC, created_at ASC, id ASC"
        );
        sqlx::query_as::<_, Item>(&query)
            .bind(registry_id)
            .fetch_all(pool)
            .await
    }

    /// Update an item. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists. A quantity below
    /// the received count is rejected by `ck_items_received_within_quantity`.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateItem,
    ) -> Result<Option<Item>, sqlx::Error> {
        let query = format!(
            "UPDATE items SET
                name = COALESCE($2, name),
                category = COALESCE($3, category),
                price_cents = COALESCE($4, price_cents),
                product_url = COALESCE($5, product_url),
                quantity = COALESCE($6, quantity),
                is_most_wanted = COALESCE($7, is_most_wanted),
                is_private = COALESCE($8, is_private)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Item>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.category)
            .bind(input.price_cents)
            .bind(&input.product_url)
            .bind(input.quantity)
            .bind(input.is_most_wanted)
            .bind(input.is_private)
            .fetch_optional(pool)
            .await
    }

    /// Delete an item after removing its purchase records, in one transaction.
    ///
    /// Returns `true` if the item existed.
    pub async fn delete_with_purchases(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let purchases = sqlx::query("DELETE FROM purchases WHERE item_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        let items = sqlx::query("DELETE FROM items WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        if items.rows_affected() > 0 {
            tracing::info!(
                item_id = id,
                purchases_removed = purchases.rows_affected(),
                "Item deleted"
            );
        }
        Ok(items.rows_affected() > 0)
    }

    /// Add `quantity` to the received counter if it still fits, inside the
    /// caller's transaction. The updated row stays locked until commit.
    ///
    /// Returns the new received count, or `None` if fewer than `quantity`
    /// units remain or the item does not exist.
    pub(crate) async fn claim_in_tx(
        tx: &mut Transaction<'_, Postgres>,
        id: DbId,
        quantity: i32,
    ) -> Result<Option<i32>, sqlx::Error> {
        sqlx::query_scalar::<_, i32>(
            "UPDATE items SET quantity_received = quantity_received + $2
             WHERE id = $1 AND quantity - quantity_received >= $2
             RETURNING quantity_received",
        )
        .bind(id)
        .bind(quantity)
        .fetch_optional(&mut **tx)
        .await
    }

    /// Write the confirmed ledger total (capped at `quantity`) onto the
    /// counter and clear the owner override.
    ///
    /// The item row is locked first, so a concurrent claim either commits
    /// before the ledger is read or waits for this sync to finish. Writes
    /// only when the counter or the override flag would change.
    pub async fn sync_with_ledger(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<LedgerSync>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let locked = sqlx::query_as::<_, (i32, i32, bool)>(
            "SELECT quantity, quantity_received, received_override
             FROM items WHERE id = $1
             FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;
        let Some((quantity, previous, overridden)) = locked else {
            return Ok(None);
        };

        let confirmed = PurchaseRepo::confirmed_quantities_in_tx(&mut tx, id).await?;
        let ledger_total = quantity::ledger_total(&confirmed);
        let synced = quantity::clamp_received(ledger_total, quantity);

        if synced != previous || overridden {
            sqlx::query(
                "UPDATE items SET quantity_received = $2, received_override = FALSE
                 WHERE id = $1",
            )
            .bind(id)
            .bind(synced)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(Some(LedgerSync {
            quantity,
            previous,
            ledger_total,
            quantity_received: synced,
        }))
    }

    /// Overwrite the received counter, clamped to `[0, quantity]`.
    ///
    /// `owner_override` marks counters the owner set by hand so drift repair
    /// leaves them alone.
    pub async fn set_received(
        pool: &PgPool,
        id: DbId,
        quantity_received: i32,
        owner_override: bool,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE items SET
                quantity_received = LEAST(GREATEST($2, 0), quantity),
                received_override = $3
             WHERE id = $1",
        )
        .bind(id)
        .bind(quantity_received)
        .bind(owner_override)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// IDs of items whose counter disagrees with their confirmed ledger.
    ///
    /// Skips owner overrides and items touched within the last
    /// `grace_secs` seconds.
    pub async fn find_drifted(
        pool: &PgPool,
        grace_secs: u64,
        limit: i64,
    ) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>(
            "SELECT i.id FROM items i
             LEFT JOIN (
                 SELECT item_id, SUM(quantity_purchased)::INTEGER AS total
                 FROM purchases
                 WHERE status_id = $1
                 GROUP BY item_id
             ) p ON p.item_id = i.id
             WHERE i.received_override = FALSE
               AND i.updated_at < NOW() - make_interval(secs => $2::DOUBLE PRECISION)
               AND i.quantity_received <> LEAST(COALESCE(p.total, 0), i.quantity)
             ORDER BY i.id
             LIMIT $3",
        )
        .bind(PurchaseStatus::Confirmed.id())
        .bind(grace_secs as f64)
        .bind(limit)
        .fetch_all(pool)
        .await
    }
}
