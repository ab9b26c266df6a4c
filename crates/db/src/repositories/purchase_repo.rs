//! Repository for the `purchases` table (the purchase ledger).

use sqlx::{PgPool, Postgres, Transaction};
use cradle_core::store::NewPurchase;
use cradle_core::types::DbId;

use crate::models::purchase::{GiftSummary, Purchase, UpdatePurchaseFlags};
use crate::models::status::PurchaseStatus;
use crate::repositories::ItemRepo;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, item_id, buyer_name, buyer_email, buyer_phone, gift_message, \
    is_surprise, quantity_purchased, status_id, confirmed_at, is_seen, is_received, \
    thanked_at, created_at, updated_at";

/// Provides ledger operations for purchases.
pub struct PurchaseRepo;

impl PurchaseRepo {
    /// Claim the purchased units on the item and insert the confirmed row in
    /// one transaction.
    ///
    /// Returns the row and the item's new received count, or `None` with
    /// nothing written if the claim did not fit or the item is gone.
    pub async fn create_with_claim(
        pool: &PgPool,
        input: &NewPurchase,
    ) -> Result<Option<(Purchase, i32)>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let Some(quantity_received) =
            ItemRepo::claim_in_tx(&mut tx, input.item_id, input.quantity_purchased).await?
        else {
            return Ok(None);
        };

        let query = format!(
            "INSERT INTO purchases
                (item_id, buyer_name, buyer_email, buyer_phone, gift_message,
                 is_surprise, quantity_purchased, status_id, confirmed_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING {COLUMNS}"
        );
        let purchase = sqlx::query_as::<_, Purchase>(&query)
            .bind(input.item_id)
            .bind(&input.buyer.name)
            .bind(&input.buyer.email)
            .bind(&input.buyer.phone)
            .bind(&input.buyer.gift_message)
            .bind(input.buyer.is_surprise)
            .bind(input.quantity_purchased)
            .bind(PurchaseStatus::Confirmed.id())
            .bind(input.confirmed_at)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some((purchase, quantity_received)))
    }

    /// Find a purchase by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Purchase>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM purchases WHERE id = $1");
        sqlx::query_as::<_, Purchase>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// All purchases of an item, newest first.
    pub async fn list_for_item(pool: &PgPool, item_id: DbId) -> Result<Vec<Purchase>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM purchases
             WHERE item_id = $1
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Purchase>(&query)
            .bind(item_id)
            .fetch_all(pool)
            .await
    }

    /// `quantity_purchased` of every confirmed purchase of an item, read
    /// inside the caller's transaction.
    pub(crate) async fn confirmed_quantities_in_tx(
        tx: &mut Transaction<'_, Postgres>,
        item_id: DbId,
    ) -> Result<Vec<i32>, sqlx::Error> {
        sqlx::query_scalar::<_, i32>(
            "SELECT quantity_purchased FROM purchases
             WHERE item_id = $1 AND status_id = $2
             ORDER BY id",
        )
        .bind(item_id)
        .bind(PurchaseStatus::Confirmed.id())
        .fetch_all(&mut **tx)
        .await
    }

    /// Apply owner bookkeeping flags. Only non-`None` fields are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update_flags(
        pool: &PgPool,
        id: DbId,
        input: &UpdatePurchaseFlags,
    ) -> Result<Option<Purchase>, sqlx::Error> {
        let query = format!(
            "UPDATE purchases SET
                is_seen = COALESCE($2, is_seen),
                is_received = COALESCE($3, is_received),
                thanked_at = CASE
                    WHEN $4::BOOLEAN IS NULL THEN thanked_at
                    WHEN $4 THEN COALESCE(thanked_at, NOW())
                    ELSE NULL
                END
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Purchase>(&query)
            .bind(id)
            .bind(input.is_seen)
            .bind(input.is_received)
            .bind(input.thanked)
            .fetch_optional(pool)
            .await
    }

    /// Mark every purchase of a registry as seen by the owner.
    pub async fn mark_all_seen(pool: &PgPool, registry_id: DbId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE purchases SET is_seen = TRUE
             WHERE is_seen = FALSE
               AND item_id IN (SELECT id FROM items WHERE registry_id = $1)",
        )
        .bind(registry_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Badge counts for the owner's gifts view.
    pub async fn gift_summary(pool: &PgPool, registry_id: DbId) -> Result<GiftSummary, sqlx::Error> {
        sqlx::query_as::<_, GiftSummary>(
            "SELECT
                COUNT(p.id) AS confirmed_purchases,
                COUNT(p.id) FILTER (WHERE NOT p.is_seen) AS unseen,
                COUNT(p.id) FILTER (WHERE p.is_surprise) AS surprises,
                COUNT(p.id) FILTER (WHERE p.is_received AND p.thanked_at IS NULL) AS awaiting_thanks,
                (SELECT COUNT(*) FROM items
                  WHERE registry_id = $1 AND quantity_received >= quantity) AS fulfilled_items
             FROM purchases p
             JOIN items i ON i.id = p.item_id
             WHERE i.registry_id = $1 AND p.status_id = $2",
        )
        .bind(registry_id)
        .bind(PurchaseStatus::Confirmed.id())
        .fetch_one(pool)
        .await
    }
}
