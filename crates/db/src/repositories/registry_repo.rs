//! Repository for the `registries` table.

use sqlx::PgPool;
use cradle_core::types::DbId;

use crate::models::registry::{CreateRegistry, Registry};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, title, owner_name, owner_email, arrival_date, slug, created_at, updated_at";

/// Provides CRUD operations for registries.
pub struct RegistryRepo;

impl RegistryRepo {
    /// Insert a new registry, returning the created row.
    ///
    /// If `slug` is `None`, a random share token is generated.
    pub async fn create(pool: &PgPool, input: &CreateRegistry) -> Result<Registry, sqlx::Error> {
        let slug = input
            .slug
            .clone()
            .unwrap_or_else(|| uuid::Uuid::new_v4().simple().to_string());
        let query = format!(
            "INSERT INTO registries (title, owner_name, owner_email, arrival_date, slug)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Registry>(&query)
            .bind(&input.title)
            .bind(&input.owner_name)
            .bind(&input.owner_email)
            .bind(input.arrival_date)
            .bind(slug)
            .fetch_one(pool)
            .await
    }

    /// Find a registry by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Registry>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM registries WHERE id = $1");
        sqlx::query_as::<_, Registry>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a registry by its public share slug.
    pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Registry>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM registries WHERE slug = $1");
        sqlx::query_as::<_, Registry>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// Permanently delete a registry. Items and purchases cascade.
    ///
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM registries WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
