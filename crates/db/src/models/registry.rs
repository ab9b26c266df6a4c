//! Registry entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use cradle_core::types::{DbId, Timestamp};

/// A row from the `registries` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Registry {
    pub id: DbId,
    pub title: String,
    pub owner_name: String,
    pub owner_email: String,
    pub arrival_date: Option<chrono::NaiveDate>,
    /// Public share-link token.
    pub slug: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new registry.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateRegistry {
    pub title: String,
    pub owner_name: String,
    pub owner_email: String,
    pub arrival_date: Option<chrono::NaiveDate>,
    /// Generated when omitted.
    pub slug: Option<String>,
}
