//! Preference catalog entries (traits, brands, colors).

use presently_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from one of the `traits`, `brands` or `colors` tables.
///
/// `hex` is only populated for colors.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CatalogItem {
    pub id: DbId,
    pub slug: String,
    pub name: String,
    pub hex: Option<String>,
    pub is_active: bool,
    pub created_at: Timestamp,
}

/// DTO for creating a catalog entry.
#[derive(Debug, Deserialize)]
pub struct CreateCatalogItem {
    pub slug: String,
    pub name: String,
    pub hex: Option<String>,
}
