//! Repository for the preference catalogs (`traits`, `brands`, `colors`).
//!
//! The three tables share a shape; the category picks the table. Table and
//! column names come from [`PreferenceCategory`], never from user input.

use presently_core::preferences::PreferenceCategory;
use presently_core::types::DbId;
use sqlx::PgPool;

use crate::models::catalog::{CatalogItem, CreateCatalogItem};

/// Select list for a catalog table aliased as `c`. Only colors carry `hex`.
pub(crate) fn catalog_columns(category: PreferenceCategory) -> &'static str {
    match category {
        PreferenceCategory::Colors => "c.id, c.slug, c.name, c.hex, c.is_active, c.created_at",
        PreferenceCategory::Traits | PreferenceCategory::Brands => {
            "c.id, c.slug, c.name, NULL::TEXT AS hex, c.is_active, c.created_at"
        }
    }
}

/// Provides read and create operations for catalog entries.
pub struct CatalogRepo;

impl CatalogRepo {
    /// List active entries ordered by name.
    pub async fn list_active(
        pool: &PgPool,
        category: PreferenceCategory,
    ) -> Result<Vec<CatalogItem>, sqlx::Error> {
        let query = format!(
            "SELECT {} FROM {} c WHERE c.is_active ORDER BY c.name",
            catalog_columns(category),
            category.catalog_table()
        );
        sqlx::query_as::<_, CatalogItem>(&query).fetch_all(pool).await
    }

    /// Count how many of `ids` are active entries of `category`.
    pub async fn count_active(
        pool: &PgPool,
        category: PreferenceCategory,
        ids: &[DbId],
    ) -> Result<i64, sqlx::Error> {
        let query = format!(
            "SELECT COUNT(*) FROM {} WHERE id = ANY($1) AND is_active",
            category.catalog_table()
        );
        sqlx::query_scalar::<_, i64>(&query)
            .bind(ids)
            .fetch_one(pool)
            .await
    }

    /// Insert a new entry. A duplicate slug violates `uq_<table>_slug`.
    pub async fn create(
        pool: &PgPool,
        category: PreferenceCategory,
        input: &CreateCatalogItem,
    ) -> Result<CatalogItem, sqlx::Error> {
        let table = category.catalog_table();
        let columns = catalog_columns(category);
        match category {
            PreferenceCategory::Colors => {
                let query = format!(
                    "INSERT INTO {table} AS c (slug, name, hex) VALUES ($1, $2, $3) \
                     RETURNING {columns}"
                );
                sqlx::query_as::<_, CatalogItem>(&query)
                    .bind(&input.slug)
                    .bind(input.name.trim())
                    .bind(&input.hex)
                    .fetch_one(pool)
                    .await
            }
            PreferenceCategory::Traits | PreferenceCategory::Brands => {
                let query = format!(
                    "INSERT INTO {table} AS c (slug, name) VALUES ($1, $2) \
                     RETURNING {columns}"
                );
                sqlx::query_as::<_, CatalogItem>(&query)
                    .bind(&input.slug)
                    .bind(input.name.trim())
                    .fetch_one(pool)
                    .await
            }
        }
    }
}
