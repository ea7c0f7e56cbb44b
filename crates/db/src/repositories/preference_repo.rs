//! Repository for the user preference link tables
//! (`user_traits`, `user_brands`, `user_colors`).

use presently_core::preferences::PreferenceCategory;
use presently_core::types::DbId;
use sqlx::PgPool;

use crate::models::catalog::CatalogItem;
use crate::models::preference::PreferenceFlags;
use crate::repositories::catalog_repo::catalog_columns;

/// Provides replace-all and read operations on preference links.
pub struct PreferenceRepo;

impl PreferenceRepo {
    /// Catalog entries linked to a user, ordered by name.
    pub async fn list_for_user(
        pool: &PgPool,
        category: PreferenceCategory,
        user_id: DbId,
    ) -> Result<Vec<CatalogItem>, sqlx::Error> {
        let query = format!(
            "SELECT {columns} FROM {catalog} c \
             JOIN {link} l ON l.{item} = c.id \
             WHERE l.user_id = $1 \
             ORDER BY c.name",
            columns = catalog_columns(category),
            catalog = category.catalog_table(),
            link = category.link_table(),
            item = category.item_column(),
        );
        sqlx::query_as::<_, CatalogItem>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Replace every link of `category` for a user with `item_ids`.
    ///
    /// Delete and bulk insert run in one transaction, so readers never see a
    /// half-replaced selection. Unknown ids fail the foreign key and roll the
    /// whole replacement back.
    pub async fn replace(
        pool: &PgPool,
        category: PreferenceCategory,
        user_id: DbId,
        item_ids: &[DbId],
    ) -> Result<(), sqlx::Error> {
        let link = category.link_table();
        let item = category.item_column();

        let mut tx = pool.begin().await?;

        sqlx::query(&format!("DELETE FROM {link} WHERE user_id = $1"))
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        if !item_ids.is_empty() {
            sqlx::query(&format!(
                "INSERT INTO {link} (user_id, {item}) \
                 SELECT $1, UNNEST($2::BIGINT[])"
            ))
            .bind(user_id)
            .bind(item_ids)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    /// Which categories a user has at least one link in.
    pub async fn flags_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<PreferenceFlags, sqlx::Error> {
        sqlx::query_as::<_, PreferenceFlags>(
            "SELECT \
                EXISTS (SELECT 1 FROM user_traits WHERE user_id = $1) AS has_traits, \
                EXISTS (SELECT 1 FROM user_brands WHERE user_id = $1) AS has_brands, \
                EXISTS (SELECT 1 FROM user_colors WHERE user_id = $1) AS has_colors",
        )
        .bind(user_id)
        .fetch_one(pool)
        .await
    }
}
