//! Repository for the `users` table.

use presently_core::onboarding::OnboardingProgress;
use presently_core::types::{DbId, IdentityId};
use sqlx::PgPool;

use crate::models::user::{UpdateProfile, User};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, auth_id, email, username, first_name, last_name, bio, avatar_url, \
                       birthday, phone, onboarding_step, is_onboarded, completion_percentage, \
                       deleted_at, created_at, updated_at";

/// Provides CRUD operations for users.
pub struct UserRepo;

impl UserRepo {
    /// Get the user row for an identity, creating it on first sight.
    ///
    /// A non-`None` `email` that differs from the stored one refreshes it.
    /// Otherwise an existing row is read without being written, so
    /// `updated_at` only moves on a real change.
    pub async fn get_or_create(
        pool: &PgPool,
        auth_id: IdentityId,
        email: Option<&str>,
    ) -> Result<User, sqlx::Error> {
        let upsert = format!(
            "INSERT INTO users (auth_id, email) \
             VALUES ($1, $2) \
             ON CONFLICT (auth_id) DO UPDATE SET email = EXCLUDED.email \
             WHERE EXCLUDED.email IS NOT NULL AND users.email IS DISTINCT FROM EXCLUDED.email \
             RETURNING {COLUMNS}"
        );
        let written = sqlx::query_as::<_, User>(&upsert)
            .bind(auth_id)
            .bind(email)
            .fetch_optional(pool)
            .await?;
        if let Some(user) = written {
            return Ok(user);
        }

        // Conflict with nothing to update: the row exists as-is.
        let select = format!("SELECT {COLUMNS} FROM users WHERE auth_id = $1");
        sqlx::query_as::<_, User>(&select)
            .bind(auth_id)
            .fetch_one(pool)
            .await
    }

    /// Find a live (not soft-deleted) user by username, compared normalized.
    pub async fn find_by_username(
        pool: &PgPool,
        username: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM users \
             WHERE lower(btrim(username)) = lower(btrim($1)) AND deleted_at IS NULL"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(username)
            .fetch_optional(pool)
            .await
    }

    /// ID of whoever holds `username`, soft-deleted holders included.
    pub async fn find_username_owner(
        pool: &PgPool,
        username: &str,
    ) -> Result<Option<DbId>, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>(
            "SELECT id FROM users WHERE lower(btrim(username)) = lower(btrim($1))",
        )
        .bind(username)
        .fetch_optional(pool)
        .await
    }

    /// Whether `username` is held by anyone. Soft-deleted users keep theirs.
    pub async fn username_exists(pool: &PgPool, username: &str) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM users WHERE lower(btrim(username)) = lower(btrim($1)))",
        )
        .bind(username)
        .fetch_one(pool)
        .await
    }

    /// Assign `username` to a user.
    ///
    /// Relies on `uq_users_username_normalized`; a concurrent claim of the
    /// same value surfaces as a unique violation. Returns `None` if no live
    /// row with `id` exists.
    pub async fn set_username(
        pool: &PgPool,
        id: DbId,
        username: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "UPDATE users SET username = $2 \
             WHERE id = $1 AND deleted_at IS NULL \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(username)
            .fetch_optional(pool)
            .await
    }

    /// Overwrite the profile fields. `None` optionals clear the column.
    pub async fn update_profile(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProfile,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "UPDATE users SET
                first_name = $2,
                last_name = $3,
                bio = $4,
                avatar_url = $5,
                birthday = $6,
                phone = $7
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(&input.bio)
            .bind(&input.avatar_url)
            .bind(input.birthday)
            .bind(&input.phone)
            .fetch_optional(pool)
            .await
    }

    /// Persist the derived onboarding cursor, percentage and onboarded flag.
    pub async fn sync_onboarding(
        pool: &PgPool,
        id: DbId,
        progress: &OnboardingProgress,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "UPDATE users SET
                onboarding_step = $2,
                completion_percentage = $3,
                is_onboarded = $4
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(progress.next_step.cursor())
            .bind(progress.completion_percentage)
            .bind(progress.is_onboarded)
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete a user by stamping `deleted_at`.
    ///
    /// Returns `true` if the row was updated (idempotent: a second call
    /// returns `false`).
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE users SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL")
                .bind(id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }
}
