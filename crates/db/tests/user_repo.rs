//! Integration tests for the `users` repository.
//!
//! Exercises the repository layer against a real database to verify that:
//! - Users are created once per identity (get-or-create)
//! - Username uniqueness is enforced on the normalized value by the database
//! - Soft-deleted users are hidden from public lookups but keep their username
//! - Onboarding progress is persisted

use presently_core::onboarding::{OnboardingFlags, OnboardingProgress, OnboardingStep};
use presently_db::models::user::UpdateProfile;
use presently_db::repositories::UserRepo;
use presently_db::{is_unique_violation, UQ_USERS_USERNAME};
use sqlx::PgPool;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn profile(first_name: &str) -> UpdateProfile {
    UpdateProfile {
        first_name: first_name.to_string(),
        last_name: Some("Tester".to_string()),
        bio: None,
        avatar_url: None,
        birthday: None,
        phone: None,
    }
}

// ---------------------------------------------------------------------------
// get_or_create
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn get_or_create_is_idempotent_per_identity(pool: PgPool) {
    let auth_id = Uuid::new_v4();

    let first = UserRepo::get_or_create(&pool, auth_id, Some("a@example.com"))
        .await
        .unwrap();
    let second = UserRepo::get_or_create(&pool, auth_id, None).await.unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(second.email.as_deref(), Some("a@example.com"), "None keeps email");
    assert_eq!(first.onboarding_step, 0);
    assert!(!first.is_onboarded);
    assert!(first.username.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn get_or_create_refreshes_email(pool: PgPool) {
    let auth_id = Uuid::new_v4();
    UserRepo::get_or_create(&pool, auth_id, Some("old@example.com"))
        .await
        .unwrap();
    let user = UserRepo::get_or_create(&pool, auth_id, Some("new@example.com"))
        .await
        .unwrap();

    assert_eq!(user.email.as_deref(), Some("new@example.com"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn repeated_get_or_create_does_not_touch_updated_at(pool: PgPool) {
    let auth_id = Uuid::new_v4();
    let first = UserRepo::get_or_create(&pool, auth_id, Some("a@example.com"))
        .await
        .unwrap();

    let same_email = UserRepo::get_or_create(&pool, auth_id, Some("a@example.com"))
        .await
        .unwrap();
    let no_email = UserRepo::get_or_create(&pool, auth_id, None).await.unwrap();

    assert_eq!(same_email.updated_at, first.updated_at);
    assert_eq!(no_email.updated_at, first.updated_at);
    assert_eq!(no_email.email.as_deref(), Some("a@example.com"));
}

// ---------------------------------------------------------------------------
// Username uniqueness
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn set_username_and_find_normalized(pool: PgPool) {
    let user = UserRepo::get_or_create(&pool, Uuid::new_v4(), None).await.unwrap();

    let updated = UserRepo::set_username(&pool, user.id, "john_doe")
        .await
        .unwrap()
        .expect("user exists");
    assert_eq!(updated.username.as_deref(), Some("john_doe"));

    assert!(UserRepo::username_exists(&pool, "John_Doe").await.unwrap());
    assert_eq!(
        UserRepo::find_username_owner(&pool, "JOHN_DOE").await.unwrap(),
        Some(user.id)
    );
    let found = UserRepo::find_by_username(&pool, "john_doe").await.unwrap();
    assert_eq!(found.map(|u| u.id), Some(user.id));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn duplicate_normalized_username_violates_unique_index(pool: PgPool) {
    let alice = UserRepo::get_or_create(&pool, Uuid::new_v4(), None).await.unwrap();
    let bob = UserRepo::get_or_create(&pool, Uuid::new_v4(), None).await.unwrap();

    UserRepo::set_username(&pool, alice.id, "gifter")
        .await
        .unwrap();

    // Differs only by case; the index compares lower(btrim(username)).
    let err = UserRepo::set_username(&pool, bob.id, "GIFTER")
        .await
        .expect_err("duplicate must be rejected by the database");
    assert!(is_unique_violation(&err, UQ_USERS_USERNAME), "got: {err:?}");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn multiple_users_without_username_are_allowed(pool: PgPool) {
    for _ in 0..3 {
        UserRepo::get_or_create(&pool, Uuid::new_v4(), None).await.unwrap();
    }
    assert!(!UserRepo::username_exists(&pool, "anyone").await.unwrap());
}

// ---------------------------------------------------------------------------
// Soft delete
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn soft_deleted_user_hidden_but_username_kept(pool: PgPool) {
    let user = UserRepo::get_or_create(&pool, Uuid::new_v4(), None).await.unwrap();
    UserRepo::set_username(&pool, user.id, "leaver").await.unwrap();

    assert!(UserRepo::soft_delete(&pool, user.id).await.unwrap());
    assert!(!UserRepo::soft_delete(&pool, user.id).await.unwrap(), "idempotent");

    assert!(UserRepo::find_by_username(&pool, "leaver").await.unwrap().is_none());
    assert!(UserRepo::username_exists(&pool, "leaver").await.unwrap());

    // The identity still resolves to its (deleted) row instead of a new one.
    let row = UserRepo::get_or_create(&pool, user.auth_id, None).await.unwrap();
    assert_eq!(row.id, user.id);
    assert!(row.is_deleted());

    // Writes against a soft-deleted row are no-ops.
    assert!(UserRepo::set_username(&pool, user.id, "returner")
        .await
        .unwrap()
        .is_none());
}

// ---------------------------------------------------------------------------
// Profile and onboarding progress
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_profile_overwrites_fields(pool: PgPool) {
    let user = UserRepo::get_or_create(&pool, Uuid::new_v4(), None).await.unwrap();

    let updated = UserRepo::update_profile(&pool, user.id, &profile("Ada"))
        .await
        .unwrap()
        .unwrap();
    assert!(updated.has_name());
    assert_eq!(updated.last_name.as_deref(), Some("Tester"));

    let mut cleared = profile("Ada");
    cleared.last_name = None;
    let updated = UserRepo::update_profile(&pool, user.id, &cleared)
        .await
        .unwrap()
        .unwrap();
    assert!(updated.last_name.is_none());
    assert!(updated.updated_at >= user.updated_at);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn sync_onboarding_persists_progress(pool: PgPool) {
    let user = UserRepo::get_or_create(&pool, Uuid::new_v4(), None).await.unwrap();

    let progress = OnboardingProgress::from_flags(&OnboardingFlags {
        has_name: true,
        has_username: true,
        ..OnboardingFlags::default()
    });
    let updated = UserRepo::sync_onboarding(&pool, user.id, &progress)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(updated.onboarding_step, OnboardingStep::Traits.cursor());
    assert_eq!(updated.completion_percentage, 40);
    assert!(!updated.is_onboarded);
}
