//! User entity model and DTOs.

use chrono::NaiveDate;
use presently_core::onboarding::OnboardingFlags;
use presently_core::types::{DbId, IdentityId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

use crate::models::preference::PreferenceFlags;

/// Full user row from the `users` table.
///
/// Contains the identity-provider id and contact details -- use
/// [`UserResponse`] or [`PublicProfile`] for external-facing output.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub auth_id: IdentityId,
    pub email: Option<String>,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub birthday: Option<NaiveDate>,
    pub phone: Option<String>,
    pub onboarding_step: i32,
    pub is_onboarded: bool,
    pub completion_percentage: i32,
    pub deleted_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl User {
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    pub fn has_name(&self) -> bool {
        self.first_name
            .as_deref()
            .is_some_and(|n| !n.trim().is_empty())
    }

    pub fn has_username(&self) -> bool {
        self.username.is_some()
    }

    /// Onboarding flags from this row plus the caller's preference links.
    pub fn onboarding_flags(
        &self,
        preferences: &PreferenceFlags,
        is_admin: bool,
    ) -> OnboardingFlags {
        OnboardingFlags {
            has_name: self.has_name(),
            has_username: self.has_username(),
            has_traits: preferences.has_traits,
            has_brands: preferences.has_brands,
            has_colors: preferences.has_colors,
            is_admin,
        }
    }
}

/// The caller's own record, as returned by `/me`.
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: DbId,
    pub email: Option<String>,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub birthday: Option<NaiveDate>,
    pub phone: Option<String>,
    pub onboarding_step: i32,
    pub is_onboarded: bool,
    pub completion_percentage: i32,
    pub created_at: Timestamp,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            username: user.username.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            bio: user.bio.clone(),
            avatar_url: user.avatar_url.clone(),
            birthday: user.birthday,
            phone: user.phone.clone(),
            onboarding_step: user.onboarding_step,
            is_onboarded: user.is_onboarded,
            completion_percentage: user.completion_percentage,
            created_at: user.created_at,
        }
    }
}

/// DTO for the profile step. Optional fields set to `None` are cleared.
#[derive(Debug, Clone)]
pub struct UpdateProfile {
    pub first_name: String,
    pub last_name: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub birthday: Option<NaiveDate>,
    pub phone: Option<String>,
}

/// Public profile page payload. Never includes contact details.
#[derive(Debug, Clone, Serialize)]
pub struct PublicProfile {
    pub username: String,
    pub display_name: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub traits: Vec<String>,
    pub brands: Vec<String>,
    pub colors: Vec<String>,
    pub member_since: Timestamp,
}
