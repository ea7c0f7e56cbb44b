//! Preference link summaries.

use sqlx::FromRow;

/// Which preference categories a user has any links in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, FromRow)]
pub struct PreferenceFlags {
    pub has_traits: bool,
    pub has_brands: bool,
    pub has_colors: bool,
}
