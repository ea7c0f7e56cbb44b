//! Preference categories (traits, brands, colors) and selection rules.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::DbId;

static SLUG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").expect("valid regex"));

static HEX_COLOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#[0-9a-fA-F]{6}$").expect("valid regex"));

/// Maximum length of a catalog slug.
pub const MAX_SLUG_LEN: usize = 64;

/// Maximum length of a catalog display name.
pub const MAX_NAME_LEN: usize = 100;

/// A preference catalog. Each has its own reference table and join table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PreferenceCategory {
    Traits,
    Brands,
    Colors,
}

impl PreferenceCategory {
    pub const ALL: [Self; 3] = [Self::Traits, Self::Brands, Self::Colors];

    /// Reference catalog table.
    pub fn catalog_table(self) -> &'static str {
        match self {
            Self::Traits => "traits",
            Self::Brands => "brands",
            Self::Colors => "colors",
        }
    }

    /// User link table.
    pub fn link_table(self) -> &'static str {
        match self {
            Self::Traits => "user_traits",
            Self::Brands => "user_brands",
            Self::Colors => "user_colors",
        }
    }

    /// Foreign-key column in the link table pointing at the catalog.
    pub fn item_column(self) -> &'static str {
        match self {
            Self::Traits => "trait_id",
            Self::Brands => "brand_id",
            Self::Colors => "color_id",
        }
    }

    /// Largest selection a user may store.
    pub fn max_selections(self) -> usize {
        match self {
            Self::Traits => 5,
            Self::Brands => 10,
            Self::Colors => 3,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Traits => "trait",
            Self::Brands => "brand",
            Self::Colors => "color",
        }
    }
}

/// Deduplicate a selection (keeping first occurrence order) and enforce the
/// category's size limits.
pub fn normalize_selection(
    category: PreferenceCategory,
    ids: &[DbId],
) -> Result<Vec<DbId>, CoreError> {
    if let Some(bad) = ids.iter().find(|id| **id <= 0) {
        return Err(CoreError::Validation(format!(
            "Invalid {} id {bad}",
            category.label()
        )));
    }

    let mut seen = HashSet::with_capacity(ids.len());
    let unique: Vec<DbId> = ids.iter().copied().filter(|id| seen.insert(*id)).collect();

    if unique.is_empty() {
        return Err(CoreError::Validation(format!(
            "Select at least one {}",
            category.label()
        )));
    }

    let max = category.max_selections();
    if unique.len() > max {
        return Err(CoreError::Validation(format!(
            "Select at most {max} {}s",
            category.label()
        )));
    }

    Ok(unique)
}

/// Validate a new catalog entry. `hex` is required for colors and rejected
/// for the other categories.
pub fn validate_catalog_item(
    category: PreferenceCategory,
    slug: &str,
    name: &str,
    hex: Option<&str>,
) -> Result<(), CoreError> {
    if slug.len() > MAX_SLUG_LEN || !SLUG_RE.is_match(slug) {
        return Err(CoreError::InvalidField {
            field: "slug",
            reason: "invalid_slug",
            message: "Slug must be lowercase letters, digits and single hyphens".to_string(),
        });
    }

    let name = name.trim();
    if name.is_empty() || name.chars().count() > MAX_NAME_LEN {
        return Err(CoreError::InvalidField {
            field: "name",
            reason: "invalid_length",
            message: format!("Name must be between 1 and {MAX_NAME_LEN} characters"),
        });
    }

    match (category, hex) {
        (PreferenceCategory::Colors, Some(hex)) if HEX_COLOR_RE.is_match(hex) => Ok(()),
        (PreferenceCategory::Colors, _) => Err(CoreError::InvalidField {
            field: "hex",
            reason: "invalid_hex",
            message: "Colors require a hex value like #A1B2C3".to_string(),
        }),
        (_, Some(_)) => Err(CoreError::InvalidField {
            field: "hex",
            reason: "unexpected_field",
            message: format!("A {} does not take a hex value", category.label()),
        }),
        (_, None) => Ok(()),
    }
}
