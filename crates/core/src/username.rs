//! Username format rules.
//!
//! A single rule table drives every entry point that accepts a username
//! (validation endpoint, availability check, claim). Rules are applied in a
//! fixed order and the first failure wins, so ambiguous inputs always report
//! the same reason.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Policy
// ---------------------------------------------------------------------------

/// Length bounds and separator set for usernames.
///
/// Two rule-sets exist in the product: the strict one used by the claim step
/// and the legacy one used by older clients. Which one applies is chosen by
/// configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UsernamePolicy {
    /// Minimum length in characters (inclusive).
    pub min_len: usize,
    /// Maximum length in characters (inclusive).
    pub max_len: usize,
    /// Separator allowed in addition to `_`.
    pub extra_separator: char,
}

impl UsernamePolicy {
    /// 4-12 characters, `_` and `.` separators.
    pub const STRICT: Self = Self {
        min_len: 4,
        max_len: 12,
        extra_separator: '.',
    };

    /// 3-30 characters, `_` and `-` separators.
    pub const LEGACY: Self = Self {
        min_len: 3,
        max_len: 30,
        extra_separator: '-',
    };

    /// Resolve a policy by its configuration name (`strict` or `legacy`).
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "strict" => Some(Self::STRICT),
            "legacy" => Some(Self::LEGACY),
            _ => None,
        }
    }

    /// Configuration name of this policy, or `custom` for hand-built ones.
    pub fn name(&self) -> &'static str {
        if *self == Self::STRICT {
            "strict"
        } else if *self == Self::LEGACY {
            "legacy"
        } else {
            "custom"
        }
    }

    /// Whether `c` counts as a separator under this policy.
    pub fn is_separator(&self, c: char) -> bool {
        c == '_' || c == self.extra_separator
    }
}

impl Default for UsernamePolicy {
    fn default() -> Self {
        Self::STRICT
    }
}

// ---------------------------------------------------------------------------
// Reserved words
// ---------------------------------------------------------------------------

/// Usernames that collide with system routes, the brand, or staff roles.
///
/// Stored lowercase; matching is case-insensitive.
pub const RESERVED_USERNAMES: &[&str] = &[
    // System routes
    "about",
    "account",
    "api",
    "auth",
    "callback",
    "catalog",
    "claim",
    "dashboard",
    "home",
    "login",
    "logout",
    "me",
    "onboarding",
    "privacy",
    "profile",
    "profiles",
    "register",
    "settings",
    "signin",
    "signup",
    "terms",
    "username",
    "usernames",
    // Brand
    "presently",
    "presentlyapp",
    "presently_app",
    "presently.app",
    // Staff and support
    "admin",
    "administrator",
    "help",
    "moderator",
    "official",
    "root",
    "security",
    "staff",
    "support",
    "system",
    // Literal values that confuse clients
    "null",
    "undefined",
];

/// Case-insensitive membership test against [`RESERVED_USERNAMES`].
pub fn is_reserved(username: &str) -> bool {
    let lowered = username.trim().to_ascii_lowercase();
    RESERVED_USERNAMES.contains(&lowered.as_str())
}

// ---------------------------------------------------------------------------
// Rejection reasons
// ---------------------------------------------------------------------------

/// Why a username was rejected. Serialized as a snake_case reason code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UsernameRejection {
    Empty,
    ContainsWhitespace,
    TooShort,
    TooLong,
    MustStartWithLetter,
    MustEndWithAlphanumeric,
    InvalidCharacters,
    ConsecutiveSeparators,
    /// Never produced under the current rule order, since rule 4 rejects a
    /// leading digit first.
    AllNumeric,
    Reserved,
}

impl UsernameRejection {
    /// Stable machine-readable code, identical to the serde representation.
    pub fn code(self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::ContainsWhitespace => "contains_whitespace",
            Self::TooShort => "too_short",
            Self::TooLong => "too_long",
            Self::MustStartWithLetter => "must_start_with_letter",
            Self::MustEndWithAlphanumeric => "must_end_with_alphanumeric",
            Self::InvalidCharacters => "invalid_characters",
            Self::ConsecutiveSeparators => "consecutive_separators",
            Self::AllNumeric => "all_numeric",
            Self::Reserved => "reserved",
        }
    }

    /// Human-readable explanation for the given policy.
    pub fn message(self, policy: &UsernamePolicy) -> String {
        match self {
            Self::Empty => "Username is required".to_string(),
            Self::ContainsWhitespace => "Username cannot contain spaces".to_string(),
            Self::TooShort => format!(
                "Username must be at least {} characters long",
                policy.min_len
            ),
            Self::TooLong => format!(
                "Username must be at most {} characters long",
                policy.max_len
            ),
            Self::MustStartWithLetter => "Username must start with a letter".to_string(),
            Self::MustEndWithAlphanumeric => {
                "Username must end with a letter or number".to_string()
            }
            Self::InvalidCharacters => format!(
                "Username may only contain letters, numbers, '_' and '{}'",
                policy.extra_separator
            ),
            Self::ConsecutiveSeparators => {
                "Username cannot contain consecutive separators".to_string()
            }
            Self::AllNumeric => "Username cannot be only numbers".to_string(),
            Self::Reserved => "This username is reserved".to_string(),
        }
    }

    /// Convert into a field-level [`CoreError::InvalidField`] on `username`.
    pub fn into_core_error(self, policy: &UsernamePolicy) -> CoreError {
        CoreError::InvalidField {
            field: "username",
            reason: self.code(),
            message: self.message(policy),
        }
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate a raw username against `policy`.
///
/// Rules, in order:
///
/// 1. non-empty after trim
/// 2. no whitespace anywhere
/// 3. length within `min_len..=max_len`
/// 4. starts with an ASCII letter
/// 5. ends with an ASCII letter or digit
/// 6. only letters, digits and separators
/// 7. no two adjacent separators
/// 8. not entirely numeric
/// 9. not reserved
pub fn validate_username(raw: &str, policy: &UsernamePolicy) -> Result<(), UsernameRejection> {
    if raw.trim().is_empty() {
        return Err(UsernameRejection::Empty);
    }

    if raw.chars().any(char::is_whitespace) {
        return Err(UsernameRejection::ContainsWhitespace);
    }

    let len = raw.chars().count();
    if len < policy.min_len {
        return Err(UsernameRejection::TooShort);
    }
    if len > policy.max_len {
        return Err(UsernameRejection::TooLong);
    }

    // Non-empty was checked above.
    let first = raw.chars().next().unwrap_or_default();
    if !first.is_ascii_alphabetic() {
        return Err(UsernameRejection::MustStartWithLetter);
    }

    let last = raw.chars().next_back().unwrap_or_default();
    if !last.is_ascii_alphanumeric() {
        return Err(UsernameRejection::MustEndWithAlphanumeric);
    }

    if !raw
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || policy.is_separator(c))
    {
        return Err(UsernameRejection::InvalidCharacters);
    }

    let chars: Vec<char> = raw.chars().collect();
    if chars
        .windows(2)
        .any(|pair| policy.is_separator(pair[0]) && policy.is_separator(pair[1]))
    {
        return Err(UsernameRejection::ConsecutiveSeparators);
    }

    // Unreachable while rule 4 holds: an all-digit input fails there first.
    if raw.chars().all(|c| c.is_ascii_digit()) {
        return Err(UsernameRejection::AllNumeric);
    }

    if is_reserved(raw) {
        return Err(UsernameRejection::Reserved);
    }

    Ok(())
}

/// Canonical stored form: trimmed and ASCII-lowercased.
pub fn normalize_username(raw: &str) -> String {
    raw.trim().to_ascii_lowercase()
}

/// Serializable validation outcome (`{ "valid": bool, "reason": code|null }`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UsernameCheck {
    pub valid: bool,
    pub reason: Option<UsernameRejection>,
}

impl UsernameCheck {
    pub fn evaluate(raw: &str, policy: &UsernamePolicy) -> Self {
        match validate_username(raw, policy) {
            Ok(()) => Self {
                valid: true,
                reason: None,
            },
            Err(reason) => Self {
                valid: false,
                reason: Some(reason),
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
