//! Profile completion input and its validation.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::Deserialize;
use validator::{Validate, ValidationErrors};

use crate::error::CoreError;

static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+[1-9][0-9]{7,14}$").expect("valid regex"));

pub const MAX_NAME_LEN: u64 = 50;
pub const MAX_BIO_LEN: u64 = 280;

/// Profile fields submitted on the profile step.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ProfileInput {
    #[validate(length(min = 1, max = 50))]
    pub first_name: String,
    #[validate(length(max = 50))]
    pub last_name: Option<String>,
    #[validate(length(max = 280))]
    pub bio: Option<String>,
    #[validate(url)]
    pub avatar_url: Option<String>,
    pub birthday: Option<NaiveDate>,
    #[validate(regex(path = *PHONE_RE))]
    pub phone: Option<String>,
}

/// Field order used to pick which error to report first.
const FIELD_ORDER: [(&str, &str); 5] = [
    ("first_name", "invalid_length"),
    ("last_name", "invalid_length"),
    ("bio", "invalid_length"),
    ("avatar_url", "invalid_url"),
    ("phone", "invalid_phone"),
];

/// Trim text fields, drop blank optionals, and validate.
///
/// `today` is passed in so birthdays can be checked deterministically.
pub fn validate_profile(input: ProfileInput, today: NaiveDate) -> Result<ProfileInput, CoreError> {
    let cleaned = ProfileInput {
        first_name: input.first_name.trim().to_string(),
        last_name: non_blank(input.last_name),
        bio: non_blank(input.bio),
        avatar_url: non_blank(input.avatar_url),
        birthday: input.birthday,
        phone: non_blank(input.phone),
    };

    if let Err(errors) = cleaned.validate() {
        return Err(first_field_error(&errors));
    }

    if cleaned.birthday.is_some_and(|b| b > today) {
        return Err(CoreError::InvalidField {
            field: "birthday",
            reason: "in_future",
            message: "Birthday cannot be in the future".to_string(),
        });
    }

    Ok(cleaned)
}

/// Display name shown on public profiles.
pub fn display_name(first_name: &str, last_name: Option<&str>) -> String {
    match last_name {
        Some(last) if !last.trim().is_empty() => format!("{} {}", first_name.trim(), last.trim()),
        _ => first_name.trim().to_string(),
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn first_field_error(errors: &ValidationErrors) -> CoreError {
    let field_errors = errors.field_errors();
    for (field, reason) in FIELD_ORDER {
        if field_errors.contains_key(field) {
            let message = match field {
                "first_name" => format!("First name must be between 1 and {MAX_NAME_LEN} characters"),
                "last_name" => format!("Last name must be at most {MAX_NAME_LEN} characters"),
                "bio" => format!("Bio must be at most {MAX_BIO_LEN} characters"),
                "avatar_url" => "Avatar must be a valid URL".to_string(),
                _ => "Phone must be in international format, e.g. +14155550123".to_string(),
            };
            return CoreError::InvalidField {
                field,
                reason,
                message,
            };
        }
    }
    CoreError::Validation(errors.to_string())
}
