//! HTTP handlers, grouped by resource.

pub mod me;
pub mod onboarding;
pub mod preferences;
pub mod profiles;
pub mod username;
