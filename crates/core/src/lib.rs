//! Presently domain logic.
//!
//! Pure rules shared by the database and HTTP layers: username validation,
//! availability checking, the onboarding state machine, and profile and
//! preference validation. Nothing in this crate touches the database.

pub mod availability;
pub mod error;
pub mod onboarding;
pub mod preferences;
pub mod profile;
pub mod roles;
pub mod types;
pub mod username;
