//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` entity struct matching the database row
//! - `Deserialize` DTOs for inserts and updates
//! - `Serialize` response shapes where the row must not be exposed as-is

pub mod catalog;
pub mod preference;
pub mod user;
