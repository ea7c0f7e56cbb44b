//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod catalog_repo;
pub mod preference_repo;
pub mod user_repo;

pub use catalog_repo::CatalogRepo;
pub use preference_repo::PreferenceRepo;
pub use user_repo::UserRepo;
