use std::sync::Arc;

use presently_core::availability::AvailabilityLookup;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: presently_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Read path for username availability.
    pub username_lookup: Arc<dyn AvailabilityLookup>,
}

impl AppState {
    /// State backed by `pool` for both persistence and availability lookups.
    pub fn new(pool: presently_db::DbPool, config: ServerConfig) -> Self {
        let username_lookup: Arc<dyn AvailabilityLookup> =
            Arc::new(presently_db::lookup::PgUsernameLookup::new(pool.clone()));
        Self {
            pool,
            config: Arc::new(config),
            username_lookup,
        }
    }
}
