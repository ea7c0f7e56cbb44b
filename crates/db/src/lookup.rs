//! Database-backed [`AvailabilityLookup`].

use async_trait::async_trait;
use presently_core::availability::AvailabilityLookup;
use presently_core::error::CoreError;

use crate::repositories::UserRepo;
use crate::DbPool;

/// Availability lookup against the `users` table.
///
/// The only read path for availability: a single `EXISTS` over the
/// normalized username index, which needs no caller identity.
#[derive(Debug, Clone)]
pub struct PgUsernameLookup {
    pool: DbPool,
}

impl PgUsernameLookup {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AvailabilityLookup for PgUsernameLookup {
    async fn is_taken(&self, normalized: &str) -> Result<bool, CoreError> {
        UserRepo::username_exists(&self.pool, normalized)
            .await
            .map_err(|e| CoreError::Internal(format!("username lookup failed: {e}")))
    }
}
