/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Identity id issued by the external identity provider (JWT `sub`).
pub type IdentityId = uuid::Uuid;
