/// Account primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// Inquiries use opaque, time-ordered UUIDs assigned by the store.
pub type InquiryId = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
