/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// Entity version counters start at 1 and only move forward.
pub type Version = i32;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
