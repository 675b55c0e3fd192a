/// Identifier of a subtitle set or a stored subtitle entry.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
