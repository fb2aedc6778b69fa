/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Calendar dates (service start, milestone and task due dates) carry no zone.
pub type CalendarDate = chrono::NaiveDate;
