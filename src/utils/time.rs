use chrono::{DateTime, Utc};

pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Nanoseconds since the Unix epoch, `None` once the value no longer fits in an `i64` (year 2262).
pub fn unix_nanos(dt: DateTime<Utc>) -> Option<i64> {
    dt.timestamp_nanos_opt()
}
