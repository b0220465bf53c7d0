use chrono::Local;

/// Current unix timestamp, in seconds.
pub fn current_timestamp() -> i64 {
    Local::now().timestamp()
}
