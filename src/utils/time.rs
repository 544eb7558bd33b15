use chrono::{Local, Utc};

/// Milliseconds since the Unix epoch, sent as the `_` query parameter so
/// intermediaries never serve a cached series.
pub fn cache_buster_millis() -> i64 {
    Utc::now().timestamp_millis()
}

pub fn current_human_timestamp() -> String {
    Local::now().format("%Y-%m-%d %H:%M").to_string()
}
