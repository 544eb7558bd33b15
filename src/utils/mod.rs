pub mod text;
pub mod time;

pub use text::normalize_symbol;
pub use time::{cache_buster_millis, current_human_timestamp};
