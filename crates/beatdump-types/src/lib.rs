pub mod error;
pub mod record;
pub mod time;

pub use error::{Error, Result};
pub use record::{CATEGORY_FIELD, Category, RawRecord, lookup};
pub use time::{
    Chunk, TimeRange, Timestamp, duration_from_millis, duration_from_secs, format_timestamp,
    parse_timestamp,
};
