use chrono::{DateTime, Utc};
use rand::Rng;

/// Id epoch: 2024-01-01 00:00:00 UTC
const ID_EPOCH_MS: i64 = 1_704_067_200_000;
const TIMESTAMP_MASK: i64 = 0x1FF_FFFF_FFFF;
const SEQUENCE_BITS: u32 = 12;

/// Current UTC time, the timestamp type stored on orders and messages
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Time-ordered id: 41 bits of milliseconds since the id epoch, 12 random bits
///
/// Stays below 2^53 so the value survives a round trip through JSON numbers.
pub fn snowflake_id() -> i64 {
    let ts = (now_millis() - ID_EPOCH_MS) & TIMESTAMP_MASK;
    let sequence: i64 = rand::thread_rng().gen_range(0..1 << SEQUENCE_BITS);
    (ts << SEQUENCE_BITS) | sequence
}

/// String form of [`snowflake_id`], used for message and notification ids
pub fn record_id() -> String {
    snowflake_id().to_string()
}
