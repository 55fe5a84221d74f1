use chrono::{DateTime, Utc};
use mongodb::bson::DateTime as BsonDateTime;

pub fn bson_to_chrono(dt: BsonDateTime) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(dt.timestamp_millis()).unwrap_or_default()
}
