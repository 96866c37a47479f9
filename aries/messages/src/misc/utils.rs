use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serializer;

/// Generates a fresh `@id`/`thid` value.
pub fn new_message_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

pub fn serialize_opt_datetime<S>(
    dt: &Option<DateTime<Utc>>,
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match dt {
        Some(dt) => serializer.serialize_str(&dt.to_rfc3339_opts(SecondsFormat::Millis, true)),
        None => serializer.serialize_none(),
    }
}
