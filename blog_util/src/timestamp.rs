use chrono::{DateTime, NaiveDateTime, Utc};

/// Parse a backend timestamp. Accepts RFC 3339 as well as the offset-less
/// `2024-03-01T12:34:56.789` form, which is taken as UTC.
pub fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    if let Ok(date) = DateTime::parse_from_rfc3339(s) {
        return Ok(date.to_utc());
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f").map(|date| date.and_utc())
}

/// Serde adapter for optional timestamps. Use with `#[serde(default, with = "...")]`.
pub mod optional {
    use chrono::{DateTime, Utc};
    use serde::{self, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(date: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match date {
            Some(date) => serializer.serialize_str(&date.to_rfc3339()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = Option::<String>::deserialize(deserializer)?;
        s.filter(|s| !s.trim().is_empty())
            .map(|s| super::parse_timestamp(s.trim()).map_err(serde::de::Error::custom))
            .transpose()
    }
}
