use chrono::{TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::{parse_timestamp, truncate_words};

#[derive(Deserialize, Serialize, Debug)]
struct Stamped {
    #[serde(default, with = "crate::timestamp::optional")]
    created_at: Option<chrono::DateTime<Utc>>,
}

#[test]
fn test_parse_rfc3339() {
    let date = parse_timestamp("2024-03-01T12:00:00+03:00").unwrap();
    assert_eq!(date, Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap());
}

#[test]
fn test_parse_local_datetime() {
    let date = parse_timestamp("2024-03-01T12:34:56.789").unwrap();
    assert_eq!(date.timestamp(), Utc.with_ymd_and_hms(2024, 3, 1, 12, 34, 56).unwrap().timestamp());
    assert!(parse_timestamp("yesterday").is_err());
}

#[test]
fn test_optional_timestamp_field() {
    let missing: Stamped = serde_json::from_str("{}").unwrap();
    assert!(missing.created_at.is_none());
    let null: Stamped = serde_json::from_str(r#"{"created_at": null}"#).unwrap();
    assert!(null.created_at.is_none());
    let present: Stamped = serde_json::from_str(r#"{"created_at": "2024-01-02T03:04:05"}"#).unwrap();
    assert_eq!(present.created_at, Some(Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap()));
    assert!(serde_json::from_str::<Stamped>(r#"{"created_at": "garbage"}"#).is_err());
}

#[test]
fn test_truncate_words() {
    assert_eq!(truncate_words("one two three", 3), "one two three");
    assert_eq!(truncate_words("one  two\nthree four", 2), "one two...");
    assert_eq!(truncate_words("", 5), "");
}
