use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One logged moment in a Daylio backup. `mood` runs 1 (best) to 5 (worst),
/// `month` is zero-based.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DaylioDayEntry {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    #[serde(default)]
    pub hour: u32,
    #[serde(default)]
    pub minute: u32,
    #[serde(default)]
    pub datetime: i64,
    #[serde(rename = "timeZoneOffset", default = "default_time_zone_offset")]
    pub time_zone_offset: i64,
    #[serde(default)]
    pub note_title: String,
    #[serde(default)]
    pub note: String,
    pub mood: i64,
    #[serde(default)]
    pub assets: Vec<Value>,
    #[serde(default)]
    pub tags: Vec<Value>,
}

fn default_time_zone_offset() -> i64 {
    -1
}

/// Decode side of a Daylio backup: only `dayEntries` is interpreted.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DaylioBackup {
    #[serde(rename = "dayEntries", default)]
    pub day_entries: Vec<DaylioDayEntry>,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

/// One calendar day in a Year in Pixels backup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PixelsDay {
    pub date: String,
    pub entries: Vec<PixelsEntry>,
}

/// `value` runs 1 (worst) to 5 (best), the inverse of Daylio's `mood`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PixelsEntry {
    #[serde(rename = "type", default = "default_entry_type")]
    pub kind: String,
    pub value: i64,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub notes: String,
    #[serde(rename = "isHighlighted", default)]
    pub is_highlighted: bool,
    #[serde(default)]
    pub tags: Vec<Value>,
}

pub const PIXELS_MOOD_TYPE: &str = "Mood";

fn default_entry_type() -> String {
    PIXELS_MOOD_TYPE.to_string()
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Number of default moods; both formats map through `MOOD_POLARITY - x`.
pub const MOOD_POLARITY: i64 = 6;
pub const MOOD_MIN: i64 = 1;
pub const MOOD_MAX: i64 = 5;

pub fn invert_polarity(value: i64) -> i64 {
    MOOD_POLARITY - value
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn day_entry_decodes_with_only_required_fields() {
        let raw = r#"{"year":2023,"month":0,"day":5,"mood":2}"#;
        let entry: DaylioDayEntry = serde_json::from_str(raw).expect("decode");
        assert_eq!(entry.time_zone_offset, -1);
        assert_eq!(entry.note, "");
        assert!(entry.tags.is_empty());
    }

    #[test]
    fn pixels_entry_tolerates_null_notes_and_missing_flags() {
        let raw = r#"{"date":"2023-01-05","entries":[{"type":"Mood","value":4,"notes":null}]}"#;
        let day: PixelsDay = serde_json::from_str(raw).expect("decode");
        assert_eq!(day.entries[0].notes, "");
        assert!(!day.entries[0].is_highlighted);
    }

    #[test]
    fn pixels_day_serializes_with_wire_field_names() {
        let day = PixelsDay {
            date: "2023-01-05".to_string(),
            entries: vec![PixelsEntry {
                kind: PIXELS_MOOD_TYPE.to_string(),
                value: 3,
                notes: "a\nb".to_string(),
                is_highlighted: false,
                tags: Vec::new(),
            }],
        };
        let out = serde_json::to_string(&day).expect("encode");
        assert_eq!(
            out,
            r#"{"date":"2023-01-05","entries":[{"type":"Mood","value":3,"notes":"a\nb","isHighlighted":false,"tags":[]}]}"#
        );
    }

    #[test]
    fn backup_keeps_unrelated_keys_opaque() {
        let raw = r#"{"version":19,"dayEntries":[{"year":2023,"month":0,"day":5,"mood":1}]}"#;
        let backup: DaylioBackup = serde_json::from_str(raw).expect("decode");
        assert_eq!(backup.day_entries.len(), 1);
        assert_eq!(backup.rest.get("version"), Some(&Value::from(19)));
    }
}
