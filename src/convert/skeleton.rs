use crate::assets::DAYLIO_SKELETON_JSON;
use crate::convert::model::DaylioDayEntry;
use crate::error::ConvertError;
use serde_json::{Map, Value};

fn skeleton() -> Result<Map<String, Value>, ConvertError> {
    match serde_json::from_str::<Value>(DAYLIO_SKELETON_JSON)? {
        Value::Object(map) => Ok(map),
        _ => Err(ConvertError::Validation(
            "daylio skeleton asset is not a JSON object".to_string(),
        )),
    }
}

fn stamp_tags(root: &mut Map<String, Value>, now_millis: i64) {
    let Some(Value::Array(tags)) = root.get_mut("tags") else {
        return;
    };
    for tag in tags.iter_mut().filter_map(Value::as_object_mut) {
        tag.insert("createdAt".to_string(), Value::from(now_millis));
    }
}

fn stamp_metadata(root: &mut Map<String, Value>, entries: usize, now_millis: i64) {
    let metadata = root
        .entry("metadata")
        .or_insert_with(|| Value::Object(Map::new()));
    if let Some(metadata) = metadata.as_object_mut() {
        metadata.insert("number_of_entries".to_string(), Value::from(entries));
        metadata.insert("created_at".to_string(), Value::from(now_millis));
    }
}

/// Assemble a complete Daylio backup around `day_entries`.
///
/// Everything except `dayEntries`, tag `createdAt` and the `metadata`
/// counters comes verbatim from the compiled-in skeleton, so the result only
/// depends on the arguments.
pub fn build_backup(day_entries: &[DaylioDayEntry], now_millis: i64) -> Result<Value, ConvertError> {
    let mut root = skeleton()?;
    stamp_tags(&mut root, now_millis);
    stamp_metadata(&mut root, day_entries.len(), now_millis);
    root.insert("dayEntries".to_string(), serde_json::to_value(day_entries)?);
    Ok(Value::Object(root))
}
