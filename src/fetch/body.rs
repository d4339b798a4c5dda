use crate::model::ChargerRecord;
use serde_json::Value;

/// Extract charger records from a status endpoint body.
///
/// Accepts a bare array or an object with a `chargers` array. Any other shape
/// yields an empty list; array elements that are not objects are skipped.
pub fn parse_chargers_body(body: Value) -> Vec<ChargerRecord> {
    let items = match body {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("chargers") {
            Some(Value::Array(items)) => items,
            _ => return Vec::new(),
        },
        _ => return Vec::new(),
    };

    items
        .into_iter()
        .filter(Value::is_object)
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect()
}

/// Parse raw bytes; invalid JSON is an error, odd shapes are not
pub fn parse_chargers_bytes(bytes: &[u8]) -> serde_json::Result<Vec<ChargerRecord>> {
    let value: Value = serde_json::from_slice(bytes)?;
    Ok(parse_chargers_body(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn bare_array_and_wrapped_object_parse_alike() {
        let records = json!([
            {"plug": 1, "status": "Available", "online": 1},
            {"plug": 2, "status": "Charging", "online": true}
        ]);
        let bare = parse_chargers_body(records.clone());
        let wrapped = parse_chargers_body(json!({"chargers": records, "name": "x"}));
        assert_eq!(bare.len(), 2);
        assert_eq!(bare, wrapped);
        assert_eq!(bare[1].plug, "2");
    }

    #[test]
    fn other_shapes_are_empty() {
        assert!(parse_chargers_body(json!({"chargers": "nope"})).is_empty());
        assert!(parse_chargers_body(json!({"data": []})).is_empty());
        assert!(parse_chargers_body(json!("text")).is_empty());
        assert!(parse_chargers_body(json!(42)).is_empty());
        assert!(parse_chargers_body(Value::Null).is_empty());
    }

    #[test]
    fn non_object_elements_are_skipped() {
        let parsed = parse_chargers_body(json!([null, 3, {"plug": "A"}, "x"]));
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].plug, "A");
    }

    #[test]
    fn invalid_json_bytes_fail() {
        assert!(parse_chargers_bytes(b"{not json").is_err());
        assert_eq!(parse_chargers_bytes(b"[]").unwrap().len(), 0);
    }
}
