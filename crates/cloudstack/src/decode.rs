//! Response envelope handling and lenient field decoding.

use serde::de::{DeserializeOwned, Deserializer, Error as _};
use serde::Deserialize;
use serde_json::Value;

use crate::error::{CloudStackError, CloudStackResult};

/// Strips the single-key `<command>response` envelope.
///
/// An empty envelope (`{}`) yields an empty object so list records decode
/// with zero items. Non-object values pass through unchanged.
pub fn unwrap_envelope(value: Value) -> Value {
    match value {
        Value::Object(map) => match map.into_iter().next() {
            Some((_, inner)) => inner,
            None => Value::Object(Default::default()),
        },
        other => other,
    }
}

/// Takes the record nested under `key`, e.g. `{"role": {...}}`.
///
/// Payloads that already are the bare record pass through unchanged.
pub fn unwrap_record(payload: Value, key: &str) -> Value {
    match payload {
        Value::Object(mut map) if map.get(key).map_or(false, Value::is_object) => {
            map.remove(key).unwrap_or_default()
        }
        other => other,
    }
}

/// Decodes a payload into a typed record.
///
/// `null` members are dropped first so they fall back to the field default.
pub fn decode_payload<T: DeserializeOwned>(
    command: &str,
    mut payload: Value,
) -> CloudStackResult<T> {
    drop_nulls(&mut payload);
    serde_json::from_value(payload).map_err(|err| CloudStackError::decode(command, err))
}

/// Removes `null` object members at every depth.
///
/// Records use `#[serde(default)]`, which only covers absent keys.
pub fn drop_nulls(value: &mut Value) {
    match value {
        Value::Object(map) => {
            map.retain(|_, member| !member.is_null());
            map.values_mut().for_each(drop_nulls);
        }
        Value::Array(items) => items.iter_mut().for_each(drop_nulls),
        _ => {}
    }
}

/// Accepts `true`, `"true"` and their false counterparts; null is false.
pub fn bool_or_string<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Bool(b) => Ok(b),
        Value::String(s) => match s.to_ascii_lowercase().as_str() {
            "true" => Ok(true),
            "false" | "" => Ok(false),
            other => Err(D::Error::custom(format!("invalid boolean string {:?}", other))),
        },
        Value::Null => Ok(false),
        other => Err(D::Error::custom(format!("expected boolean, found {}", other))),
    }
}

/// Accepts a string or a number and always yields a string; null is empty.
pub fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Null => Ok(String::new()),
        other => Err(D::Error::custom(format!("expected string or number, found {}", other))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Lenient {
        #[serde(default, deserialize_with = "bool_or_string")]
        success: bool,
        #[serde(default, deserialize_with = "string_or_number")]
        ostypeid: String,
    }

    #[test]
    fn test_unwrap_envelope() {
        let inner = unwrap_envelope(json!({"listrolesresponse": {"count": 1}}));
        assert_eq!(inner, json!({"count": 1}));
    }

    #[test]
    fn test_unwrap_empty_envelope() {
        assert_eq!(unwrap_envelope(json!({})), json!({}));
        assert_eq!(unwrap_envelope(json!({"listvolumesresponse": {}})), json!({}));
    }

    #[test]
    fn test_unwrap_non_object_passthrough() {
        assert_eq!(unwrap_envelope(json!("text")), json!("text"));
    }

    #[test]
    fn test_unwrap_record() {
        let nested = json!({"role": {"id": "r-1", "name": "ops"}});
        assert_eq!(unwrap_record(nested, "role"), json!({"id": "r-1", "name": "ops"}));

        let bare = json!({"id": "r-1", "role": "admin"});
        assert_eq!(unwrap_record(bare.clone(), "role"), bare);
    }

    #[test]
    fn test_bool_or_string() {
        let parsed: Lenient = serde_json::from_value(json!({"success": "true"})).unwrap();
        assert!(parsed.success);
        let parsed: Lenient = serde_json::from_value(json!({"success": false})).unwrap();
        assert!(!parsed.success);
        let parsed: Lenient = serde_json::from_value(json!({"success": null})).unwrap();
        assert!(!parsed.success);
        assert!(serde_json::from_value::<Lenient>(json!({"success": "maybe"})).is_err());
    }

    #[test]
    fn test_string_or_number() {
        let parsed: Lenient = serde_json::from_value(json!({"ostypeid": 142})).unwrap();
        assert_eq!(parsed.ostypeid, "142");
        let parsed: Lenient =
            serde_json::from_value(json!({"ostypeid": "0b2cdd2a-0f1c-11e6"})).unwrap();
        assert_eq!(parsed.ostypeid, "0b2cdd2a-0f1c-11e6");
        let parsed: Lenient = serde_json::from_value(json!({})).unwrap();
        assert!(parsed.ostypeid.is_empty());
    }

    #[test]
    fn test_null_members_use_defaults() {
        #[derive(Debug, Default, Deserialize)]
        #[serde(default)]
        struct Record {
            id: String,
            name: String,
            size: i64,
            tags: Vec<String>,
        }

        #[derive(Debug, Default, Deserialize)]
        #[serde(default)]
        struct List {
            count: i64,
            item: Vec<Record>,
        }

        let list: List = decode_payload(
            "listItems",
            json!({"count": 1, "item": [{"id": "v", "name": null, "size": null, "tags": null}]}),
        )
        .unwrap();

        assert_eq!(list.count, 1);
        assert_eq!(list.item[0].id, "v");
        assert!(list.item[0].name.is_empty());
        assert_eq!(list.item[0].size, 0);
        assert!(list.item[0].tags.is_empty());
    }

    #[test]
    fn test_drop_nulls_keeps_array_slots() {
        let mut value = json!({"a": null, "b": [null, {"c": null, "d": 1}]});
        drop_nulls(&mut value);
        assert_eq!(value, json!({"b": [null, {"d": 1}]}));
    }

    #[test]
    fn test_decode_payload_error_names_command() {
        let err = decode_payload::<Lenient>("listIsos", json!({"success": 3})).unwrap_err();
        assert!(err.to_string().contains("listIsos"));
    }
}
