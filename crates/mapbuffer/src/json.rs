//! JSON bridge for keyed tables.
//!
//! Debugging and interop surface: [`from_json`] serializes a JSON document
//! into table bytes, [`to_json`] renders a decoded table back to JSON.
//!
//! # Mapping
//!
//! | JSON                  | Wire                                     |
//! |-----------------------|------------------------------------------|
//! | null                  | NULL                                     |
//! | true/false            | BOOL                                     |
//! | integer fitting i32   | INT                                      |
//! | other integer         | LONG                                     |
//! | other number          | DOUBLE                                   |
//! | string                | STRING (UTF-8)                           |
//! | object                | nested table, keys parsed as base-10 u16 |
//! | array                 | nested table keyed `0..len-1`            |
//!
//! The top level always renders back as an object. A decoded *nested*
//! table whose keys are exactly `0..count-1` (and has at least one entry)
//! renders as a JSON array, otherwise as an object with decimal keys; both
//! shapes are identical on the wire, so a dense-keyed nested object comes
//! back as an array. Empty nested tables render as `{}`.

use serde_json::Value as JsonValue;

use crate::builder::MapBufferBuilder;
use crate::error::{Error, Result};
use crate::map::MapBuffer;
use crate::value::TypedValue;

/// Serialize a JSON object string into keyed-table bytes.
///
/// The top-level value must be an object; its keys must parse as `u16`.
///
/// # Errors
///
/// Returns `Error::JsonParse` on invalid JSON, a non-object top level,
/// non-`u16` keys, an unrepresentable number, or an array longer than the
/// key space.
pub fn from_json(json: &str) -> Result<Vec<u8>> {
    let value: JsonValue =
        serde_json::from_str(json).map_err(|e| Error::JsonParse(e.to_string()))?;
    let JsonValue::Object(object) = value else {
        return Err(Error::JsonParse("top-level value must be an object".into()));
    };
    build_object(&object)
}

fn build_object(object: &serde_json::Map<String, JsonValue>) -> Result<Vec<u8>> {
    let mut builder = MapBufferBuilder::new();
    for (raw_key, value) in object {
        let key: u16 = raw_key
            .parse()
            .map_err(|_| Error::JsonParse(format!("object key {raw_key:?} is not a u16")))?;
        put_value(&mut builder, key, value)?;
    }
    Ok(builder.build())
}

fn build_list(items: &[JsonValue]) -> Result<Vec<u8>> {
    // The entry count field is u16, so 65535 items is the ceiling.
    if items.len() > usize::from(u16::MAX) {
        return Err(Error::JsonParse(format!(
            "array of {} items exceeds the table capacity",
            items.len()
        )));
    }
    let mut builder = MapBufferBuilder::new();
    for (index, value) in items.iter().enumerate() {
        put_value(&mut builder, index as u16, value)?;
    }
    Ok(builder.build())
}

fn put_value(builder: &mut MapBufferBuilder, key: u16, value: &JsonValue) -> Result<()> {
    match value {
        JsonValue::Null => builder.put_null(key),
        JsonValue::Bool(v) => builder.put_bool(key, *v),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                match i32::try_from(i) {
                    Ok(v) => builder.put_int(key, v),
                    Err(_) => builder.put_long(key, i),
                }
            } else if let Some(f) = n.as_f64() {
                builder.put_double(key, f);
            } else {
                return Err(Error::JsonParse(format!("unrepresentable number {n}")));
            }
        }
        JsonValue::String(s) => builder.put_string(key, s),
        JsonValue::Object(object) => builder.put_map(key, build_object(object)?),
        JsonValue::Array(items) => builder.put_map(key, build_list(items)?),
    }
    Ok(())
}

/// Render a decoded table as a JSON string.
///
/// # Errors
///
/// Returns `Error::JsonSerialize` for non-finite doubles, plus any decode
/// error from reading the table.
pub fn to_json(map: &MapBuffer<'_>) -> Result<String> {
    let value = object_value(map)?;
    serde_json::to_string(&value).map_err(|e| Error::JsonSerialize(e.to_string()))
}

fn object_value(map: &MapBuffer<'_>) -> Result<JsonValue> {
    let mut object = serde_json::Map::new();
    for entry in map.iter() {
        object.insert(entry.key().to_string(), entry_value(entry.typed()?)?);
    }
    Ok(JsonValue::Object(object))
}

fn nested_value(map: &MapBuffer<'_>) -> Result<JsonValue> {
    if is_list_shaped(map) {
        let mut items = Vec::with_capacity(usize::from(map.count()));
        for entry in map.iter() {
            items.push(entry_value(entry.typed()?)?);
        }
        return Ok(JsonValue::Array(items));
    }
    object_value(map)
}

/// A non-empty table whose keys are exactly `0..count-1` reads as a list.
fn is_list_shaped(map: &MapBuffer<'_>) -> bool {
    !map.is_empty()
        && map
            .iter()
            .enumerate()
            .all(|(position, entry)| usize::from(entry.key()) == position)
}

fn entry_value(value: TypedValue<'_>) -> Result<JsonValue> {
    match value {
        TypedValue::Null => Ok(JsonValue::Null),
        TypedValue::Bool(v) => Ok(JsonValue::Bool(v)),
        TypedValue::Int(v) => Ok(JsonValue::from(v)),
        TypedValue::Long(v) => Ok(JsonValue::from(v)),
        TypedValue::Double(v) => serde_json::Number::from_f64(v)
            .map(JsonValue::Number)
            .ok_or_else(|| Error::JsonSerialize(format!("non-finite double {v}"))),
        TypedValue::Str(s) => Ok(JsonValue::String(s.to_string())),
        TypedValue::Map(nested) => nested_value(&nested),
    }
}
