//! Keyed-map codec: `enum -> value` maps as JSON objects keyed by the enum's
//! symbolic wire name
//!
//! Decoding never fails on a key. Unrecognized names coerce to the parse
//! function's fallback; when several entries land on the same key the later
//! one overwrites the earlier one and a warning is logged. Only the values
//! are decoded strictly.

use crate::error::{MalformedDocumentError, Result};
use crate::json::nest;
use crate::jsonable::{FromJson, Jsonable, Shape};
use crate::registry::WireEnum;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Encode a map with nested values in the given shape
pub fn encode<K, V>(map: &BTreeMap<K, V>, shape: Shape) -> Value
where
    K: WireEnum + Ord,
    V: Jsonable,
{
    encode_with(map, |value| value.to_shape(shape))
}

/// Encode a map with an explicit value encoder
pub fn encode_with<K, V, F>(map: &BTreeMap<K, V>, encode_value: F) -> Value
where
    K: WireEnum + Ord,
    F: Fn(&V) -> Value,
{
    let mut object = Map::new();
    for (key, value) in map {
        object.insert(key.name().to_string(), encode_value(value));
    }
    Value::Object(object)
}

/// Decode a JSON object into a map, parsing each field name through `parse`
pub fn decode<K, V, P>(json: &Value, parse: P) -> Result<BTreeMap<K, V>>
where
    K: WireEnum + Ord,
    V: FromJson,
    P: Fn(&str) -> K,
{
    decode_with(json, parse, V::from_json)
}

/// Decode with the enum's own name lookup
pub fn decode_keyed<K, V>(json: &Value) -> Result<BTreeMap<K, V>>
where
    K: WireEnum + Ord,
    V: FromJson,
{
    decode(json, K::from_name)
}

/// Decode with an explicit value decoder
pub fn decode_with<K, V, P, D>(json: &Value, parse: P, decode_value: D) -> Result<BTreeMap<K, V>>
where
    K: WireEnum + Ord,
    P: Fn(&str) -> K,
    D: Fn(&Value) -> Result<V>,
{
    let object = json
        .as_object()
        .ok_or_else(|| MalformedDocumentError::wrong_type("$", "an object"))?;

    let mut map = BTreeMap::new();
    for (name, raw) in object {
        let key = parse(name);
        if key.is_fallback() && key.name() != name {
            tracing::warn!(
                family = K::FAMILY,
                name = %name,
                fallback = key.name(),
                "unrecognized key coerced to fallback"
            );
        }

        let value = decode_value(raw).map_err(|e| nest(e, name))?;
        if map.insert(key, value).is_some() {
            tracing::warn!(
                family = K::FAMILY,
                key = key.name(),
                "keyed map entry overwritten by a later field"
            );
        }
    }
    Ok(map)
}

/// Decode a plain integer value (counters and similar)
pub fn decode_i64(json: &Value) -> Result<i64> {
    json.as_i64()
        .ok_or_else(|| MalformedDocumentError::wrong_type("$", "an integer").into())
}
