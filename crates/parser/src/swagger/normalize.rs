//! Generic-document cleanup before typed deserialization
//!
//! YAML allows non-string map keys (`200:` is an integer) which JSON-shaped
//! models cannot accept, and Swagger 2.0 writes `type` as a bare string
//! where the OpenAPI 3.x type system expects a list of type names.

use serde_json::{Map, Number, Value as JsonValue};
use serde_yaml::Value as YamlValue;

/// Rewrite a YAML tree into JSON, turning every map key into a string
pub fn stringify_yaml_keys(value: YamlValue) -> JsonValue {
    match value {
        YamlValue::Null => JsonValue::Null,
        YamlValue::Bool(b) => JsonValue::Bool(b),
        YamlValue::Number(n) => yaml_number(&n),
        YamlValue::String(s) => JsonValue::String(s),
        YamlValue::Sequence(items) => {
            JsonValue::Array(items.into_iter().map(stringify_yaml_keys).collect())
        }
        YamlValue::Mapping(mapping) => {
            let mut map = Map::new();
            for (key, value) in mapping {
                map.insert(key_string(key), stringify_yaml_keys(value));
            }
            JsonValue::Object(map)
        }
        YamlValue::Tagged(tagged) => stringify_yaml_keys(tagged.value),
    }
}

fn yaml_number(n: &serde_yaml::Number) -> JsonValue {
    if let Some(i) = n.as_i64() {
        JsonValue::Number(i.into())
    } else if let Some(u) = n.as_u64() {
        JsonValue::Number(u.into())
    } else {
        // NaN and infinities have no JSON form
        n.as_f64()
            .and_then(Number::from_f64)
            .map(JsonValue::Number)
            .unwrap_or(JsonValue::Null)
    }
}

fn key_string(key: YamlValue) -> String {
    match key {
        YamlValue::String(s) => s,
        YamlValue::Number(n) => n.to_string(),
        YamlValue::Bool(b) => b.to_string(),
        YamlValue::Null => "null".to_string(),
        YamlValue::Tagged(tagged) => key_string(tagged.value),
        complex => serde_yaml::to_string(&complex)
            .map(|s| s.trim().to_string())
            .unwrap_or_default(),
    }
}

/// Wrap every string-valued `type` field into a one-element list
///
/// Recurses through the whole document, including `type` keys whose value
/// is not a string (e.g., a property named `type`).
pub fn normalize_type_fields(value: &mut JsonValue) {
    match value {
        JsonValue::Object(map) => {
            for (key, child) in map.iter_mut() {
                if key == "type" {
                    if let JsonValue::String(name) = child {
                        *child = JsonValue::Array(vec![JsonValue::String(std::mem::take(name))]);
                        continue;
                    }
                }
                normalize_type_fields(child);
            }
        }
        JsonValue::Array(items) => items.iter_mut().for_each(normalize_type_fields),
        _ => {}
    }
}
