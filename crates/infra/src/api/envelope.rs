//! JSON:API envelope decoding
//!
//! Success payloads from JSON:API endpoints are wrapped as
//! `{"data": {"type", "id", "attributes"}}` or `{"data": [ ... ]}`. Callers
//! want the attributes, so the decoder unwraps them; non-JSON:API responses
//! pass through untouched.

use serde_json::{Map, Value};

use super::media;

/// Extract the caller-facing data from a parsed body.
///
/// - JSON:API single resource → its `attributes`
/// - JSON:API collection → the `attributes` of every element, in order
///   (`null` for an element without attributes, keeping the mapping 1:1)
/// - JSON:API content type with a missing or malformed `data` → `None`
/// - any other content type → the value unchanged
pub fn decode(content_type: &str, value: Value) -> Option<Value> {
    if !media::is_jsonapi(content_type) {
        return Some(value);
    }

    let Value::Object(mut document) = value else {
        return None;
    };

    match document.remove("data")? {
        Value::Array(resources) => {
            Some(Value::Array(resources.into_iter().map(into_attributes).collect()))
        }
        Value::Object(mut resource) => resource.remove("attributes"),
        _ => None,
    }
}

/// Attributes of a single-resource document, regardless of content type.
pub fn single_resource_attributes(document: &Value) -> Option<&Map<String, Value>> {
    document.get("data")?.as_object()?.get("attributes")?.as_object()
}

fn into_attributes(resource: Value) -> Value {
    match resource {
        Value::Object(mut resource) => resource.remove("attributes").unwrap_or(Value::Null),
        _ => Value::Null,
    }
}
