//! Request-body compaction.
//!
//! Outgoing records are serialized to JSON and then stripped of every member
//! that is `null`, `""`, `[]` or `{}`. `false` and `0` are kept.

use serde::Serialize;
use serde_json::{Map, Value};

/// Serialize `record` to JSON and drop its empty members.
pub fn to_compact_json<T: Serialize + ?Sized>(record: &T) -> serde_json::Result<Value> {
    Ok(compact(serde_json::to_value(record)?))
}

/// Remove empty members from objects, recursing through nested objects and
/// arrays. A top-level array compacts each element but keeps its length.
pub fn compact(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(compact_object(map)),
        Value::Array(items) => Value::Array(items.into_iter().map(compact).collect()),
        other => other,
    }
}

fn compact_object(map: Map<String, Value>) -> Map<String, Value> {
    map.into_iter()
        .filter_map(|(key, value)| {
            let value = compact(value);
            (!is_empty(&value)).then_some((key, value))
        })
        .collect()
}

fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    struct Draft {
        name: String,
        description: Option<String>,
        tags: Vec<String>,
        archived: bool,
        priority: i32,
        owner_id: String,
    }

    #[test]
    fn test_drops_null_and_empty_members() {
        let draft = Draft {
            name: "Roadmap".to_string(),
            description: None,
            tags: Vec::new(),
            archived: false,
            priority: 0,
            owner_id: String::new(),
        };

        let body = to_compact_json(&draft).unwrap();
        assert_eq!(
            body,
            json!({ "name": "Roadmap", "archived": false, "priority": 0 })
        );
    }

    #[test]
    fn test_nested_objects_collapse() {
        let body = compact(json!({
            "name": "Q3",
            "settings": { "color": null, "labels": [] },
            "members": [{ "id": "u1", "role": "" }]
        }));

        assert_eq!(
            body,
            json!({ "name": "Q3", "members": [{ "id": "u1" }] })
        );
    }

    #[test]
    fn test_sequence_body_compacts_each_record() {
        let body = compact(json!([
            { "title": "a", "notes": null },
            { "title": "b", "notes": "keep" }
        ]));

        assert_eq!(
            body,
            json!([{ "title": "a" }, { "title": "b", "notes": "keep" }])
        );
    }
}
