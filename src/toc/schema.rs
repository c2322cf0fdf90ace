//! JSON Schema handed to the TOC extraction collaborator.
//!
//! Structured-output model APIs accept only a subset of JSON Schema: no
//! `$ref`, no `$defs`, no `title`. The schema generated from
//! [`RawTableOfContents`] is flattened and stripped accordingly.

use serde_json::{Map, Value};

use super::types::RawTableOfContents;
use crate::error::Result;

/// Flattened, title-free JSON Schema for the TOC wire format.
pub fn toc_json_schema() -> Result<Value> {
    let schema = schemars::schema_for!(RawTableOfContents);
    let mut value = serde_json::to_value(&schema)?;

    let mut defs = Map::new();
    if let Some(root) = value.as_object_mut() {
        root.remove("$schema");
        for key in ["$defs", "definitions"] {
            if let Some(Value::Object(found)) = root.remove(key) {
                defs.extend(found);
            }
        }
    }

    let mut flattened = inline_refs(value, &defs);
    strip_titles(&mut flattened);
    Ok(flattened)
}

/// Replace every `{"$ref": "#/.../Name"}` with the definition it names.
fn inline_refs(value: Value, defs: &Map<String, Value>) -> Value {
    match value {
        Value::Object(obj) => {
            if let Some(target) = obj.get("$ref").and_then(Value::as_str) {
                let name = target.rsplit('/').next().unwrap_or(target);
                if let Some(def) = defs.get(name) {
                    return inline_refs(def.clone(), defs);
                }
                log::warn!("Unresolvable schema reference {}", target);
            }
            Value::Object(
                obj.into_iter()
                    .map(|(k, v)| (k, inline_refs(v, defs)))
                    .collect(),
            )
        },
        Value::Array(items) => {
            Value::Array(items.into_iter().map(|v| inline_refs(v, defs)).collect())
        },
        other => other,
    }
}

fn strip_titles(value: &mut Value) {
    match value {
        Value::Object(obj) => {
            obj.remove("title");
            obj.values_mut().for_each(strip_titles);
        },
        Value::Array(items) => items.iter_mut().for_each(strip_titles),
        _ => {},
    }
}
