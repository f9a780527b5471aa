//! Tooling-facing output: lossy JSON rendering of runtime values and
//! serializable fault reports for trace consumers.
use serde::Serialize;
use serde_json::{Map, Number, json};

use crate::{hash_key::HashKey, signal::Fault, value::Value};

/// Renders a runtime value as JSON for trace and tooling output.
///
/// The rendering is lossy by design: objects and callables become tag
/// strings, broken references become `{"$broken": problem}`, and map keys
/// use their unquoted text form. It is not a round-trippable encoding.
pub fn value_to_json(value: &Value) -> serde_json::Value {
    match value {
        Value::Integer(v) => json!(v),
        Value::Float(v) => Number::from_f64(*v)
            .map(serde_json::Value::Number)
            .unwrap_or_else(|| json!(v.to_string())),
        Value::Boolean(v) => json!(v),
        Value::String(v) => json!(v.as_ref()),
        Value::Null => serde_json::Value::Null,
        Value::ConstList(items) => items.iter().map(value_to_json).collect(),
        Value::FlexList(items) => items.borrow().iter().map(value_to_json).collect(),
        Value::ConstMap(map) => map_to_json(map.entries()),
        Value::FlexMap(map) => map_to_json(map.borrow().entries()),
        Value::Object(obj) => json!(format!("<object {}>", obj.type_label())),
        Value::Callable(c) => json!(format!("<callable {}>", c.label())),
        Value::Broken(problem) => json!({ "$broken": problem.as_ref() }),
    }
}

fn map_to_json(entries: &[(HashKey, Value)]) -> serde_json::Value {
    let mut object = Map::new();
    for (key, value) in entries {
        let key = match key {
            HashKey::String(s) => s.clone(),
            other => other.to_string(),
        };
        object.insert(key, value_to_json(value));
    }
    serde_json::Value::Object(object)
}

/// Flat fault description for tooling consumers.
#[derive(Debug, Serialize)]
pub struct FaultReport {
    /// `"eject"` or `"usage"`.
    pub kind: &'static str,
    /// Rendered message text, as produced by `Display`.
    pub message: String,
    /// The firing signal's debug name, for ejects.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signal: Option<String>,
}

pub fn fault_report(fault: &Fault) -> FaultReport {
    match fault {
        Fault::Eject { name, .. } => FaultReport {
            kind: "eject",
            message: fault.to_string(),
            signal: Some(name.to_string()),
        },
        Fault::Usage(_) => FaultReport {
            kind: "usage",
            message: fault.to_string(),
            signal: None,
        },
    }
}

pub fn render_fault_json(fault: &Fault) -> String {
    serde_json::to_string(&fault_report(fault)).unwrap_or_else(|_| fault.to_string())
}
