//! Boolean short-circuit chain support: broken references and the canonical
//! quantifier-failure list.
use crate::{signal::Fault, value::Value};

const SHORT_CIRCUIT_PROBLEM: &str = "boolean flow short-circuited";

/// Runtime facet backing compiled `&&`/`||` chains and quantifiers.
pub struct BooleanFlow;

impl BooleanFlow {
    /// A fresh broken-reference marker.
    ///
    /// Broken references propagate through value-producing operations
    /// unchanged and fault only when forced in a boolean context.
    pub fn broken(&self) -> Value {
        Value::broken(SHORT_CIRCUIT_PROBLEM)
    }

    /// The canonical failed-quantifier value: boolean false followed by
    /// `size` broken placeholders for the unevaluated sub-results.
    pub fn failure_list(&self, size: &Value) -> Result<Value, Fault> {
        let size = match size {
            Value::Integer(n) if *n >= 0 => *n as usize,
            Value::Integer(n) => {
                return Err(Fault::usage(format!("{} is not a non-negative integer", n)));
            }
            other => return Err(Fault::usage(format!("{} is not an integer", other))),
        };
        let mut items = Vec::with_capacity(size + 1);
        items.push(Value::Boolean(false));
        for _ in 0..size {
            items.push(self.broken());
        }
        Ok(Value::const_list(items))
    }
}
