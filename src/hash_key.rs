use std::fmt;

use crate::value::Value;

/// Key variants accepted by the ordered map views.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum HashKey {
    Integer(i64),
    Boolean(bool),
    String(String),
}

impl HashKey {
    /// The key as an ordinary runtime value, used for iteration pairs.
    pub fn to_value(&self) -> Value {
        match self {
            HashKey::Integer(v) => Value::Integer(*v),
            HashKey::Boolean(v) => Value::Boolean(*v),
            HashKey::String(v) => Value::String(v.as_str().into()),
        }
    }
}

impl fmt::Display for HashKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HashKey::Integer(v) => write!(f, "{}", v),
            HashKey::Boolean(v) => write!(f, "{}", v),
            HashKey::String(v) => write!(f, "\"{}\"", v),
        }
    }
}
