use std::{cell::RefCell, fmt, rc::Rc};

use crate::{
    hash_key::HashKey,
    signal::Fault,
    tables::OrderedMap,
    verb::{Callable, Receiver},
};

/// Runtime value passed between compiled code and the runtime.
///
/// The set of variants is closed: combinators and dispatch switch over it
/// explicitly and report unsupported variants as usage errors rather than
/// leaning on host reflection.
///
/// Heap-backed variants use `Rc` for cheap sharing. Const collections are
/// immutable; Flex collections are mutable in place behind `RefCell`, which
/// is sufficient because execution is single-threaded and cooperative.
/// `Broken` is the distinguished broken-reference marker produced by boolean
/// short-circuit chains; it propagates through value-producing operations
/// and only faults when forced in a boolean context.
#[derive(Debug, Clone)]
pub enum Value {
    /// 64-bit signed integer.
    Integer(i64),
    /// 64-bit floating point number.
    Float(f64),
    /// Boolean value.
    Boolean(bool),
    /// UTF-8 text value.
    String(Rc<str>),
    /// Absence of value.
    Null,
    /// Immutable ordered sequence.
    ConstList(Rc<Vec<Value>>),
    /// Mutable ordered sequence.
    FlexList(Rc<RefCell<Vec<Value>>>),
    /// Immutable insertion-ordered mapping.
    ConstMap(Rc<OrderedMap>),
    /// Mutable insertion-ordered mapping.
    FlexMap(Rc<RefCell<OrderedMap>>),
    /// Object reference with verb dispatch.
    Object(Rc<dyn Receiver>),
    /// First-class callable (verb facets, native functions).
    Callable(Rc<dyn Callable>),
    /// Broken reference carrying its problem description.
    Broken(Rc<str>),
}

impl Value {
    pub fn string(text: impl Into<String>) -> Value {
        Value::String(text.into().into())
    }

    pub fn const_list(items: Vec<Value>) -> Value {
        Value::ConstList(Rc::new(items))
    }

    pub fn flex_list(items: Vec<Value>) -> Value {
        Value::FlexList(Rc::new(RefCell::new(items)))
    }

    pub fn const_map(map: OrderedMap) -> Value {
        Value::ConstMap(Rc::new(map))
    }

    pub fn flex_map(map: OrderedMap) -> Value {
        Value::FlexMap(Rc::new(RefCell::new(map)))
    }

    pub fn broken(problem: impl Into<String>) -> Value {
        Value::Broken(problem.into().into())
    }

    /// Returns the canonical runtime type label used in diagnostics.
    ///
    /// These labels are user-visible and are expected to remain stable.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Integer(_) => "Int",
            Value::Float(_) => "Float",
            Value::Boolean(_) => "Bool",
            Value::String(_) => "String",
            Value::Null => "Null",
            Value::ConstList(_) => "ConstList",
            Value::FlexList(_) => "FlexList",
            Value::ConstMap(_) => "ConstMap",
            Value::FlexMap(_) => "FlexMap",
            Value::Object(_) => "Object",
            Value::Callable(_) => "Callable",
            Value::Broken(_) => "Broken",
        }
    }

    /// Whether this value is truthy. Only `Boolean(false)` and `Null` are
    /// falsy; broken references are handled by [`Value::truthiness`].
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Boolean(false) | Value::Null)
    }

    /// Truthiness with broken-reference forcing.
    ///
    /// Testing a broken reference is the point where its problem can no
    /// longer propagate silently, so it is a usage error naming the problem.
    pub fn truthiness(&self) -> Result<bool, Fault> {
        match self {
            Value::Broken(problem) => Err(Fault::usage(format!(
                "broken reference forced in a boolean context: {}",
                problem
            ))),
            other => Ok(other.is_truthy()),
        }
    }

    /// Converts this value into a map key if the value is hashable.
    ///
    /// Hashable variants are `Integer`, `Boolean`, and `String`.
    pub fn to_hash_key(&self) -> Option<HashKey> {
        match self {
            Value::Integer(v) => Some(HashKey::Integer(*v)),
            Value::Boolean(v) => Some(HashKey::Boolean(*v)),
            Value::String(v) => Some(HashKey::String(v.to_string())),
            _ => None,
        }
    }

    /// Snapshot of a list-like value's elements, if the value is list-like.
    ///
    /// Flex lists are copied out; element clones are cheap `Rc` bumps.
    pub fn list_items(&self) -> Option<Vec<Value>> {
        match self {
            Value::ConstList(items) => Some(items.as_ref().clone()),
            Value::FlexList(items) => Some(items.borrow().clone()),
            _ => None,
        }
    }

    /// Snapshot of a map-like value's entries in insertion order.
    pub fn map_entries(&self) -> Option<Vec<(HashKey, Value)>> {
        match self {
            Value::ConstMap(map) => Some(map.entries().to_vec()),
            Value::FlexMap(map) => Some(map.borrow().entries().to_vec()),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Null, Value::Null) => true,
            (Value::ConstList(a), Value::ConstList(b)) => a == b,
            (Value::FlexList(a), Value::FlexList(b)) => Rc::ptr_eq(a, b),
            (Value::ConstMap(a), Value::ConstMap(b)) => a == b,
            (Value::FlexMap(a), Value::FlexMap(b)) => Rc::ptr_eq(a, b),
            (Value::Object(a), Value::Object(b)) => {
                std::ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b))
            }
            (Value::Callable(a), Value::Callable(b)) => {
                std::ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b))
            }
            (Value::Broken(a), Value::Broken(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{}", v),
            Value::Boolean(v) => write!(f, "{}", v),
            Value::String(v) => write!(f, "\"{}\"", v),
            Value::Null => write!(f, "null"),
            Value::ConstList(items) => write_list(f, items),
            Value::FlexList(items) => write_list(f, &items.borrow()),
            Value::ConstMap(map) => write_map(f, map),
            Value::FlexMap(map) => write_map(f, &map.borrow()),
            Value::Object(obj) => write!(f, "<object {}>", obj.type_label()),
            Value::Callable(c) => write!(f, "<callable {}>", c.label()),
            Value::Broken(problem) => write!(f, "<broken: {}>", problem),
        }
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, items: &[Value]) -> fmt::Result {
    let rendered: Vec<String> = items.iter().map(|e| e.to_string()).collect();
    write!(f, "[{}]", rendered.join(", "))
}

fn write_map(f: &mut fmt::Formatter<'_>, map: &OrderedMap) -> fmt::Result {
    let rendered: Vec<String> = map
        .entries()
        .iter()
        .map(|(k, v)| format!("{}: {}", k, v))
        .collect();
    write!(f, "{{{}}}", rendered.join(", "))
}
