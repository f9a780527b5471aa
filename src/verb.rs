//! Reflective dispatch by name: verb facets, callables, and the closed
//! verb table for collection views.
use std::fmt;
use std::rc::Rc;

use crate::{
    signal::Fault,
    tables,
    value::Value,
};

/// String-keyed method dispatch for object values.
///
/// Implementations resolve `verb` against their own dispatch table and must
/// report unknown verbs with [`unknown_verb`], not a host lookup failure.
pub trait Receiver: fmt::Debug {
    /// Label used when rendering the object in diagnostics.
    fn type_label(&self) -> &str;

    fn respond(&self, verb: &str, args: &[Value]) -> Result<Value, Fault>;
}

/// A first-class callable value.
pub trait Callable: fmt::Debug {
    /// Label used when rendering the callable in diagnostics.
    fn label(&self) -> &str;

    fn call(&self, args: Vec<Value>) -> Result<Value, Fault>;
}

/// Named native function handle.
pub struct NativeFn {
    pub name: &'static str,
    pub func: fn(Vec<Value>) -> Result<Value, Fault>,
}

impl fmt::Debug for NativeFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NativeFn({})", self.name)
    }
}

impl Callable for NativeFn {
    fn label(&self) -> &str {
        self.name
    }

    fn call(&self, args: Vec<Value>) -> Result<Value, Fault> {
        (self.func)(args)
    }
}

/// Wraps a native function as a callable value.
pub fn native(name: &'static str, func: fn(Vec<Value>) -> Result<Value, Fault>) -> Value {
    Value::Callable(Rc::new(NativeFn { name, func }))
}

/// The usage error for a verb an object does not answer.
pub fn unknown_verb(type_label: &str, verb: &str) -> Fault {
    Fault::usage(format!("{} does not respond to verb \"{}\"", type_label, verb))
}

#[derive(Debug)]
struct CurriedVerb {
    target: Value,
    verb: Rc<str>,
}

impl Callable for CurriedVerb {
    fn label(&self) -> &str {
        &self.verb
    }

    fn call(&self, args: Vec<Value>) -> Result<Value, Fault> {
        dispatch_verb(&self.target, &self.verb, &args)
    }
}

/// Builds a verb facet: a callable that dispatches `verb` on `obj` with the
/// arguments it is later invoked with.
///
/// `verb` must be a text value; anything else is a usage error.
pub fn curry_call(obj: &Value, verb: &Value) -> Result<Value, Fault> {
    let Value::String(name) = verb else {
        return Err(Fault::usage(format!("{} is not a string", verb)));
    };
    Ok(Value::Callable(Rc::new(CurriedVerb {
        target: obj.clone(),
        verb: name.clone(),
    })))
}

/// Dispatches `verb` on `target`.
///
/// Objects resolve through their own [`Receiver`] table. Collection views
/// answer the narrow verb set the runtime itself consumes. Broken references
/// propagate unchanged. Everything else is a usage error.
pub fn dispatch_verb(target: &Value, verb: &str, args: &[Value]) -> Result<Value, Fault> {
    match target {
        Value::Object(obj) => obj.respond(verb, args),
        Value::Broken(_) => Ok(target.clone()),
        Value::ConstList(_) | Value::FlexList(_) | Value::ConstMap(_) | Value::FlexMap(_) => {
            collection_verb(target, verb, args)
        }
        other => Err(unknown_verb(other.type_name(), verb)),
    }
}

/// Invokes a callable value with `args`.
pub fn call_value(callee: &Value, args: Vec<Value>) -> Result<Value, Fault> {
    match callee {
        Value::Callable(c) => c.call(args),
        Value::Broken(_) => Ok(callee.clone()),
        other => Err(Fault::usage(format!(
            "{} is not callable ({})",
            other,
            other.type_name()
        ))),
    }
}

fn collection_verb(target: &Value, verb: &str, args: &[Value]) -> Result<Value, Fault> {
    match verb {
        "size" => {
            check_verb_arity(target, verb, args, 0)?;
            Ok(Value::Integer(tables::size_of(target)? as i64))
        }
        "without" => {
            check_verb_arity(target, verb, args, 1)?;
            tables::without(target, &args[0])
        }
        "fetch" => {
            check_verb_arity(target, verb, args, 2)?;
            let instead = args[1].clone();
            tables::fetch(target, &args[0], || call_value(&instead, vec![]))
        }
        _ => Err(unknown_verb(target.type_name(), verb)),
    }
}

fn check_verb_arity(target: &Value, verb: &str, args: &[Value], expected: usize) -> Result<(), Fault> {
    if args.len() != expected {
        return Err(Fault::usage(format!(
            "{}.{} expects {} argument(s), got {}",
            target.type_name(),
            verb,
            expected,
            args.len()
        )));
    }
    Ok(())
}
