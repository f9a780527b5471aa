//! Structural pattern combinators.
//!
//! Every matcher has the shape `(specimen, ejector) -> bound value`. A
//! rejected specimen fails through the supplied [`Ejector`] with a
//! descriptive message and the matcher never returns on that path; the
//! caller decides what "no match" means. Contract violations by compiled
//! code (wrong argument types) are [`Fault::Usage`] instead and are never
//! routed through the ejector.
use crate::{
    signal::{Ejector, Fault},
    tables,
    value::Value,
};

/// Matcher: succeeds iff the specimen equals `expected` under host equality.
pub fn match_same(expected: Value) -> impl Fn(&Value, &Ejector) -> Result<Value, Fault> {
    move |specimen, ej| {
        if *specimen == expected {
            Ok(expected.clone())
        } else {
            ej.fail(format!("{} is not {}", specimen, expected))
        }
    }
}

/// Matcher form of a such-that guard: the predicate result is already
/// evaluated, the matcher binds nothing and only vetoes.
pub fn such_that(flag: Value) -> impl Fn(&Value, &Ejector) -> Result<Value, Fault> {
    move |_specimen, ej| {
        if flag.truthiness()? {
            Ok(Value::Null)
        } else {
            ej.fail("such-that expression was false")
        }
    }
}

/// Guard-composition form: pairs the value with a null slot. Not a matcher.
pub fn such_that_pair(x: Value) -> Value {
    Value::const_list(vec![x, Value::Null])
}

/// Matcher: `[value-at-key, remainder-without-key]`; absence fails through
/// the ejector. Non-map specimens are usage errors.
pub fn extract(key: Value) -> impl Fn(&Value, &Ejector) -> Result<Value, Fault> {
    move |specimen, ej| {
        require_map(specimen)?;
        let value = tables::fetch(specimen, &key, || {
            ej.fail(format!("{} has no key {}", specimen, key))
        })?;
        let remainder = tables::without(specimen, &key)?;
        Ok(Value::const_list(vec![value, remainder]))
    }
}

/// Like [`extract`], but absence yields `[instead(), remainder]` instead of
/// failing. `instead` runs only on the absence path.
pub fn extract_with_default<F>(
    key: Value,
    instead: F,
) -> impl Fn(&Value, &Ejector) -> Result<Value, Fault>
where
    F: Fn() -> Result<Value, Fault>,
{
    move |specimen, _ej| {
        require_map(specimen)?;
        let value = tables::fetch(specimen, &key, &instead)?;
        let remainder = tables::without(specimen, &key)?;
        Ok(Value::const_list(vec![value, remainder]))
    }
}

/// Builds the list-splitting matcher for a `[p0, .., pN] + tail` pattern.
///
/// `cut` must be a non-negative integer; that is checked eagerly, at the
/// factory call, because a bad cut is a code-generator bug rather than a
/// specimen mismatch.
pub fn split_list(
    cut: Value,
) -> Result<impl Fn(&Value, &Ejector) -> Result<Value, Fault>, Fault> {
    let cut = match cut {
        Value::Integer(n) if n >= 0 => n as usize,
        Value::Integer(n) => {
            return Err(Fault::usage(format!("{} is not a non-negative integer", n)));
        }
        other => return Err(Fault::usage(format!("{} is not an integer", other))),
    };
    Ok(move |specimen: &Value, ej: &Ejector| {
        let items = specimen
            .list_items()
            .ok_or_else(|| Fault::usage(format!("{} is not a list", specimen)))?;
        if items.len() < cut {
            return ej.fail(format!(
                "A {} size list doesn't match a >= {} size list pattern",
                items.len(),
                cut
            ));
        }
        let mut bound: Vec<Value> = items[..cut].to_vec();
        bound.push(Value::const_list(items[cut..].to_vec()));
        Ok(Value::const_list(bound))
    })
}

/// Guard accepting only zero-size collections.
pub struct Empty;

impl Empty {
    /// Returns the specimen unchanged when it is empty; fails through the
    /// ejector otherwise.
    pub fn coerce(&self, specimen: &Value, ej: &Ejector) -> Result<Value, Fault> {
        if tables::size_of(specimen)? == 0 {
            Ok(specimen.clone())
        } else {
            ej.fail(format!("Not empty: {}", specimen))
        }
    }
}

/// The compiled `switch` exhaustion error: no clause matched `specimen`.
/// `failures` are the per-clause failure payloads, in clause order.
pub fn switch_failed(specimen: &Value, failures: &[Value]) -> Fault {
    let rendered: Vec<String> = failures.iter().map(|f| f.to_string()).collect();
    Fault::usage(format!(
        "{} did not match any option: [{}]",
        specimen,
        rendered.join(" ")
    ))
}

fn require_map(specimen: &Value) -> Result<(), Fault> {
    match specimen {
        Value::ConstMap(_) | Value::FlexMap(_) => Ok(()),
        other => Err(tables::not_a_map(other)),
    }
}
