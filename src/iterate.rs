//! The iteration protocol: restartable collection traversal and one-shot
//! generator adaption, producing (key, value) pairs.
//!
//! Exhaustion is signaled exclusively by firing the ejector passed to
//! [`PairIter::next`], never by a sentinel value. This lets "loop done" and
//! "user requested early stop" share one channel while staying
//! distinguishable by tag.
use crate::{
    hash_key::HashKey,
    signal::{Ejector, Fault},
    value::Value,
};

enum Source {
    /// List traversal; keys are element indices.
    List { items: Vec<Value>, at: usize },
    /// Map traversal in insertion order; keys are the map keys.
    Map {
        entries: Vec<(HashKey, Value)>,
        at: usize,
    },
    /// One-shot generator polled until it returns `false`.
    Poll {
        poll: Box<dyn FnMut() -> Result<Value, Fault>>,
        done: bool,
    },
}

/// Owns traversal position over a collection or a generator function.
pub struct PairIter {
    source: Source,
}

impl PairIter {
    /// Returns the next (key, value) pair, or fires `ej` at exhaustion.
    ///
    /// Once the ejector has been fired the iterator is exhausted; further
    /// calls keep firing it.
    pub fn next(&mut self, ej: &Ejector) -> Result<(Value, Value), Fault> {
        match &mut self.source {
            Source::List { items, at } => {
                if *at >= items.len() {
                    return ej.eject(Value::Null);
                }
                let pair = (Value::Integer(*at as i64), items[*at].clone());
                *at += 1;
                Ok(pair)
            }
            Source::Map { entries, at } => {
                if *at >= entries.len() {
                    return ej.eject(Value::Null);
                }
                let (key, value) = &entries[*at];
                let pair = (key.to_value(), value.clone());
                *at += 1;
                Ok(pair)
            }
            Source::Poll { poll, done } => {
                if *done {
                    return ej.eject(Value::Null);
                }
                let produced = poll()?;
                if produced == Value::Boolean(false) {
                    *done = true;
                    return ej.eject(Value::Null);
                }
                if let Value::Broken(problem) = &produced {
                    return Err(Fault::usage(format!(
                        "broken reference forced in a boolean context: {}",
                        problem
                    )));
                }
                Ok((Value::Null, produced))
            }
        }
    }
}

/// The `_makeIterator()` hook: traversal over any collection view.
pub fn make_iterator(collection: &Value) -> Result<PairIter, Fault> {
    if let Some(items) = collection.list_items() {
        return Ok(PairIter {
            source: Source::List { items, at: 0 },
        });
    }
    if let Some(entries) = collection.map_entries() {
        return Ok(PairIter {
            source: Source::Map { entries, at: 0 },
        });
    }
    Err(Fault::usage(format!(
        "{} is not iterable ({})",
        collection,
        collection.type_name()
    )))
}

/// Adapts a zero-argument function into the iterator shape used by `for`
/// loops: yields `(null, f())` pairs until `f()` returns the false boolean.
pub fn iter_while<F>(poll: F) -> PairIter
where
    F: FnMut() -> Result<Value, Fault> + 'static,
{
    PairIter {
        source: Source::Poll {
            poll: Box::new(poll),
            done: false,
        },
    }
}
