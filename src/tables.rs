//! Collection views: insertion-ordered maps and the value-level glue the
//! pattern combinators and the comprehension engine consume.
use std::collections::HashMap;

use crate::{hash_key::HashKey, signal::Fault, value::Value};

/// Insertion-ordered mapping with O(1) lookup.
///
/// The entry vector is the source of truth for iteration order; the index
/// map only accelerates lookup. `without` preserves the order of survivors.
#[derive(Debug, Clone, Default)]
pub struct OrderedMap {
    entries: Vec<(HashKey, Value)>,
    index: HashMap<HashKey, usize>,
}

impl OrderedMap {
    pub fn new() -> OrderedMap {
        OrderedMap::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &HashKey) -> Option<&Value> {
        self.index.get(key).map(|&at| &self.entries[at].1)
    }

    pub fn contains_key(&self, key: &HashKey) -> bool {
        self.index.contains_key(key)
    }

    /// Inserts or overwrites. The first insertion of a key fixes its
    /// position in iteration order; later inserts overwrite in place.
    pub fn insert(&mut self, key: HashKey, value: Value) {
        match self.index.get(&key) {
            Some(&at) => self.entries[at].1 = value,
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, value));
            }
        }
    }

    /// A new map lacking `key`, survivor order preserved. Absent keys make
    /// this a plain copy.
    pub fn without(&self, key: &HashKey) -> OrderedMap {
        let mut next = OrderedMap::new();
        for (k, v) in &self.entries {
            if k != key {
                next.insert(k.clone(), v.clone());
            }
        }
        next
    }

    /// Entries in insertion order.
    pub fn entries(&self) -> &[(HashKey, Value)] {
        &self.entries
    }

    pub fn from_entries(pairs: Vec<(HashKey, Value)>) -> OrderedMap {
        let mut map = OrderedMap::new();
        for (k, v) in pairs {
            map.insert(k, v);
        }
        map
    }
}

impl PartialEq for OrderedMap {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

/// Element count of any collection view; usage error otherwise.
pub fn size_of(specimen: &Value) -> Result<usize, Fault> {
    match specimen {
        Value::ConstList(items) => Ok(items.len()),
        Value::FlexList(items) => Ok(items.borrow().len()),
        Value::ConstMap(map) => Ok(map.len()),
        Value::FlexMap(map) => Ok(map.borrow().len()),
        other => Err(Fault::usage(format!(
            "{} has no size ({})",
            other,
            other.type_name()
        ))),
    }
}

/// Map lookup with a lazy default. `instead` runs only on the absence path.
pub fn fetch<F>(specimen: &Value, key: &Value, instead: F) -> Result<Value, Fault>
where
    F: FnOnce() -> Result<Value, Fault>,
{
    let key = hashable(key)?;
    let found = match specimen {
        Value::ConstMap(map) => map.get(&key).cloned(),
        Value::FlexMap(map) => map.borrow().get(&key).cloned(),
        other => return Err(not_a_map(other)),
    };
    match found {
        Some(value) => Ok(value),
        None => instead(),
    }
}

/// A new view of the same const/flex kind lacking `key`.
pub fn without(specimen: &Value, key: &Value) -> Result<Value, Fault> {
    let key = hashable(key)?;
    match specimen {
        Value::ConstMap(map) => Ok(Value::const_map(map.without(&key))),
        Value::FlexMap(map) => Ok(Value::flex_map(map.borrow().without(&key))),
        other => Err(not_a_map(other)),
    }
}

/// Builds an ordered map from `[key, value]` pair elements.
///
/// Non-pair elements and unhashable keys are usage errors; a duplicate key
/// keeps its first position and takes the later value.
pub fn map_from_pairs(items: &[Value]) -> Result<OrderedMap, Fault> {
    let mut map = OrderedMap::new();
    for element in items {
        let pair = element.list_items().ok_or_else(|| {
            Fault::usage(format!(
                "{} is not a [key, value] pair ({})",
                element,
                element.type_name()
            ))
        })?;
        if pair.len() != 2 {
            return Err(Fault::usage(format!(
                "{} is not a [key, value] pair (size {})",
                element,
                pair.len()
            )));
        }
        let key = hashable(&pair[0])?;
        map.insert(key, pair[1].clone());
    }
    Ok(map)
}

pub(crate) fn hashable(key: &Value) -> Result<HashKey, Fault> {
    key.to_hash_key().ok_or_else(|| {
        Fault::usage(format!(
            "{} is not a valid map key ({})",
            key,
            key.type_name()
        ))
    })
}

pub(crate) fn not_a_map(specimen: &Value) -> Fault {
    Fault::usage(format!("{} is not a map", specimen))
}
