use std::cell::Cell;

use sable_runtime::hash_key::HashKey;
use sable_runtime::tables::{OrderedMap, fetch, size_of, without};
use sable_runtime::value::Value;

fn sample() -> OrderedMap {
    OrderedMap::from_entries(vec![
        (HashKey::String("a".to_string()), Value::Integer(1)),
        (HashKey::String("b".to_string()), Value::Integer(2)),
        (HashKey::String("c".to_string()), Value::Integer(3)),
    ])
}

#[test]
fn const_and_flex_views_report_size() {
    assert_eq!(size_of(&Value::const_list(vec![Value::Null])), Ok(1));
    assert_eq!(size_of(&Value::flex_list(vec![])), Ok(0));
    assert_eq!(size_of(&Value::const_map(sample())), Ok(3));
    assert!(size_of(&Value::Integer(4)).unwrap_err().is_usage());
}

#[test]
fn flex_lists_mutate_in_place() {
    let flex = Value::flex_list(vec![Value::Integer(1)]);
    if let Value::FlexList(items) = &flex {
        items.borrow_mut().push(Value::Integer(2));
    }
    assert_eq!(size_of(&flex), Ok(2));
}

#[test]
fn without_returns_a_new_view_of_the_same_kind() {
    let const_map = Value::const_map(sample());
    let trimmed = without(&const_map, &Value::string("b")).unwrap();
    assert_eq!(trimmed.type_name(), "ConstMap");
    assert_eq!(size_of(&trimmed), Ok(2));
    // The original is untouched.
    assert_eq!(size_of(&const_map), Ok(3));

    let flex_map = Value::flex_map(sample());
    let trimmed = without(&flex_map, &Value::string("b")).unwrap();
    assert_eq!(trimmed.type_name(), "FlexMap");
    assert_eq!(size_of(&flex_map), Ok(3));
}

#[test]
fn without_preserves_survivor_order() {
    let trimmed = sample().without(&HashKey::String("a".to_string()));
    let keys: Vec<String> = trimmed
        .entries()
        .iter()
        .map(|(k, _)| k.to_string())
        .collect();
    assert_eq!(keys, vec!["\"b\"", "\"c\""]);
}

#[test]
fn without_an_absent_key_is_a_copy() {
    let trimmed = sample().without(&HashKey::String("zz".to_string()));
    assert_eq!(trimmed, sample());
}

#[test]
fn fetch_defaults_stay_lazy() {
    let calls = Cell::new(0u32);
    let map = Value::const_map(sample());

    let hit = fetch(&map, &Value::string("a"), || {
        calls.set(calls.get() + 1);
        Ok(Value::Null)
    });
    assert_eq!(hit, Ok(Value::Integer(1)));
    assert_eq!(calls.get(), 0);

    let miss = fetch(&map, &Value::string("zz"), || {
        calls.set(calls.get() + 1);
        Ok(Value::Null)
    });
    assert_eq!(miss, Ok(Value::Null));
    assert_eq!(calls.get(), 1);
}

#[test]
fn unhashable_keys_are_usage_errors() {
    let map = Value::const_map(sample());
    let key = Value::const_list(vec![]);
    assert!(fetch(&map, &key, || Ok(Value::Null)).unwrap_err().is_usage());
    assert!(without(&map, &key).unwrap_err().is_usage());
}

#[test]
fn boolean_and_integer_keys_coexist() {
    let mut map = OrderedMap::new();
    map.insert(HashKey::Integer(1), Value::string("int"));
    map.insert(HashKey::Boolean(true), Value::string("bool"));
    assert_eq!(map.get(&HashKey::Integer(1)), Some(&Value::string("int")));
    assert_eq!(
        map.get(&HashKey::Boolean(true)),
        Some(&Value::string("bool"))
    );
}
