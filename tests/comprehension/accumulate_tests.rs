use sable_runtime::accum::{accumulate_list, accumulate_map, validate_for};
use sable_runtime::hash_key::HashKey;
use sable_runtime::signal::{Ejector, Fault, escape};
use sable_runtime::tables::OrderedMap;
use sable_runtime::value::Value;

fn identity(_key: Value, item: Value, _skip: &Ejector) -> Result<Value, Fault> {
    Ok(item)
}

fn skip_all(_key: Value, _item: Value, skip: &Ejector) -> Result<Value, Fault> {
    skip.eject(Value::Null)
}

fn numbers(values: &[i64]) -> Value {
    Value::const_list(values.iter().map(|&n| Value::Integer(n)).collect())
}

#[test]
fn identity_block_preserves_elements_and_order() {
    let result = accumulate_list(&numbers(&[3, 1, 4, 1, 5]), &identity).unwrap();
    assert_eq!(result, numbers(&[3, 1, 4, 1, 5]));
}

#[test]
fn skip_all_yields_an_empty_list() {
    let result = accumulate_list(&numbers(&[1, 2, 3]), &skip_all).unwrap();
    assert_eq!(result, Value::const_list(vec![]));
}

#[test]
fn skipped_elements_are_dropped_without_placeholders() {
    fn keep_even(_key: Value, item: Value, skip: &Ejector) -> Result<Value, Fault> {
        match item {
            Value::Integer(n) if n % 2 == 0 => Ok(Value::Integer(n)),
            _ => skip.eject(Value::Null),
        }
    }
    let result = accumulate_list(&numbers(&[1, 2, 3, 4, 5, 6]), &keep_even).unwrap();
    assert_eq!(result, numbers(&[2, 4, 6]));
}

#[test]
fn keys_are_list_indices() {
    fn key_only(key: Value, _item: Value, _skip: &Ejector) -> Result<Value, Fault> {
        Ok(key)
    }
    let result = accumulate_list(&numbers(&[7, 8, 9]), &key_only).unwrap();
    assert_eq!(result, numbers(&[0, 1, 2]));
}

#[test]
fn map_traversal_follows_insertion_order() {
    let map = Value::const_map(OrderedMap::from_entries(vec![
        (HashKey::String("x".to_string()), Value::Integer(1)),
        (HashKey::String("y".to_string()), Value::Integer(2)),
    ]));
    fn key_only(key: Value, _item: Value, _skip: &Ejector) -> Result<Value, Fault> {
        Ok(key)
    }
    let result = accumulate_list(&map, &key_only).unwrap();
    assert_eq!(
        result,
        Value::const_list(vec![Value::string("x"), Value::string("y")])
    );
}

#[test]
fn flex_lists_are_traversable() {
    let flex = Value::flex_list(vec![Value::Integer(1), Value::Integer(2)]);
    let result = accumulate_list(&flex, &identity).unwrap();
    assert_eq!(result, numbers(&[1, 2]));
}

#[test]
fn non_collection_input_is_a_usage_error() {
    let fault = accumulate_list(&Value::Integer(5), &identity).unwrap_err();
    assert!(fault.is_usage());
    assert!(fault.to_string().contains("is not iterable"));
}

#[test]
fn foreign_unwinds_propagate_unmodified() {
    // A loop break compiles to an escape around the traversal; the break
    // unwind must pass through the engine untouched and be caught outside.
    let result = escape("break", |brk| {
        let stop_at_three = |_key: Value, item: Value, _skip: &Ejector| -> Result<Value, Fault> {
            if item == Value::Integer(3) {
                brk.eject(Value::string("stopped"))?;
            }
            Ok(item)
        };
        accumulate_list(&numbers(&[1, 2, 3, 4]), &stop_at_three)
    });
    assert_eq!(result, Ok(Value::string("stopped")));
}

#[test]
fn usage_errors_from_the_block_are_not_swallowed() {
    fn explode(_key: Value, _item: Value, _skip: &Ejector) -> Result<Value, Fault> {
        Err(Fault::usage("block contract violation"))
    }
    let fault = accumulate_list(&numbers(&[1]), &explode).unwrap_err();
    assert_eq!(fault, Fault::usage("block contract violation"));
}

#[test]
fn nested_comprehensions_use_independent_signals() {
    // The inner traversal skips everything; its skip ejector must never be
    // confused with the outer one even though both carry the same name.
    let pairs = |_key: Value, item: Value, _skip: &Ejector| -> Result<Value, Fault> {
        let inner = accumulate_list(&numbers(&[10, 20]), &skip_all)?;
        Ok(Value::const_list(vec![item, inner]))
    };
    let result = accumulate_list(&numbers(&[1, 2]), &pairs).unwrap();
    assert_eq!(
        result,
        Value::const_list(vec![
            Value::const_list(vec![Value::Integer(1), Value::const_list(vec![])]),
            Value::const_list(vec![Value::Integer(2), Value::const_list(vec![])]),
        ])
    );
}

#[test]
fn accumulate_map_builds_distinct_key_mapping() {
    fn self_pair(_key: Value, item: Value, _skip: &Ejector) -> Result<Value, Fault> {
        Ok(Value::const_list(vec![item.clone(), item]))
    }
    let result = accumulate_map(&numbers(&[1, 2, 1, 3]), &self_pair).unwrap();
    let entries = result.map_entries().unwrap();
    let keys: Vec<&HashKey> = entries.iter().map(|(k, _)| k).collect();
    assert_eq!(
        keys,
        vec![&HashKey::Integer(1), &HashKey::Integer(2), &HashKey::Integer(3)]
    );
}

#[test]
fn accumulate_map_last_pair_wins_first_position_kept() {
    fn tag(key: Value, item: Value, _skip: &Ejector) -> Result<Value, Fault> {
        Ok(Value::const_list(vec![item, key]))
    }
    let result = accumulate_map(&numbers(&[5, 6, 5]), &tag).unwrap();
    let entries = result.map_entries().unwrap();
    assert_eq!(entries.len(), 2);
    // Key 5 keeps its first position but carries the value from index 2.
    assert_eq!(entries[0], (HashKey::Integer(5), Value::Integer(2)));
    assert_eq!(entries[1], (HashKey::Integer(6), Value::Integer(1)));
}

#[test]
fn accumulate_map_rejects_non_pair_elements() {
    let fault = accumulate_map(&numbers(&[1]), &identity).unwrap_err();
    assert!(fault.is_usage());
    assert!(fault.to_string().contains("is not a [key, value] pair"));
}

#[test]
fn validate_for_accepts_live_loops_only() {
    assert_eq!(validate_for(&Value::Boolean(true)), Ok(()));
    let fault = validate_for(&Value::Boolean(false)).unwrap_err();
    assert!(fault.is_usage());
    assert_eq!(
        fault.to_string(),
        "For-loop body isn't valid after for-loop exits."
    );
}
