use sable_runtime::flow::BooleanFlow;
use sable_runtime::signal::Fault;
use sable_runtime::value::Value;
use sable_runtime::verb::{call_value, dispatch_verb};

#[test]
fn broken_is_a_distinguished_marker() {
    let flow = BooleanFlow;
    let broken = flow.broken();
    assert_eq!(broken.type_name(), "Broken");
    assert_ne!(broken, Value::Boolean(false));
    assert_ne!(broken, Value::Null);
}

#[test]
fn broken_propagates_through_dispatch_and_calls() {
    let flow = BooleanFlow;
    let broken = flow.broken();
    assert_eq!(dispatch_verb(&broken, "anything", &[]), Ok(broken.clone()));
    assert_eq!(call_value(&broken, vec![Value::Integer(1)]), Ok(broken.clone()));
}

#[test]
fn broken_faults_when_forced_in_boolean_context() {
    let flow = BooleanFlow;
    let fault = flow.broken().truthiness().unwrap_err();
    assert!(fault.is_usage());
    assert!(fault.to_string().contains("boolean flow short-circuited"));
}

#[test]
fn failure_list_is_false_then_broken_placeholders() {
    let flow = BooleanFlow;
    let list = flow.failure_list(&Value::Integer(3)).unwrap();
    let items = list.list_items().unwrap();
    assert_eq!(items.len(), 4);
    assert_eq!(items[0], Value::Boolean(false));
    for placeholder in &items[1..] {
        assert_eq!(placeholder.type_name(), "Broken");
    }
}

#[test]
fn failure_list_of_zero_is_just_false() {
    let flow = BooleanFlow;
    let list = flow.failure_list(&Value::Integer(0)).unwrap();
    assert_eq!(list, Value::const_list(vec![Value::Boolean(false)]));
}

#[test]
fn failure_list_validates_its_size() {
    let flow = BooleanFlow;
    assert_eq!(
        flow.failure_list(&Value::Integer(-2)),
        Err(Fault::usage("-2 is not a non-negative integer"))
    );
    assert_eq!(
        flow.failure_list(&Value::Boolean(true)),
        Err(Fault::usage("true is not an integer"))
    );
}
