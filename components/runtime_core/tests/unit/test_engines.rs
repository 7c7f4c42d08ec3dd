//! Unit tests for the operator, attribute, subscript and iteration
//! engines through the public crate API

use core_types::Value;
use runtime_core::{attrib, iterate, operators, subscript, Vm};

fn string_value(vm: &mut Vm, text: &str) -> Value {
    Value::Obj(vm.new_string(text))
}

#[test]
fn test_arithmetic_coercion() {
    // add(true, 2.5) == 3.5
    let mut vm = Vm::new();
    assert_eq!(
        operators::add(&mut vm, Value::Bool(true), Value::Num(2.5)).unwrap(),
        Value::Num(3.5)
    );

    // add(false, "x") fails on the right operand.
    let x = string_value(&mut vm, "x");
    let error = operators::add(&mut vm, Value::Bool(false), x).unwrap_err();
    assert_eq!(error.message, "Right operand must be a numeric value.");
}

#[test]
fn test_string_concat_versus_mixed() {
    let mut vm = Vm::new();
    let foo = string_value(&mut vm, "foo");
    vm.heap_mut().push_temp(foo.as_obj().unwrap());
    let bar = string_value(&mut vm, "bar");
    vm.heap_mut().pop_temp();

    let joined = operators::add(&mut vm, foo, bar).unwrap();
    assert_eq!(
        vm.heap().string(joined.as_obj().unwrap()).as_bytes(),
        b"foobar"
    );

    let error = operators::add(&mut vm, foo, Value::Num(1.0)).unwrap_err();
    assert_eq!(
        error.message,
        "Unsupported operand types for '+' String and Num"
    );
}

#[test]
fn test_list_indexing() {
    let mut vm = Vm::new();
    let list = Value::Obj(vm.new_list(vec![
        Value::Num(10.0),
        Value::Num(20.0),
        Value::Num(30.0),
    ]));

    assert_eq!(
        subscript::get_subscript(&mut vm, list, Value::Num(1.0)).unwrap(),
        Value::Num(20.0)
    );

    let error = subscript::get_subscript(&mut vm, list, Value::Num(3.0)).unwrap_err();
    assert_eq!(error.message, "List index out of range.");

    subscript::set_subscript(&mut vm, list, Value::Num(0.0), Value::Num(99.0)).unwrap();
    assert_eq!(
        subscript::get_subscript(&mut vm, list, Value::Num(0.0)).unwrap(),
        Value::Num(99.0)
    );
}

#[test]
fn test_list_set_then_get_is_identity() {
    let mut vm = Vm::new();
    let list = Value::Obj(vm.new_list(vec![Value::Null; 5]));
    for i in 0..5 {
        let index = Value::Num(i as f64);
        let value = Value::Num((i * i) as f64);
        subscript::set_subscript(&mut vm, list, index, value).unwrap();
        assert_eq!(subscript::get_subscript(&mut vm, list, index).unwrap(), value);
    }
}

#[test]
fn test_map_roundtrip_and_iteration_yields_key_once() {
    let mut vm = Vm::new();
    let map = Value::Obj(vm.new_map());
    let key = string_value(&mut vm, "k");

    subscript::set_subscript(&mut vm, map, key, Value::Num(5.0)).unwrap();
    assert_eq!(
        subscript::get_subscript(&mut vm, map, key).unwrap(),
        Value::Num(5.0)
    );

    // Iterating the map yields `k` exactly once.
    let mut seen = 0;
    let mut state = Value::Null;
    while let Some((element, next)) = iterate::iterate(&mut vm, map, state).unwrap() {
        assert!(vm.value_eq(element, key));
        seen += 1;
        state = next;
    }
    assert_eq!(seen, 1);
}

#[test]
fn test_map_iteration_terminates_after_exactly_the_entry_count() {
    let mut vm = Vm::new();
    let map = Value::Obj(vm.new_map());
    let a = string_value(&mut vm, "a");
    subscript::set_subscript(&mut vm, map, a, Value::Num(1.0)).unwrap();
    let b = string_value(&mut vm, "b");
    subscript::set_subscript(&mut vm, map, b, Value::Num(2.0)).unwrap();

    let mut steps = 0;
    let mut state = Value::Null;
    while let Some((_, next)) = iterate::iterate(&mut vm, map, state).unwrap() {
        steps += 1;
        state = next;
    }
    assert_eq!(steps, 2);
}

#[test]
fn test_string_iteration_concatenates_back_to_source() {
    let mut vm = Vm::new();
    let source = string_value(&mut vm, "rill");
    let mut rebuilt = Vec::new();
    let mut count = 0;
    let mut state = Value::Null;
    while let Some((element, next)) = iterate::iterate(&mut vm, source, state).unwrap() {
        let id = element.as_obj().unwrap();
        assert_eq!(vm.heap().string(id).len(), 1);
        rebuilt.extend_from_slice(vm.heap().string(id).as_bytes());
        count += 1;
        state = next;
    }
    assert_eq!(count, 4);
    assert_eq!(rebuilt, b"rill");
}

#[test]
fn test_range_iteration_counts() {
    let mut vm = Vm::new();

    // from < to: exactly to-from values, never emitting `to`.
    let up = Value::Obj(vm.new_range(3.0, 7.0));
    let mut values = Vec::new();
    let mut state = Value::Null;
    while let Some((element, next)) = iterate::iterate(&mut vm, up, state).unwrap() {
        values.push(element.as_num().unwrap());
        state = next;
    }
    assert_eq!(values, vec![3.0, 4.0, 5.0, 6.0]);

    // from > to: steps by -1.
    let down = Value::Obj(vm.new_range(3.0, 0.0));
    let mut values = Vec::new();
    let mut state = Value::Null;
    while let Some((element, next)) = iterate::iterate(&mut vm, down, state).unwrap() {
        values.push(element.as_num().unwrap());
        state = next;
    }
    assert_eq!(values, vec![3.0, 2.0, 1.0]);
}

#[test]
fn test_attribute_immutability() {
    let mut vm = Vm::new();
    let hello = string_value(&mut vm, "hello");

    let error = attrib::set_attrib(&mut vm, hello, "length", Value::Num(7.0)).unwrap_err();
    assert_eq!(error.message, "'length' attribute is immutable.");

    assert_eq!(
        attrib::get_attrib(&vm, hello, "length").unwrap(),
        Value::Num(5.0)
    );
}

#[test]
fn test_module_global_roundtrip() {
    let mut vm = Vm::new();
    let module = vm.new_module("app");
    vm.heap_mut()
        .module_mut(module)
        .globals
        .push(runtime_core::Global {
            name: "counter".to_string(),
            value: Value::Num(0.0),
        });

    let on = Value::Obj(module);
    attrib::set_attrib(&mut vm, on, "counter", Value::Num(41.0)).unwrap();
    assert_eq!(
        attrib::get_attrib(&vm, on, "counter").unwrap(),
        Value::Num(41.0)
    );
}
