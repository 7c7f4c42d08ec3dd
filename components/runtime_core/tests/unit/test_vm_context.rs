//! Unit tests for the VM context: registries, fibers and native calls

use core_types::{ObjectKind, RuntimeError, TypeId, Value};
use runtime_core::{FnBody, Vm};

#[test]
fn test_type_taxonomy() {
    let mut vm = Vm::new();
    assert_eq!(vm.type_name(Value::Null), "Null");
    assert_eq!(vm.type_name(Value::Bool(true)), "Bool");
    assert_eq!(vm.type_name(Value::Num(1.0)), "Num");

    let s = Value::Obj(vm.new_string("s"));
    assert_eq!(vm.type_name(s), "String");
    assert_eq!(vm.type_id_of(s), TypeId::String);
    assert_eq!(vm.type_id_of(Value::Num(1.0)), TypeId::Number);
    assert!(vm.is_obj_of_kind(s, ObjectKind::String));
    assert!(!vm.is_obj_of_kind(s, ObjectKind::List));
    assert!(!vm.is_obj_of_kind(Value::Null, ObjectKind::String));
}

#[test]
fn test_builtin_registration_order_and_lookup() {
    let mut vm = Vm::new();
    fn noop(_vm: &mut Vm) {}
    vm.register_builtin("alpha", 1, noop);
    vm.register_builtin("beta", -1, noop);

    assert_eq!(vm.builtin_count(), 2);
    assert_eq!(vm.find_builtin("alpha"), Some(0));
    assert_eq!(vm.find_builtin("beta"), Some(1));
    assert_eq!(vm.builtin_name(1), "beta");

    let beta = vm.heap().function(vm.builtin_fn(1));
    assert_eq!(beta.arity, -1);
    assert!(beta.is_native());
}

#[test]
#[should_panic(expected = "A builtin function named 'twice' already exists")]
fn test_duplicate_builtin_panics() {
    let mut vm = Vm::new();
    fn noop(_vm: &mut Vm) {}
    vm.register_builtin("twice", 0, noop);
    vm.register_builtin("twice", 0, noop);
}

#[test]
#[should_panic(expected = "A function named 'f' already exists on module 'm'")]
fn test_duplicate_module_function_panics() {
    let mut vm = Vm::new();
    let module = vm.new_module("m");
    fn noop(_vm: &mut Vm) {}
    vm.module_add_function(module, "f", 0, FnBody::Native(noop));
    vm.module_add_function(module, "f", 0, FnBody::Native(noop));
}

#[test]
#[should_panic(expected = "A global variable named 'g' already exists on module 'm'")]
fn test_function_global_namespace_is_flat() {
    let mut vm = Vm::new();
    let module = vm.new_module("m");
    vm.heap_mut()
        .module_mut(module)
        .globals
        .push(runtime_core::Global {
            name: "g".to_string(),
            value: Value::Null,
        });
    fn noop(_vm: &mut Vm) {}
    vm.module_add_function(module, "g", 0, FnBody::Native(noop));
}

#[test]
fn test_native_call_reads_args_and_returns() {
    let mut vm = Vm::new();

    // Adds its two arguments; mirrors how a host callback reads the
    // native frame.
    fn sum(vm: &mut Vm) {
        let fiber = vm.current_fiber().expect("runtime call");
        let (a, b) = {
            let f = vm.heap().fiber(fiber);
            assert_eq!(f.arg_count(), 2);
            (f.arg(1), f.arg(2))
        };
        let total = a.as_num().unwrap() + b.as_num().unwrap();
        vm.heap_mut().fiber_mut(fiber).set_return(Value::Num(total));
    }

    let fn_id = vm.register_builtin("sum", 2, sum);
    let result = vm
        .call_native(fn_id, &[Value::Num(2.0), Value::Num(3.0)])
        .unwrap();
    assert_eq!(result, Value::Num(5.0));
}

#[test]
fn test_native_error_propagates_and_clears() {
    let mut vm = Vm::new();
    fn failing(vm: &mut Vm) {
        vm.set_error(RuntimeError::type_error("Number is not iterable."));
    }
    let fn_id = vm.register_builtin("failing", 0, failing);

    let error = vm.call_native(fn_id, &[]).unwrap_err();
    assert_eq!(error.message, "Number is not iterable.");

    // The next call starts with a clean error slot.
    fn fine(_vm: &mut Vm) {}
    let ok_id = vm.register_builtin("fine", 0, fine);
    assert_eq!(vm.call_native(ok_id, &[]).unwrap(), Value::Null);
}

#[test]
fn test_nested_native_frames_restore_ret() {
    let mut vm = Vm::new();

    fn inner(vm: &mut Vm) {
        let fiber = vm.current_fiber().unwrap();
        vm.heap_mut().fiber_mut(fiber).set_return(Value::Num(1.0));
    }

    fn outer(vm: &mut Vm) {
        let inner_id = vm
            .find_builtin("inner")
            .map(|index| vm.builtin_fn(index))
            .unwrap();
        let nested = vm.call_native(inner_id, &[]).unwrap();
        let fiber = vm.current_fiber().unwrap();
        let own_arg = vm.heap().fiber(fiber).arg(1);
        let total = nested.as_num().unwrap() + own_arg.as_num().unwrap();
        vm.heap_mut().fiber_mut(fiber).set_return(Value::Num(total));
    }

    vm.register_builtin("inner", 0, inner);
    let outer_id = vm.register_builtin("outer", 1, outer);
    let result = vm.call_native(outer_id, &[Value::Num(10.0)]).unwrap();
    assert_eq!(result, Value::Num(11.0));
}

#[test]
fn test_elapsed_seconds_is_monotonic() {
    let vm = Vm::new();
    let t1 = vm.elapsed_seconds();
    let t2 = vm.elapsed_seconds();
    assert!(t2 >= t1);
    assert!(t1 >= 0.0);
}
