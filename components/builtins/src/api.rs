//! The host-facing native ABI.
//!
//! Inside a native callback the current fiber holds a C-style frame:
//! the result slot at `ret`, arguments at `ret[1..=argc]`. These
//! functions are the only sanctioned way for host code to read that
//! frame and publish a result.
//!
//! Misusing the ABI (calling it outside a native frame, indexing a
//! nonexistent argument, registering a duplicate name) is a bug in the
//! embedder and panics; a script-visible type mismatch instead writes
//! the fiber's error slot and reports failure through the return value.

use core_types::{ObjectId, ObjectKind, RuntimeError, TypeId, Value};
use runtime_core::{FnBody, NativeFn, Vm};

/// The fiber a native callback is running on.
fn runtime_fiber(vm: &Vm) -> ObjectId {
    vm.current_fiber()
        .expect("This function can only be called at runtime.")
}

/// Number of arguments in the current native frame.
pub fn arg_count(vm: &Vm) -> usize {
    let fiber = runtime_fiber(vm);
    vm.heap().fiber(fiber).arg_count()
}

/// The `arg`-th argument (1-based) of the current native frame.
///
/// Panics when `arg` is outside `1..=arg_count`; the host asked for an
/// argument that is not there.
pub fn get_arg(vm: &Vm, arg: usize) -> Value {
    let fiber = runtime_fiber(vm);
    let count = vm.heap().fiber(fiber).arg_count();
    assert!(arg >= 1 && arg <= count, "Invalid argument index.");
    vm.heap().fiber(fiber).arg(arg)
}

/// Read argument `arg` as a number (booleans coerce to 0/1).
///
/// On mismatch, writes `Expected a number at argument <arg>.` into the
/// fiber error slot and returns `None`.
pub fn get_arg_number(vm: &mut Vm, arg: usize) -> Option<f64> {
    match get_arg(vm, arg) {
        Value::Num(n) => Some(n),
        Value::Bool(b) => Some(if b { 1.0 } else { 0.0 }),
        _ => {
            vm.set_error(RuntimeError::type_error(format!(
                "Expected a number at argument {}.",
                arg
            )));
            None
        }
    }
}

/// Read argument `arg` as a boolean, by truthiness. Total.
pub fn get_arg_bool(vm: &mut Vm, arg: usize) -> Option<bool> {
    Some(get_arg(vm, arg).is_truthy())
}

/// Read argument `arg`, requiring the exact type `kind`.
///
/// On mismatch, writes `Expected a <kind> at argument <arg>.` into the
/// fiber error slot and returns `None`. The returned value is read
/// from the frame slot itself, so it stays valid as long as the frame
/// does.
pub fn get_arg_value(vm: &mut Vm, arg: usize, kind: TypeId) -> Option<Value> {
    let value = get_arg(vm, arg);
    if vm.type_id_of(value) != kind {
        vm.set_error(RuntimeError::type_error(format!(
            "Expected a {} at argument {}.",
            kind.name(),
            arg
        )));
        return None;
    }
    Some(value)
}

/// Return `null` from the current native frame.
pub fn return_null(vm: &mut Vm) {
    return_value(vm, Value::Null);
}

/// Return a boolean from the current native frame.
pub fn return_bool(vm: &mut Vm, value: bool) {
    return_value(vm, Value::Bool(value));
}

/// Return a number from the current native frame.
pub fn return_number(vm: &mut Vm, value: f64) {
    return_value(vm, Value::Num(value));
}

/// Return an arbitrary value from the current native frame.
pub fn return_value(vm: &mut Vm, value: Value) {
    let fiber = runtime_fiber(vm);
    vm.heap_mut().fiber_mut(fiber).set_return(value);
}

/// Create a module and register it with the VM.
///
/// Panics if a module with `name` already exists; duplicate modules
/// are a bug in the embedder, not a script failure.
pub fn new_module(vm: &mut Vm, name: &str) -> ObjectId {
    vm.new_module(name)
}

/// Register the native `callback` as function `name` on `module`.
///
/// `arity` is the fixed argument count, or `-1` for variadic. Panics
/// when the handle is not a module or when `name` collides with an
/// existing function or global on that module.
pub fn module_add_function(
    vm: &mut Vm,
    module: ObjectId,
    name: &str,
    callback: NativeFn,
    arity: i32,
) -> ObjectId {
    assert!(
        vm.is_obj_of_kind(Value::Obj(module), ObjectKind::Module),
        "Given handle is not a module"
    );
    vm.module_add_function(module, name, arity, FnBody::Native(callback))
}
