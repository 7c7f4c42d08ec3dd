//! Type-predicate builtins.
//!
//! One `is_*` builtin per value type, each taking a single argument
//! and returning a boolean.

use core_types::ObjectKind;
use runtime_core::Vm;

use crate::api::{get_arg, return_bool};

fn return_is_kind(vm: &mut Vm, kind: ObjectKind) {
    let value = get_arg(vm, 1);
    let result = vm.is_obj_of_kind(value, kind);
    return_bool(vm, result);
}

/// `is_null(v)`
pub fn is_null(vm: &mut Vm) {
    let result = get_arg(vm, 1).is_null();
    return_bool(vm, result);
}

/// `is_bool(v)`
pub fn is_bool(vm: &mut Vm) {
    let result = get_arg(vm, 1).is_bool();
    return_bool(vm, result);
}

/// `is_num(v)`
pub fn is_num(vm: &mut Vm) {
    let result = get_arg(vm, 1).is_num();
    return_bool(vm, result);
}

/// `is_string(v)`
pub fn is_string(vm: &mut Vm) {
    return_is_kind(vm, ObjectKind::String);
}

/// `is_list(v)`
pub fn is_list(vm: &mut Vm) {
    return_is_kind(vm, ObjectKind::List);
}

/// `is_map(v)`
pub fn is_map(vm: &mut Vm) {
    return_is_kind(vm, ObjectKind::Map);
}

/// `is_range(v)`
pub fn is_range(vm: &mut Vm) {
    return_is_kind(vm, ObjectKind::Range);
}

/// `is_function(v)`
pub fn is_function(vm: &mut Vm) {
    return_is_kind(vm, ObjectKind::Function);
}

/// `is_script(v)` - true for module objects.
pub fn is_script(vm: &mut Vm) {
    return_is_kind(vm, ObjectKind::Module);
}

/// `is_userobj(v)`
pub fn is_userobj(vm: &mut Vm) {
    return_is_kind(vm, ObjectKind::User);
}
