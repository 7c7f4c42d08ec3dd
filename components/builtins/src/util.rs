//! General-purpose builtins: `assert`, `hash`, `to_string` and
//! `print`.

use core_types::{ObjectKind, RuntimeError, Value};
use runtime_core::render::value_to_string;
use runtime_core::Vm;

use crate::api::{arg_count, get_arg, return_null, return_number, return_value};

/// `assert(cond [, msg])` - record an assertion failure when `cond` is
/// falsy.
pub fn assert(vm: &mut Vm) {
    let argc = arg_count(vm);
    if argc != 1 && argc != 2 {
        vm.set_error(RuntimeError::type_error("Invalid argument count."));
        return;
    }

    if get_arg(vm, 1).is_truthy() {
        return;
    }

    if argc == 2 {
        let message = get_arg(vm, 2);
        let text = match message {
            Value::Obj(id) if vm.heap().get(id).kind() == ObjectKind::String => {
                vm.heap().string(id).to_display().into_owned()
            }
            other => value_to_string(vm, other, false),
        };
        vm.set_error(RuntimeError::assertion_error(format!(
            "Assertion failed: '{}'.",
            text
        )));
    } else {
        vm.set_error(RuntimeError::assertion_error("Assertion failed."));
    }
}

/// `hash(v)` - content hash of `v`, or `null` for non-hashable
/// objects.
pub fn hash(vm: &mut Vm) {
    let value = get_arg(vm, 1);
    match vm.value_hash(value) {
        Some(h) => return_number(vm, h as f64),
        None => return_null(vm),
    }
}

/// `to_string(v)` - fresh string rendering of any value.
pub fn to_string(vm: &mut Vm) {
    let value = get_arg(vm, 1);
    let text = value_to_string(vm, value, false);
    let result = vm.new_string(&text);
    return_value(vm, Value::Obj(result));
}

/// `print(...)` - write arguments space-separated with a trailing
/// newline through the host write hook; silent when no hook is
/// installed.
pub fn print(vm: &mut Vm) {
    let Some(write) = vm.config().write.clone() else {
        return;
    };

    let argc = arg_count(vm);
    for i in 1..=argc {
        let value = get_arg(vm, i);
        // A string argument is written as-is, without re-rendering.
        let text = match value {
            Value::Obj(id) if vm.heap().get(id).kind() == ObjectKind::String => {
                vm.heap().string(id).to_display().into_owned()
            }
            other => value_to_string(vm, other, false),
        };
        if i != 1 {
            write(" ");
        }
        write(&text);
    }
    write("\n");
}
