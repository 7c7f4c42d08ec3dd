//! String builtins.
//!
//! ASCII case mapping and ASCII whitespace trimming; byte buffers pass
//! through untouched otherwise. Results are fresh string objects whose
//! cached hash reflects the transformed content.

use core_types::{ObjectId, ObjectKind, RuntimeError, Value};
use runtime_core::Vm;

use crate::api::{get_arg, return_value};

/// Read argument `arg` as a string object, or report
/// `Expected a string at argument <arg>.` and return `None`.
pub(crate) fn validate_arg_string(vm: &mut Vm, arg: usize) -> Option<ObjectId> {
    match get_arg(vm, arg) {
        Value::Obj(id) if vm.heap().get(id).kind() == ObjectKind::String => Some(id),
        _ => {
            vm.set_error(RuntimeError::type_error(format!(
                "Expected a string at argument {}.",
                arg
            )));
            None
        }
    }
}

/// `str_lower(s)` - ASCII lowercase copy of `s`.
pub fn str_lower(vm: &mut Vm) {
    let Some(id) = validate_arg_string(vm, 1) else {
        return;
    };
    let bytes = vm.heap().string(id).as_bytes().to_ascii_lowercase();
    let result = vm.new_string_bytes(&bytes);
    return_value(vm, Value::Obj(result));
}

/// `str_upper(s)` - ASCII uppercase copy of `s`.
pub fn str_upper(vm: &mut Vm) {
    let Some(id) = validate_arg_string(vm, 1) else {
        return;
    };
    let bytes = vm.heap().string(id).as_bytes().to_ascii_uppercase();
    let result = vm.new_string_bytes(&bytes);
    return_value(vm, Value::Obj(result));
}

/// `str_strip(s)` - copy of `s` with ASCII whitespace removed from
/// both ends.
pub fn str_strip(vm: &mut Vm) {
    let Some(id) = validate_arg_string(vm, 1) else {
        return;
    };
    let bytes = {
        let data = vm.heap().string(id).as_bytes();
        let mut start = 0;
        while start < data.len() && data[start].is_ascii_whitespace() {
            start += 1;
        }
        let mut end = data.len();
        while end > start && data[end - 1].is_ascii_whitespace() {
            end -= 1;
        }
        data[start..end].to_vec()
    };
    let result = vm.new_string_bytes(&bytes);
    return_value(vm, Value::Obj(result));
}
