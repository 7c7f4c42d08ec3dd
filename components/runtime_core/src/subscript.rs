//! Element access by key.
//!
//! Strings index by byte and are immutable; lists index by integer and
//! are writable; maps key by hashable value. Other object kinds are
//! reserved.

use core_types::{RuntimeError, RuntimeResult, Value};

use crate::object::HeapObject;
use crate::render::value_to_string;
use crate::validate::{validate_index, validate_integer};
use crate::vm::Vm;

fn not_subscriptable(vm: &Vm, on: Value) -> RuntimeError {
    RuntimeError::type_error(format!("{} type is not subscriptable.", vm.type_name(on)))
}

fn key_is_hashable(vm: &Vm, key: Value) -> bool {
    match key {
        Value::Obj(id) => vm.heap().get(id).kind().is_hashable(),
        _ => true,
    }
}

/// Read `on[key]`.
pub fn get_subscript(vm: &mut Vm, on: Value, key: Value) -> RuntimeResult<Value> {
    let Value::Obj(id) = on else {
        return Err(not_subscriptable(vm, on));
    };

    match vm.heap().get(id) {
        HeapObject::String(s) => {
            let index = validate_integer(key, "String index")?;
            let index = validate_index(index, s.len(), "String")?;
            let byte = s.as_bytes()[index];
            Ok(Value::Obj(vm.new_string_bytes(&[byte])))
        }

        HeapObject::List(list) => {
            let index = validate_integer(key, "List index")?;
            let index = validate_index(index, list.len(), "List")?;
            Ok(list.elements[index])
        }

        HeapObject::Map(_) => {
            let value = vm.map_get(id, key);
            if !value.is_undef() {
                return Ok(value);
            }
            let rendered = value_to_string(vm, key, true);
            if !key_is_hashable(vm, key) {
                return Err(RuntimeError::lookup_error(format!(
                    "Invalid key '{}'.",
                    rendered
                )));
            }
            Err(RuntimeError::lookup_error(format!(
                "Key '{}' not exists.",
                rendered
            )))
        }

        // Subscript on the remaining kinds is reserved.
        HeapObject::Range(_)
        | HeapObject::Function(_)
        | HeapObject::Module(_)
        | HeapObject::Fiber(_)
        | HeapObject::User(_) => Err(not_subscriptable(vm, on)),
    }
}

/// Write `on[key] = value`.
pub fn set_subscript(vm: &mut Vm, on: Value, key: Value, value: Value) -> RuntimeResult<()> {
    let Value::Obj(id) = on else {
        return Err(not_subscriptable(vm, on));
    };

    match vm.heap().get(id) {
        HeapObject::String(_) => Err(RuntimeError::immutability_error(
            "String objects are immutable.",
        )),

        HeapObject::List(list) => {
            let index = validate_integer(key, "List index")?;
            let index = validate_index(index, list.len(), "List")?;
            vm.heap_mut().list_mut(id).elements[index] = value;
            Ok(())
        }

        HeapObject::Map(_) => {
            if !key_is_hashable(vm, key) {
                return Err(RuntimeError::type_error(format!(
                    "{} type is not hashable.",
                    vm.type_name(key)
                )));
            }
            vm.map_set(id, key, value);
            Ok(())
        }

        HeapObject::Range(_)
        | HeapObject::Function(_)
        | HeapObject::Module(_)
        | HeapObject::Fiber(_)
        | HeapObject::User(_) => Err(not_subscriptable(vm, on)),
    }
}
