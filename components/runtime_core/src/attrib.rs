//! Attribute access by name.
//!
//! `get_attrib` / `set_attrib` are total over values: primitives are
//! not subscriptable, heap objects dispatch on kind. Per-kind
//! immutability rules live here (string/list `length`, module
//! functions).

use core_types::{RuntimeError, RuntimeResult, Value};

use crate::object::HeapObject;
use crate::vm::Vm;

fn not_subscriptable(vm: &Vm, on: Value) -> RuntimeError {
    RuntimeError::type_error(format!("{} type is not subscriptable.", vm.type_name(on)))
}

fn no_attrib(vm: &Vm, on: Value, name: &str) -> RuntimeError {
    RuntimeError::lookup_error(format!(
        "'{}' objects has no attribute named '{}'.",
        vm.type_name(on),
        name
    ))
}

fn immutable_attrib(name: &str) -> RuntimeError {
    RuntimeError::immutability_error(format!("'{}' attribute is immutable.", name))
}

/// Read the attribute `name` of `on`.
pub fn get_attrib(vm: &Vm, on: Value, name: &str) -> RuntimeResult<Value> {
    let Value::Obj(id) = on else {
        return Err(not_subscriptable(vm, on));
    };

    match vm.heap().get(id) {
        HeapObject::String(s) => {
            if name == "length" {
                return Ok(Value::Num(s.len() as f64));
            }
            Err(no_attrib(vm, on, name))
        }

        HeapObject::List(list) => {
            if name == "length" {
                return Ok(Value::Num(list.len() as f64));
            }
            Err(no_attrib(vm, on, name))
        }

        HeapObject::Map(_) => {
            // The attribute name is a string key into the map.
            let value = vm.map_get_str(id, name);
            if value.is_undef() {
                return Err(RuntimeError::lookup_error(format!(
                    "Key (\"{}\") not exists.",
                    name
                )));
            }
            Ok(value)
        }

        // Range attributes are reserved.
        HeapObject::Range(_) => Err(no_attrib(vm, on, name)),

        HeapObject::Module(module) => {
            if let Some(fn_id) = vm.module_find_function(id, name) {
                return Ok(Value::Obj(fn_id));
            }
            if let Some(index) = module.find_global(name) {
                return Ok(module.globals[index].value);
            }
            Err(no_attrib(vm, on, name))
        }

        // Function, fiber and user-object attributes are reserved.
        HeapObject::Function(_) | HeapObject::Fiber(_) | HeapObject::User(_) => {
            Err(no_attrib(vm, on, name))
        }
    }
}

/// Write the attribute `name` of `on`.
pub fn set_attrib(vm: &mut Vm, on: Value, name: &str, value: Value) -> RuntimeResult<()> {
    let Value::Obj(id) = on else {
        return Err(not_subscriptable(vm, on));
    };

    match vm.heap().get(id) {
        HeapObject::String(_) | HeapObject::List(_) => {
            if name == "length" {
                return Err(immutable_attrib("length"));
            }
            Err(no_attrib(vm, on, name))
        }

        // Map set-attrib is reserved; element writes go through
        // subscript assignment.
        HeapObject::Map(_) => Err(no_attrib(vm, on, name)),

        HeapObject::Range(_) => Err(no_attrib(vm, on, name)),

        HeapObject::Module(module) => {
            // Globals win over functions on write; functions are
            // immutable.
            if let Some(index) = module.find_global(name) {
                vm.heap_mut().module_mut(id).globals[index].value = value;
                return Ok(());
            }
            if vm.module_find_function(id, name).is_some() {
                return Err(immutable_attrib(name));
            }
            Err(no_attrib(vm, on, name))
        }

        HeapObject::Function(_) | HeapObject::Fiber(_) | HeapObject::User(_) => {
            Err(no_attrib(vm, on, name))
        }
    }
}
