//! The iteration protocol.
//!
//! A single stepping operation unifies strings, lists, maps and ranges
//! behind one contract: the iterator state is `Null` on the first call
//! and a non-negative Number thereafter, and each step yields the next
//! element plus the advanced state, or `None` when the sequence is
//! exhausted.
//!
//! The integer inside the state is opaque to callers. For maps it
//! indexes the raw backing slot array, so it is neither dense nor a
//! stable insertion position.

use core_types::{RuntimeError, RuntimeResult, Value};

use crate::object::HeapObject;
use crate::vm::Vm;

/// Advance one step of iteration over `seq`.
///
/// Returns `Some((element, next_state))` while elements remain, `None`
/// on exhaustion, and a type error for non-iterable values.
pub fn iterate(vm: &mut Vm, seq: Value, state: Value) -> RuntimeResult<Option<(Value, Value)>> {
    let id = match seq {
        Value::Null => return Err(RuntimeError::type_error("Null is not iterable.")),
        Value::Bool(_) => return Err(RuntimeError::type_error("Boolean is not iterable.")),
        Value::Num(_) => return Err(RuntimeError::type_error("Number is not iterable.")),
        Value::Obj(id) => id,
        Value::Undef => unreachable!("Undef never escapes containers"),
    };

    let iter = match state {
        Value::Null => 0,
        Value::Num(n) => {
            debug_assert!(n >= 0.0 && n.trunc() == n, "iterator state must be integral");
            n as usize
        }
        _ => unreachable!("iterator state is Null or a non-negative Number"),
    };
    let next = Value::Num((iter + 1) as f64);

    match vm.heap().get(id) {
        HeapObject::String(s) => {
            // Byte-wise stepping; code points are a non-goal.
            if iter >= s.len() {
                return Ok(None);
            }
            let byte = s.as_bytes()[iter];
            let element = Value::Obj(vm.new_string_bytes(&[byte]));
            Ok(Some((element, next)))
        }

        HeapObject::List(list) => {
            if iter >= list.len() {
                return Ok(None);
            }
            Ok(Some((list.elements[iter], next)))
        }

        HeapObject::Map(map) => {
            // Find the next occupied slot; iteration yields keys.
            let mut slot = iter;
            while slot < map.capacity() && map.entry(slot).key.is_undef() {
                slot += 1;
            }
            if slot >= map.capacity() {
                return Ok(None);
            }
            let key = map.entry(slot).key;
            Ok(Some((key, Value::Num((slot + 1) as f64))))
        }

        HeapObject::Range(range) => {
            let (from, to) = (range.from, range.to);
            if from == to {
                return Ok(None);
            }
            let current = if from <= to {
                from + iter as f64
            } else {
                from - iter as f64
            };
            if current == to {
                return Ok(None);
            }
            Ok(Some((Value::Num(current), next)))
        }

        HeapObject::Function(_)
        | HeapObject::Module(_)
        | HeapObject::Fiber(_)
        | HeapObject::User(_) => Err(RuntimeError::type_error(format!(
            "{} is not iterable.",
            vm.type_name(seq)
        ))),
    }
}
