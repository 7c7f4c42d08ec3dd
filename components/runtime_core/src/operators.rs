//! Binary arithmetic and comparison operators.
//!
//! Every operator follows the same shape: a numerically coercible left
//! operand demands a numeric right operand and computes with IEEE-754
//! semantics; otherwise heap-object pairs dispatch on the left
//! operand's kind; everything else is an unsupported-operand failure.

use core_types::{ObjectKind, RuntimeError, RuntimeResult, Value};

use crate::validate::{as_numeric, validate_numeric};
use crate::vm::Vm;

fn unsupported(vm: &Vm, op: &str, v1: Value, v2: Value) -> RuntimeError {
    RuntimeError::operator_error(format!(
        "Unsupported operand types for '{}' {} and {}",
        op,
        vm.type_name(v1),
        vm.type_name(v2)
    ))
}

/// `v1 + v2`: numeric addition or string concatenation.
pub fn add(vm: &mut Vm, v1: Value, v2: Value) -> RuntimeResult<Value> {
    if let Some(d1) = as_numeric(v1) {
        let d2 = validate_numeric(v2, "Right operand")?;
        return Ok(Value::Num(d1 + d2));
    }

    if let (Value::Obj(o1), Value::Obj(o2)) = (v1, v2) {
        if vm.heap().get(o1).kind() == ObjectKind::String
            && vm.heap().get(o2).kind() == ObjectKind::String
        {
            let bytes = {
                let s1 = vm.heap().string(o1);
                let s2 = vm.heap().string(o2);
                let mut bytes = Vec::with_capacity(s1.len() + s2.len());
                bytes.extend_from_slice(s1.as_bytes());
                bytes.extend_from_slice(s2.as_bytes());
                bytes
            };
            return Ok(Value::Obj(vm.new_string_bytes(&bytes)));
        }
        // List + List is reserved until concatenation semantics land.
    }

    Err(unsupported(vm, "+", v1, v2))
}

/// `v1 - v2`: numeric subtraction.
pub fn subtract(vm: &mut Vm, v1: Value, v2: Value) -> RuntimeResult<Value> {
    if let Some(d1) = as_numeric(v1) {
        let d2 = validate_numeric(v2, "Right operand")?;
        return Ok(Value::Num(d1 - d2));
    }
    Err(unsupported(vm, "-", v1, v2))
}

/// `v1 * v2`: numeric multiplication.
pub fn multiply(vm: &mut Vm, v1: Value, v2: Value) -> RuntimeResult<Value> {
    if let Some(d1) = as_numeric(v1) {
        let d2 = validate_numeric(v2, "Right operand")?;
        return Ok(Value::Num(d1 * d2));
    }
    Err(unsupported(vm, "*", v1, v2))
}

/// `v1 / v2`: numeric division.
pub fn divide(vm: &mut Vm, v1: Value, v2: Value) -> RuntimeResult<Value> {
    if let Some(d1) = as_numeric(v1) {
        let d2 = validate_numeric(v2, "Right operand")?;
        return Ok(Value::Num(d1 / d2));
    }
    Err(unsupported(vm, "/", v1, v2))
}

/// `v1 % v2`: floating-point remainder with the sign of the dividend.
pub fn modulo(vm: &mut Vm, v1: Value, v2: Value) -> RuntimeResult<Value> {
    if let Some(d1) = as_numeric(v1) {
        let d2 = validate_numeric(v2, "Right operand")?;
        return Ok(Value::Num(d1 % d2));
    }

    if vm.is_obj_of_kind(v1, ObjectKind::String) {
        // "fmt" % args is reserved until format semantics land.
        return Err(RuntimeError::operator_error(
            "String formatting is not implemented.",
        ));
    }

    Err(unsupported(vm, "%", v1, v2))
}

/// `v1 > v2`: numeric ordering.
///
/// Non-numeric ordering is reserved and reports an unsupported-operand
/// failure.
pub fn greater(vm: &Vm, v1: Value, v2: Value) -> RuntimeResult<bool> {
    match (as_numeric(v1), as_numeric(v2)) {
        (Some(d1), Some(d2)) => Ok(d1 > d2),
        _ => Err(unsupported(vm, ">", v1, v2)),
    }
}

/// `v1 < v2`: numeric ordering.
pub fn lesser(vm: &Vm, v1: Value, v2: Value) -> RuntimeResult<bool> {
    match (as_numeric(v1), as_numeric(v2)) {
        (Some(d1), Some(d2)) => Ok(d1 < d2),
        _ => Err(unsupported(vm, "<", v1, v2)),
    }
}
