//! Coercion and validation helpers.
//!
//! Shared by every operator: numeric coercion (booleans count as 0/1),
//! the integer check, and index bounds. Failures carry the standardized
//! messages the interpreter surfaces to scripts; `role` and `container`
//! name the operand in those messages (e.g. "Right operand", "List").

use core_types::{RuntimeError, RuntimeResult, Value};

/// The numeric coercion rule shared by every arithmetic operator:
/// booleans coerce to 0/1, numbers pass through, everything else is
/// not numeric.
pub fn as_numeric(value: Value) -> Option<f64> {
    match value {
        Value::Bool(b) => Some(if b { 1.0 } else { 0.0 }),
        Value::Num(n) => Some(n),
        _ => None,
    }
}

/// Coerce `value` to a number or fail with `<role> must be a numeric
/// value.`
pub fn validate_numeric(value: Value, role: &str) -> RuntimeResult<f64> {
    as_numeric(value)
        .ok_or_else(|| RuntimeError::type_error(format!("{} must be a numeric value.", role)))
}

/// Coerce `value` to an integer or fail with `<role> must be an
/// integer.`
///
/// A number is an integer iff truncation leaves it unchanged.
pub fn validate_integer(value: Value, role: &str) -> RuntimeResult<i64> {
    if let Some(n) = as_numeric(value) {
        if n.trunc() == n {
            return Ok(n as i64);
        }
    }
    Err(RuntimeError::type_error(format!(
        "{} must be an integer.",
        role
    )))
}

/// Check `0 <= index < len` or fail with `<container> index out of
/// range.`
pub fn validate_index(index: i64, len: usize, container: &str) -> RuntimeResult<usize> {
    if index < 0 || index as u64 >= len as u64 {
        return Err(RuntimeError::range_error(format!(
            "{} index out of range.",
            container
        )));
    }
    Ok(index as usize)
}
