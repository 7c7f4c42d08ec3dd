//! Unit tests for RuntimeError

use core_types::{ErrorKind, RuntimeError, RuntimeResult};

#[test]
fn test_constructors_set_kind() {
    assert_eq!(RuntimeError::type_error("x").kind, ErrorKind::Type);
    assert_eq!(RuntimeError::range_error("x").kind, ErrorKind::Range);
    assert_eq!(RuntimeError::lookup_error("x").kind, ErrorKind::Lookup);
    assert_eq!(
        RuntimeError::immutability_error("x").kind,
        ErrorKind::Immutability
    );
    assert_eq!(RuntimeError::operator_error("x").kind, ErrorKind::Operator);
    assert_eq!(
        RuntimeError::assertion_error("x").kind,
        ErrorKind::Assertion
    );
}

#[test]
fn test_message_is_preserved_verbatim() {
    let error = RuntimeError::operator_error("Unsupported operand types for '+' String and Num");
    assert_eq!(
        error.message,
        "Unsupported operand types for '+' String and Num"
    );
}

#[test]
fn test_display_is_the_message() {
    let error = RuntimeError::range_error("List index out of range.");
    assert_eq!(format!("{}", error), "List index out of range.");
}

#[test]
fn test_result_alias() {
    fn fails() -> RuntimeResult<f64> {
        Err(RuntimeError::type_error("Left operand must be a numeric value."))
    }
    assert!(fails().is_err());
}

#[test]
fn test_error_source_trait() {
    let error = RuntimeError::type_error("x");
    let dynamic: &dyn std::error::Error = &error;
    assert_eq!(dynamic.to_string(), "x");
}
