//! Value-to-text rendering.
//!
//! Produces the textual form of any value for `to_string`, `print` and
//! diagnostics. `quote = true` requests a form suitable for embedding
//! in error messages: string payloads are wrapped in double quotes.

use core_types::Value;

use crate::object::HeapObject;
use crate::vm::Vm;

/// Render a number the way Rill scripts see it.
///
/// Integral finite values print without a decimal point.
pub fn num_to_string(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        if n.is_sign_positive() {
            "Infinity".to_string()
        } else {
            "-Infinity".to_string()
        }
    } else if n.trunc() == n && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

/// Render any value as text.
///
/// Total over every user-visible value; containers render their
/// elements in quoted form.
pub fn value_to_string(vm: &Vm, value: Value, quote: bool) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(true) => "true".to_string(),
        Value::Bool(false) => "false".to_string(),
        Value::Num(n) => num_to_string(n),
        Value::Obj(id) => match vm.heap().get(id) {
            HeapObject::String(s) => {
                if quote {
                    format!("\"{}\"", s.to_display())
                } else {
                    s.to_display().into_owned()
                }
            }
            HeapObject::List(list) => {
                let elements: Vec<String> = list
                    .elements
                    .iter()
                    .map(|&element| value_to_string(vm, element, true))
                    .collect();
                format!("[{}]", elements.join(", "))
            }
            HeapObject::Map(map) => {
                let mut pairs = Vec::with_capacity(map.len());
                for slot in 0..map.capacity() {
                    let entry = map.entry(slot);
                    if entry.key.is_undef() {
                        continue;
                    }
                    pairs.push(format!(
                        "{}:{}",
                        value_to_string(vm, entry.key, true),
                        value_to_string(vm, entry.value, true)
                    ));
                }
                format!("{{{}}}", pairs.join(", "))
            }
            HeapObject::Range(range) => format!(
                "[range:{}..{}]",
                num_to_string(range.from),
                num_to_string(range.to)
            ),
            HeapObject::Function(function) => format!("[fn:{}]", function.name),
            HeapObject::Module(module) => format!("[module:{}]", module.name),
            HeapObject::Fiber(_) => "[fiber]".to_string(),
            HeapObject::User(_) => "[userobj]".to_string(),
        },
        Value::Undef => unreachable!("Undef never escapes containers"),
    }
}
