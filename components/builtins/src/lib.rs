//! Rill builtin library and host ABI.
//!
//! This crate seeds a fresh VM with its flat builtin namespace (type
//! predicates, `assert`, `hash`, `to_string`, `print` and the string
//! helpers), registers the `lang` standard module, and exposes the
//! native ABI the embedding host uses to add its own modules and read
//! arguments inside callbacks.
//!
//! # Example
//!
//! ```
//! use builtins::{api, initialize_core};
//! use core_types::Value;
//! use runtime_core::Vm;
//!
//! let mut vm = Vm::new();
//! initialize_core(&mut vm);
//!
//! // Call a builtin the way the interpreter would.
//! let index = vm.find_builtin("is_num").unwrap();
//! let result = vm.call_native(vm.builtin_fn(index), &[Value::Num(1.0)]);
//! assert_eq!(result.unwrap(), Value::Bool(true));
//!
//! // Register a host module.
//! fn answer(vm: &mut runtime_core::Vm) {
//!     api::return_number(vm, 42.0);
//! }
//! let module = api::new_module(&mut vm, "host");
//! api::module_add_function(&mut vm, module, "answer", answer, 0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod api;
pub mod lang;
pub mod string;
pub mod type_checks;
pub mod util;

use runtime_core::Vm;

/// Seed `vm` with the builtin function table and the `lang` module.
///
/// Called once at VM startup, before any script runs. The registered
/// names are reserved; scripts cannot shadow them at the builtin level.
pub fn initialize_core(vm: &mut Vm) {
    vm.register_builtin("is_null", 1, type_checks::is_null);
    vm.register_builtin("is_bool", 1, type_checks::is_bool);
    vm.register_builtin("is_num", 1, type_checks::is_num);

    vm.register_builtin("is_string", 1, type_checks::is_string);
    vm.register_builtin("is_list", 1, type_checks::is_list);
    vm.register_builtin("is_map", 1, type_checks::is_map);
    vm.register_builtin("is_range", 1, type_checks::is_range);
    vm.register_builtin("is_function", 1, type_checks::is_function);
    vm.register_builtin("is_script", 1, type_checks::is_script);
    vm.register_builtin("is_userobj", 1, type_checks::is_userobj);

    vm.register_builtin("assert", -1, util::assert);
    vm.register_builtin("hash", 1, util::hash);
    vm.register_builtin("to_string", 1, util::to_string);
    vm.register_builtin("print", -1, util::print);

    vm.register_builtin("str_lower", 1, string::str_lower);
    vm.register_builtin("str_upper", 1, string::str_upper);
    vm.register_builtin("str_strip", 1, string::str_strip);

    lang::register_lang_module(vm);
}
