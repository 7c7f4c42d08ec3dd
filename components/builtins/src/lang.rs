//! The `lang` standard module.

use core_types::{ObjectKind, Value};
use runtime_core::render::value_to_string;
use runtime_core::Vm;

use crate::api::{arg_count, get_arg, module_add_function, new_module, return_number};

/// `lang.clock()` - seconds since the VM was created.
pub fn clock(vm: &mut Vm) {
    let seconds = vm.elapsed_seconds();
    return_number(vm, seconds);
}

/// `lang.gc()` - trigger a collection and return the bytes reclaimed.
pub fn gc(vm: &mut Vm) {
    let reclaimed = vm.collect_garbage();
    return_number(vm, reclaimed as f64);
}

/// `lang.write(...)` - like `print`, but with no separators and no
/// trailing newline.
pub fn write(vm: &mut Vm) {
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
        write(&text);
    }
}

/// Register the `lang` module on `vm`.
pub fn register_lang_module(vm: &mut Vm) {
    let lang = new_module(vm, "lang");
    module_add_function(vm, lang, "clock", clock, 0);
    module_add_function(vm, lang, "gc", gc, 0);
    module_add_function(vm, lang, "write", write, -1);
}
