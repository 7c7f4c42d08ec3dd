//! The VM context.
//!
//! A [`Vm`] owns all script-visible state: the object heap, the builtin
//! function table, the module registry and the currently running fiber.
//! Every core entry point takes the VM as context; no global mutable
//! state exists in the runtime.

use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::hash::Hasher;
use std::rc::Rc;
use std::time::Instant;

use core_types::{ObjectId, ObjectKind, RuntimeError, TypeId, Value};
use rustc_hash::{FxHashMap, FxHasher};

use crate::heap::Heap;
use crate::object::{
    hash_bytes, FiberObject, FnBody, FunctionObject, HeapObject, ListObject, MapEntry, MapObject,
    ModuleObject, NativeFn, RangeObject, StringObject, UserObject,
};

/// Maps stay at or below 75% load.
const MAP_MAX_LOAD_PERCENT: usize = 75;
/// Smallest non-empty map backing array.
const MAP_MIN_CAPACITY: usize = 8;

/// Host-supplied configuration for a VM instance.
///
/// # Examples
///
/// ```
/// use runtime_core::{Vm, VmConfig};
/// use std::cell::RefCell;
/// use std::rc::Rc;
///
/// let output = Rc::new(RefCell::new(Vec::new()));
/// let sink = output.clone();
///
/// let mut config = VmConfig::default();
/// config.write = Some(Rc::new(move |text: &str| {
///     sink.borrow_mut().push(text.to_string());
/// }));
///
/// let vm = Vm::with_config(config);
/// vm.write_out("hello");
/// assert_eq!(output.borrow().join(""), "hello");
/// ```
#[derive(Clone)]
pub struct VmConfig {
    /// Stdout-like sink for `print`/`write`. Absent means script output
    /// is silently discarded.
    pub write: Option<Rc<dyn Fn(&str)>>,
    /// Heap size at which the first collection triggers.
    pub initial_gc_threshold: usize,
    /// Factor applied to the live size to choose the next threshold.
    pub gc_growth_factor: usize,
}

impl Default for VmConfig {
    fn default() -> Self {
        VmConfig {
            write: None,
            initial_gc_threshold: 1024 * 1024,
            gc_growth_factor: 2,
        }
    }
}

impl fmt::Debug for VmConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VmConfig")
            .field("write", &self.write.as_ref().map(|_| ".."))
            .field("initial_gc_threshold", &self.initial_gc_threshold)
            .field("gc_growth_factor", &self.gc_growth_factor)
            .finish()
    }
}

/// One entry of the builtin function table.
#[derive(Debug)]
pub struct Builtin {
    /// The reserved builtin name.
    pub name: String,
    /// Handle of the native function object.
    pub fn_id: ObjectId,
}

/// Result of probing a map's backing array for a key.
enum Probe {
    /// The key lives at this slot.
    Found(usize),
    /// The key is absent; this empty slot would receive it.
    Vacant(usize),
    /// The map has no backing storage yet.
    NoStorage,
}

/// A Rill virtual machine instance.
///
/// Owns the heap, the builtin table, the module registry, and the
/// currently running fiber. The bytecode interpreter drives fibers from
/// outside; this core supplies the semantic operations.
pub struct Vm {
    heap: Heap,
    config: VmConfig,
    builtins: Vec<Builtin>,
    builtin_index: FxHashMap<String, usize>,
    modules: FxHashMap<String, ObjectId>,
    fiber: Option<ObjectId>,
    next_gc: usize,
    started: Instant,
}

impl fmt::Debug for Vm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Vm")
            .field("live_objects", &self.heap.live_objects())
            .field("builtins", &self.builtins.len())
            .field("modules", &self.modules.len())
            .field("fiber", &self.fiber)
            .finish()
    }
}

impl Default for Vm {
    fn default() -> Self {
        Vm::new()
    }
}

impl Vm {
    /// Create a VM with default configuration.
    pub fn new() -> Self {
        Vm::with_config(VmConfig::default())
    }

    /// Create a VM with host-supplied configuration.
    pub fn with_config(config: VmConfig) -> Self {
        let next_gc = config.initial_gc_threshold;
        Vm {
            heap: Heap::new(),
            config,
            builtins: Vec::new(),
            builtin_index: FxHashMap::default(),
            modules: FxHashMap::default(),
            fiber: None,
            next_gc,
            started: Instant::now(),
        }
    }

    /// The object heap.
    pub fn heap(&self) -> &Heap {
        &self.heap
    }

    /// The object heap, mutably.
    pub fn heap_mut(&mut self) -> &mut Heap {
        &mut self.heap
    }

    /// The active configuration.
    pub fn config(&self) -> &VmConfig {
        &self.config
    }

    /// Send `text` to the host write hook, if one is installed.
    pub fn write_out(&self, text: &str) {
        if let Some(write) = &self.config.write {
            write(text);
        }
    }

    /// Monotonic seconds since this VM was created.
    pub fn elapsed_seconds(&self) -> f64 {
        self.started.elapsed().as_secs_f64()
    }

    // ------------------------------------------------------------------
    // Allocation
    // ------------------------------------------------------------------

    /// Move `object` into the heap, collecting first if the threshold
    /// was crossed.
    ///
    /// Collection runs before the insert, so the new object can never
    /// be swept; any *earlier* unrooted allocation must be protected
    /// with [`Heap::push_temp`].
    fn alloc(&mut self, object: HeapObject) -> ObjectId {
        if self.heap.bytes_allocated() >= self.next_gc {
            self.collect_garbage();
            let grown = self.heap.bytes_allocated() * self.config.gc_growth_factor;
            self.next_gc = grown.max(self.config.initial_gc_threshold);
        }
        self.heap.insert(object)
    }

    /// Allocate a string from UTF-8 text.
    pub fn new_string(&mut self, text: &str) -> ObjectId {
        self.alloc(HeapObject::String(StringObject::from_str(text)))
    }

    /// Allocate a string from raw bytes.
    pub fn new_string_bytes(&mut self, bytes: &[u8]) -> ObjectId {
        self.alloc(HeapObject::String(StringObject::new(bytes.to_vec())))
    }

    /// Allocate a list.
    pub fn new_list(&mut self, elements: Vec<Value>) -> ObjectId {
        self.alloc(HeapObject::List(ListObject::new(elements)))
    }

    /// Allocate an empty map.
    pub fn new_map(&mut self) -> ObjectId {
        self.alloc(HeapObject::Map(MapObject::new()))
    }

    /// Allocate a range.
    pub fn new_range(&mut self, from: f64, to: f64) -> ObjectId {
        self.alloc(HeapObject::Range(RangeObject::new(from, to)))
    }

    /// Allocate a fiber with an empty stack.
    pub fn new_fiber(&mut self) -> ObjectId {
        self.alloc(HeapObject::Fiber(FiberObject::new()))
    }

    /// Allocate a user object around a host payload.
    pub fn new_user(&mut self, data: Rc<RefCell<dyn Any>>) -> ObjectId {
        self.alloc(HeapObject::User(UserObject::new(data)))
    }

    // ------------------------------------------------------------------
    // Garbage collection
    // ------------------------------------------------------------------

    /// Run a mark-sweep collection now. Returns bytes reclaimed.
    ///
    /// Roots: the module registry, the builtin table, the current fiber
    /// and the heap's temporary-root stack.
    pub fn collect_garbage(&mut self) -> usize {
        let mut roots: Vec<ObjectId> = Vec::with_capacity(
            self.modules.len() + self.builtins.len() + 1,
        );
        roots.extend(self.modules.values().copied());
        roots.extend(self.builtins.iter().map(|b| b.fn_id));
        if let Some(fiber) = self.fiber {
            roots.push(fiber);
        }
        self.heap.collect(&roots)
    }

    // ------------------------------------------------------------------
    // Fibers
    // ------------------------------------------------------------------

    /// The currently running fiber, if any.
    pub fn current_fiber(&self) -> Option<ObjectId> {
        self.fiber
    }

    /// Install the currently running fiber.
    pub fn attach_fiber(&mut self, fiber: Option<ObjectId>) {
        self.fiber = fiber;
    }

    /// Record `error` in the current fiber's error slot.
    ///
    /// Panics if no fiber is running; errors can only be raised at
    /// runtime.
    pub fn set_error(&mut self, error: RuntimeError) {
        let fiber = self.fiber.expect("set_error outside a running fiber");
        self.heap.fiber_mut(fiber).set_error(error);
    }

    /// The current fiber's error, if it is failing.
    pub fn error(&self) -> Option<&RuntimeError> {
        let fiber = self.fiber?;
        self.heap.fiber(fiber).error.as_ref()
    }

    /// Invoke a native function with `args`, using the current fiber
    /// (one is created if none is attached).
    ///
    /// Builds the C-style native frame - result slot pre-initialized to
    /// `Null` at `ret`, arguments at `ret[1..=argc]` - invokes the
    /// callback, and unwinds the frame. A callback that set the error
    /// slot yields `Err`; otherwise the result slot is returned.
    pub fn call_native(&mut self, fn_id: ObjectId, args: &[Value]) -> Result<Value, RuntimeError> {
        let native = match &self.heap.function(fn_id).body {
            FnBody::Native(native) => *native,
            FnBody::Bytecode(_) => {
                panic!("cannot invoke a bytecode function without the interpreter")
            }
        };

        if self.fiber.is_none() {
            let fiber = self.new_fiber();
            self.fiber = Some(fiber);
        }
        let fiber_id = self.fiber.expect("fiber attached above");

        let (base, saved_ret) = {
            let fiber = self.heap.fiber_mut(fiber_id);
            let base = fiber.stack.len();
            let saved_ret = fiber.ret;
            fiber.stack.push(Value::Null);
            fiber.stack.extend_from_slice(args);
            fiber.ret = base;
            (base, saved_ret)
        };

        native(self);

        let fiber = self.heap.fiber_mut(fiber_id);
        let result = fiber.stack[base];
        fiber.stack.truncate(base);
        fiber.ret = saved_ret;
        match fiber.error.take() {
            Some(error) => Err(error),
            None => Ok(result),
        }
    }

    // ------------------------------------------------------------------
    // Builtin function table
    // ------------------------------------------------------------------

    /// Register a builtin function under a reserved top-level name.
    ///
    /// Panics if `name` is already taken; duplicate builtins are a bug
    /// in the embedder.
    pub fn register_builtin(&mut self, name: &str, arity: i32, native: NativeFn) -> ObjectId {
        assert!(
            !self.builtin_index.contains_key(name),
            "A builtin function named '{}' already exists",
            name
        );
        let fn_id = self.alloc(HeapObject::Function(FunctionObject::new(
            name,
            arity,
            None,
            FnBody::Native(native),
        )));
        self.builtin_index
            .insert(name.to_string(), self.builtins.len());
        self.builtins.push(Builtin {
            name: name.to_string(),
            fn_id,
        });
        fn_id
    }

    /// Index of the builtin named `name`, if any.
    pub fn find_builtin(&self, name: &str) -> Option<usize> {
        self.builtin_index.get(name).copied()
    }

    /// Function handle of the builtin at `index`.
    pub fn builtin_fn(&self, index: usize) -> ObjectId {
        self.builtins[index].fn_id
    }

    /// Name of the builtin at `index`.
    pub fn builtin_name(&self, index: usize) -> &str {
        &self.builtins[index].name
    }

    /// Number of registered builtins.
    pub fn builtin_count(&self) -> usize {
        self.builtins.len()
    }

    // ------------------------------------------------------------------
    // Module registry
    // ------------------------------------------------------------------

    /// Create a module and enter it into the registry.
    ///
    /// Panics if a module named `name` is already registered; that is a
    /// bug in the embedder, not a script failure.
    pub fn new_module(&mut self, name: &str) -> ObjectId {
        assert!(
            !self.modules.contains_key(name),
            "A module named '{}' already exists",
            name
        );
        let module = self.alloc(HeapObject::Module(ModuleObject::new(name)));
        self.modules.insert(name.to_string(), module);
        module
    }

    /// Look up a registered module by name.
    pub fn core_module(&self, name: &str) -> Option<ObjectId> {
        self.modules.get(name).copied()
    }

    /// Register a function on `module`.
    ///
    /// Panics if `name` collides with an existing function or global on
    /// that module (the namespace is flat).
    pub fn module_add_function(
        &mut self,
        module: ObjectId,
        name: &str,
        arity: i32,
        body: FnBody,
    ) -> ObjectId {
        if self.module_find_function(module, name).is_some() {
            panic!(
                "A function named '{}' already exists on module '{}'",
                name,
                self.heap.module(module).name
            );
        }
        if self.heap.module(module).find_global(name).is_some() {
            panic!(
                "A global variable named '{}' already exists on module '{}'",
                name,
                self.heap.module(module).name
            );
        }

        let fn_id = self.alloc(HeapObject::Function(FunctionObject::new(
            name,
            arity,
            Some(module),
            body,
        )));
        self.heap.module_mut(module).functions.push(fn_id);
        fn_id
    }

    /// Handle of the function named `name` on `module`, if any.
    pub fn module_find_function(&self, module: ObjectId, name: &str) -> Option<ObjectId> {
        self.heap
            .module(module)
            .functions
            .iter()
            .copied()
            .find(|&fn_id| self.heap.function(fn_id).name == name)
    }

    // ------------------------------------------------------------------
    // Type taxonomy
    // ------------------------------------------------------------------

    /// Display name of a value's type, as used in diagnostics.
    pub fn type_name(&self, value: Value) -> &'static str {
        match value {
            Value::Null => "Null",
            Value::Bool(_) => "Bool",
            Value::Num(_) => "Num",
            Value::Obj(id) => self.heap.get(id).kind().name(),
            Value::Undef => unreachable!("Undef never escapes containers"),
        }
    }

    /// Host-ABI type id of a value.
    pub fn type_id_of(&self, value: Value) -> TypeId {
        match value {
            Value::Null => TypeId::Null,
            Value::Bool(_) => TypeId::Bool,
            Value::Num(_) => TypeId::Number,
            Value::Obj(id) => TypeId::of_kind(self.heap.get(id).kind()),
            Value::Undef => unreachable!("Undef never escapes containers"),
        }
    }

    /// Whether `value` is a heap object of `kind`.
    pub fn is_obj_of_kind(&self, value: Value, kind: ObjectKind) -> bool {
        match value {
            Value::Obj(id) => self.heap.get(id).kind() == kind,
            _ => false,
        }
    }

    // ------------------------------------------------------------------
    // Hashing and equality
    // ------------------------------------------------------------------

    /// Content hash of a value, or `None` for non-hashable objects.
    ///
    /// Equal values hash equal; primitives are always hashable, objects
    /// iff their kind is in the hashable set.
    pub fn value_hash(&self, value: Value) -> Option<u32> {
        let mut hasher = FxHasher::default();
        match value {
            Value::Null => hasher.write_u8(0),
            Value::Bool(b) => {
                hasher.write_u8(1);
                hasher.write_u8(b as u8);
            }
            Value::Num(n) => {
                // Normalize -0.0 so equal numbers hash equal.
                let n = if n == 0.0 { 0.0 } else { n };
                hasher.write_u8(2);
                hasher.write_u64(n.to_bits());
            }
            Value::Obj(id) => match self.heap.get(id) {
                HeapObject::String(s) => return Some(s.hash()),
                HeapObject::Range(r) => {
                    hasher.write_u8(3);
                    hasher.write_u64(r.from.to_bits());
                    hasher.write_u64(r.to.to_bits());
                }
                _ => return None,
            },
            Value::Undef => unreachable!("Undef never escapes containers"),
        }
        let h = hasher.finish();
        Some((h ^ (h >> 32)) as u32)
    }

    /// Semantic equality used for map keys.
    ///
    /// Tag then payload: primitives by value, strings by content,
    /// ranges by endpoints, every other object by identity.
    pub fn value_eq(&self, a: Value, b: Value) -> bool {
        match (a, b) {
            (Value::Obj(x), Value::Obj(y)) => {
                if x == y {
                    return true;
                }
                match (self.heap.get(x), self.heap.get(y)) {
                    (HeapObject::String(s1), HeapObject::String(s2)) => {
                        s1.hash() == s2.hash() && s1.as_bytes() == s2.as_bytes()
                    }
                    (HeapObject::Range(r1), HeapObject::Range(r2)) => r1 == r2,
                    _ => false,
                }
            }
            _ => a == b,
        }
    }

    // ------------------------------------------------------------------
    // Map operations
    // ------------------------------------------------------------------

    /// Value stored under `key`, or `Undef` when absent.
    ///
    /// Callers must validate hashability first; an unhashable key is
    /// simply absent here.
    pub fn map_get(&self, map: ObjectId, key: Value) -> Value {
        let Some(hash) = self.value_hash(key) else {
            return Value::Undef;
        };
        match self.probe(self.heap.map(map), hash, |stored| {
            self.value_eq(stored, key)
        }) {
            Probe::Found(slot) => self.heap.map(map).entry(slot).value,
            _ => Value::Undef,
        }
    }

    /// Value stored under the string key `key`, or `Undef` when absent.
    ///
    /// Attribute access reads maps with unallocated names; this avoids
    /// building a temporary string object.
    pub fn map_get_str(&self, map: ObjectId, key: &str) -> Value {
        let hash = hash_bytes(key.as_bytes());
        match self.probe(self.heap.map(map), hash, |stored| match stored {
            Value::Obj(id) => match self.heap.get(id) {
                HeapObject::String(s) => s.as_bytes() == key.as_bytes(),
                _ => false,
            },
            _ => false,
        }) {
            Probe::Found(slot) => self.heap.map(map).entry(slot).value,
            _ => Value::Undef,
        }
    }

    /// Insert or overwrite `key` with `value`.
    ///
    /// Callers must validate hashability first.
    pub fn map_set(&mut self, map: ObjectId, key: Value, value: Value) {
        let hash = self
            .value_hash(key)
            .expect("map_set requires a hashable key");

        // Grow before probing so a vacant slot always exists.
        let (count, capacity) = {
            let m = self.heap.map(map);
            (m.len(), m.capacity())
        };
        if (count + 1) * 100 > capacity * MAP_MAX_LOAD_PERCENT {
            self.map_grow(map);
        }

        let slot = match self.probe(self.heap.map(map), hash, |stored| {
            self.value_eq(stored, key)
        }) {
            Probe::Found(slot) | Probe::Vacant(slot) => slot,
            Probe::NoStorage => unreachable!("map_grow left no storage"),
        };
        self.heap.map_mut(map).set_entry(slot, key, value);
    }

    /// Double the backing array and re-seat every live entry.
    fn map_grow(&mut self, map: ObjectId) {
        let old = self.heap.map(map);
        let new_capacity = (old.capacity() * 2).max(MAP_MIN_CAPACITY);
        let mut entries = vec![MapEntry::empty(); new_capacity].into_boxed_slice();
        let mut count = 0;

        for entry in old.entries() {
            if entry.key.is_undef() {
                continue;
            }
            let hash = self
                .value_hash(entry.key)
                .expect("stored map keys are hashable");
            let mut slot = hash as usize & (new_capacity - 1);
            while !entries[slot].key.is_undef() {
                slot = (slot + 1) & (new_capacity - 1);
            }
            entries[slot] = *entry;
            count += 1;
        }

        self.heap.map_mut(map).replace_storage(entries, count);
    }

    /// Linear probe for a key with the given hash.
    fn probe(&self, map: &MapObject, hash: u32, eq: impl Fn(Value) -> bool) -> Probe {
        let capacity = map.capacity();
        if capacity == 0 {
            return Probe::NoStorage;
        }
        let mut slot = hash as usize & (capacity - 1);
        loop {
            let entry = map.entry(slot);
            if entry.key.is_undef() {
                return Probe::Vacant(slot);
            }
            if eq(entry.key) {
                return Probe::Found(slot);
            }
            slot = (slot + 1) & (capacity - 1);
        }
    }
}
