//! Heap object bodies.
//!
//! Every Rill heap object is one variant of [`HeapObject`], discriminated
//! by [`ObjectKind`]. Objects are owned by the [`Heap`](crate::heap::Heap)
//! arena and referenced through [`core_types::ObjectId`] handles.

use std::any::Any;
use std::borrow::Cow;
use std::cell::RefCell;
use std::hash::Hasher;
use std::mem;
use std::rc::Rc;

use core_types::{ObjectId, ObjectKind, RuntimeError, Value};
use rustc_hash::FxHasher;

/// A native callback registered by the host or the builtin library.
///
/// The callback reads its arguments from the current fiber's stack
/// (`ret[1..=argc]`) and either writes a return value into `ret[0]` or
/// sets the fiber's error slot. If it does neither, the pre-initialized
/// `Null` in the result slot is returned implicitly.
pub type NativeFn = fn(&mut crate::vm::Vm);

/// Fold a 64-bit hash down to the 32 bits cached on strings.
///
/// 32 bits keep every hash exactly representable as a Rill number.
fn fold_hash(h: u64) -> u32 {
    (h ^ (h >> 32)) as u32
}

/// Hash a byte buffer with the hasher the rest of the runtime uses.
pub(crate) fn hash_bytes(bytes: &[u8]) -> u32 {
    let mut hasher = FxHasher::default();
    hasher.write(bytes);
    fold_hash(hasher.finish())
}

/// An immutable byte string with a cached hash.
///
/// Strings are byte-indexed; Unicode-aware indexing is a non-goal of
/// the runtime. The hash is computed once at construction, so every
/// published string carries a hash consistent with its content.
#[derive(Debug, Clone)]
pub struct StringObject {
    data: Box<[u8]>,
    hash: u32,
}

impl StringObject {
    /// Create a string from raw bytes.
    pub fn new(bytes: impl Into<Box<[u8]>>) -> Self {
        let data = bytes.into();
        let hash = hash_bytes(&data);
        StringObject { data, hash }
    }

    /// Create a string from UTF-8 text.
    pub fn from_str(text: &str) -> Self {
        StringObject::new(text.as_bytes().to_vec())
    }

    /// The raw bytes of this string.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Length in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the string is empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The cached content hash.
    pub fn hash(&self) -> u32 {
        self.hash
    }

    /// Lossy UTF-8 view used for display and diagnostics.
    pub fn to_display(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.data)
    }
}

/// A dynamic ordered sequence of values.
#[derive(Debug, Clone, Default)]
pub struct ListObject {
    /// The elements, in order.
    pub elements: Vec<Value>,
}

impl ListObject {
    /// Create a list from its elements.
    pub fn new(elements: Vec<Value>) -> Self {
        ListObject { elements }
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Whether the list is empty.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

/// One slot of a map's backing array.
///
/// A slot with `key == Value::Undef` is empty.
#[derive(Debug, Clone, Copy)]
pub struct MapEntry {
    /// The slot's key, or `Undef` when the slot is empty.
    pub key: Value,
    /// The slot's value.
    pub value: Value,
}

impl MapEntry {
    /// An empty slot.
    pub fn empty() -> Self {
        MapEntry {
            key: Value::Undef,
            value: Value::Undef,
        }
    }
}

/// An open-addressed mapping from hashable values to values.
///
/// The backing array has power-of-two capacity and is probed linearly;
/// iteration yields keys in slot order, which is not a stable insertion
/// order. Key hashing and equality need heap access, so probing lives
/// on [`Vm`](crate::vm::Vm); this type only owns the slots.
#[derive(Debug, Clone, Default)]
pub struct MapObject {
    entries: Box<[MapEntry]>,
    count: usize,
}

impl MapObject {
    /// Create an empty map with no backing storage yet.
    pub fn new() -> Self {
        MapObject::default()
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.count
    }

    /// Whether the map has no entries.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Capacity of the backing slot array.
    pub fn capacity(&self) -> usize {
        self.entries.len()
    }

    /// The slot at `index` of the backing array.
    pub fn entry(&self, index: usize) -> &MapEntry {
        &self.entries[index]
    }

    pub(crate) fn entries(&self) -> &[MapEntry] {
        &self.entries
    }

    pub(crate) fn set_entry(&mut self, index: usize, key: Value, value: Value) {
        if self.entries[index].key.is_undef() {
            self.count += 1;
        }
        self.entries[index] = MapEntry { key, value };
    }

    pub(crate) fn replace_storage(&mut self, entries: Box<[MapEntry]>, count: usize) {
        self.entries = entries;
        self.count = count;
    }
}

/// A numeric range `from..to` with exclusive upper endpoint.
///
/// Direction is determined by the sign of `to - from`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeObject {
    /// Inclusive start.
    pub from: f64,
    /// Exclusive end.
    pub to: f64,
}

impl RangeObject {
    /// Create a range.
    pub fn new(from: f64, to: f64) -> Self {
        RangeObject { from, to }
    }
}

/// An opaque bytecode body owned by the external compiler.
#[derive(Debug, Clone, Default)]
pub struct Chunk {
    /// Encoded instructions.
    pub code: Vec<u8>,
    /// Constant pool referenced by the instructions.
    pub constants: Vec<Value>,
}

impl Chunk {
    /// Create an empty chunk.
    pub fn new() -> Self {
        Chunk::default()
    }
}

/// The body of a function: bytecode or a native callback.
#[derive(Clone)]
pub enum FnBody {
    /// A compiler-produced bytecode body.
    Bytecode(Chunk),
    /// A host-provided native callback.
    Native(NativeFn),
}

impl std::fmt::Debug for FnBody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FnBody::Bytecode(chunk) => f.debug_tuple("Bytecode").field(chunk).finish(),
            FnBody::Native(_) => write!(f, "Native(..)"),
        }
    }
}

/// A callable function.
#[derive(Debug, Clone)]
pub struct FunctionObject {
    /// Function name as it appears in its namespace.
    pub name: String,
    /// Fixed argument count, or `-1` for variadic.
    pub arity: i32,
    /// Owning module, if any (builtins have none).
    pub owner: Option<ObjectId>,
    /// Bytecode or native body.
    pub body: FnBody,
}

impl FunctionObject {
    /// Create a function.
    pub fn new(name: impl Into<String>, arity: i32, owner: Option<ObjectId>, body: FnBody) -> Self {
        FunctionObject {
            name: name.into(),
            arity,
            owner,
            body,
        }
    }

    /// Whether the body is a native callback.
    pub fn is_native(&self) -> bool {
        matches!(self.body, FnBody::Native(_))
    }
}

/// A named global variable slot on a module.
#[derive(Debug, Clone)]
pub struct Global {
    /// The global's name.
    pub name: String,
    /// The global's current value.
    pub value: Value,
}

/// A module: a named namespace of functions and global variables.
///
/// Functions and globals share one flat namespace; registration rejects
/// duplicates across both tables.
#[derive(Debug, Clone)]
pub struct ModuleObject {
    /// The module's name.
    pub name: String,
    /// Ordered function table. Function names live on the objects.
    pub functions: Vec<ObjectId>,
    /// Ordered global-variable table.
    pub globals: Vec<Global>,
}

impl ModuleObject {
    /// Create an empty module.
    pub fn new(name: impl Into<String>) -> Self {
        ModuleObject {
            name: name.into(),
            functions: Vec::new(),
            globals: Vec::new(),
        }
    }

    /// Index of the global named `name`, if any.
    pub fn find_global(&self, name: &str) -> Option<usize> {
        self.globals.iter().position(|g| g.name == name)
    }
}

/// A single execution stack.
///
/// The interpreter owns frame layout; this core reads `ret` (base of
/// the current native frame's result slot) and the error slot.
#[derive(Debug, Default)]
pub struct FiberObject {
    /// Operand stack. The stack top `sp` is `stack.len()`.
    pub stack: Vec<Value>,
    /// Base index of the current call frame's result slot.
    pub ret: usize,
    /// Error slot; non-empty means the current execution is failing.
    pub error: Option<RuntimeError>,
}

impl FiberObject {
    /// Create a fiber with an empty stack.
    pub fn new() -> Self {
        FiberObject::default()
    }

    /// Argument count of the current native frame.
    pub fn arg_count(&self) -> usize {
        self.stack.len() - self.ret - 1
    }

    /// The `i`-th argument (1-based) of the current native frame.
    pub fn arg(&self, i: usize) -> Value {
        self.stack[self.ret + i]
    }

    /// Write the current frame's return value.
    pub fn set_return(&mut self, value: Value) {
        let ret = self.ret;
        self.stack[ret] = value;
    }

    /// Record a failure in the error slot.
    pub fn set_error(&mut self, error: RuntimeError) {
        self.error = Some(error);
    }

    /// Whether the fiber is currently failing.
    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }
}

/// An opaque host-defined payload.
#[derive(Clone)]
pub struct UserObject {
    /// Host data; the runtime never looks inside.
    pub data: Rc<RefCell<dyn Any>>,
}

impl UserObject {
    /// Wrap a host payload.
    pub fn new(data: Rc<RefCell<dyn Any>>) -> Self {
        UserObject { data }
    }
}

impl std::fmt::Debug for UserObject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserObject").finish()
    }
}

/// One heap object of any kind.
#[derive(Debug)]
pub enum HeapObject {
    /// Immutable byte string.
    String(StringObject),
    /// Ordered value sequence.
    List(ListObject),
    /// Open-addressed map.
    Map(MapObject),
    /// Numeric range.
    Range(RangeObject),
    /// Callable function.
    Function(FunctionObject),
    /// Module namespace.
    Module(ModuleObject),
    /// Execution stack.
    Fiber(FiberObject),
    /// Opaque host payload.
    User(UserObject),
}

impl HeapObject {
    /// The kind tag of this object.
    pub fn kind(&self) -> ObjectKind {
        match self {
            HeapObject::String(_) => ObjectKind::String,
            HeapObject::List(_) => ObjectKind::List,
            HeapObject::Map(_) => ObjectKind::Map,
            HeapObject::Range(_) => ObjectKind::Range,
            HeapObject::Function(_) => ObjectKind::Function,
            HeapObject::Module(_) => ObjectKind::Module,
            HeapObject::Fiber(_) => ObjectKind::Fiber,
            HeapObject::User(_) => ObjectKind::User,
        }
    }

    /// Approximate owned size in bytes, for GC accounting.
    pub fn size_bytes(&self) -> usize {
        let payload = match self {
            HeapObject::String(s) => s.len(),
            HeapObject::List(l) => l.elements.capacity() * mem::size_of::<Value>(),
            HeapObject::Map(m) => m.capacity() * mem::size_of::<MapEntry>(),
            HeapObject::Range(_) => 0,
            HeapObject::Function(f) => {
                let chunk = match &f.body {
                    FnBody::Bytecode(c) => {
                        c.code.capacity() + c.constants.capacity() * mem::size_of::<Value>()
                    }
                    FnBody::Native(_) => 0,
                };
                f.name.capacity() + chunk
            }
            HeapObject::Module(m) => {
                m.name.capacity()
                    + m.functions.capacity() * mem::size_of::<ObjectId>()
                    + m.globals.capacity() * mem::size_of::<Global>()
                    + m.globals.iter().map(|g| g.name.capacity()).sum::<usize>()
            }
            HeapObject::Fiber(f) => f.stack.capacity() * mem::size_of::<Value>(),
            HeapObject::User(_) => 0,
        };
        mem::size_of::<HeapObject>() + payload
    }
}
