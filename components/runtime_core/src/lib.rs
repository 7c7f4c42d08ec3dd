//! Rill runtime core.
//!
//! This crate implements the value layer of the Rill virtual machine:
//! heap object bodies, the arena heap with temporary rooting and
//! mark-sweep collection, the [`Vm`] context, and the semantic engines
//! the bytecode interpreter dispatches into - arithmetic and comparison
//! operators, attribute and subscript access, and the iteration
//! protocol.
//!
//! The bytecode compiler and the interpreter loop are external
//! collaborators: they pull and push [`core_types::Value`]s on a fiber's
//! operand stack and call into this crate for every opcode that needs
//! semantic behavior.
//!
//! # Example
//!
//! ```
//! use core_types::Value;
//! use runtime_core::{operators, Vm};
//!
//! let mut vm = Vm::new();
//! let sum = operators::add(&mut vm, Value::Bool(true), Value::Num(2.5)).unwrap();
//! assert_eq!(sum, Value::Num(3.5));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod attrib;
pub mod heap;
pub mod iterate;
pub mod object;
pub mod operators;
pub mod render;
pub mod subscript;
pub mod validate;
pub mod vm;

pub use heap::Heap;
pub use object::{
    Chunk, FiberObject, FnBody, FunctionObject, Global, HeapObject, ListObject, MapEntry,
    MapObject, ModuleObject, NativeFn, RangeObject, StringObject, UserObject,
};
pub use vm::{Vm, VmConfig};
