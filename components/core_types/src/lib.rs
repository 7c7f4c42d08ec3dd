//! Core Rill value types and error handling.
//!
//! This crate provides the foundational types for the Rill virtual
//! machine: the tagged dynamic value, heap-object identity, the object
//! kind taxonomy, and the runtime error type.
//!
//! # Overview
//!
//! - [`Value`] - Tagged representation of Rill values
//! - [`ObjectId`] - Handle to a heap-allocated object
//! - [`ObjectKind`] - Discriminant of heap object types
//! - [`TypeId`] - Flattened type taxonomy used by the host ABI
//! - [`RuntimeError`] / [`RuntimeResult`] - Runtime failure reporting
//!
//! # Examples
//!
//! ```
//! use core_types::{RuntimeError, Value};
//!
//! // Create Rill values
//! let num = Value::Num(42.0);
//! assert!(num.is_truthy());
//! assert!(num.is_num());
//!
//! // Create an error
//! let error = RuntimeError::type_error("Number is not iterable.");
//! assert_eq!(error.message, "Number is not iterable.");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

mod error;
mod value;

pub use error::{ErrorKind, RuntimeError, RuntimeResult};
pub use value::{ObjectId, ObjectKind, TypeId, Value};
