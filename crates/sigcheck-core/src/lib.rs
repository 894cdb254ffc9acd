//! # sigcheck-core — Runtime Value Model
//!
//! The values that flow across a checked call boundary and the type tags
//! schemas refer to. Every other crate in the workspace depends on
//! `sigcheck-core`; it depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Lists and tuples are distinct kinds.** A schema for a tuple never
//!    accepts a list, even with matching elements.
//!
//! 2. **Instance checks honour subtyping.** `bool` is an `int`, a derived
//!    class is an instance of its parents, and everything is an `object`.
//!
//! 3. **One rendering path for diagnostics.** [`Value::repr`] and the
//!    `Display` of [`ValueType`] are the only text that failure messages
//!    embed for values and types.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `sigcheck-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod error;
pub mod types;
pub mod value;

pub use error::CoreError;
pub use types::{Class, ClassRef, TypeRegistry, ValueType};
pub use value::{Object, Value};
