//! Interop Type Descriptors
//!
//! This crate provides the inputs the marshalling model is built from:
//!
//! - [`ManagedTypeInfo`]: an immutable, name-identified description of a
//!   managed or unmanaged type (primitive keywords, reference types, value
//!   types, pointers, arrays, type parameters, delegates).
//! - [`TypePositionInfo`]: a reference to one parameter or the return value of
//!   a signature, located by its managed-side and unmanaged-side index.
//!
//! ## Value Semantics
//!
//! Neither type holds a handle into a symbol table. Both are compared and
//! hashed by value so that everything built on top of them can be cached and
//! reused across incremental generation passes.

pub mod managed_type;
pub mod position;

pub use managed_type::{ManagedTypeInfo, ManagedTypeKind, SpecialType};
pub use position::{PositionKey, RefKind, SignatureIndex, TypePositionInfo};
