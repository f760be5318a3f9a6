//! Core types shared by the markup property compiler.
//!
//! - [`TypeHash`]: deterministic identity for types, fields and methods
//! - [`Span`]: source location inside a markup document
//! - [`QualifiedName`]: namespace-qualified lookup key
//! - [`entries`]: type, field, property and method records
//! - [`TypeSystem`]: the read-only type-system collaborator
//! - [`error`]: registration and compilation errors

pub mod entries;
pub mod error;
mod qualified_name;
mod span;
pub mod type_hash;
pub mod type_system;

pub use entries::{
    AttributeRef, BaseRef, FieldEntry, FieldFlags, MethodEntry, PropertyEntry, TypeEntry,
    TypeFlags,
};
pub use error::{CompilationError, MarkupError, RegistrationError};
pub use qualified_name::QualifiedName;
pub use span::Span;
pub use type_hash::TypeHash;
pub use type_system::{BaseChain, MAX_BASE_DEPTH, TypeSystem, base_chain};
