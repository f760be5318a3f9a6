//! Markup type registry.
//!
//! [`TypeRegistry`] is an in-memory implementation of
//! [`markup_core::TypeSystem`]: it stores plain types, generic definitions and
//! their closed instances, and answers the read-only queries the property
//! compiler makes while resolving references.

mod registry;

pub use registry::TypeRegistry;

// Re-export the entry types callers need to populate a registry
pub use markup_core::{
    AttributeRef, BaseRef, FieldEntry, FieldFlags, MethodEntry, PropertyEntry, QualifiedName,
    RegistrationError, TypeEntry, TypeFlags, TypeHash, TypeSystem,
};
