//! Registry entry types.
//!
//! These are the read-only records a [`TypeSystem`](crate::TypeSystem) hands
//! out to the property compiler:
//!
//! - [`TypeEntry`] - a type, generic definition or generic instance
//! - [`FieldEntry`] - a field, usually a static property-descriptor field
//! - [`PropertyEntry`] - an instance property with getter/setter methods
//! - [`MethodEntry`] - a method, possibly generic
//! - [`AttributeRef`] - a custom attribute attached to a declaration

mod attribute;
mod field;
mod method;
mod property;
mod type_entry;

pub use attribute::AttributeRef;
pub use field::{FieldEntry, FieldFlags};
pub use method::MethodEntry;
pub use property::PropertyEntry;
pub use type_entry::{BaseRef, TypeEntry, TypeFlags};
