//! Field entries.

use bitflags::bitflags;

use crate::TypeHash;

use super::AttributeRef;

bitflags! {
    /// Modifiers of a field declaration.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct FieldFlags: u8 {
        /// Declared `static`.
        const STATIC = 0x01;
        /// Publicly visible.
        const PUBLIC = 0x02;
        /// Cannot be assigned after initialization.
        const READ_ONLY = 0x04;
    }
}

/// A field declared on a type.
///
/// Property descriptors are published as `public static readonly` fields
/// named `<Name>Property`; their field type is a typed property container.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldEntry {
    /// Field name.
    pub name: String,
    /// Type that declares the field.
    pub declaring_type: TypeHash,
    /// Identity of the field (owner + name).
    pub field_hash: TypeHash,
    /// Storage type of the field.
    pub field_type: TypeHash,
    /// Declaration modifiers.
    pub flags: FieldFlags,
    /// Custom attributes on the field.
    pub attributes: Vec<AttributeRef>,
}

impl FieldEntry {
    /// Create a field entry.
    pub fn new(
        name: impl Into<String>,
        declaring_type: TypeHash,
        field_type: TypeHash,
        flags: FieldFlags,
    ) -> Self {
        let name = name.into();
        let field_hash = TypeHash::from_field(declaring_type, &name);
        Self {
            name,
            declaring_type,
            field_hash,
            field_type,
            flags,
            attributes: Vec::new(),
        }
    }

    /// Create a `public static readonly` field, the shape of a property descriptor.
    pub fn public_static(
        name: impl Into<String>,
        declaring_type: TypeHash,
        field_type: TypeHash,
    ) -> Self {
        Self::new(
            name,
            declaring_type,
            field_type,
            FieldFlags::PUBLIC | FieldFlags::STATIC | FieldFlags::READ_ONLY,
        )
    }

    /// Add an attribute.
    pub fn with_attribute(mut self, attribute: AttributeRef) -> Self {
        self.attributes.push(attribute);
        self
    }

    /// Whether the field is static.
    pub fn is_static(&self) -> bool {
        self.flags.contains(FieldFlags::STATIC)
    }

    /// Whether the field is publicly visible.
    pub fn is_public(&self) -> bool {
        self.flags.contains(FieldFlags::PUBLIC)
    }
}
