//! Type entries: plain types, generic definitions and generic instances.

use bitflags::bitflags;

use crate::{QualifiedName, TypeHash};

use super::{FieldEntry, MethodEntry, PropertyEntry};

bitflags! {
    /// Kind and modifiers of a type.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct TypeFlags: u8 {
        /// Reference type; variables of this type accept null.
        const REFERENCE = 0x01;
        /// Enumeration.
        const ENUM = 0x02;
        /// Open generic definition such as `Property<T>`.
        const GENERIC_DEFINITION = 0x04;
        /// Generic type parameter (`T` of a definition).
        const GENERIC_PARAM = 0x08;
        /// Cannot be instantiated directly.
        const ABSTRACT = 0x10;
    }
}

/// Declared base of a type.
///
/// A generic definition may derive from another generic over its own
/// parameters (`StyledProperty<T> : StyledPropertyBase<T>`); the arguments are
/// then parameter hashes that get substituted on instantiation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BaseRef {
    /// A closed, already registered type.
    Concrete(TypeHash),
    /// A generic definition applied to arguments (parameters or closed types).
    Generic {
        /// Definition being applied.
        definition: TypeHash,
        /// Arguments in order.
        args: Vec<TypeHash>,
    },
}

/// A registered type.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeEntry {
    /// Unqualified name; generic definitions carry an arity suffix (`Property`1`).
    pub name: String,
    /// Namespace-qualified name used for lookup.
    pub qualified_name: QualifiedName,
    /// Identity.
    pub type_hash: TypeHash,
    /// Kind and modifiers.
    pub flags: TypeFlags,
    /// Declared base, as written.
    pub base: Option<BaseRef>,
    /// Resolved base type. `None` on generic definitions and root types.
    pub base_type: Option<TypeHash>,
    /// Parameter hashes of a generic definition.
    pub generic_params: Vec<TypeHash>,
    /// Definition this type was instantiated from.
    pub generic_definition: Option<TypeHash>,
    /// Arguments of a generic instance.
    pub generic_args: Vec<TypeHash>,
    /// Declared fields.
    pub fields: Vec<FieldEntry>,
    /// Declared instance properties.
    pub properties: Vec<PropertyEntry>,
    /// Declared methods.
    pub methods: Vec<MethodEntry>,
}

impl TypeEntry {
    /// Create a type entry.
    pub fn new(qualified_name: QualifiedName, flags: TypeFlags) -> Self {
        let type_hash = qualified_name.to_type_hash();
        Self {
            name: qualified_name.name.clone(),
            qualified_name,
            type_hash,
            flags,
            base: None,
            base_type: None,
            generic_params: Vec::new(),
            generic_definition: None,
            generic_args: Vec::new(),
            fields: Vec::new(),
            properties: Vec::new(),
            methods: Vec::new(),
        }
    }

    /// Create a reference type in the global namespace.
    pub fn class(name: impl Into<String>) -> Self {
        Self::new(QualifiedName::global(name), TypeFlags::REFERENCE)
    }

    /// Create a value type in the global namespace.
    pub fn value(name: impl Into<String>) -> Self {
        Self::new(QualifiedName::global(name), TypeFlags::empty())
    }

    // === Builder Methods ===

    /// Derive from a closed type.
    pub fn with_base(mut self, base: TypeHash) -> Self {
        self.base = Some(BaseRef::Concrete(base));
        self.base_type = Some(base);
        self
    }

    /// Derive from a generic definition applied to `args`.
    pub fn with_generic_base(mut self, definition: TypeHash, args: Vec<TypeHash>) -> Self {
        self.base = Some(BaseRef::Generic { definition, args });
        self.base_type = None;
        self
    }

    /// Add a field.
    pub fn with_field(mut self, field: FieldEntry) -> Self {
        self.fields.push(field);
        self
    }

    /// Add an instance property.
    pub fn with_property(mut self, property: PropertyEntry) -> Self {
        self.properties.push(property);
        self
    }

    /// Add a method.
    pub fn with_method(mut self, method: MethodEntry) -> Self {
        self.methods.push(method);
        self
    }

    // === Queries ===

    /// Whether this is an open generic definition.
    pub fn is_generic_definition(&self) -> bool {
        self.flags.contains(TypeFlags::GENERIC_DEFINITION)
    }

    /// Whether this is a closed generic instance.
    pub fn is_generic_instance(&self) -> bool {
        self.generic_definition.is_some()
    }

    /// Whether values of this type accept null.
    pub fn accepts_null(&self) -> bool {
        self.flags.contains(TypeFlags::REFERENCE)
    }

    /// Find a declared field by name (this type only).
    pub fn find_field(&self, name: &str) -> Option<&FieldEntry> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Find a declared property by name (this type only).
    pub fn find_property(&self, name: &str) -> Option<&PropertyEntry> {
        self.properties.iter().find(|p| p.name == name)
    }

    /// Find a declared method by name (this type only, first overload).
    pub fn find_method(&self, name: &str) -> Option<&MethodEntry> {
        self.methods.iter().find(|m| m.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn class_is_reference() {
        let entry = TypeEntry::class("Button");
        assert!(entry.accepts_null());
        assert_eq!(entry.type_hash, TypeHash::from_name("Button"));
    }

    #[test]
    fn value_type_rejects_null() {
        assert!(!TypeEntry::value("bool").accepts_null());
    }

    #[test]
    fn generic_base_clears_resolved_base() {
        let def = TypeHash::from_name("Property`1");
        let entry = TypeEntry::class("Thing")
            .with_base(TypeHash::from_name("Object"))
            .with_generic_base(def, vec![TypeHash::from_name("bool")]);
        assert!(entry.base_type.is_none());
        assert!(matches!(entry.base, Some(BaseRef::Generic { .. })));
    }

    #[test]
    fn member_lookup() {
        let owner = TypeHash::from_name("Button");
        let entry = TypeEntry::class("Button")
            .with_field(FieldEntry::public_static("ClickModeProperty", owner, owner))
            .with_property(PropertyEntry::new("ClickMode", owner))
            .with_method(MethodEntry::instance("Focus", owner, vec![], None));
        assert!(entry.find_field("ClickModeProperty").is_some());
        assert!(entry.find_property("ClickMode").is_some());
        assert!(entry.find_method("Focus").is_some());
        assert!(entry.find_field("ClickMode").is_none());
    }
}
