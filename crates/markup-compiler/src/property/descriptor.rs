//! Resolved property descriptors.

use std::rc::Rc;

use markup_core::{CompilationError, FieldEntry, MethodEntry, PropertyEntry, Span, TypeHash, TypeSystem};

/// A property whose descriptor is a public static `<Name>Property` field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldBackedProperty {
    /// Property name, without the field suffix.
    pub name: String,
    /// Type declaring the descriptor field.
    pub declaring_type: TypeHash,
    /// The descriptor field.
    pub field: FieldEntry,
    /// `T` recovered from the field's `Property<T>` ancestry.
    pub value_type: TypeHash,
    /// Storage type is a styled property.
    pub is_styled: bool,
    /// Storage type is an attached property.
    pub is_attached: bool,
    /// Bindings may be assigned through the binding variants.
    pub allows_binding_override: bool,
}

impl FieldBackedProperty {
    /// Declared type of the descriptor field.
    pub fn storage_type(&self) -> TypeHash {
        self.field.field_type
    }

    /// Styled and attached properties accept a priority.
    pub fn supports_priority(&self) -> bool {
        self.is_styled || self.is_attached
    }
}

/// An ordinary instance property with getter/setter accessors.
#[derive(Debug, Clone, PartialEq)]
pub struct ReflectionProperty {
    pub name: String,
    pub declaring_type: TypeHash,
    pub getter: Option<MethodEntry>,
    pub setters: Vec<MethodEntry>,
    /// Getter return type, else first parameter of the first setter.
    pub value_type: TypeHash,
}

impl ReflectionProperty {
    /// Build from a property declaration.
    ///
    /// Fails with [`CompilationError::MissingAccessor`] when no accessor
    /// reveals the value type.
    pub fn from_entry(
        types: &dyn TypeSystem,
        entry: &PropertyEntry,
        span: Span,
    ) -> Result<Self, CompilationError> {
        let value_type = entry
            .getter
            .as_ref()
            .and_then(|g| g.return_type)
            .or_else(|| entry.setters.first().and_then(|s| s.params.first().copied()))
            .ok_or_else(|| CompilationError::MissingAccessor {
                owner: types.type_name(entry.declaring_type),
                name: entry.name.clone(),
                span,
            })?;

        Ok(Self {
            name: entry.name.clone(),
            declaring_type: entry.declaring_type,
            getter: entry.getter.clone(),
            setters: entry.setters.clone(),
            value_type,
        })
    }
}

/// Membership in a named pseudo-class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassSelector {
    pub class_name: String,
}

/// The resolved form of a property reference.
///
/// The field-backed descriptor is reference counted: every setter variant
/// built for it shares it.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyDescriptor {
    FieldBacked(Rc<FieldBackedProperty>),
    ReflectionBacked(ReflectionProperty),
    ClassSelector(ClassSelector),
}

impl PropertyDescriptor {
    /// Property or class name.
    pub fn name(&self) -> &str {
        match self {
            PropertyDescriptor::FieldBacked(p) => &p.name,
            PropertyDescriptor::ReflectionBacked(p) => &p.name,
            PropertyDescriptor::ClassSelector(c) => &c.class_name,
        }
    }

    /// Declaring type; class selectors have none.
    pub fn declaring_type(&self) -> Option<TypeHash> {
        match self {
            PropertyDescriptor::FieldBacked(p) => Some(p.declaring_type),
            PropertyDescriptor::ReflectionBacked(p) => Some(p.declaring_type),
            PropertyDescriptor::ClassSelector(_) => None,
        }
    }

    /// Short kind label for diagnostics and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            PropertyDescriptor::FieldBacked(_) => "field",
            PropertyDescriptor::ReflectionBacked(_) => "reflection",
            PropertyDescriptor::ClassSelector(_) => "class",
        }
    }

    /// The field-backed descriptor, if this is one.
    pub fn as_field_backed(&self) -> Option<&Rc<FieldBackedProperty>> {
        match self {
            PropertyDescriptor::FieldBacked(p) => Some(p),
            _ => None,
        }
    }
}
