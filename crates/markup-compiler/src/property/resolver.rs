//! Name resolution: property reference to descriptor.
//!
//! Resolution order for `owner.name` (or a bare `name` against the owner
//! hint):
//!
//! 1. `Classes.name` with no namespace is a class selector; the owner is never
//!    looked up.
//! 2. A public static `<name>Property` field on the owner or its bases gives a
//!    field-backed descriptor. Its storage type must derive from the typed
//!    property family.
//! 3. An instance property `name` gives a reflection-backed descriptor.
//! 4. Anything else is unresolved.

use std::rc::Rc;

use markup_core::{CompilationError, FieldEntry, QualifiedName, Span, TypeHash, TypeSystem};
use tracing::debug;

use super::descriptor::{ClassSelector, FieldBackedProperty, PropertyDescriptor, ReflectionProperty};
use super::token::PropertyReference;
use super::value_type::extract_value_type;
use crate::known_types::{WellKnownNames, WellKnownTypes};

/// Resolves property references against a type system.
pub struct PropertyResolver<'a> {
    types: &'a dyn TypeSystem,
    known: &'a WellKnownTypes,
    names: &'a WellKnownNames,
}

impl<'a> PropertyResolver<'a> {
    pub fn new(types: &'a dyn TypeSystem, known: &'a WellKnownTypes, names: &'a WellKnownNames) -> Self {
        Self { types, known, names }
    }

    /// Resolve `reference`, using `owner_hint` when it names no owner.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn resolve(
        &self,
        owner_hint: TypeHash,
        reference: &PropertyReference,
        span: Span,
    ) -> Result<PropertyDescriptor, CompilationError> {
        let name = reference.name.as_str();

        if let Some(owner) = &reference.owner
            && reference.namespace.is_none()
            && !name.is_empty()
            && owner.eq_ignore_ascii_case(&self.names.class_selector_owner)
        {
            debug!(class = name, "resolved class selector");
            return Ok(PropertyDescriptor::ClassSelector(ClassSelector {
                class_name: name.to_string(),
            }));
        }

        let owner = match &reference.owner {
            Some(owner) => {
                let qualified = QualifiedName::from_markup(reference.namespace.as_deref(), owner);
                self.types
                    .resolve_type(&qualified)
                    .ok_or_else(|| CompilationError::UnknownType {
                        name: qualified.to_string(),
                        span,
                    })?
            }
            None => owner_hint,
        };

        if let Some(field) = find_descriptor_field(self.types, self.known, owner, name) {
            let property = self.field_backed(owner, name, field, span)?;
            debug!(
                owner = %self.types.type_name(owner),
                name,
                styled = property.is_styled,
                attached = property.is_attached,
                binding = property.allows_binding_override,
                "resolved field-backed property"
            );
            return Ok(PropertyDescriptor::FieldBacked(Rc::new(property)));
        }

        if let Some(entry) = self.types.find_property(owner, name) {
            let property = ReflectionProperty::from_entry(self.types, entry, span)?;
            debug!(owner = %self.types.type_name(owner), name, "resolved reflection property");
            return Ok(PropertyDescriptor::ReflectionBacked(property));
        }

        debug!(owner = %self.types.type_name(owner), name, "unresolved property");
        Err(CompilationError::UnresolvedProperty {
            owner: self.types.type_name(owner),
            name: name.to_string(),
            span,
        })
    }

    fn field_backed(
        &self,
        owner: TypeHash,
        name: &str,
        field: &FieldEntry,
        span: Span,
    ) -> Result<FieldBackedProperty, CompilationError> {
        let storage = field.field_type;
        let value_type = extract_value_type(self.types, storage, self.known.property_t, &field.name, span)?;

        let family = self.types.generic_definition(storage);
        let assign_binding = self.types.find_property(owner, name).is_some_and(|p| {
            self.types
                .custom_attributes(p)
                .iter()
                .any(|a| a.is(self.known.assign_binding_attribute))
        });

        Ok(FieldBackedProperty {
            name: name.to_string(),
            declaring_type: field.declaring_type,
            field: field.clone(),
            value_type,
            is_styled: family == Some(self.known.styled_property_t),
            is_attached: family == Some(self.known.attached_property_t),
            allows_binding_override: !assign_binding,
        })
    }
}

/// Public static `<name>Property` field of `owner` or one of its bases.
pub(crate) fn find_descriptor_field<'t>(
    types: &'t dyn TypeSystem,
    known: &WellKnownTypes,
    owner: TypeHash,
    name: &str,
) -> Option<&'t FieldEntry> {
    let field_name = format!("{name}{}", known.property_field_suffix);
    types
        .static_fields(owner)
        .into_iter()
        .find(|f| f.is_public() && f.name == field_name)
}
