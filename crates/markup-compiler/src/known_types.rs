//! Runtime types the emitted code calls into.
//!
//! [`WellKnownNames`] is configuration: the names under which the runtime's
//! property system is registered. [`WellKnownTypes`] is the same set looked
//! up once against a [`TypeSystem`], so resolution and emission never query
//! names again.

use markup_core::{CompilationError, FieldEntry, MethodEntry, QualifiedName, Span, TypeHash, TypeSystem};

/// Names of the runtime property system's types and members.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WellKnownNames {
    /// Non-generic base of every property descriptor.
    pub property_base: QualifiedName,
    /// Static field on `property_base` holding the unset sentinel.
    pub unset_value_field: String,
    /// Typed property family `Property<T>`.
    pub property_t: QualifiedName,
    /// Styled property family.
    pub styled_property_t: QualifiedName,
    /// Attached property family.
    pub attached_property_t: QualifiedName,
    /// Binding expression type.
    pub binding: QualifiedName,
    /// Priority enumeration.
    pub binding_priority: QualifiedName,
    /// Type of the unset sentinel.
    pub unset_value_type: QualifiedName,
    /// Runtime object exposing the setter entry points.
    pub property_object: QualifiedName,
    /// `property_object` method binding an expression to a property.
    pub bind_method: String,
    /// `property_object` method setting a boxed value with a priority.
    pub set_value_method: String,
    /// `property_object` generic method setting a styled value with a priority.
    pub set_styled_value_method: String,
    /// Type providing class-selector lookups.
    pub classes: QualifiedName,
    /// Static method on `classes` returning the pseudo-property of a class name.
    pub has_class_method: String,
    /// Attribute that disables binding variants on a property.
    pub assign_binding_attribute: QualifiedName,
    /// Root object type.
    pub object: QualifiedName,
    /// String type.
    pub string: QualifiedName,
    /// Boolean type.
    pub bool: QualifiedName,
    /// Integer type.
    pub int: QualifiedName,
    /// Suffix of descriptor fields (`Width` -> `WidthProperty`).
    pub property_field_suffix: String,
    /// Markup owner that introduces a class selector (`Classes.active`).
    pub class_selector_owner: String,
}

impl Default for WellKnownNames {
    fn default() -> Self {
        Self {
            property_base: QualifiedName::global("PropertyBase"),
            unset_value_field: "UnsetValue".into(),
            property_t: QualifiedName::global("Property`1"),
            styled_property_t: QualifiedName::global("StyledProperty`1"),
            attached_property_t: QualifiedName::global("AttachedProperty`1"),
            binding: QualifiedName::global("IBinding"),
            binding_priority: QualifiedName::global("BindingPriority"),
            unset_value_type: QualifiedName::global("UnsetValueType"),
            property_object: QualifiedName::global("PropertyObject"),
            bind_method: "Bind".into(),
            set_value_method: "SetValue".into(),
            set_styled_value_method: "SetStyledValue".into(),
            classes: QualifiedName::global("Classes"),
            has_class_method: "HasClass".into(),
            assign_binding_attribute: QualifiedName::global("AssignBindingAttribute"),
            object: QualifiedName::global("object"),
            string: QualifiedName::global("string"),
            bool: QualifiedName::global("bool"),
            int: QualifiedName::global("int"),
            property_field_suffix: "Property".into(),
            class_selector_owner: "Classes".into(),
        }
    }
}

/// Options handed to [`crate::PropertyCompiler::new`].
#[derive(Debug, Clone, Default)]
pub struct CompilerOptions {
    /// Runtime names.
    pub names: WellKnownNames,
    /// First local slot available for temporaries.
    pub local_slot_base: u32,
}

/// [`WellKnownNames`] resolved against a type system.
#[derive(Debug, Clone)]
pub struct WellKnownTypes {
    pub property_base: TypeHash,
    pub property_t: TypeHash,
    pub styled_property_t: TypeHash,
    pub attached_property_t: TypeHash,
    pub binding: TypeHash,
    pub binding_priority: TypeHash,
    pub unset_value_type: TypeHash,
    pub property_object: TypeHash,
    pub classes: TypeHash,
    pub assign_binding_attribute: TypeHash,
    pub object: TypeHash,
    pub string: TypeHash,
    pub bool: TypeHash,
    pub int: TypeHash,
    /// `Property<bool>`, the static type of class selectors.
    pub class_property: TypeHash,
    pub unset_value: FieldEntry,
    pub bind: MethodEntry,
    pub set_value: MethodEntry,
    pub set_styled_value: MethodEntry,
    pub has_class: MethodEntry,
    /// Suffix of descriptor fields.
    pub property_field_suffix: String,
}

impl WellKnownTypes {
    /// Look every runtime name up.
    ///
    /// Fails with [`CompilationError::UnknownType`] naming the first missing
    /// type or member.
    pub fn resolve(types: &dyn TypeSystem, names: &WellKnownNames) -> Result<Self, CompilationError> {
        let ty = |name: &QualifiedName| {
            types.resolve_type(name).ok_or_else(|| unknown(name.to_string()))
        };

        let property_base = ty(&names.property_base)?;
        let property_t = ty(&names.property_t)?;
        let property_object = ty(&names.property_object)?;
        let classes = ty(&names.classes)?;
        let bool_type = ty(&names.bool)?;

        let method = |owner: TypeHash, owner_name: &QualifiedName, name: &str| {
            types
                .find_method(owner, name)
                .cloned()
                .ok_or_else(|| unknown(format!("{owner_name}::{name}")))
        };

        let unset_value = types
            .static_fields(property_base)
            .into_iter()
            .find(|f| f.name == names.unset_value_field)
            .cloned()
            .ok_or_else(|| unknown(format!("{}::{}", names.property_base, names.unset_value_field)))?;

        let class_property = TypeHash::from_generic_instance(property_t, &[bool_type]);
        if types.get_type(class_property).is_none() {
            let stem = names.property_t.name.split('`').next().unwrap_or_default();
            return Err(unknown(format!("{stem}<{}>", names.bool)));
        }

        Ok(Self {
            property_base,
            property_t,
            styled_property_t: ty(&names.styled_property_t)?,
            attached_property_t: ty(&names.attached_property_t)?,
            binding: ty(&names.binding)?,
            binding_priority: ty(&names.binding_priority)?,
            unset_value_type: ty(&names.unset_value_type)?,
            property_object,
            classes,
            assign_binding_attribute: ty(&names.assign_binding_attribute)?,
            object: ty(&names.object)?,
            string: ty(&names.string)?,
            bool: bool_type,
            int: ty(&names.int)?,
            class_property,
            unset_value,
            bind: method(property_object, &names.property_object, &names.bind_method)?,
            set_value: method(property_object, &names.property_object, &names.set_value_method)?,
            set_styled_value: method(
                property_object,
                &names.property_object,
                &names.set_styled_value_method,
            )?,
            has_class: method(classes, &names.classes, &names.has_class_method)?,
            property_field_suffix: names.property_field_suffix.clone(),
        })
    }
}

fn unknown(name: String) -> CompilationError {
    CompilationError::UnknownType {
        name,
        span: Span::default(),
    }
}
