//! Registration of the runtime property system into a [`TypeRegistry`].
//!
//! Installs every type the emitted code calls into under the names of a
//! [`WellKnownNames`]:
//!
//! ```text
//! PropertyBase                          static UnsetValue: UnsetValueType
//! └── Property<T>
//!     ├── StyledPropertyBase<T>
//!     │   └── StyledProperty<T>
//!     │       └── AttachedProperty<T>
//!     └── DirectPropertyBase<T>
//!         └── DirectProperty<TOwner, TValue>
//!
//! PropertyObject   Bind, SetValue, SetStyledValue<T>
//! Classes          static HasClass(string) -> Property<bool>
//! ```
//!
//! Types already present (the builtin scalars) are reused.

use markup_core::{
    FieldEntry, MethodEntry, QualifiedName, RegistrationError, TypeEntry, TypeFlags, TypeHash,
    TypeSystem,
};
use markup_registry::TypeRegistry;

use crate::known_types::WellKnownNames;

/// Register the runtime property system.
pub fn register_runtime(
    registry: &mut TypeRegistry,
    names: &WellKnownNames,
) -> Result<(), RegistrationError> {
    let object = ensure(registry, &names.object, TypeFlags::REFERENCE)?;
    let string = ensure(registry, &names.string, TypeFlags::REFERENCE)?;
    let bool_type = ensure(registry, &names.bool, TypeFlags::empty())?;
    ensure(registry, &names.int, TypeFlags::empty())?;

    let unset_value_type = ensure(registry, &names.unset_value_type, TypeFlags::REFERENCE)?;
    let binding = ensure(
        registry,
        &names.binding,
        TypeFlags::REFERENCE | TypeFlags::ABSTRACT,
    )?;
    let priority = ensure(registry, &names.binding_priority, TypeFlags::ENUM)?;
    ensure(registry, &names.assign_binding_attribute, TypeFlags::REFERENCE)?;

    // Descriptor families
    let property_base = registry.register_type(
        TypeEntry::new(
            names.property_base.clone(),
            TypeFlags::REFERENCE | TypeFlags::ABSTRACT,
        )
        .with_base(object),
    )?;
    registry.add_field(
        property_base,
        FieldEntry::public_static(&names.unset_value_field, property_base, unset_value_type),
    )?;

    let property_t = registry.register_generic(
        TypeEntry::new(names.property_t.clone(), TypeFlags::REFERENCE | TypeFlags::ABSTRACT)
            .with_base(property_base),
        &["T"],
    )?;
    let styled_base_t = derive_generic(
        registry,
        sibling(&names.styled_property_t, "StyledPropertyBase`1"),
        property_t,
        TypeFlags::ABSTRACT,
    )?;
    let styled_t = derive_generic(
        registry,
        names.styled_property_t.clone(),
        styled_base_t,
        TypeFlags::empty(),
    )?;
    derive_generic(
        registry,
        names.attached_property_t.clone(),
        styled_t,
        TypeFlags::empty(),
    )?;
    let direct_base_t = derive_generic(
        registry,
        sibling(&names.property_t, "DirectPropertyBase`1"),
        property_t,
        TypeFlags::ABSTRACT,
    )?;

    // DirectProperty<TOwner, TValue> : DirectPropertyBase<TValue>
    let direct_name = sibling(&names.property_t, "DirectProperty`2");
    let value_param = TypeRegistry::generic_param_hash(&direct_name, "TValue");
    registry.register_generic(
        TypeEntry::new(direct_name, TypeFlags::REFERENCE)
            .with_generic_base(direct_base_t, vec![value_param]),
        &["TOwner", "TValue"],
    )?;

    let class_property = registry.instantiate(property_t, &[bool_type])?;

    // Setter entry points
    let property_object = ensure(registry, &names.property_object, TypeFlags::REFERENCE)?;
    for method in [
        MethodEntry::instance(
            &names.bind_method,
            property_object,
            vec![property_base, binding, object],
            Some(object),
        ),
        MethodEntry::instance(
            &names.set_value_method,
            property_object,
            vec![property_base, object, priority],
            Some(object),
        ),
        MethodEntry::instance(
            &names.set_styled_value_method,
            property_object,
            vec![property_base, object, priority],
            Some(object),
        )
        .generic(1),
    ] {
        registry.add_method(property_object, method)?;
    }

    let classes = ensure(registry, &names.classes, TypeFlags::REFERENCE | TypeFlags::ABSTRACT)?;
    registry.add_method(
        classes,
        MethodEntry::static_method(
            &names.has_class_method,
            classes,
            vec![string],
            Some(class_property),
        ),
    )?;

    Ok(())
}

/// Resolve `name`, registering it with `flags` when absent.
fn ensure(
    registry: &mut TypeRegistry,
    name: &QualifiedName,
    flags: TypeFlags,
) -> Result<TypeHash, RegistrationError> {
    match registry.resolve_type(name) {
        Some(hash) => Ok(hash),
        None => registry.register_type(TypeEntry::new(name.clone(), flags)),
    }
}

/// Register `name<T> : base<T>`.
fn derive_generic(
    registry: &mut TypeRegistry,
    name: QualifiedName,
    base: TypeHash,
    extra: TypeFlags,
) -> Result<TypeHash, RegistrationError> {
    let param = TypeRegistry::generic_param_hash(&name, "T");
    registry.register_generic(
        TypeEntry::new(name, TypeFlags::REFERENCE | extra).with_generic_base(base, vec![param]),
        &["T"],
    )
}

/// `name` in the namespace of `anchor`.
fn sibling(anchor: &QualifiedName, name: &str) -> QualifiedName {
    QualifiedName::new(name, anchor.namespace.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use markup_core::base_chain;

    fn runtime() -> (TypeRegistry, WellKnownNames) {
        let names = WellKnownNames::default();
        let mut registry = TypeRegistry::with_builtins();
        register_runtime(&mut registry, &names).unwrap();
        (registry, names)
    }

    #[test]
    fn attached_property_chain_reaches_property_base() {
        let (mut registry, names) = runtime();
        let attached = registry.resolve_type(&names.attached_property_t).unwrap();
        let bool_type = registry.resolve_type(&names.bool).unwrap();
        let instance = registry.instantiate(attached, &[bool_type]).unwrap();

        let chain: Vec<String> = base_chain(&registry, instance)
            .map(|h| registry.type_name(h))
            .collect();
        assert_eq!(
            chain,
            vec![
                "AttachedProperty<bool>",
                "StyledProperty<bool>",
                "StyledPropertyBase<bool>",
                "Property<bool>",
                "PropertyBase",
                "object"
            ]
        );
    }

    #[test]
    fn direct_property_uses_value_argument() {
        let (mut registry, names) = runtime();
        let direct = registry
            .resolve_type(&QualifiedName::global("DirectProperty`2"))
            .unwrap();
        let owner = registry.register_type(TypeEntry::class("Slider")).unwrap();
        let int = registry.resolve_type(&names.int).unwrap();
        let instance = registry.instantiate(direct, &[owner, int]).unwrap();

        let direct_base = registry.base_type(instance).unwrap();
        assert_eq!(registry.generic_arguments(direct_base), &[int]);
        let property = registry.base_type(direct_base).unwrap();
        assert_eq!(registry.type_name(property), "Property<int>");
    }

    #[test]
    fn setter_entry_points_registered() {
        let (registry, names) = runtime();
        let object = registry.resolve_type(&names.property_object).unwrap();
        let bind = registry.find_method(object, "Bind").unwrap();
        assert_eq!(bind.params.len(), 3);
        assert!(bind.returns_value());
        let styled = registry.find_method(object, "SetStyledValue").unwrap();
        assert!(styled.is_generic());
        assert!(styled.returns_value());
        assert!(registry.find_method(object, "SetDirectValue").is_none());
    }

    #[test]
    fn registering_twice_is_rejected() {
        let (mut registry, names) = runtime();
        let err = register_runtime(&mut registry, &names).unwrap_err();
        assert!(matches!(err, RegistrationError::DuplicateType(_)));
    }
}
