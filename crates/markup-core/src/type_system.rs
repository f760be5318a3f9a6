//! The type-system collaborator consumed by the property compiler.
//!
//! The compiler never mutates type metadata; every method takes `&self`, so a
//! single implementation can serve many independent document compilations.
//! Implementors only need [`TypeSystem::resolve_type`] and
//! [`TypeSystem::get_type`]; the remaining queries are derived from entries.

use crate::{AttributeRef, FieldEntry, MethodEntry, PropertyEntry, QualifiedName, TypeEntry, TypeHash};

/// Upper bound on base-type hops, guards against malformed cyclic registries.
pub const MAX_BASE_DEPTH: usize = 256;

/// Read-only access to type metadata.
pub trait TypeSystem {
    /// Resolve a namespace-qualified name to a type.
    fn resolve_type(&self, name: &QualifiedName) -> Option<TypeHash>;

    /// Get the entry of a type.
    fn get_type(&self, hash: TypeHash) -> Option<&TypeEntry>;

    /// Display name of a type, falling back to the hash for unknown types.
    fn type_name(&self, hash: TypeHash) -> String {
        self.get_type(hash)
            .map(|t| t.qualified_name.to_string())
            .unwrap_or_else(|| hash.to_string())
    }

    /// Direct base type.
    fn base_type(&self, hash: TypeHash) -> Option<TypeHash> {
        self.get_type(hash).and_then(|t| t.base_type)
    }

    /// Generic definition a closed instance was created from.
    fn generic_definition(&self, hash: TypeHash) -> Option<TypeHash> {
        self.get_type(hash).and_then(|t| t.generic_definition)
    }

    /// Ordered generic arguments of a closed instance (empty otherwise).
    fn generic_arguments(&self, hash: TypeHash) -> &[TypeHash] {
        self.get_type(hash)
            .map(|t| t.generic_args.as_slice())
            .unwrap_or(&[])
    }

    /// Static fields declared on the type and its bases, most-derived first.
    fn static_fields(&self, hash: TypeHash) -> Vec<&FieldEntry> {
        let mut fields = Vec::new();
        let mut current = Some(hash);
        let mut steps = 0;
        while let Some(ty) = current.and_then(|h| self.get_type(h)) {
            fields.extend(ty.fields.iter().filter(|f| f.is_static()));
            steps += 1;
            if steps >= MAX_BASE_DEPTH {
                break;
            }
            current = ty.base_type;
        }
        fields
    }

    /// Find an instance property by name on the type or its bases.
    fn find_property(&self, hash: TypeHash, name: &str) -> Option<&PropertyEntry> {
        let mut current = Some(hash);
        let mut steps = 0;
        while let Some(ty) = current.and_then(|h| self.get_type(h)) {
            if let Some(property) = ty.find_property(name) {
                return Some(property);
            }
            steps += 1;
            if steps >= MAX_BASE_DEPTH {
                return None;
            }
            current = ty.base_type;
        }
        None
    }

    /// Find a method by name on the type or its bases.
    fn find_method(&self, hash: TypeHash, name: &str) -> Option<&MethodEntry> {
        let mut current = Some(hash);
        let mut steps = 0;
        while let Some(ty) = current.and_then(|h| self.get_type(h)) {
            if let Some(method) = ty.find_method(name) {
                return Some(method);
            }
            steps += 1;
            if steps >= MAX_BASE_DEPTH {
                return None;
            }
            current = ty.base_type;
        }
        None
    }

    /// Custom attributes of a property declaration.
    fn custom_attributes<'a>(&self, property: &'a PropertyEntry) -> &'a [AttributeRef] {
        &property.attributes
    }

    /// Whether values of the type accept null.
    fn accepts_null(&self, hash: TypeHash) -> bool {
        self.get_type(hash).is_some_and(|t| t.accepts_null())
    }

    /// Whether a value of `from` can be stored where `to` is expected.
    ///
    /// True when the types are equal or `to` appears in `from`'s base chain.
    fn is_assignable(&self, from: TypeHash, to: TypeHash) -> bool {
        let mut current = Some(from);
        let mut steps = 0;
        while let Some(ty) = current {
            if ty == to {
                return true;
            }
            steps += 1;
            if steps >= MAX_BASE_DEPTH {
                return false;
            }
            current = self.base_type(ty);
        }
        false
    }
}

/// Iterate `hash` followed by its base types, most-derived first.
pub fn base_chain(types: &dyn TypeSystem, hash: TypeHash) -> BaseChain<'_> {
    BaseChain {
        types,
        next: Some(hash),
        steps: 0,
    }
}

/// Iterator over a type and its bases, see [`base_chain`].
pub struct BaseChain<'a> {
    types: &'a dyn TypeSystem,
    next: Option<TypeHash>,
    steps: usize,
}

impl Iterator for BaseChain<'_> {
    type Item = TypeHash;

    fn next(&mut self) -> Option<TypeHash> {
        let current = self.next?;
        self.steps += 1;
        self.next = if self.steps >= MAX_BASE_DEPTH {
            None
        } else {
            self.types.base_type(current)
        };
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustc_hash::FxHashMap;

    #[derive(Default)]
    struct MapTypes {
        types: FxHashMap<TypeHash, TypeEntry>,
    }

    impl MapTypes {
        fn add(&mut self, entry: TypeEntry) -> TypeHash {
            let hash = entry.type_hash;
            self.types.insert(hash, entry);
            hash
        }
    }

    impl TypeSystem for MapTypes {
        fn resolve_type(&self, name: &QualifiedName) -> Option<TypeHash> {
            let hash = name.to_type_hash();
            self.types.contains_key(&hash).then_some(hash)
        }

        fn get_type(&self, hash: TypeHash) -> Option<&TypeEntry> {
            self.types.get(&hash)
        }
    }

    fn hierarchy() -> (MapTypes, TypeHash, TypeHash, TypeHash) {
        let mut types = MapTypes::default();
        let object = types.add(TypeEntry::class("Object"));
        let control = TypeEntry::class("Control").with_base(object);
        let control_hash = control.type_hash;
        let control = control
            .with_field(FieldEntry::public_static("WidthProperty", control_hash, object))
            .with_property(PropertyEntry::read_write("Width", control_hash, object));
        types.add(control);
        let button = TypeEntry::class("Button").with_base(control_hash);
        let button_hash = button.type_hash;
        let button =
            button.with_field(FieldEntry::public_static("ClickModeProperty", button_hash, object));
        types.add(button);
        (types, object, control_hash, button_hash)
    }

    #[test]
    fn base_chain_walks_to_root() {
        let (types, object, control, button) = hierarchy();
        let chain: Vec<_> = base_chain(&types, button).collect();
        assert_eq!(chain, vec![button, control, object]);
    }

    #[test]
    fn static_fields_include_inherited() {
        let (types, _, _, button) = hierarchy();
        let names: Vec<_> = types
            .static_fields(button)
            .iter()
            .map(|f| f.name.as_str())
            .collect();
        assert_eq!(names, vec!["ClickModeProperty", "WidthProperty"]);
    }

    #[test]
    fn find_property_searches_bases() {
        let (types, _, control, button) = hierarchy();
        let prop = types.find_property(button, "Width").unwrap();
        assert_eq!(prop.declaring_type, control);
        assert!(types.find_property(button, "Height").is_none());
    }

    #[test]
    fn assignability_follows_bases() {
        let (types, object, control, button) = hierarchy();
        assert!(types.is_assignable(button, object));
        assert!(types.is_assignable(button, button));
        assert!(!types.is_assignable(control, button));
    }

    #[test]
    fn unknown_type_name_falls_back_to_hash() {
        let (types, ..) = hierarchy();
        let missing = TypeHash::from_name("Missing");
        assert_eq!(types.type_name(missing), missing.to_string());
        assert!(!types.accepts_null(missing));
    }
}
