//! TypeRegistry - in-memory type system.
//!
//! # Storage Model
//!
//! - **Types**: every entry (plain types, generic definitions, generic
//!   parameters and closed instances) lives in one map keyed by `TypeHash`.
//! - **Names**: a secondary `QualifiedName -> TypeHash` index serves
//!   [`TypeSystem::resolve_type`]. Generic parameters are not indexed.
//!
//! # Generics
//!
//! A generic definition declares named parameters. Its base may be another
//! generic applied to those parameters; [`TypeRegistry::instantiate`]
//! substitutes the arguments and instantiates the whole base chain, so that
//! `StyledProperty<bool>` derives from `StyledPropertyBase<bool>`, which
//! derives from `Property<bool>`. Members stay on the definition.
//!
//! # Thread Safety
//!
//! The registry is populated single-threaded. Once built it is only read, and
//! since it owns plain data it can be shared behind an `Arc` by concurrent
//! document compilations.

use rustc_hash::FxHashMap;

use markup_core::{
    BaseRef, FieldEntry, MethodEntry, PropertyEntry, QualifiedName, RegistrationError, TypeEntry,
    TypeFlags, TypeHash, TypeSystem,
};

/// In-memory type registry.
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    /// All entries by hash.
    types: FxHashMap<TypeHash, TypeEntry>,
    /// Lookup index by qualified name.
    by_name: FxHashMap<QualifiedName, TypeHash>,
}

impl TypeRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the builtin scalar types registered:
    /// `object`, `string` (reference types) and `bool`, `int`, `double`.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for entry in [
            TypeEntry::class("object"),
            TypeEntry::class("string"),
            TypeEntry::value("bool"),
            TypeEntry::value("int"),
            TypeEntry::value("double"),
        ] {
            registry.insert(entry);
        }
        registry
    }

    /// Hash of parameter `param` of the generic definition named `definition`.
    ///
    /// Needed to write a definition's generic base before registering it.
    pub fn generic_param_hash(definition: &QualifiedName, param: &str) -> TypeHash {
        TypeHash::from_name(&format!("{definition}::{param}"))
    }

    /// Number of registered entries, including generic parameters and instances.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Whether a type with this hash exists.
    pub fn contains(&self, hash: TypeHash) -> bool {
        self.types.contains_key(&hash)
    }

    /// Get a mutable type entry.
    pub fn get_type_mut(&mut self, hash: TypeHash) -> Option<&mut TypeEntry> {
        self.types.get_mut(&hash)
    }

    // ==========================================================================
    // Registration
    // ==========================================================================

    /// Register a non-generic type.
    ///
    /// A generic base (`with_generic_base`) is instantiated on the spot.
    pub fn register_type(&mut self, mut entry: TypeEntry) -> Result<TypeHash, RegistrationError> {
        if self.by_name.contains_key(&entry.qualified_name) {
            return Err(RegistrationError::DuplicateType(
                entry.qualified_name.to_string(),
            ));
        }
        entry.base_type = self.resolve_base(entry.base.as_ref(), &entry.qualified_name)?;
        Ok(self.insert(entry))
    }

    /// Register a generic definition with the given parameter names.
    ///
    /// The entry's name should carry the arity suffix (`Property`1`). Its base
    /// may refer to parameters through [`TypeRegistry::generic_param_hash`];
    /// it is only resolved per instance.
    pub fn register_generic(
        &mut self,
        mut entry: TypeEntry,
        params: &[&str],
    ) -> Result<TypeHash, RegistrationError> {
        if self.by_name.contains_key(&entry.qualified_name) {
            return Err(RegistrationError::DuplicateType(
                entry.qualified_name.to_string(),
            ));
        }

        let mut param_namespace = entry.qualified_name.namespace.clone();
        param_namespace.push(entry.qualified_name.name.clone());

        entry.flags |= TypeFlags::GENERIC_DEFINITION;
        entry.base_type = None;
        entry.generic_params = Vec::with_capacity(params.len());
        for param in params {
            let param_entry = TypeEntry::new(
                QualifiedName::new(*param, param_namespace.clone()),
                TypeFlags::GENERIC_PARAM,
            );
            entry.generic_params.push(param_entry.type_hash);
            self.types.insert(param_entry.type_hash, param_entry);
        }

        Ok(self.insert(entry))
    }

    /// Add a field to a registered type.
    pub fn add_field(&mut self, owner: TypeHash, field: FieldEntry) -> Result<(), RegistrationError> {
        self.owner_mut(owner, &field.name)?.fields.push(field);
        Ok(())
    }

    /// Add an instance property to a registered type.
    pub fn add_property(
        &mut self,
        owner: TypeHash,
        property: PropertyEntry,
    ) -> Result<(), RegistrationError> {
        self.owner_mut(owner, &property.name)?.properties.push(property);
        Ok(())
    }

    /// Add a method to a registered type.
    pub fn add_method(&mut self, owner: TypeHash, method: MethodEntry) -> Result<(), RegistrationError> {
        self.owner_mut(owner, &method.name)?.methods.push(method);
        Ok(())
    }

    // ==========================================================================
    // Generic Instantiation
    // ==========================================================================

    /// Close a generic definition over `args`.
    ///
    /// Returns the cached instance when it already exists. The instance's
    /// base chain is instantiated with the same substitution.
    pub fn instantiate(
        &mut self,
        definition: TypeHash,
        args: &[TypeHash],
    ) -> Result<TypeHash, RegistrationError> {
        let def = self
            .types
            .get(&definition)
            .ok_or_else(|| RegistrationError::TypeNotFound(definition.to_string()))?;

        if !def.is_generic_definition() {
            return Err(RegistrationError::NotAGenericDefinition(
                def.qualified_name.to_string(),
            ));
        }
        if def.generic_params.len() != args.len() {
            return Err(RegistrationError::GenericArgCountMismatch {
                name: def.qualified_name.to_string(),
                expected: def.generic_params.len(),
                got: args.len(),
            });
        }
        if let Some(missing) = args.iter().find(|a| !self.types.contains_key(a)) {
            return Err(RegistrationError::TypeNotFound(missing.to_string()));
        }

        let hash = TypeHash::from_generic_instance(definition, args);
        if self.types.contains_key(&hash) {
            return Ok(hash);
        }

        let substitution: FxHashMap<TypeHash, TypeHash> = def
            .generic_params
            .iter()
            .copied()
            .zip(args.iter().copied())
            .collect();
        let declared_base = def.base.clone();
        let flags = def.flags - TypeFlags::GENERIC_DEFINITION;
        let namespace = def.qualified_name.namespace.clone();
        let stem = def.name.split('`').next().unwrap_or(&def.name).to_string();
        let arg_names: Vec<String> = args.iter().map(|a| self.type_name(*a)).collect();
        let display = format!("{stem}<{}>", arg_names.join(", "));

        let base_type = match declared_base {
            None => None,
            Some(BaseRef::Concrete(base)) => Some(base),
            Some(BaseRef::Generic {
                definition: base_def,
                args: base_args,
            }) => {
                let substituted: Vec<TypeHash> = base_args
                    .iter()
                    .map(|a| substitution.get(a).copied().unwrap_or(*a))
                    .collect();
                Some(self.instantiate(base_def, &substituted)?)
            }
        };

        let mut entry = TypeEntry::new(QualifiedName::new(display, namespace), flags);
        entry.type_hash = hash;
        entry.base = base_type.map(BaseRef::Concrete);
        entry.base_type = base_type;
        entry.generic_definition = Some(definition);
        entry.generic_args = args.to_vec();
        Ok(self.insert(entry))
    }

    // ==========================================================================
    // Internals
    // ==========================================================================

    fn insert(&mut self, entry: TypeEntry) -> TypeHash {
        let hash = entry.type_hash;
        if !entry.flags.contains(TypeFlags::GENERIC_PARAM) {
            self.by_name.insert(entry.qualified_name.clone(), hash);
        }
        self.types.insert(hash, entry);
        hash
    }

    fn resolve_base(
        &mut self,
        base: Option<&BaseRef>,
        owner: &QualifiedName,
    ) -> Result<Option<TypeHash>, RegistrationError> {
        match base {
            None => Ok(None),
            Some(BaseRef::Concrete(base)) if self.types.contains_key(base) => Ok(Some(*base)),
            Some(BaseRef::Concrete(base)) => Err(RegistrationError::TypeNotFound(format!(
                "base {base} of '{owner}'"
            ))),
            Some(BaseRef::Generic { definition, args }) => {
                self.instantiate(*definition, args).map(Some)
            }
        }
    }

    fn owner_mut(&mut self, owner: TypeHash, member: &str) -> Result<&mut TypeEntry, RegistrationError> {
        self.types
            .get_mut(&owner)
            .ok_or_else(|| RegistrationError::UnknownOwner {
                owner: owner.to_string(),
                member: member.to_string(),
            })
    }
}

impl TypeSystem for TypeRegistry {
    fn resolve_type(&self, name: &QualifiedName) -> Option<TypeHash> {
        self.by_name.get(name).copied()
    }

    fn get_type(&self, hash: TypeHash) -> Option<&TypeEntry> {
        self.types.get(&hash)
    }
}
