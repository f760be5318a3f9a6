use crate::TypeHash;

/// A method declared on a type.
///
/// Generic methods (`generic_param_count > 0`) are called through a
/// generic instantiation, see [`TypeHash::from_generic_method`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodEntry {
    /// Method name.
    pub name: String,
    /// Declaring type.
    pub owner: TypeHash,
    /// Identity of the method (owner + name + parameters).
    pub method_hash: TypeHash,
    /// Parameter types, not counting the instance.
    pub params: Vec<TypeHash>,
    /// Return type, `None` for void.
    pub return_type: Option<TypeHash>,
    /// Static methods take no instance.
    pub is_static: bool,
    /// Number of generic type parameters.
    pub generic_param_count: u8,
}

impl MethodEntry {
    /// Create an instance method.
    pub fn instance(
        name: impl Into<String>,
        owner: TypeHash,
        params: Vec<TypeHash>,
        return_type: Option<TypeHash>,
    ) -> Self {
        let name = name.into();
        let method_hash = TypeHash::from_method(owner, &name, &params);
        Self {
            name,
            owner,
            method_hash,
            params,
            return_type,
            is_static: false,
            generic_param_count: 0,
        }
    }

    /// Create a static method.
    pub fn static_method(
        name: impl Into<String>,
        owner: TypeHash,
        params: Vec<TypeHash>,
        return_type: Option<TypeHash>,
    ) -> Self {
        Self {
            is_static: true,
            ..Self::instance(name, owner, params, return_type)
        }
    }

    /// Mark as generic over `count` type parameters.
    pub fn generic(mut self, count: u8) -> Self {
        self.generic_param_count = count;
        self
    }

    /// Whether the method is generic.
    pub fn is_generic(&self) -> bool {
        self.generic_param_count > 0
    }

    /// Whether the call leaves a value on the stack.
    pub fn returns_value(&self) -> bool {
        self.return_type.is_some()
    }
}
