//! Constant pool shared by every chunk compiled for one document.
//!
//! Stores values referenced by instructions: string literals, field and
//! method hashes, generic method instantiations and reflection handles.

use markup_core::TypeHash;
use rustc_hash::FxHashMap;

/// Values stored in the constant pool.
#[derive(Debug, Clone, PartialEq)]
pub enum Constant {
    /// Signed integer.
    Int(i64),
    /// Raw string literal bytes.
    StringData(Vec<u8>),
    /// Hash of a type, field or non-generic method.
    TypeHash(TypeHash),
    /// A generic method closed over type arguments.
    GenericMethod {
        /// Open method.
        method: TypeHash,
        /// Type arguments in order.
        type_args: Vec<TypeHash>,
    },
    /// Reflection handle for an instance property declaration.
    PropertyInfo(TypeHash),
}

/// Pool with deduplication.
#[derive(Debug, Clone, Default)]
pub struct ConstantPool {
    constants: Vec<Constant>,
    index: FxHashMap<ConstantKey, u32>,
}

/// Hashable mirror of [`Constant`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum ConstantKey {
    Int(i64),
    StringData(Vec<u8>),
    TypeHash(TypeHash),
    GenericMethod(TypeHash, Vec<TypeHash>),
    PropertyInfo(TypeHash),
}

impl ConstantPool {
    /// Create a new empty constant pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or get existing constant, returns index.
    pub fn add(&mut self, constant: Constant) -> u32 {
        let key = Self::to_key(&constant);

        if let Some(&idx) = self.index.get(&key) {
            return idx;
        }

        let idx = self.constants.len() as u32;
        self.constants.push(constant);
        self.index.insert(key, idx);
        idx
    }

    /// Add string data.
    pub fn add_string(&mut self, data: Vec<u8>) -> u32 {
        self.add(Constant::StringData(data))
    }

    /// Add a hash.
    pub fn add_type_hash(&mut self, hash: TypeHash) -> u32 {
        self.add(Constant::TypeHash(hash))
    }

    /// Add a generic method instantiation.
    pub fn add_generic_method(&mut self, method: TypeHash, type_args: Vec<TypeHash>) -> u32 {
        self.add(Constant::GenericMethod { method, type_args })
    }

    /// Get constant by index.
    pub fn get(&self, index: u32) -> Option<&Constant> {
        self.constants.get(index as usize)
    }

    /// Get all constants.
    pub fn constants(&self) -> &[Constant] {
        &self.constants
    }

    /// Number of constants.
    pub fn len(&self) -> usize {
        self.constants.len()
    }

    /// Check if the pool is empty.
    pub fn is_empty(&self) -> bool {
        self.constants.is_empty()
    }

    fn to_key(constant: &Constant) -> ConstantKey {
        match constant {
            Constant::Int(v) => ConstantKey::Int(*v),
            Constant::StringData(b) => ConstantKey::StringData(b.clone()),
            Constant::TypeHash(h) => ConstantKey::TypeHash(*h),
            Constant::GenericMethod { method, type_args } => {
                ConstantKey::GenericMethod(*method, type_args.clone())
            }
            Constant::PropertyInfo(h) => ConstantKey::PropertyInfo(*h),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_pool_is_empty() {
        let pool = ConstantPool::new();
        assert!(pool.is_empty());
        assert_eq!(pool.get(0), None);
    }

    #[test]
    fn deduplication() {
        let mut pool = ConstantPool::new();
        let a = pool.add_string(b"active".to_vec());
        let b = pool.add_type_hash(TypeHash::from_name("Button"));
        let c = pool.add_string(b"active".to_vec());

        assert_eq!(a, 0);
        assert_eq!(b, 1);
        assert_eq!(c, 0);
        assert_eq!(pool.len(), 2);
    }

    #[test]
    fn generic_method_keyed_by_arguments() {
        let mut pool = ConstantPool::new();
        let method = TypeHash::from_name("SetValue");
        let bool_hash = TypeHash::from_name("bool");
        let int_hash = TypeHash::from_name("int");

        let a = pool.add_generic_method(method, vec![bool_hash]);
        let b = pool.add_generic_method(method, vec![int_hash]);
        let c = pool.add_generic_method(method, vec![bool_hash]);

        assert_ne!(a, b);
        assert_eq!(a, c);
        assert_eq!(
            pool.get(b),
            Some(&Constant::GenericMethod {
                method,
                type_args: vec![int_hash]
            })
        );
    }

    #[test]
    fn property_info_distinct_from_hash() {
        let mut pool = ConstantPool::new();
        let hash = TypeHash::from_name("Width");
        let a = pool.add_type_hash(hash);
        let b = pool.add(Constant::PropertyInfo(hash));
        assert_ne!(a, b);
        assert_eq!(pool.constants().len(), 2);
    }
}
