//! Deterministic hash-based identity for types, fields and methods.
//!
//! [`TypeHash`] is a 64-bit hash computed from a qualified name (and, for
//! members, the owner and signature). Because the hash only depends on names,
//! a reference can be hashed before the entity it names has been registered,
//! and two lookups of the same name always agree.
//!
//! # Hash Computation
//!
//! Uses XXHash64 with a domain constant per entity kind so that a type and a
//! field sharing a spelling never collide.
//!
//! # Examples
//!
//! ```
//! use markup_core::TypeHash;
//!
//! let control = TypeHash::from_name("Controls::Button");
//! assert_eq!(control, TypeHash::from_name("Controls::Button"));
//!
//! let field = TypeHash::from_field(control, "IsDefaultProperty");
//! assert_ne!(field, control);
//! ```

use std::fmt;
use xxhash_rust::xxh64::xxh64;

/// Domain-specific mixing constants for hash computation.
pub mod hash_constants {
    /// Separator constant used when folding ordered components.
    pub const SEP: u64 = 0x4bc94d6bd06053ad;

    /// Domain marker for type hashes
    pub const TYPE: u64 = 0x2fac10b63a6cc57c;

    /// Domain marker for static and instance field hashes
    pub const FIELD: u64 = 0x1a095090689d4647;

    /// Domain marker for method hashes
    pub const METHOD: u64 = 0x7d3c8b4a92e15f6d;

    /// Domain marker for instance property declarations
    pub const PROPERTY: u64 = 0x3e9f5d2a8c7b1403;

    /// Domain marker for generic method instantiations
    pub const GENERIC_METHOD: u64 = 0x9a7f3d5e2b8c4601;

    /// Position markers so that argument order changes the hash.
    pub const PARAM_MARKERS: [u64; 8] = [
        0x9e3779b97f4a7c15,
        0xbf58476d1ce4e5b9,
        0x94d049bb133111eb,
        0xd6e8feb86659fd93,
        0xe7037ed1a0b428db,
        0xc6a4a7935bd1e995,
        0x8648dbbc94d49b8d,
        0xa2b48b2c69e0d657,
    ];
}

/// A deterministic 64-bit hash identifying a type, field, property or method.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct TypeHash(pub u64);

impl TypeHash {
    /// Empty/invalid hash constant.
    pub const EMPTY: TypeHash = TypeHash(0);

    /// Create a type hash from a qualified type name (`"Ns::Name"`).
    #[inline]
    pub fn from_name(name: &str) -> Self {
        TypeHash(hash_constants::TYPE ^ xxh64(name.as_bytes(), 0))
    }

    /// Create a field hash from its declaring type and field name.
    #[inline]
    pub fn from_field(owner: TypeHash, name: &str) -> Self {
        TypeHash(hash_constants::FIELD ^ owner.0.rotate_left(17) ^ xxh64(name.as_bytes(), 0))
    }

    /// Create a property-declaration hash from its declaring type and name.
    #[inline]
    pub fn from_property(owner: TypeHash, name: &str) -> Self {
        TypeHash(hash_constants::PROPERTY ^ owner.0.rotate_left(23) ^ xxh64(name.as_bytes(), 0))
    }

    /// Create a method hash from owner type, method name and parameter types.
    ///
    /// Parameter order matters.
    #[inline]
    pub fn from_method(owner: TypeHash, name: &str, param_hashes: &[TypeHash]) -> Self {
        let seed = hash_constants::METHOD ^ owner.0 ^ xxh64(name.as_bytes(), 0);
        TypeHash(fold_ordered(seed, param_hashes))
    }

    /// Create a generic instance hash (e.g. `Property<bool>`) from the
    /// definition hash and ordered type arguments.
    ///
    /// ```
    /// use markup_core::TypeHash;
    ///
    /// let def = TypeHash::from_name("Property`1");
    /// let bool_hash = TypeHash::from_name("bool");
    /// let int_hash = TypeHash::from_name("int");
    /// assert_ne!(
    ///     TypeHash::from_generic_instance(def, &[bool_hash]),
    ///     TypeHash::from_generic_instance(def, &[int_hash]),
    /// );
    /// ```
    #[inline]
    pub fn from_generic_instance(definition: TypeHash, args: &[TypeHash]) -> Self {
        TypeHash(fold_ordered(definition.0, args))
    }

    /// Create the hash of a generic method instantiated with type arguments.
    #[inline]
    pub fn from_generic_method(method: TypeHash, type_args: &[TypeHash]) -> Self {
        TypeHash(fold_ordered(hash_constants::GENERIC_METHOD ^ method.0, type_args))
    }

    /// Check if this is an empty/invalid hash.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Get the underlying u64 value.
    #[inline]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

fn fold_ordered(seed: u64, parts: &[TypeHash]) -> u64 {
    let mut hash = seed;
    for (i, part) in parts.iter().enumerate() {
        let marker = hash_constants::PARAM_MARKERS
            .get(i)
            .copied()
            .unwrap_or_else(|| hash_constants::PARAM_MARKERS[0].wrapping_add(i as u64));
        // wrapping_mul keeps the fold non-commutative
        hash = hash.wrapping_mul(hash_constants::SEP).wrapping_add(marker ^ part.0);
    }
    hash
}

impl fmt::Debug for TypeHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeHash({:#018x})", self.0)
    }
}

impl fmt::Display for TypeHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#018x}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_name_is_deterministic() {
        assert_eq!(TypeHash::from_name("Button"), TypeHash::from_name("Button"));
        assert_ne!(TypeHash::from_name("Button"), TypeHash::from_name("button"));
    }

    #[test]
    fn domains_do_not_collide() {
        let owner = TypeHash::from_name("Button");
        let field = TypeHash::from_field(owner, "Content");
        let property = TypeHash::from_property(owner, "Content");
        let method = TypeHash::from_method(owner, "Content", &[]);
        assert_ne!(field, property);
        assert_ne!(field, method);
        assert_ne!(property, method);
    }

    #[test]
    fn generic_argument_order_matters() {
        let def = TypeHash::from_name("Pair`2");
        let a = TypeHash::from_name("int");
        let b = TypeHash::from_name("string");
        assert_ne!(
            TypeHash::from_generic_instance(def, &[a, b]),
            TypeHash::from_generic_instance(def, &[b, a])
        );
    }

    #[test]
    fn generic_method_differs_from_open_method() {
        let method = TypeHash::from_method(TypeHash::from_name("Obj"), "SetValue", &[]);
        let closed = TypeHash::from_generic_method(method, &[TypeHash::from_name("bool")]);
        assert_ne!(method, closed);
    }

    #[test]
    fn empty_hash() {
        assert!(TypeHash::EMPTY.is_empty());
        assert!(!TypeHash::from_name("x").is_empty());
    }
}
