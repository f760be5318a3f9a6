use std::fmt;

/// Namespace-qualified type name used as the lookup key for types.
///
/// # Examples
///
/// ```
/// use markup_core::QualifiedName;
///
/// let button = QualifiedName::global("Button");
/// assert_eq!(button.to_string(), "Button");
///
/// let styled = QualifiedName::new("Button", vec!["Controls".into()]);
/// assert_eq!(styled.to_string(), "Controls::Button");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QualifiedName {
    /// Simple name (e.g., "Button", "StyledProperty`1")
    pub name: String,
    /// Namespace path, empty for the global namespace
    pub namespace: Vec<String>,
}

impl QualifiedName {
    /// Create a new qualified name with namespace.
    pub fn new(name: impl Into<String>, namespace: Vec<String>) -> Self {
        Self {
            name: name.into(),
            namespace,
        }
    }

    /// Create a qualified name in the global namespace.
    pub fn global(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: Vec::new(),
        }
    }

    /// Build the lookup key for a type referenced from markup as
    /// `prefix:Owner` (or just `Owner` when no prefix was written).
    pub fn from_markup(prefix: Option<&str>, owner: &str) -> Self {
        match prefix {
            Some(ns) if !ns.is_empty() => Self::new(owner, vec![ns.to_string()]),
            _ => Self::global(owner),
        }
    }

    /// Create from a qualified string (e.g., "Controls::Button").
    ///
    /// Splits on "::"; a leading "::" is ignored.
    pub fn from_qualified_string(s: &str) -> Self {
        let mut parts: Vec<&str> = s.split("::").filter(|p| !p.is_empty()).collect();
        match parts.pop() {
            None => Self::global(""),
            Some(name) => Self::new(name, parts.into_iter().map(str::to_string).collect()),
        }
    }

    /// Check if this is in the global namespace.
    pub fn is_global(&self) -> bool {
        self.namespace.is_empty()
    }

    /// Get the simple (unqualified) name.
    pub fn simple_name(&self) -> &str {
        &self.name
    }

    /// Compute the type hash of this name.
    pub fn to_type_hash(&self) -> crate::TypeHash {
        crate::TypeHash::from_name(&self.to_string())
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.namespace.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{}::{}", self.namespace.join("::"), self.name)
        }
    }
}

impl From<&str> for QualifiedName {
    fn from(s: &str) -> Self {
        Self::from_qualified_string(s)
    }
}
