//! Error types for the markup property compiler.
//!
//! ## Error Hierarchy
//!
//! ```text
//! MarkupError (top-level wrapper)
//! ├── RegistrationError - building the type registry
//! └── CompilationError  - resolving property references and emitting code
//! ```
//!
//! Every failure in the property core is local and non-retryable: it comes
//! from a pure query over already-loaded type metadata. Errors propagate to
//! the caller unchanged and abort compilation of the enclosing document.

use thiserror::Error;

use crate::Span;

// ============================================================================
// Registration Errors
// ============================================================================

/// Errors raised while populating a type registry.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RegistrationError {
    /// A referenced type was not found.
    #[error("type not found: {0}")]
    TypeNotFound(String),

    /// A type with this name already exists.
    #[error("duplicate type: {0}")]
    DuplicateType(String),

    /// A member was added to a type that does not exist.
    #[error("cannot add member '{member}' to unknown type '{owner}'")]
    UnknownOwner {
        /// Type the member was meant for.
        owner: String,
        /// Member name.
        member: String,
    },

    /// A generic definition was applied to the wrong number of arguments.
    #[error("generic '{name}' expects {expected} type argument(s), got {got}")]
    GenericArgCountMismatch {
        /// Definition name.
        name: String,
        /// Declared parameter count.
        expected: usize,
        /// Supplied argument count.
        got: usize,
    },

    /// Something that is not a generic definition was instantiated.
    #[error("'{0}' is not a generic definition")]
    NotAGenericDefinition(String),
}

// ============================================================================
// Compilation Errors
// ============================================================================

/// Errors raised while resolving property references or emitting assignments.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CompilationError {
    /// A referenced type could not be found.
    #[error("at {span}: unknown type '{name}'")]
    UnknownType {
        /// The type name that wasn't found.
        name: String,
        /// Where the type was referenced.
        span: Span,
    },

    /// The raw property token could not be split into namespace, owner and name.
    #[error("at {span}: invalid property reference '{token}': {message}")]
    InvalidPropertyToken {
        /// The token as written.
        token: String,
        /// What is wrong with it.
        message: String,
        /// Where the token appeared.
        span: Span,
    },

    /// The name resolved to neither a descriptor field nor an instance property.
    #[error("at {span}: unable to resolve property '{name}' on type '{owner}'")]
    UnresolvedProperty {
        /// Owner type name.
        owner: String,
        /// Property name.
        name: String,
        /// Where the reference appeared.
        span: Span,
    },

    /// A `<Name>Property` field exists but its type is not a typed property container.
    #[error(
        "at {span}: {field}'s type {field_type} doesn't inherit from {family}, make sure to use \
         typed properties (a field with this name that is not a property descriptor is probably \
         a naming collision)"
    )]
    NotATypedProperty {
        /// Field name.
        field: String,
        /// Declared field type.
        field_type: String,
        /// Name of the typed property family that was expected.
        family: String,
        /// Where the reference appeared.
        span: Span,
    },

    /// An instance property has neither getter nor setter.
    #[error(
        "at {span}: unable to resolve \"{owner}.{name}\" property type. There is no setter or getter."
    )]
    MissingAccessor {
        /// Declaring type name.
        owner: String,
        /// Property name.
        name: String,
        /// Where the reference appeared.
        span: Span,
    },

    /// An assignment targets a property that has no resolvable descriptor.
    #[error("at {span}: property '{name}' not found")]
    PropertyNotFound {
        /// Property name.
        name: String,
        /// Where the assignment appeared.
        span: Span,
    },

    /// A reflection-backed property has no `<Name>Property` descriptor field to load.
    #[error("at {span}: {name} is not a styled property")]
    NotAStyledProperty {
        /// Property name.
        name: String,
        /// Where the reference appeared.
        span: Span,
    },

    /// A produced value does not fit the expected parameter type.
    #[error("at {span}: {message}")]
    TypeMismatch {
        /// Description of the mismatch.
        message: String,
        /// Where the mismatch occurred.
        span: Span,
    },

    /// A setter was emitted with the wrong number of argument expressions.
    #[error("at {span}: '{name}' expects {expected} argument(s), got {got}")]
    ArgumentCountMismatch {
        /// Setter description.
        name: String,
        /// Expected count.
        expected: usize,
        /// Supplied count.
        got: usize,
        /// Where the call occurred.
        span: Span,
    },

    /// Internal compiler error.
    #[error("internal compiler error: {message}")]
    Internal {
        /// The error message.
        message: String,
    },
}

impl CompilationError {
    /// Get the span where this error occurred.
    pub fn span(&self) -> Span {
        match self {
            CompilationError::UnknownType { span, .. } => *span,
            CompilationError::InvalidPropertyToken { span, .. } => *span,
            CompilationError::UnresolvedProperty { span, .. } => *span,
            CompilationError::NotATypedProperty { span, .. } => *span,
            CompilationError::MissingAccessor { span, .. } => *span,
            CompilationError::PropertyNotFound { span, .. } => *span,
            CompilationError::NotAStyledProperty { span, .. } => *span,
            CompilationError::TypeMismatch { span, .. } => *span,
            CompilationError::ArgumentCountMismatch { span, .. } => *span,
            CompilationError::Internal { .. } => Span::default(),
        }
    }

    /// Shorthand for an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        CompilationError::Internal {
            message: message.into(),
        }
    }
}

// ============================================================================
// Top-level Error
// ============================================================================

/// Unified error for callers that drive both registry building and compilation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MarkupError {
    /// A registration error.
    #[error(transparent)]
    Registration(#[from] RegistrationError),

    /// A compilation error.
    #[error(transparent)]
    Compilation(#[from] CompilationError),
}

impl MarkupError {
    /// Check if this is a registration error.
    pub fn is_registration(&self) -> bool {
        matches!(self, MarkupError::Registration(_))
    }

    /// Check if this is a compilation error.
    pub fn is_compilation(&self) -> bool {
        matches!(self, MarkupError::Compilation(_))
    }

    /// Source location, when the error carries one.
    pub fn span(&self) -> Option<Span> {
        match self {
            MarkupError::Registration(_) => None,
            MarkupError::Compilation(e) => Some(e.span()),
        }
    }
}
