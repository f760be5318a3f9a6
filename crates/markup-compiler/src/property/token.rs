//! Property reference tokens.
//!
//! ```text
//! token   := [ namespace ':' ] [ owner '.' ] name
//! ident   := (letter | '_') (letter | digit | '_')*
//! ```
//!
//! Surrounding whitespace is ignored and one pair of enclosing parentheses
//! (the attached-property spelling `(Grid.Row)`) is stripped.

use markup_core::{CompilationError, Span};
use thiserror::Error;

/// A parsed property reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyReference {
    /// XML namespace prefix of the owner.
    pub namespace: Option<String>,
    /// Owner type as written.
    pub owner: Option<String>,
    /// Property name.
    pub name: String,
}

impl PropertyReference {
    /// A bare `name` reference.
    pub fn unqualified(name: impl Into<String>) -> Self {
        Self {
            namespace: None,
            owner: None,
            name: name.into(),
        }
    }

    /// An `owner.name` reference.
    pub fn qualified(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: None,
            owner: Some(owner.into()),
            name: name.into(),
        }
    }

    /// Whether an owner was written.
    pub fn is_qualified(&self) -> bool {
        self.owner.is_some()
    }
}

/// Why a token is malformed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("empty property reference")]
    Empty,

    #[error("empty {0}")]
    EmptySegment(&'static str),

    #[error("invalid character '{ch}' in {segment} '{text}'")]
    InvalidCharacter {
        ch: char,
        segment: &'static str,
        text: String,
    },

    #[error("more than one '{0}'")]
    Repeated(char),

    #[error("unbalanced parentheses")]
    UnbalancedParentheses,

    #[error("namespace '{0}' requires an owner type")]
    NamespaceWithoutOwner(String),
}

/// Split a raw token into namespace, owner and name.
pub fn parse_property_token(raw: &str, span: Span) -> Result<PropertyReference, CompilationError> {
    parse(raw).map_err(|err| CompilationError::InvalidPropertyToken {
        token: raw.to_string(),
        message: err.to_string(),
        span,
    })
}

fn parse(raw: &str) -> Result<PropertyReference, TokenError> {
    let mut token = raw.trim();
    if let Some(inner) = token.strip_prefix('(') {
        token = inner
            .strip_suffix(')')
            .ok_or(TokenError::UnbalancedParentheses)?
            .trim();
    }
    if token.contains(['(', ')']) {
        return Err(TokenError::UnbalancedParentheses);
    }
    if token.is_empty() {
        return Err(TokenError::Empty);
    }
    for sep in [':', '.'] {
        if token.matches(sep).count() > 1 {
            return Err(TokenError::Repeated(sep));
        }
    }

    let (namespace, rest) = match token.split_once(':') {
        Some((ns, rest)) => (Some(ns), rest),
        None => (None, token),
    };
    let (owner, name) = match rest.split_once('.') {
        Some((owner, name)) => (Some(owner), name),
        None => (None, rest),
    };

    if let Some(ns) = namespace {
        identifier(ns, "namespace")?;
        if owner.is_none() {
            return Err(TokenError::NamespaceWithoutOwner(ns.to_string()));
        }
    }
    if let Some(owner) = owner {
        identifier(owner, "owner")?;
    }
    identifier(name, "name")?;

    Ok(PropertyReference {
        namespace: namespace.map(str::to_string),
        owner: owner.map(str::to_string),
        name: name.to_string(),
    })
}

fn identifier(text: &str, segment: &'static str) -> Result<(), TokenError> {
    let mut chars = text.chars();
    let Some(first) = chars.next() else {
        return Err(TokenError::EmptySegment(segment));
    };
    let invalid = |ch| TokenError::InvalidCharacter {
        ch,
        segment,
        text: text.to_string(),
    };
    if !(first.is_alphabetic() || first == '_') {
        return Err(invalid(first));
    }
    match chars.find(|c| !(c.is_alphanumeric() || *c == '_')) {
        Some(ch) => Err(invalid(ch)),
        None => Ok(()),
    }
}
