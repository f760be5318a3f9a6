use crate::TypeHash;

/// A custom attribute applied to a field or property declaration.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AttributeRef {
    /// Type of the attribute.
    pub attribute_type: TypeHash,
    /// Positional constructor arguments, already rendered as text.
    pub arguments: Vec<String>,
}

impl AttributeRef {
    /// An attribute with no arguments.
    pub fn marker(attribute_type: TypeHash) -> Self {
        Self {
            attribute_type,
            arguments: Vec::new(),
        }
    }

    /// Whether this attribute is of the given type.
    pub fn is(&self, attribute_type: TypeHash) -> bool {
        self.attribute_type == attribute_type
    }
}
