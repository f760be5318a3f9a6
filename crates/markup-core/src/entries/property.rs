use crate::TypeHash;

use super::{AttributeRef, MethodEntry};

/// An instance property declaration backed by accessor methods.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyEntry {
    /// Property name.
    pub name: String,
    /// Type that declares the property.
    pub declaring_type: TypeHash,
    /// Identity of the declaration.
    pub property_hash: TypeHash,
    /// Getter, if readable.
    pub getter: Option<MethodEntry>,
    /// Setters in declaration order.
    pub setters: Vec<MethodEntry>,
    /// Custom attributes on the declaration.
    pub attributes: Vec<AttributeRef>,
}

impl PropertyEntry {
    /// Create a property with no accessors.
    pub fn new(name: impl Into<String>, declaring_type: TypeHash) -> Self {
        let name = name.into();
        let property_hash = TypeHash::from_property(declaring_type, &name);
        Self {
            name,
            declaring_type,
            property_hash,
            getter: None,
            setters: Vec::new(),
            attributes: Vec::new(),
        }
    }

    /// Create a read-write property of `value_type` with conventional
    /// `get_<Name>`/`set_<Name>` accessors.
    pub fn read_write(name: impl Into<String>, declaring_type: TypeHash, value_type: TypeHash) -> Self {
        let name = name.into();
        let getter = MethodEntry::instance(
            format!("get_{name}"),
            declaring_type,
            Vec::new(),
            Some(value_type),
        );
        let setter =
            MethodEntry::instance(format!("set_{name}"), declaring_type, vec![value_type], None);
        Self::new(name, declaring_type)
            .with_getter(getter)
            .with_setter(setter)
    }

    /// Set the getter.
    pub fn with_getter(mut self, getter: MethodEntry) -> Self {
        self.getter = Some(getter);
        self
    }

    /// Append a setter.
    pub fn with_setter(mut self, setter: MethodEntry) -> Self {
        self.setters.push(setter);
        self
    }

    /// Add an attribute.
    pub fn with_attribute(mut self, attribute: AttributeRef) -> Self {
        self.attributes.push(attribute);
        self
    }

    /// Whether an attribute of `attribute_type` is present.
    pub fn has_attribute(&self, attribute_type: TypeHash) -> bool {
        self.attributes.iter().any(|a| a.is(attribute_type))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_write_accessors() {
        let owner = TypeHash::from_name("TextBlock");
        let string = TypeHash::from_name("string");
        let prop = PropertyEntry::read_write("Text", owner, string);

        let getter = prop.getter.as_ref().unwrap();
        assert_eq!(getter.name, "get_Text");
        assert_eq!(getter.return_type, Some(string));
        assert_eq!(prop.setters.len(), 1);
        assert_eq!(prop.setters[0].params, vec![string]);
    }

    #[test]
    fn attribute_lookup() {
        let owner = TypeHash::from_name("TextBlock");
        let marker = TypeHash::from_name("AssignBindingAttribute");
        let prop = PropertyEntry::new("Text", owner).with_attribute(AttributeRef::marker(marker));
        assert!(prop.has_attribute(marker));
        assert!(!prop.has_attribute(TypeHash::from_name("Other")));
    }
}
