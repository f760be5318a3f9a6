//! The property value node handed to the rest of the compiler.

use markup_core::{CompilationError, Span, TypeHash, TypeSystem};

use super::descriptor::PropertyDescriptor;
use super::emit::emit_property_field;
use super::setters::{ArgumentType, SetterVariant, build_setters, select_setter};
use crate::context::{EmitContext, ValueNode};
use crate::known_types::WellKnownTypes;

/// A resolved property reference.
///
/// As a value it pushes the property's descriptor. Field-backed properties
/// also carry their setter variants, best first.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyValueNode {
    pub descriptor: PropertyDescriptor,
    /// Type of the pushed descriptor.
    pub static_type: TypeHash,
    /// Type of values stored in the property.
    pub value_type: TypeHash,
    /// Extra parameters of the pseudo-property (`[string]` for class selectors).
    pub parameters: Vec<TypeHash>,
    pub setters: Vec<SetterVariant>,
    pub span: Span,
}

impl PropertyValueNode {
    /// Build the node of a resolved descriptor.
    pub fn new(
        descriptor: PropertyDescriptor,
        known: &WellKnownTypes,
        types: &dyn TypeSystem,
        span: Span,
    ) -> Self {
        let (static_type, value_type, parameters, setters) = match &descriptor {
            PropertyDescriptor::FieldBacked(p) => (
                p.storage_type(),
                p.value_type,
                Vec::new(),
                build_setters(p, known, types),
            ),
            PropertyDescriptor::ReflectionBacked(p) => {
                (known.property_base, p.value_type, Vec::new(), Vec::new())
            }
            PropertyDescriptor::ClassSelector(_) => {
                (known.class_property, known.bool, vec![known.string], Vec::new())
            }
        };
        Self {
            descriptor,
            static_type,
            value_type,
            parameters,
            setters,
            span,
        }
    }

    /// First setter accepting arguments of the given types.
    pub fn select_setter(&self, args: &[ArgumentType], types: &dyn TypeSystem) -> Option<&SetterVariant> {
        select_setter(&self.setters, args, types)
    }
}

impl ValueNode for PropertyValueNode {
    fn produced_type(&self) -> Option<TypeHash> {
        Some(self.static_type)
    }

    fn emit(&self, ctx: &mut EmitContext<'_, '_>) -> Result<(), CompilationError> {
        match &self.descriptor {
            PropertyDescriptor::FieldBacked(p) => ctx.emitter().emit_get_static(p.field.field_hash),
            PropertyDescriptor::ReflectionBacked(p) => {
                if emit_property_field(ctx, p.declaring_type, &p.name)? {
                    Ok(())
                } else {
                    Err(CompilationError::NotAStyledProperty {
                        name: p.name.clone(),
                        span: self.span,
                    })
                }
            }
            PropertyDescriptor::ClassSelector(c) => c.emit(ctx),
        }
    }

    fn span(&self) -> Span {
        self.span
    }
}
