//! Property resolution and setter emission.
//!
//! ## Pipeline
//!
//! ```text
//! "ns:Owner.Name" --parse_property_token--> PropertyReference
//!                 --PropertyResolver-------> PropertyDescriptor
//!                 --build_setters----------> Vec<SetterVariant>
//!                 --emit_inline/emit_args--> bytecode
//! ```
//!
//! [`PropertyCompiler`] bundles the steps for one type system.

mod class_selector;
pub mod descriptor;
pub mod emit;
pub mod node;
pub mod resolver;
pub mod setters;
pub mod token;
pub mod value_type;

pub use descriptor::{ClassSelector, FieldBackedProperty, PropertyDescriptor, ReflectionProperty};
pub use emit::{emit_property_field, emit_provide_value_target};
pub use node::PropertyValueNode;
pub use resolver::PropertyResolver;
pub use setters::{
    ArgumentType, BinderParameters, SetterKind, SetterVariant, build_setters, select_setter,
};
pub use token::{PropertyReference, parse_property_token};
pub use value_type::extract_value_type;

use markup_core::{CompilationError, Span, TypeHash, TypeSystem};
use tracing::debug;

use crate::bytecode::ConstantPool;
use crate::context::EmitContext;
use crate::emit::BytecodeEmitter;
use crate::known_types::{CompilerOptions, WellKnownTypes};

/// Resolves property references and emits their assignments.
///
/// Holds only read-only state; one compiler serves any number of documents
/// compiled against the same type system.
pub struct PropertyCompiler<'a> {
    types: &'a dyn TypeSystem,
    known: WellKnownTypes,
    options: CompilerOptions,
}

impl<'a> PropertyCompiler<'a> {
    /// Create a compiler, looking the runtime types up once.
    pub fn new(types: &'a dyn TypeSystem, options: CompilerOptions) -> Result<Self, CompilationError> {
        if options.local_slot_base > u32::from(u16::MAX) {
            return Err(CompilationError::internal(format!(
                "local slot base {} is past the last addressable slot {}",
                options.local_slot_base,
                u16::MAX
            )));
        }
        let known = WellKnownTypes::resolve(types, &options.names)?;
        Ok(Self {
            types,
            known,
            options,
        })
    }

    /// The type system.
    pub fn types(&self) -> &'a dyn TypeSystem {
        self.types
    }

    /// The resolved runtime types.
    pub fn known_types(&self) -> &WellKnownTypes {
        &self.known
    }

    /// The options this compiler was built with.
    pub fn options(&self) -> &CompilerOptions {
        &self.options
    }

    /// Parse and resolve `raw`, building the node and its setter variants.
    ///
    /// Unqualified names are looked up on `owner_hint`.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn resolve_property_reference(
        &self,
        owner_hint: TypeHash,
        raw: &str,
        span: Span,
    ) -> Result<PropertyValueNode, CompilationError> {
        let reference = parse_property_token(raw, span)?;
        let descriptor = self.resolver().resolve(owner_hint, &reference, span)?;
        let node = PropertyValueNode::new(descriptor, &self.known, self.types, span);
        debug!(
            token = raw,
            kind = node.descriptor.kind(),
            setters = node.setters.len(),
            "property reference compiled"
        );
        Ok(node)
    }

    /// Resolve the target of an assignment.
    ///
    /// Fails with [`CompilationError::PropertyNotFound`] when the name does
    /// not resolve. Class selectors cannot be assigned.
    pub fn resolve_assignment_target(
        &self,
        owner_hint: TypeHash,
        raw: &str,
        span: Span,
    ) -> Result<PropertyValueNode, CompilationError> {
        let node = self
            .resolve_property_reference(owner_hint, raw, span)
            .map_err(|err| match err {
                CompilationError::UnresolvedProperty { name, span, .. } => {
                    CompilationError::PropertyNotFound { name, span }
                }
                other => other,
            })?;
        if let PropertyDescriptor::ClassSelector(c) = &node.descriptor {
            return Err(CompilationError::TypeMismatch {
                message: format!("class selector '{}' is read-only", c.class_name),
                span,
            });
        }
        Ok(node)
    }

    /// A resolver borrowing this compiler's state.
    pub fn resolver(&self) -> PropertyResolver<'_> {
        PropertyResolver::new(self.types, &self.known, &self.options.names)
    }

    /// An emitter whose temporaries start at the configured base slot.
    pub fn emitter<'pool>(&self, constants: &'pool mut ConstantPool) -> BytecodeEmitter<'pool> {
        BytecodeEmitter::with_locals_base(constants, self.options.local_slot_base)
    }

    /// An emission context over `emitter`.
    pub fn context<'c, 'pool>(&'c self, emitter: &'c mut BytecodeEmitter<'pool>) -> EmitContext<'c, 'pool> {
        EmitContext::new(self.types, &self.known, emitter)
    }
}
