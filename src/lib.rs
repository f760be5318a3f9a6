//! Property resolution and setter emission for a declarative markup compiler.
//!
//! The workspace is split by layer:
//!
//! - [`core`]: identity, type-system entries, the [`TypeSystem`](core::TypeSystem)
//!   trait and the error taxonomy
//! - [`registry`]: an in-memory type system with generic instantiation
//! - [`compiler`]: bytecode, the emitter and the property core
//!
//! Most callers only need the [`prelude`].

pub use markup_compiler as compiler;
pub use markup_core as core;
pub use markup_registry as registry;

pub use markup_compiler::{PropertyCompiler, PropertyValueNode, register_runtime};
pub use markup_core::{CompilationError, MarkupError, RegistrationError};
pub use markup_registry::TypeRegistry;

pub mod prelude {
    pub use markup_compiler::bytecode::{BytecodeChunk, Constant, ConstantPool, OpCode};
    pub use markup_compiler::{
        ArgumentType, BinderParameters, BytecodeEmitter, ClassSelector, CompilerOptions,
        EmitContext, FieldBackedProperty, LocalValue, NullLiteral, PropertyCompiler,
        PropertyDescriptor, PropertyReference, PropertyValueNode, ReflectionProperty, SetterKind,
        SetterVariant, ValueNode, WellKnownNames, WellKnownTypes, build_setters,
        emit_property_field, emit_provide_value_target, extract_value_type, parse_property_token,
        register_runtime, select_setter,
    };
    pub use markup_core::{
        AttributeRef, CompilationError, FieldEntry, FieldFlags, MarkupError, MethodEntry,
        PropertyEntry, QualifiedName, RegistrationError, Span, TypeEntry, TypeFlags, TypeHash,
        TypeSystem,
    };
    pub use markup_registry::TypeRegistry;
}
