//! Property compiler for declarative markup.
//!
//! Turns property references written in markup (`IsDefault`,
//! `Control.Dock`, `local:Grid.Row`, `Classes.active`) into resolved
//! descriptors, the ordered setter variants each descriptor supports, and the
//! bytecode assigning through those variants.
//!
//! # Example
//!
//! ```
//! use markup_compiler::{CompilerOptions, PropertyCompiler, SetterKind, register_runtime};
//! use markup_core::{FieldEntry, Span, TypeEntry, TypeSystem};
//! use markup_registry::TypeRegistry;
//!
//! let options = CompilerOptions::default();
//! let mut registry = TypeRegistry::with_builtins();
//! register_runtime(&mut registry, &options.names).unwrap();
//!
//! let bool_type = registry.resolve_type(&options.names.bool).unwrap();
//! let styled = registry.resolve_type(&options.names.styled_property_t).unwrap();
//! let storage = registry.instantiate(styled, &[bool_type]).unwrap();
//! let button = registry.register_type(TypeEntry::class("Button")).unwrap();
//! registry
//!     .add_field(button, FieldEntry::public_static("IsDefaultProperty", button, storage))
//!     .unwrap();
//!
//! let compiler = PropertyCompiler::new(&registry, options).unwrap();
//! let node = compiler
//!     .resolve_property_reference(button, "IsDefault", Span::default())
//!     .unwrap();
//! let kinds: Vec<_> = node.setters.iter().map(|v| v.kind).collect();
//! assert_eq!(
//!     kinds,
//!     [
//!         SetterKind::Binding,
//!         SetterKind::BindingWithPriority,
//!         SetterKind::PlainWithPriority,
//!         SetterKind::Unset,
//!     ]
//! );
//! ```

pub mod bytecode;
pub mod context;
pub mod emit;
pub mod known_types;
pub mod property;
pub mod runtime;

pub use bytecode::{BytecodeChunk, Constant, ConstantPool, OpCode};
pub use context::{EmitContext, LocalValue, NullLiteral, ValueNode};
pub use emit::{BytecodeEmitter, LocalsPool, PooledLocal};
pub use known_types::{CompilerOptions, WellKnownNames, WellKnownTypes};
pub use property::{
    ArgumentType, BinderParameters, ClassSelector, FieldBackedProperty, PropertyCompiler,
    PropertyDescriptor, PropertyReference, PropertyResolver, PropertyValueNode, ReflectionProperty,
    SetterKind, SetterVariant, build_setters, emit_property_field, emit_provide_value_target,
    extract_value_type, parse_property_token, select_setter,
};
pub use runtime::register_runtime;

pub use markup_core::CompilationError;
