//! Emission context and the value-node abstraction.
//!
//! An [`EmitContext`] lives for one emission call. It borrows the type system,
//! the resolved runtime types and the emitter; temporaries it hands out are
//! guards that release their slot when dropped.

use markup_core::{CompilationError, Span, TypeHash, TypeSystem};

use crate::emit::{BytecodeEmitter, PooledLocal};
use crate::known_types::WellKnownTypes;

/// Something that can be compiled to push a single value.
pub trait ValueNode {
    /// Static type of the pushed value, `None` for a null literal.
    fn produced_type(&self) -> Option<TypeHash>;

    /// Emit code pushing the value.
    fn emit(&self, ctx: &mut EmitContext<'_, '_>) -> Result<(), CompilationError>;

    /// Source location of the node.
    fn span(&self) -> Span {
        Span::default()
    }
}

/// State of one emission call.
pub struct EmitContext<'a, 'pool> {
    types: &'a dyn TypeSystem,
    known: &'a WellKnownTypes,
    emitter: &'a mut BytecodeEmitter<'pool>,
}

impl<'a, 'pool> EmitContext<'a, 'pool> {
    /// Create a context.
    pub fn new(
        types: &'a dyn TypeSystem,
        known: &'a WellKnownTypes,
        emitter: &'a mut BytecodeEmitter<'pool>,
    ) -> Self {
        Self {
            types,
            known,
            emitter,
        }
    }

    /// The type system.
    pub fn types(&self) -> &'a dyn TypeSystem {
        self.types
    }

    /// The runtime types.
    pub fn known(&self) -> &'a WellKnownTypes {
        self.known
    }

    /// The emitter.
    pub fn emitter(&mut self) -> &mut BytecodeEmitter<'pool> {
        self.emitter
    }

    /// Acquire a temporary local, released when the guard drops.
    pub fn acquire_local(&self, ty: TypeHash) -> PooledLocal {
        self.emitter.acquire_local(ty)
    }

    /// Emit `node` as an argument of type `expected`.
    ///
    /// Nothing is emitted when the node's type does not fit.
    pub fn emit_value(&mut self, node: &dyn ValueNode, expected: TypeHash) -> Result<(), CompilationError> {
        self.check_value(node, expected)?;
        node.emit(self)
    }

    /// Check that `node` can be passed where `expected` is required.
    pub fn check_value(&self, node: &dyn ValueNode, expected: TypeHash) -> Result<(), CompilationError> {
        let fits = match node.produced_type() {
            None => self.types.accepts_null(expected),
            Some(ty) => self.types.is_assignable(ty, expected),
        };
        if !fits {
            let produced = node
                .produced_type()
                .map_or_else(|| "null".to_string(), |ty| self.types.type_name(ty));
            return Err(CompilationError::TypeMismatch {
                message: format!(
                    "cannot pass a value of type '{produced}' where '{}' is expected",
                    self.types.type_name(expected)
                ),
                span: node.span(),
            });
        }
        Ok(())
    }
}

/// A value already stored in a local slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalValue {
    pub slot: u32,
    pub ty: TypeHash,
    pub span: Span,
}

impl ValueNode for LocalValue {
    fn produced_type(&self) -> Option<TypeHash> {
        Some(self.ty)
    }

    fn emit(&self, ctx: &mut EmitContext<'_, '_>) -> Result<(), CompilationError> {
        ctx.emitter().emit_get_local(self.slot)
    }

    fn span(&self) -> Span {
        self.span
    }
}

/// The `null` literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NullLiteral {
    pub span: Span,
}

impl ValueNode for NullLiteral {
    fn produced_type(&self) -> Option<TypeHash> {
        None
    }

    fn emit(&self, ctx: &mut EmitContext<'_, '_>) -> Result<(), CompilationError> {
        ctx.emitter().emit_null();
        Ok(())
    }

    fn span(&self) -> Span {
        self.span
    }
}
