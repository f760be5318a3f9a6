//! Bytecode emitter for property assignments.
//!
//! The [`BytecodeEmitter`] wraps a [`BytecodeChunk`], a shared
//! [`ConstantPool`] and the [`LocalsPool`] used to spill stack operands.
//!
//! # Example
//!
//! ```
//! use markup_compiler::bytecode::{ConstantPool, OpCode};
//! use markup_compiler::emit::BytecodeEmitter;
//!
//! let mut constants = ConstantPool::new();
//! let mut emitter = BytecodeEmitter::new(&mut constants);
//!
//! emitter.set_line(3);
//! emitter.emit_string("active")?;
//! emitter.emit_pop();
//!
//! let chunk = emitter.finish();
//! chunk.assert_opcodes(&[OpCode::Constant, OpCode::Pop]);
//! # Ok::<(), markup_core::CompilationError>(())
//! ```
//!
//! Wide operands are 16 bits. A constant index or local slot beyond that
//! range is reported as [`CompilationError::Internal`] rather than wrapped.

mod locals;

use markup_core::{CompilationError, TypeHash};

use crate::bytecode::{BytecodeChunk, Constant, ConstantPool, OpCode};

pub use locals::{LocalsPool, PooledLocal};

/// Emits bytecode instructions.
pub struct BytecodeEmitter<'pool> {
    /// The chunk being built.
    chunk: BytecodeChunk,

    /// Shared constant pool (deduplicated).
    constants: &'pool mut ConstantPool,

    /// Temporary locals.
    locals: LocalsPool,

    /// Current source line for debug info.
    current_line: u32,
}

impl<'pool> BytecodeEmitter<'pool> {
    /// Create a new emitter whose temporaries start at slot 0.
    pub fn new(constants: &'pool mut ConstantPool) -> Self {
        Self::with_locals_base(constants, 0)
    }

    /// Create a new emitter whose temporaries start at `base`.
    ///
    /// `base` is the first slot not used by the enclosing function.
    pub fn with_locals_base(constants: &'pool mut ConstantPool, base: u32) -> Self {
        Self {
            chunk: BytecodeChunk::new(),
            constants,
            locals: LocalsPool::new(base),
            current_line: 1,
        }
    }

    /// Set current source line for debug info.
    pub fn set_line(&mut self, line: u32) {
        self.current_line = line;
    }

    /// Get current source line.
    pub fn current_line(&self) -> u32 {
        self.current_line
    }

    /// The temporary locals pool.
    pub fn locals(&self) -> &LocalsPool {
        &self.locals
    }

    /// Acquire a temporary local of type `ty`.
    pub fn acquire_local(&self, ty: TypeHash) -> PooledLocal {
        self.locals.acquire(ty)
    }

    // ==========================================================================
    // Basic Emission
    // ==========================================================================

    /// Emit a single opcode with no operands.
    pub fn emit(&mut self, op: OpCode) {
        self.chunk.write_op(op, self.current_line);
    }

    /// Emit opcode with 8-bit operand.
    pub fn emit_byte(&mut self, op: OpCode, byte: u8) {
        self.chunk.write_op(op, self.current_line);
        self.chunk.write_byte(byte, self.current_line);
    }

    /// Emit opcode with 16-bit operand.
    pub fn emit_u16(&mut self, op: OpCode, value: u16) {
        self.chunk.write_op(op, self.current_line);
        self.chunk.write_u16(value, self.current_line);
    }

    /// Emit opcode with a narrow operand when `value` fits a byte, otherwise
    /// the wide form.
    fn emit_narrow_or_wide(
        &mut self,
        narrow: OpCode,
        wide: OpCode,
        value: u32,
    ) -> Result<(), CompilationError> {
        match u8::try_from(value) {
            Ok(byte) => self.emit_byte(narrow, byte),
            Err(_) => self.emit_u16(wide, wide_operand(wide, value)?),
        }
        Ok(())
    }

    /// Emit opcode whose operand is a constant-pool index, plus the call
    /// argument count when `arg_count` is given.
    fn emit_indexed(
        &mut self,
        op: OpCode,
        index: u32,
        arg_count: Option<u8>,
    ) -> Result<(), CompilationError> {
        self.emit_u16(op, wide_operand(op, index)?);
        if let Some(count) = arg_count {
            self.chunk.write_byte(count, self.current_line);
        }
        Ok(())
    }

    /// Emit a constant load, narrow or wide depending on the pool index.
    pub fn emit_constant(&mut self, constant: Constant) -> Result<(), CompilationError> {
        let index = self.constants.add(constant);
        self.emit_narrow_or_wide(OpCode::Constant, OpCode::ConstantWide, index)
    }

    // ==========================================================================
    // Constants
    // ==========================================================================

    /// Emit an integer constant.
    ///
    /// 0 and 1 use `PushZero` and `PushOne`.
    pub fn emit_int(&mut self, value: i64) -> Result<(), CompilationError> {
        match value {
            0 => self.emit(OpCode::PushZero),
            1 => self.emit(OpCode::PushOne),
            _ => return self.emit_constant(Constant::Int(value)),
        }
        Ok(())
    }

    /// Emit a string constant.
    pub fn emit_string(&mut self, value: &str) -> Result<(), CompilationError> {
        self.emit_constant(Constant::StringData(value.as_bytes().to_vec()))
    }

    /// Emit null.
    pub fn emit_null(&mut self) {
        self.emit(OpCode::PushNull);
    }

    // ==========================================================================
    // Locals and Statics
    // ==========================================================================

    /// Emit get local variable.
    pub fn emit_get_local(&mut self, slot: u32) -> Result<(), CompilationError> {
        self.emit_narrow_or_wide(OpCode::GetLocal, OpCode::GetLocalWide, slot)
    }

    /// Emit set local variable.
    pub fn emit_set_local(&mut self, slot: u32) -> Result<(), CompilationError> {
        self.emit_narrow_or_wide(OpCode::SetLocal, OpCode::SetLocalWide, slot)
    }

    /// Emit a static field load.
    pub fn emit_get_static(&mut self, field_hash: TypeHash) -> Result<(), CompilationError> {
        let index = self.constants.add(Constant::TypeHash(field_hash));
        self.emit_indexed(OpCode::GetStatic, index, None)
    }

    // ==========================================================================
    // Calls
    // ==========================================================================

    /// Emit a static function call.
    pub fn emit_call(&mut self, func_hash: TypeHash, arg_count: u8) -> Result<(), CompilationError> {
        let index = self.constants.add(Constant::TypeHash(func_hash));
        self.emit_indexed(OpCode::Call, index, Some(arg_count))
    }

    /// Emit an instance method call. `arg_count` excludes the receiver.
    pub fn emit_call_method(
        &mut self,
        method_hash: TypeHash,
        arg_count: u8,
    ) -> Result<(), CompilationError> {
        let index = self.constants.add(Constant::TypeHash(method_hash));
        self.emit_indexed(OpCode::CallMethod, index, Some(arg_count))
    }

    /// Emit a call to a generic static function closed over `type_args`.
    pub fn emit_call_generic(
        &mut self,
        method_hash: TypeHash,
        type_args: Vec<TypeHash>,
        arg_count: u8,
    ) -> Result<(), CompilationError> {
        let index = self.constants.add_generic_method(method_hash, type_args);
        self.emit_indexed(OpCode::CallGeneric, index, Some(arg_count))
    }

    /// Emit a call to a generic instance method closed over `type_args`.
    pub fn emit_call_method_generic(
        &mut self,
        method_hash: TypeHash,
        type_args: Vec<TypeHash>,
        arg_count: u8,
    ) -> Result<(), CompilationError> {
        let index = self.constants.add_generic_method(method_hash, type_args);
        self.emit_indexed(OpCode::CallMethodGeneric, index, Some(arg_count))
    }

    // ==========================================================================
    // Stack Operations
    // ==========================================================================

    /// Emit pop (discard top of stack).
    pub fn emit_pop(&mut self) {
        self.emit(OpCode::Pop);
    }

    // ==========================================================================
    // Finalization
    // ==========================================================================

    /// Finish and return the bytecode chunk.
    pub fn finish(self) -> BytecodeChunk {
        self.chunk
    }

    /// The chunk emitted so far.
    pub fn chunk(&self) -> &BytecodeChunk {
        &self.chunk
    }

    /// Current chunk size.
    pub fn code_size(&self) -> usize {
        self.chunk.len()
    }
}

/// Narrow a constant index or local slot to a 16-bit operand of `op`.
fn wide_operand(op: OpCode, value: u32) -> Result<u16, CompilationError> {
    u16::try_from(value).map_err(|_| {
        CompilationError::internal(format!(
            "operand {value} of {} exceeds the 16-bit operand range",
            op.name()
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emit_special_ints() {
        let mut constants = ConstantPool::new();
        let mut emitter = BytecodeEmitter::new(&mut constants);
        emitter.emit_int(0).unwrap();
        emitter.emit_int(1).unwrap();
        emitter.emit_int(7).unwrap();
        let chunk = emitter.finish();

        chunk.assert_opcodes(&[OpCode::PushZero, OpCode::PushOne, OpCode::Constant]);
        assert_eq!(constants.get(0), Some(&Constant::Int(7)));
    }

    #[test]
    fn string_constants_are_shared() {
        let mut constants = ConstantPool::new();
        let mut emitter = BytecodeEmitter::new(&mut constants);
        emitter.emit_string("active").unwrap();
        emitter.emit_string("active").unwrap();
        let chunk = emitter.finish();

        assert_eq!(chunk.read_byte(1), chunk.read_byte(3));
        assert_eq!(constants.len(), 1);
    }

    #[test]
    fn wide_locals() {
        let mut constants = ConstantPool::new();
        let mut emitter = BytecodeEmitter::new(&mut constants);
        emitter.emit_set_local(3).unwrap();
        emitter.emit_get_local(300).unwrap();
        emitter.emit_set_local(u32::from(u16::MAX)).unwrap();
        let chunk = emitter.finish();

        chunk.assert_opcodes(&[OpCode::SetLocal, OpCode::GetLocalWide, OpCode::SetLocalWide]);
        assert_eq!(chunk.read_u16(3), Some(300));
        assert_eq!(chunk.read_u16(6), Some(u16::MAX));
    }

    #[test]
    fn slots_past_wide_range_are_rejected() {
        let mut constants = ConstantPool::new();
        let mut emitter = BytecodeEmitter::new(&mut constants);

        let err = emitter.emit_get_local(65_539).unwrap_err();
        assert!(matches!(err, CompilationError::Internal { .. }));
        let err = emitter.emit_set_local(u32::from(u16::MAX) + 1).unwrap_err();
        assert!(err.to_string().contains("SET_LOCAL_WIDE"));
        // nothing written for a rejected operand
        assert_eq!(emitter.code_size(), 0);
    }

    #[test]
    fn constant_index_past_wide_range_is_rejected() {
        let mut constants = ConstantPool::new();
        for i in 0..=i64::from(u16::MAX) {
            constants.add(Constant::Int(i + 2));
        }
        let mut emitter = BytecodeEmitter::new(&mut constants);

        // index 65535 still fits
        emitter.emit_int(i64::from(u16::MAX) + 2).unwrap();
        let err = emitter.emit_string("overflow").unwrap_err();
        assert!(matches!(err, CompilationError::Internal { .. }));
        let err = emitter
            .emit_get_static(TypeHash::from_name("WidthProperty"))
            .unwrap_err();
        assert!(matches!(err, CompilationError::Internal { .. }));

        let chunk = emitter.finish();
        chunk.assert_opcodes(&[OpCode::ConstantWide]);
        assert_eq!(chunk.read_u16(1), Some(u16::MAX));
    }

    #[test]
    fn call_operands() {
        let mut constants = ConstantPool::new();
        let method = TypeHash::from_name("Bind");
        let mut emitter = BytecodeEmitter::new(&mut constants);
        emitter.emit_call_method(method, 3).unwrap();
        let chunk = emitter.finish();

        assert_eq!(chunk.read_op(0), Some(OpCode::CallMethod));
        assert_eq!(chunk.read_u16(1), Some(0));
        assert_eq!(chunk.read_byte(3), Some(3));
        assert_eq!(constants.get(0), Some(&Constant::TypeHash(method)));
    }

    #[test]
    fn generic_call_records_type_arguments() {
        let mut constants = ConstantPool::new();
        let method = TypeHash::from_name("SetValue");
        let bool_hash = TypeHash::from_name("bool");
        let mut emitter = BytecodeEmitter::new(&mut constants);
        emitter
            .emit_call_method_generic(method, vec![bool_hash], 3)
            .unwrap();
        emitter.emit_call_generic(method, vec![bool_hash], 1).unwrap();
        let chunk = emitter.finish();

        chunk.assert_opcodes(&[OpCode::CallMethodGeneric, OpCode::CallGeneric]);
        assert_eq!(constants.len(), 1);
        assert_eq!(
            constants.get(0),
            Some(&Constant::GenericMethod {
                method,
                type_args: vec![bool_hash]
            })
        );
    }

    #[test]
    fn lines_follow_set_line() {
        let mut constants = ConstantPool::new();
        let mut emitter = BytecodeEmitter::new(&mut constants);
        emitter.set_line(12);
        emitter
            .emit_get_static(TypeHash::from_name("WidthProperty"))
            .unwrap();
        assert_eq!(emitter.current_line(), 12);
        let chunk = emitter.finish();
        assert!(chunk.lines().iter().all(|&l| l == 12));
    }

    #[test]
    fn locals_use_configured_base() {
        let mut constants = ConstantPool::new();
        let emitter = BytecodeEmitter::with_locals_base(&mut constants, 8);
        let local = emitter.acquire_local(TypeHash::from_name("bool"));
        assert_eq!(local.slot(), 8);
        assert_eq!(emitter.locals().outstanding(), 1);
        drop(local);
        assert_eq!(emitter.locals().outstanding(), 0);
    }
}
