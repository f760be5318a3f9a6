//! Bytecode operation codes.
//!
//! Each opcode is a single byte, with operands following inline. The set is
//! exactly what a property assignment needs: constants, pop, locals, static
//! field loads and (generic) runtime calls.

use num_enum::{IntoPrimitive, TryFromPrimitive};

/// Bytecode operation codes.
///
/// The runtime is a stack machine. Calls pop their arguments (and, for
/// methods, the receiver beneath them) and push the return value if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum OpCode {
    // =========================================================================
    // Constants
    // =========================================================================
    /// Push constant from pool (8-bit index).
    /// Operand: u8 constant index
    Constant = 0,
    /// Push constant from pool (16-bit index).
    /// Operand: u16 constant index (big-endian)
    ConstantWide,
    /// Push null reference.
    PushNull,
    /// Push integer 0.
    PushZero,
    /// Push integer 1.
    PushOne,

    // =========================================================================
    // Stack Operations
    // =========================================================================
    /// Pop top of stack.
    Pop,

    // =========================================================================
    // Local Variables
    // =========================================================================
    /// Load local variable (8-bit slot).
    /// Operand: u8 slot index
    GetLocal,
    /// Store to local variable (8-bit slot), popping the value.
    /// Operand: u8 slot index
    SetLocal,
    /// Load local variable (16-bit slot).
    /// Operand: u16 slot index (big-endian)
    GetLocalWide,
    /// Store to local variable (16-bit slot).
    /// Operand: u16 slot index (big-endian)
    SetLocalWide,

    // =========================================================================
    // Static Fields
    // =========================================================================
    /// Load a static field.
    /// Operand: u16 constant index (field hash)
    GetStatic,

    // =========================================================================
    // Calls
    // =========================================================================
    /// Call a static function.
    /// Operand: u16 constant index + u8 arg count
    Call,
    /// Call an instance method; the receiver sits below the arguments.
    /// Operand: u16 constant index + u8 arg count
    CallMethod,
    /// Call a generic static function instantiation.
    /// Operand: u16 constant index (generic method) + u8 arg count
    CallGeneric,
    /// Call a generic instance method instantiation.
    /// Operand: u16 constant index (generic method) + u8 arg count
    CallMethodGeneric,
}

impl OpCode {
    /// Decode an opcode byte.
    pub fn from_u8(byte: u8) -> Option<Self> {
        Self::try_from(byte).ok()
    }

    /// Number of operand bytes following the opcode.
    pub fn operand_size(&self) -> usize {
        match self {
            OpCode::PushNull
            | OpCode::PushZero
            | OpCode::PushOne
            | OpCode::Pop => 0,

            OpCode::Constant // u8 constant index
            | OpCode::GetLocal  // u8 slot
            | OpCode::SetLocal => 1, // u8 slot

            OpCode::ConstantWide // u16 constant index
            | OpCode::GetLocalWide  // u16 slot
            | OpCode::SetLocalWide  // u16 slot
            | OpCode::GetStatic => 2, // u16 constant index (field hash)

            OpCode::Call
            | OpCode::CallMethod
            | OpCode::CallGeneric
            | OpCode::CallMethodGeneric => 3, // u16 constant index + u8 arg count
        }
    }

    /// Get the name of this opcode for debugging.
    pub fn name(&self) -> &'static str {
        match self {
            OpCode::Constant => "CONSTANT",
            OpCode::ConstantWide => "CONSTANT_WIDE",
            OpCode::PushNull => "PUSH_NULL",
            OpCode::PushZero => "PUSH_ZERO",
            OpCode::PushOne => "PUSH_ONE",
            OpCode::Pop => "POP",
            OpCode::GetLocal => "GET_LOCAL",
            OpCode::SetLocal => "SET_LOCAL",
            OpCode::GetLocalWide => "GET_LOCAL_WIDE",
            OpCode::SetLocalWide => "SET_LOCAL_WIDE",
            OpCode::GetStatic => "GET_STATIC",
            OpCode::Call => "CALL",
            OpCode::CallMethod => "CALL_METHOD",
            OpCode::CallGeneric => "CALL_GENERIC",
            OpCode::CallMethodGeneric => "CALL_METHOD_GENERIC",
        }
    }
}
