//! Bytecode types for the property compiler.
//!
//! - [`OpCode`] - the instruction set
//! - [`BytecodeChunk`] - emitted bytes with line information
//! - [`Constant`] and [`ConstantPool`] - deduplicated constant storage

mod chunk;
mod constant;
mod opcode;

pub use chunk::BytecodeChunk;
pub use constant::{Constant, ConstantPool};
pub use opcode::OpCode;
