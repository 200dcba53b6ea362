//! MicroC Compiler - Instruction Model
//! 
//! This crate holds the target side of the compiler:
//! 
//! - Register model and the fixed-arity instruction catalog
//! - Operand-shape validation
//! - Listing emission with an optional data section

pub mod asm;
pub mod emit;

pub use asm::{AsmInst, OpCode, Operand, OperandKind, Reg, RegClass, ShapeError};
pub use emit::{emit_instructions, emit_program, DataItem, EmitError, EmitOptions, Listing};
