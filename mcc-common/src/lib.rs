//! MicroC Compiler - Common Types and Utilities
//! 
//! This crate contains shared types, error definitions, and the symbol table
//! used across all components of the MicroC compiler.

pub mod error;
pub mod types;
pub mod source_loc;
pub mod symbols;

pub use error::CompilerError;
pub use types::{Type, TypeError, WORD_SIZE};
pub use source_loc::{HasSpan, SourceLocation, SourceSpan};
pub use symbols::{
    FunctionEntry, Storage, StringEntry, Symbol, SymbolError, SymbolId, SymbolTable,
    VariableEntry, RETURN_SLOT_OFFSET,
};
