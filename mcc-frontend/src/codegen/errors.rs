//! Code generation error types
//!
//! Every variant is fatal; the generator never produces a partial listing.

use mcc_common::{CompilerError, SourceLocation, SymbolId};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CodegenError {
    #[error("Function '{name}' already defined at {location}")]
    Redefinition {
        name: String,
        location: SourceLocation,
    },
    
    #[error("Unsupported type at {location}: {message}")]
    TypeShape {
        message: String,
        location: SourceLocation,
    },
    
    #[error("Internal error at {location}: {message}")]
    InvariantViolation {
        message: String,
        location: SourceLocation,
    },
    
    #[error("Unknown symbol #{symbol} at {location}")]
    UnknownSymbol {
        symbol: SymbolId,
        location: SourceLocation,
    },
}

impl CodegenError {
    pub fn type_shape(message: impl Into<String>, location: &SourceLocation) -> Self {
        CodegenError::TypeShape {
            message: message.into(),
            location: location.clone(),
        }
    }
    
    pub fn invariant(message: impl Into<String>, location: &SourceLocation) -> Self {
        CodegenError::InvariantViolation {
            message: message.into(),
            location: location.clone(),
        }
    }
}

impl From<CodegenError> for CompilerError {
    fn from(err: CodegenError) -> Self {
        match &err {
            CodegenError::Redefinition { location, .. }
            | CodegenError::TypeShape { location, .. }
            | CodegenError::InvariantViolation { location, .. }
            | CodegenError::UnknownSymbol { location, .. } => {
                CompilerError::codegen_error(err.to_string(), location.clone())
            }
        }
    }
}
