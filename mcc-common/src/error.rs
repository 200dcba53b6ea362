//! Error handling for the MicroC compiler
//! 
//! Every phase reports failures through [`CompilerError`]. All errors are
//! fatal: compilation stops at the first one.

use crate::source_loc::{SourceLocation, SourceSpan};
use thiserror::Error;

/// Main compiler error type that encompasses all phases of compilation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompilerError {
    #[error("Lexical error at {location}: {message}")]
    LexError {
        location: SourceLocation,
        message: String,
    },

    #[error("Parse error at {location}: {message}")]
    ParseError {
        location: SourceLocation,
        message: String,
    },

    #[error("Semantic error at {location}: {message}")]
    SemanticError {
        location: SourceLocation,
        message: String,
    },

    #[error("Type error at {span}: {message}")]
    TypeError {
        span: SourceSpan,
        message: String,
    },

    #[error("Code generation error at {location}: {message}")]
    CodegenError {
        location: SourceLocation,
        message: String,
    },

    #[error("IO error: {message}")]
    IoError { message: String },

    #[error("Internal compiler error: {message}")]
    InternalError { message: String },
}

impl CompilerError {
    /// Create a lexer error
    pub fn lexer_error(message: String, location: SourceLocation) -> Self {
        CompilerError::LexError { location, message }
    }
    
    /// Create a parse error
    pub fn parse_error(message: String, location: SourceLocation) -> Self {
        CompilerError::ParseError { location, message }
    }
    
    /// Create a semantic error
    pub fn semantic_error(message: String, location: SourceLocation) -> Self {
        CompilerError::SemanticError { location, message }
    }
    
    /// Create a type error
    pub fn type_error(message: String, span: SourceSpan) -> Self {
        CompilerError::TypeError { span, message }
    }
    
    /// Create a codegen error
    pub fn codegen_error(message: String, location: SourceLocation) -> Self {
        CompilerError::CodegenError { location, message }
    }
}

/// Convert from std::io::Error
impl From<std::io::Error> for CompilerError {
    fn from(err: std::io::Error) -> Self {
        CompilerError::IoError {
            message: err.to_string(),
        }
    }
}

/// Convert from String (for simple error cases)
impl From<String> for CompilerError {
    fn from(message: String) -> Self {
        CompilerError::InternalError { message }
    }
}
