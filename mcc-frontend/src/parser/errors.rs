//! Parse error types for the MicroC parser
//! 
//! This module defines all error types that can occur during parsing.

use crate::lexer::{Token, TokenType};
use mcc_common::{CompilerError, SourceLocation};

/// Parse error types specific to the parser
#[derive(Debug, Clone)]
pub enum ParseError {
    UnexpectedToken {
        expected: String,
        found: Token,
    },
    UnexpectedEndOfFile {
        expected: String,
        location: SourceLocation,
    },
    InvalidExpression {
        message: String,
        location: SourceLocation,
    },
    InvalidType {
        message: String,
        location: SourceLocation,
    },
}

impl From<ParseError> for CompilerError {
    fn from(err: ParseError) -> Self {
        match err {
            ParseError::UnexpectedToken { expected, found } => {
                if found.token_type == TokenType::EndOfFile {
                    return CompilerError::parse_error(
                        format!("Unexpected end of file, expected {}", expected),
                        found.span.start,
                    );
                }
                CompilerError::parse_error(
                    format!("Expected {}, found {}", expected, found.token_type),
                    found.span.start,
                )
            }
            ParseError::UnexpectedEndOfFile { expected, location } => {
                CompilerError::parse_error(
                    format!("Unexpected end of file, expected {}", expected),
                    location,
                )
            }
            ParseError::InvalidExpression { message, location }
            | ParseError::InvalidType { message, location } => {
                CompilerError::parse_error(message, location)
            }
        }
    }
}
