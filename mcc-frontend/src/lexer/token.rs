//! Token definitions for the MicroC lexer
//! 
//! This module defines token types and the Token struct.

use mcc_common::{SourceLocation, SourceSpan};
use serde::{Deserialize, Serialize};
use std::fmt;

/// MicroC token types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TokenType {
    // Literals
    IntLiteral(i64),
    FloatLiteral(f64),
    StringLiteral(String),
    
    Identifier(String),
    
    // Keywords
    Int, Float, Void, String, If, Else, While, Return,
    Read, Print, Malloc, Free,
    
    // Operators
    Plus,           // +
    Minus,          // -
    Star,           // *
    Slash,          // /
    Ampersand,      // &
    Equal,          // =
    Less,           // <
    Greater,        // >
    LessEqual,      // <=
    GreaterEqual,   // >=
    EqualEqual,     // ==
    BangEqual,      // !=
    
    // Delimiters
    LeftParen,      // (
    RightParen,     // )
    LeftBrace,      // {
    RightBrace,     // }
    LeftBracket,    // [
    RightBracket,   // ]
    Semicolon,      // ;
    Comma,          // ,
    
    // Special
    Newline,
    EndOfFile,
    
    // Comments, dropped by the parser
    LineComment(String),
    BlockComment(String),
}

impl TokenType {
    /// Tokens the parser never sees
    pub fn is_trivia(&self) -> bool {
        matches!(
            self,
            TokenType::Newline | TokenType::LineComment(_) | TokenType::BlockComment(_)
        )
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenType::IntLiteral(n) => write!(f, "{n}"),
            TokenType::FloatLiteral(x) => write!(f, "{x:?}"),
            TokenType::StringLiteral(s) => write!(f, "{s:?}"),
            TokenType::Identifier(s) => write!(f, "{s}"),
            
            TokenType::Int => write!(f, "int"),
            TokenType::Float => write!(f, "float"),
            TokenType::Void => write!(f, "void"),
            TokenType::String => write!(f, "string"),
            TokenType::If => write!(f, "if"),
            TokenType::Else => write!(f, "else"),
            TokenType::While => write!(f, "while"),
            TokenType::Return => write!(f, "return"),
            TokenType::Read => write!(f, "read"),
            TokenType::Print => write!(f, "print"),
            TokenType::Malloc => write!(f, "malloc"),
            TokenType::Free => write!(f, "free"),
            
            TokenType::Plus => write!(f, "+"),
            TokenType::Minus => write!(f, "-"),
            TokenType::Star => write!(f, "*"),
            TokenType::Slash => write!(f, "/"),
            TokenType::Ampersand => write!(f, "&"),
            TokenType::Equal => write!(f, "="),
            TokenType::Less => write!(f, "<"),
            TokenType::Greater => write!(f, ">"),
            TokenType::LessEqual => write!(f, "<="),
            TokenType::GreaterEqual => write!(f, ">="),
            TokenType::EqualEqual => write!(f, "=="),
            TokenType::BangEqual => write!(f, "!="),
            
            TokenType::LeftParen => write!(f, "("),
            TokenType::RightParen => write!(f, ")"),
            TokenType::LeftBrace => write!(f, "{{"),
            TokenType::RightBrace => write!(f, "}}"),
            TokenType::LeftBracket => write!(f, "["),
            TokenType::RightBracket => write!(f, "]"),
            TokenType::Semicolon => write!(f, ";"),
            TokenType::Comma => write!(f, ","),
            
            TokenType::Newline => write!(f, "\\n"),
            TokenType::EndOfFile => write!(f, "EOF"),
            TokenType::LineComment(s) => write!(f, "//{s}"),
            TokenType::BlockComment(s) => write!(f, "/*{s}*/"),
        }
    }
}

/// A token with location information
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub token_type: TokenType,
    pub span: SourceSpan,
}

impl Token {
    pub fn new(token_type: TokenType, span: SourceSpan) -> Self {
        Self { token_type, span }
    }
    
    pub fn eof(location: SourceLocation) -> Self {
        Self {
            token_type: TokenType::EndOfFile,
            span: SourceSpan::new(location.clone(), location),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}", self.token_type, self.span.start)
    }
}
