//! MicroC Lexer
//! 
//! Tokenizes MicroC source code into a stream of tokens.
//! Handles keywords, operators, literals, identifiers, and comments.

pub mod token;
pub mod literals;
pub mod comments;

pub use token::{Token, TokenType};

use mcc_common::{CompilerError, SourceLocation, SourceSpan};
use std::collections::HashMap;

/// MicroC Lexer
pub struct Lexer {
    pub(crate) input: Vec<char>,
    pub(crate) position: usize,
    pub(crate) line: u32,
    pub(crate) column: u32,
    keywords: HashMap<String, TokenType>,
}

impl Lexer {
    /// Create a new lexer
    pub fn new(input: &str) -> Self {
        let mut lexer = Self {
            input: input.chars().collect(),
            position: 0,
            line: 1,
            column: 1,
            keywords: HashMap::new(),
        };
        
        lexer.initialize_keywords();
        lexer
    }
    
    fn initialize_keywords(&mut self) {
        let keywords = [
            ("int", TokenType::Int),
            ("float", TokenType::Float),
            ("void", TokenType::Void),
            ("string", TokenType::String),
            ("if", TokenType::If),
            ("else", TokenType::Else),
            ("while", TokenType::While),
            ("return", TokenType::Return),
            ("read", TokenType::Read),
            ("print", TokenType::Print),
            ("malloc", TokenType::Malloc),
            ("free", TokenType::Free),
        ];
        
        for (keyword, token_type) in keywords {
            self.keywords.insert(keyword.to_string(), token_type);
        }
    }
    
    /// Get current character
    pub(crate) fn current_char(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }
    
    /// Peek ahead n characters
    pub(crate) fn peek_char(&self, offset: usize) -> Option<char> {
        self.input.get(self.position + offset).copied()
    }
    
    /// Advance to next character
    pub(crate) fn advance(&mut self) -> Option<char> {
        let ch = self.current_char()?;
        self.position += 1;
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(ch)
    }
    
    pub(crate) fn current_location(&self) -> SourceLocation {
        SourceLocation::new(self.line, self.column)
    }
    
    /// Skip whitespace (except newlines)
    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.current_char() {
            if ch.is_whitespace() && ch != '\n' {
                self.advance();
            } else {
                break;
            }
        }
    }
    
    /// Tokenize an identifier or keyword
    fn tokenize_identifier(&mut self) -> TokenType {
        let mut identifier = String::new();
        while let Some(ch) = self.current_char() {
            if ch.is_alphanumeric() || ch == '_' {
                identifier.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        
        match self.keywords.get(&identifier) {
            Some(keyword) => keyword.clone(),
            None => TokenType::Identifier(identifier),
        }
    }
    
    /// Consume one character and return `single`, or two and return `double`
    /// when the next character is `second`
    fn one_or_two(&mut self, second: char, double: TokenType, single: TokenType) -> TokenType {
        self.advance();
        if self.current_char() == Some(second) {
            self.advance();
            double
        } else {
            single
        }
    }
    
    /// Get next token
    pub fn next_token(&mut self) -> Result<Token, CompilerError> {
        self.skip_whitespace();
        
        let start_location = self.current_location();
        
        let token_type = match self.current_char() {
            None => TokenType::EndOfFile,
            
            Some('\n') => {
                self.advance();
                TokenType::Newline
            }
            
            Some(ch) if ch.is_alphabetic() || ch == '_' => self.tokenize_identifier(),
            
            Some(ch) if ch.is_ascii_digit() => self.tokenize_number()?,
            
            Some('.') if self.peek_char(1).is_some_and(|c| c.is_ascii_digit()) => {
                self.tokenize_number()?
            }
            
            Some('"') => self.tokenize_string_literal()?,
            
            Some('/') => match self.peek_char(1) {
                Some('/') => self.tokenize_line_comment(),
                Some('*') => self.tokenize_block_comment()?,
                _ => {
                    self.advance();
                    TokenType::Slash
                }
            },
            
            Some('=') => self.one_or_two('=', TokenType::EqualEqual, TokenType::Equal),
            Some('<') => self.one_or_two('=', TokenType::LessEqual, TokenType::Less),
            Some('>') => self.one_or_two('=', TokenType::GreaterEqual, TokenType::Greater),
            
            Some('!') => {
                if self.peek_char(1) != Some('=') {
                    return Err(CompilerError::lexer_error(
                        "Expected '=' after '!'".to_string(),
                        self.current_location(),
                    ));
                }
                self.advance();
                self.advance();
                TokenType::BangEqual
            }
            
            Some('+') => { self.advance(); TokenType::Plus }
            Some('-') => { self.advance(); TokenType::Minus }
            Some('*') => { self.advance(); TokenType::Star }
            Some('&') => { self.advance(); TokenType::Ampersand }
            Some('(') => { self.advance(); TokenType::LeftParen }
            Some(')') => { self.advance(); TokenType::RightParen }
            Some('{') => { self.advance(); TokenType::LeftBrace }
            Some('}') => { self.advance(); TokenType::RightBrace }
            Some('[') => { self.advance(); TokenType::LeftBracket }
            Some(']') => { self.advance(); TokenType::RightBracket }
            Some(';') => { self.advance(); TokenType::Semicolon }
            Some(',') => { self.advance(); TokenType::Comma }
            
            Some(ch) => {
                return Err(CompilerError::lexer_error(
                    format!("Unexpected character: {}", ch),
                    self.current_location(),
                ));
            }
        };
        
        let end_location = self.current_location();
        let span = SourceSpan::new(start_location, end_location);
        
        Ok(Token::new(token_type, span))
    }
    
    /// Tokenize entire input into a vector of tokens
    pub fn tokenize(&mut self) -> Result<Vec<Token>, CompilerError> {
        let mut tokens = Vec::new();
        
        loop {
            let token = self.next_token()?;
            let is_eof = matches!(token.token_type, TokenType::EndOfFile);
            tokens.push(token);
            
            if is_eof {
                break;
            }
        }
        
        Ok(tokens)
    }
}
