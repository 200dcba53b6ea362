//! Comment scanning for the MicroC lexer

use crate::lexer::{Lexer, TokenType};
use mcc_common::CompilerError;

impl Lexer {
    /// Tokenize line comment
    pub fn tokenize_line_comment(&mut self) -> TokenType {
        self.advance(); // Skip first '/'
        self.advance(); // Skip second '/'
        
        let mut comment = String::new();
        while let Some(ch) = self.current_char() {
            if ch == '\n' {
                break;
            }
            comment.push(ch);
            self.advance();
        }
        
        TokenType::LineComment(comment)
    }
    
    /// Tokenize block comment
    pub fn tokenize_block_comment(&mut self) -> Result<TokenType, CompilerError> {
        let start = self.current_location();
        self.advance(); // Skip '/'
        self.advance(); // Skip '*'
        
        let mut comment = String::new();
        while let Some(ch) = self.current_char() {
            if ch == '*' && self.peek_char(1) == Some('/') {
                self.advance();
                self.advance();
                return Ok(TokenType::BlockComment(comment));
            }
            comment.push(ch);
            self.advance();
        }
        
        Err(CompilerError::lexer_error(
            "Unterminated block comment".to_string(),
            start,
        ))
    }
}
