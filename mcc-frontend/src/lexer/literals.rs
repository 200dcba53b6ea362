//! Literal scanning for the MicroC lexer
//! 
//! Numbers with a decimal point are FLOAT literals, all others INT.

use crate::lexer::{Lexer, TokenType};
use mcc_common::CompilerError;

impl Lexer {
    /// Tokenize an integer or float literal
    pub fn tokenize_number(&mut self) -> Result<TokenType, CompilerError> {
        let start = self.current_location();
        let mut number = String::new();
        let mut is_float = false;
        
        while let Some(ch) = self.current_char() {
            if ch.is_ascii_digit() {
                number.push(ch);
                self.advance();
            } else if ch == '.' && !is_float {
                is_float = true;
                number.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        
        if is_float {
            let value = number.parse::<f64>().map_err(|_| {
                CompilerError::lexer_error(format!("Invalid float literal: {}", number), start)
            })?;
            return Ok(TokenType::FloatLiteral(value));
        }
        
        // INT values occupy one 32-bit word
        let value = number.parse::<i32>().map_err(|_| {
            CompilerError::lexer_error(format!("Integer literal out of range: {}", number), start)
        })?;
        Ok(TokenType::IntLiteral(i64::from(value)))
    }
    
    /// Tokenize a string literal
    pub fn tokenize_string_literal(&mut self) -> Result<TokenType, CompilerError> {
        self.advance(); // Skip opening quote
        let mut string = String::new();
        
        while let Some(ch) = self.current_char() {
            match ch {
                '"' => {
                    self.advance();
                    return Ok(TokenType::StringLiteral(string));
                }
                '\n' => break,
                '\\' => {
                    self.advance();
                    match self.current_char() {
                        Some('n') => string.push('\n'),
                        Some('t') => string.push('\t'),
                        Some('\\') => string.push('\\'),
                        Some('"') => string.push('"'),
                        Some(c) => {
                            return Err(CompilerError::lexer_error(
                                format!("Invalid escape sequence: \\{}", c),
                                self.current_location(),
                            ));
                        }
                        None => break,
                    }
                    self.advance();
                }
                _ => {
                    string.push(ch);
                    self.advance();
                }
            }
        }
        
        Err(CompilerError::lexer_error(
            "Unterminated string literal".to_string(),
            self.current_location(),
        ))
    }
}
