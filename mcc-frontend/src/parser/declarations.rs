//! Declaration parsing for MicroC
//! 
//! Global variables, string constants, function prototypes and function
//! definitions. Each declaration is entered into the symbol table as soon as
//! it is recognised.

use crate::ast::{FunctionDefinition, Parameter, Program};
use crate::lexer::TokenType;
use crate::parser::{EnclosingFunction, Parser};
use mcc_common::{CompilerError, SourceLocation, SourceSpan, Type};
use log::debug;

impl Parser {
    /// Parse a whole program
    pub fn parse_program(&mut self) -> Result<Program, CompilerError> {
        let mut program = Program::default();
        
        while !self.check(&TokenType::EndOfFile) {
            if let Some(function) = self.parse_top_level_item()? {
                program.functions.push(function);
            }
        }
        
        Ok(program)
    }
    
    /// Parse one global declaration or function definition
    fn parse_top_level_item(&mut self) -> Result<Option<FunctionDefinition>, CompilerError> {
        let start = self.current_location();
        
        if self.match_token(&TokenType::String) {
            self.parse_string_declaration(start)?;
            return Ok(None);
        }
        
        let ty = self.parse_function_type()?;
        let (name, _) = self.expect_identifier("declaration")?;
        
        if self.check(&TokenType::LeftParen) {
            let params = self.parse_parameters()?;
            let param_types: Vec<Type> = params.iter().map(|(_, ty, _)| ty.clone()).collect();
            
            if self.match_token(&TokenType::Semicolon) {
                self.symbols
                    .declare_function(&name, ty, param_types)
                    .map_err(|e| e.at(start))?;
                return Ok(None);
            }
            
            return self.parse_function_definition(name, ty, params, start).map(Some);
        }
        
        if ty == Type::Void {
            return Err(CompilerError::semantic_error(
                format!("variable '{}' declared void", name),
                start,
            ));
        }
        self.expect(TokenType::Semicolon, "variable declaration")?;
        self.symbols.add_variable(&name, ty).map_err(|e| e.at(start))?;
        Ok(None)
    }
    
    /// `string name = "value";`
    fn parse_string_declaration(&mut self, start: SourceLocation) -> Result<(), CompilerError> {
        let (name, _) = self.expect_identifier("string declaration")?;
        self.expect(TokenType::Equal, "string declaration")?;
        let token = self.expect(TokenType::StringLiteral(String::new()), "string declaration")?;
        self.expect(TokenType::Semicolon, "string declaration")?;
        
        let TokenType::StringLiteral(value) = token.token_type else {
            return Err(CompilerError::parse_error("expected string literal".to_string(), start));
        };
        self.symbols.add_string(&name, &value).map_err(|e| e.at(start))?;
        Ok(())
    }
    
    /// Whether the current token starts a variable type
    pub(crate) fn is_type_start(&self) -> bool {
        self.check(&TokenType::Int) || self.check(&TokenType::Float)
    }
    
    /// `int` or `float` followed by any number of `*`
    pub(crate) fn parse_type(&mut self) -> Result<Type, CompilerError> {
        let mut ty = match self.advance() {
            Some(token) if token.token_type == TokenType::Int => Type::Int,
            Some(token) if token.token_type == TokenType::Float => Type::Float,
            Some(token) => {
                return Err(CompilerError::parse_error(
                    format!("Expected type, found {}", token.token_type),
                    token.span.start,
                ));
            }
            None => {
                return Err(CompilerError::parse_error(
                    "Unexpected end of file, expected type".to_string(),
                    self.current_location(),
                ));
            }
        };
        
        while self.match_token(&TokenType::Star) {
            ty = Type::pointer_to(ty);
        }
        Ok(ty)
    }
    
    /// A variable type or `void`
    fn parse_function_type(&mut self) -> Result<Type, CompilerError> {
        if self.match_token(&TokenType::Void) {
            return Ok(Type::Void);
        }
        self.parse_type()
    }
    
    /// `( type name, ... )`
    fn parse_parameters(&mut self) -> Result<Vec<(String, Type, SourceSpan)>, CompilerError> {
        self.expect(TokenType::LeftParen, "parameter list")?;
        
        let mut params = Vec::new();
        if !self.check(&TokenType::RightParen) {
            loop {
                let ty = self.parse_type()?;
                let (name, span) = self.expect_identifier("parameter list")?;
                params.push((name, ty, span));
                if !self.match_token(&TokenType::Comma) {
                    break;
                }
            }
        }
        
        self.expect(TokenType::RightParen, "parameter list")?;
        Ok(params)
    }
    
    fn parse_function_definition(
        &mut self,
        name: String,
        return_type: Type,
        params: Vec<(String, Type, SourceSpan)>,
        start: SourceLocation,
    ) -> Result<FunctionDefinition, CompilerError> {
        let param_types: Vec<Type> = params.iter().map(|(_, ty, _)| ty.clone()).collect();
        let symbol = self
            .symbols
            .define_function(&name, return_type.clone(), param_types)
            .map_err(|e| e.at(start.clone()))?;
        
        self.symbols.push_function_scope(&name);
        let named: Vec<(String, Type)> = params.iter().map(|(n, ty, _)| (n.clone(), ty.clone())).collect();
        let ids = self
            .symbols
            .add_parameters(&named)
            .map_err(|e| e.at(start.clone()))?;
        let parameters = params
            .into_iter()
            .zip(ids)
            .map(|((name, param_type, _), symbol)| Parameter { name, param_type, symbol })
            .collect();
        
        self.current_function = Some(EnclosingFunction {
            name: name.clone(),
            return_type: return_type.clone(),
        });
        
        self.expect(TokenType::LeftBrace, "function body")?;
        
        // Locals come before any statement
        while self.is_type_start() {
            let decl_start = self.current_location();
            let ty = self.parse_type()?;
            let (local, _) = self.expect_identifier("local declaration")?;
            self.expect(TokenType::Semicolon, "local declaration")?;
            self.symbols.add_variable(&local, ty).map_err(|e| e.at(decl_start))?;
        }
        
        let body = self.parse_statement_list()?;
        self.expect(TokenType::RightBrace, "function body")?;
        
        self.current_function = None;
        let slots = self.symbols.pop_scope();
        debug!("parsed function {} ({} locals)", name, slots);
        
        Ok(FunctionDefinition {
            name,
            symbol,
            return_type,
            parameters,
            body,
            span: self.span_from(start),
        })
    }
}
