//! Statement parsing for MicroC
//! 
//! This module handles parsing of all statement types.

use crate::ast::{Expression, Statement, StatementKind};
use crate::lexer::TokenType;
use crate::parser::{check_assignable, Parser};
use mcc_common::{CompilerError, Type};

impl Parser {
    /// Statements up to (not including) the closing brace
    pub fn parse_statement_list(&mut self) -> Result<Vec<Statement>, CompilerError> {
        let mut statements = Vec::new();
        while !self.check(&TokenType::RightBrace) && !self.check(&TokenType::EndOfFile) {
            statements.push(self.parse_statement()?);
        }
        Ok(statements)
    }
    
    /// `{ statement* }`
    fn parse_block(&mut self, context: &str) -> Result<Vec<Statement>, CompilerError> {
        self.expect(TokenType::LeftBrace, context)?;
        let statements = self.parse_statement_list()?;
        self.expect(TokenType::RightBrace, context)?;
        Ok(statements)
    }
    
    /// Parse statement
    pub fn parse_statement(&mut self) -> Result<Statement, CompilerError> {
        let start_location = self.current_location();
        
        let kind = match self.peek().map(|t| &t.token_type) {
            Some(TokenType::If) => {
                self.advance();
                self.parse_if_statement()?
            }
            Some(TokenType::While) => {
                self.advance();
                self.parse_while_statement()?
            }
            Some(TokenType::Return) => {
                self.advance();
                self.parse_return_statement()?
            }
            Some(TokenType::Read) => {
                self.advance();
                self.parse_read_statement()?
            }
            Some(TokenType::Print) => {
                self.advance();
                self.parse_print_statement()?
            }
            Some(TokenType::Malloc) | Some(TokenType::Free) => self.parse_call_statement()?,
            Some(TokenType::Identifier(_)) if self.peek_ahead(1) == Some(&TokenType::LeftParen) => {
                self.parse_call_statement()?
            }
            _ => self.parse_assignment()?,
        };
        
        Ok(Statement::new(kind).with_span(self.span_from(start_location)))
    }
    
    fn parse_if_statement(&mut self) -> Result<StatementKind, CompilerError> {
        self.expect(TokenType::LeftParen, "if statement")?;
        let condition = self.parse_condition()?;
        self.expect(TokenType::RightParen, "if statement")?;
        
        let then_branch = self.parse_block("if statement")?;
        let else_branch = if self.match_token(&TokenType::Else) {
            Some(self.parse_block("else branch")?)
        } else {
            None
        };
        
        Ok(StatementKind::If { condition, then_branch, else_branch })
    }
    
    fn parse_while_statement(&mut self) -> Result<StatementKind, CompilerError> {
        self.expect(TokenType::LeftParen, "while statement")?;
        let condition = self.parse_condition()?;
        self.expect(TokenType::RightParen, "while statement")?;
        let body = self.parse_block("while statement")?;
        Ok(StatementKind::While { condition, body })
    }
    
    fn parse_return_statement(&mut self) -> Result<StatementKind, CompilerError> {
        let location = self.current_location();
        let function = self.current_function.clone().ok_or_else(|| {
            CompilerError::semantic_error("return outside of a function".to_string(), location.clone())
        })?;
        
        if self.match_token(&TokenType::Semicolon) {
            return Ok(StatementKind::Return(None));
        }
        
        let value = self.parse_expression()?;
        self.expect(TokenType::Semicolon, "return statement")?;
        
        if function.return_type == Type::Void {
            return Err(CompilerError::semantic_error(
                format!("void function '{}' cannot return a value", function.name),
                location,
            ));
        }
        check_assignable(&value.expr_type, &function.return_type, &value.span, "return")?;
        Ok(StatementKind::Return(Some(value)))
    }
    
    /// `read(name);` into an INT or FLOAT variable
    fn parse_read_statement(&mut self) -> Result<StatementKind, CompilerError> {
        self.expect(TokenType::LeftParen, "read statement")?;
        let (name, span) = self.expect_identifier("read statement")?;
        self.expect(TokenType::RightParen, "read statement")?;
        self.expect(TokenType::Semicolon, "read statement")?;
        
        let target = self.variable_reference(&name, span)?;
        if !matches!(target.expr_type, Type::Int | Type::Float) {
            return Err(CompilerError::semantic_error(
                format!("cannot read into '{}' of type {}", name, target.expr_type),
                target.span.start.clone(),
            ));
        }
        Ok(StatementKind::Read(target))
    }
    
    fn parse_print_statement(&mut self) -> Result<StatementKind, CompilerError> {
        self.expect(TokenType::LeftParen, "print statement")?;
        let value = self.parse_expression()?;
        self.expect(TokenType::RightParen, "print statement")?;
        self.expect(TokenType::Semicolon, "print statement")?;
        
        if value.expr_type == Type::Void {
            return Err(CompilerError::semantic_error(
                "cannot print a void value".to_string(),
                value.span.start.clone(),
            ));
        }
        Ok(StatementKind::Print(value))
    }
    
    /// A call evaluated for its side effects
    fn parse_call_statement(&mut self) -> Result<StatementKind, CompilerError> {
        let call = self.parse_primary()?;
        self.expect(TokenType::Semicolon, "call statement")?;
        Ok(StatementKind::Call(call))
    }
    
    /// `lval = expr;`
    fn parse_assignment(&mut self) -> Result<StatementKind, CompilerError> {
        let target = self.parse_unary()?;
        self.expect(TokenType::Equal, "assignment")?;
        let value = self.parse_expression()?;
        self.expect(TokenType::Semicolon, "assignment")?;
        
        check_lvalue(&target)?;
        check_assignable(&value.expr_type, &target.expr_type, &value.span, "assignment")?;
        Ok(StatementKind::Assign { target, value })
    }
}

fn check_lvalue(target: &Expression) -> Result<(), CompilerError> {
    if !target.is_lvalue() {
        return Err(CompilerError::semantic_error(
            "left side of assignment is not assignable".to_string(),
            target.span.start.clone(),
        ));
    }
    if target.expr_type == Type::Str {
        return Err(CompilerError::semantic_error(
            "string constants cannot be assigned".to_string(),
            target.span.start.clone(),
        ));
    }
    Ok(())
}
