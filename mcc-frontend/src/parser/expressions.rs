//! Expression parsing with operator precedence
//! 
//! Every node is built through the typed constructors on [`Expression`], so
//! type errors surface here with the location of the offending operands.

use crate::ast::{ArithOp, Expression, RelOp};
use crate::lexer::TokenType;
use crate::parser::{check_assignable, Parser};
use mcc_common::{CompilerError, SourceSpan, Symbol, Type};

impl Parser {
    /// `expr relop expr`
    pub fn parse_condition(&mut self) -> Result<Expression, CompilerError> {
        let left = self.parse_expression()?;
        
        let op = match self.peek().map(|t| &t.token_type) {
            Some(TokenType::Less) => RelOp::Less,
            Some(TokenType::LessEqual) => RelOp::LessEqual,
            Some(TokenType::Greater) => RelOp::Greater,
            Some(TokenType::GreaterEqual) => RelOp::GreaterEqual,
            Some(TokenType::EqualEqual) => RelOp::Equal,
            Some(TokenType::BangEqual) => RelOp::NotEqual,
            _ => {
                let location = self.current_location();
                let found = self
                    .peek()
                    .map(|t| t.token_type.to_string())
                    .unwrap_or_else(|| "end of file".to_string());
                return Err(CompilerError::parse_error(
                    format!("Expected comparison operator in condition, found {}", found),
                    location,
                ));
            }
        };
        self.advance();
        
        let right = self.parse_expression()?;
        Expression::compare(op, left, right)
    }
    
    /// Additive expression
    pub fn parse_expression(&mut self) -> Result<Expression, CompilerError> {
        let mut left = self.parse_term()?;
        
        loop {
            let op = if self.match_token(&TokenType::Plus) {
                ArithOp::Add
            } else if self.match_token(&TokenType::Minus) {
                ArithOp::Sub
            } else {
                break;
            };
            let right = self.parse_term()?;
            left = Expression::binary(op, left, right)?;
        }
        
        Ok(left)
    }
    
    /// Multiplicative expression
    fn parse_term(&mut self) -> Result<Expression, CompilerError> {
        let mut left = self.parse_unary()?;
        
        loop {
            let op = if self.match_token(&TokenType::Star) {
                ArithOp::Mul
            } else if self.match_token(&TokenType::Slash) {
                ArithOp::Div
            } else {
                break;
            };
            let right = self.parse_unary()?;
            left = Expression::binary(op, left, right)?;
        }
        
        Ok(left)
    }
    
    /// Prefix operators and casts
    pub fn parse_unary(&mut self) -> Result<Expression, CompilerError> {
        let start = self.current_location();
        
        if self.match_token(&TokenType::Minus) {
            let operand = self.parse_unary()?;
            return Ok(Expression::negate(operand)?.with_span(self.span_from(start)));
        }
        
        if self.match_token(&TokenType::Star) {
            let operand = self.parse_unary()?;
            return Ok(Expression::deref(operand)?.with_span(self.span_from(start)));
        }
        
        if self.match_token(&TokenType::Ampersand) {
            let operand = self.parse_unary()?;
            return Ok(Expression::address_of(operand)?.with_span(self.span_from(start)));
        }
        
        let is_cast = self.check(&TokenType::LeftParen)
            && matches!(self.peek_ahead(1), Some(TokenType::Int) | Some(TokenType::Float));
        if is_cast {
            self.advance();
            let target = self.parse_type()?;
            self.expect(TokenType::RightParen, "cast")?;
            let operand = self.parse_unary()?;
            return Ok(Expression::cast(target, operand)?.with_span(self.span_from(start)));
        }
        
        self.parse_primary()
    }
    
    /// Literals, names, calls, indexing and parenthesised expressions
    pub fn parse_primary(&mut self) -> Result<Expression, CompilerError> {
        let start = self.current_location();
        let token = self.advance().ok_or_else(|| {
            CompilerError::parse_error("Unexpected end of file, expected expression".to_string(), start.clone())
        })?;
        
        match token.token_type {
            TokenType::IntLiteral(value) => Ok(Expression::int(value).with_span(token.span)),
            
            TokenType::FloatLiteral(value) => Ok(Expression::float(value).with_span(token.span)),
            
            TokenType::LeftParen => {
                let inner = self.parse_expression()?;
                self.expect(TokenType::RightParen, "parenthesized expression")?;
                Ok(inner)
            }
            
            TokenType::Malloc => {
                self.expect(TokenType::LeftParen, "malloc")?;
                let size = self.parse_expression()?;
                self.expect(TokenType::RightParen, "malloc")?;
                Ok(Expression::malloc(size)?.with_span(self.span_from(start)))
            }
            
            TokenType::Free => {
                self.expect(TokenType::LeftParen, "free")?;
                let pointer = self.parse_expression()?;
                self.expect(TokenType::RightParen, "free")?;
                Ok(Expression::free(pointer)?.with_span(self.span_from(start)))
            }
            
            TokenType::Identifier(name) => {
                if self.check(&TokenType::LeftParen) {
                    return self.parse_call(&name, token.span);
                }
                
                let base = self.variable_reference(&name, token.span)?;
                if !self.match_token(&TokenType::LeftBracket) {
                    return Ok(base);
                }
                
                let row = self.parse_expression()?;
                self.expect(TokenType::RightBracket, "array index")?;
                let element = if self.match_token(&TokenType::LeftBracket) {
                    let col = self.parse_expression()?;
                    self.expect(TokenType::RightBracket, "array index")?;
                    Expression::index2(base, row, col)?
                } else {
                    Expression::index(base, row)?
                };
                Ok(element.with_span(self.span_from(start)))
            }
            
            other => Err(CompilerError::parse_error(
                format!("Expected expression, found {}", other),
                token.span.start,
            )),
        }
    }
    
    /// `name(args)` checked against the function's declaration
    fn parse_call(&mut self, name: &str, name_span: SourceSpan) -> Result<Expression, CompilerError> {
        let location = name_span.start.clone();
        self.expect(TokenType::LeftParen, "call")?;
        
        let mut arguments = Vec::new();
        if !self.check(&TokenType::RightParen) {
            loop {
                arguments.push(self.parse_expression()?);
                if !self.match_token(&TokenType::Comma) {
                    break;
                }
            }
        }
        self.expect(TokenType::RightParen, "call")?;
        
        let symbol = self.symbols.lookup(name).ok_or_else(|| {
            CompilerError::semantic_error(format!("call to undeclared function '{}'", name), location.clone())
        })?;
        let function = self.symbols.function(symbol).ok_or_else(|| {
            CompilerError::semantic_error(format!("'{}' is not a function", name), location.clone())
        })?;
        
        if function.param_types().len() != arguments.len() {
            return Err(CompilerError::semantic_error(
                format!(
                    "function '{}' expects {} arguments, found {}",
                    name,
                    function.param_types().len(),
                    arguments.len()
                ),
                location,
            ));
        }
        for (arg, param) in arguments.iter().zip(function.param_types()) {
            check_assignable(&arg.expr_type, param, &arg.span, "argument")?;
        }
        
        let return_type = function.return_type.clone();
        Ok(Expression::call(name, symbol, return_type, arguments).with_span(self.span_from(location)))
    }
    
    /// A name used as a value: a variable or a string constant
    pub(crate) fn variable_reference(&self, name: &str, span: SourceSpan) -> Result<Expression, CompilerError> {
        let symbol = self.symbols.lookup(name).ok_or_else(|| {
            CompilerError::semantic_error(format!("undeclared identifier '{}'", name), span.start.clone())
        })?;
        
        let ty = match self.symbols.get(symbol) {
            Some(Symbol::Variable(var)) => var.ty.clone(),
            Some(Symbol::StringConstant(_)) => Type::Str,
            _ => {
                return Err(CompilerError::semantic_error(
                    format!("'{}' is not a variable", name),
                    span.start.clone(),
                ));
            }
        };
        
        Ok(Expression::variable(name, symbol, ty).with_span(span))
    }
}
